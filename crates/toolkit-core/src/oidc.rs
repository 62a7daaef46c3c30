// OIDC ID token request for cloud federation.
// A single GET against the runner-provided endpoint; retries and proxy
// negotiation are left to reqwest and the caller.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::command_channel::CommandChannel;
use crate::constants::variables;
use crate::error::{CommandError, Result};

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Deserialize)]
struct TokenResponse {
    value: Option<String>,
}

/// Append the audience to the request URL. The runner's URL already carries
/// a query string, so the audience is added with `&`.
pub fn id_token_url(base: &str, audience: Option<&str>) -> Result<Url> {
    let mut raw = base.to_string();
    if let Some(audience) = audience {
        raw.push_str("&audience=");
        raw.extend(utf8_percent_encode(audience, URI_COMPONENT));
    }
    Url::parse(&raw).map_err(|e| {
        CommandError::Configuration(format!(
            "Invalid {} '{raw}': {e}",
            variables::ID_TOKEN_REQUEST_URL
        ))
    })
}

impl CommandChannel {
    /// Request an ID token for `audience` and mask it in the log.
    pub async fn get_id_token(&self, audience: Option<&str>) -> Result<String> {
        let client = Client::builder()
            .user_agent(concat!("actions-toolkit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        self.get_id_token_with(&client, audience).await
    }

    /// Same as [`CommandChannel::get_id_token`] with a caller-supplied client.
    pub async fn get_id_token_with(&self, client: &Client, audience: Option<&str>) -> Result<String> {
        let base = self
            .environment()
            .non_empty_var(variables::ID_TOKEN_REQUEST_URL)
            .ok_or_else(|| {
                CommandError::Configuration(format!(
                    "Unable to get {} env variable",
                    variables::ID_TOKEN_REQUEST_URL
                ))
            })?;
        let url = id_token_url(&base, audience)?;
        tracing::debug!("Requesting ID token from {}", url.path());

        let mut request = client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = self
            .environment()
            .non_empty_var(variables::ID_TOKEN_REQUEST_TOKEN)
        {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body: TokenResponse = response.json().await?;
        let token = body
            .value
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CommandError::IdToken("Response json body do not have ID Token field".into()))?;

        self.set_secret(&token)?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SharedBuffer;
    use crate::environment::MapEnvironment;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use toolkit_sdk::EOL;

    /// Serve one HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8(request).unwrap()
        });
        (format!("http://{addr}/token?api-version=2.0"), handle)
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn audience_is_uri_component_encoded() {
        let url = id_token_url("https://example.com/t?api-version=2.0", Some("api://Azure AD")).unwrap();
        assert_eq!(url.query(), Some("api-version=2.0&audience=api%3A%2F%2FAzure%20AD"));

        let url = id_token_url("https://example.com/t?x=1", None).unwrap();
        assert_eq!(url.query(), Some("x=1"));
    }

    #[test]
    fn invalid_url_is_configuration_error() {
        let err = id_token_url("not a url", None).unwrap_err();
        assert!(matches!(err, CommandError::Configuration(_)));
    }

    #[tokio::test]
    async fn missing_request_url() {
        let channel = CommandChannel::new(Arc::new(MapEnvironment::new()), Box::new(SharedBuffer::new()));
        let err = channel.get_id_token_with(&client(), None).await.unwrap_err();
        assert!(matches!(err, CommandError::Configuration(msg) if msg.contains("ACTIONS_ID_TOKEN_REQUEST_URL")));
    }

    #[tokio::test]
    async fn fetches_and_masks_token() {
        let (url, server) = serve_once("200 OK", r#"{"value":"id-token-123"}"#).await;
        let out = SharedBuffer::new();
        let env = MapEnvironment::new()
            .with("ACTIONS_ID_TOKEN_REQUEST_URL", url)
            .with("ACTIONS_ID_TOKEN_REQUEST_TOKEN", "request-token");
        let channel = CommandChannel::new(Arc::new(env), Box::new(out.clone()));

        let token = channel
            .get_id_token_with(&client(), Some("sts.amazonaws.com"))
            .await
            .unwrap();

        assert_eq!(token, "id-token-123");
        assert_eq!(out.contents(), format!("::add-mask::id-token-123{EOL}"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /token?api-version=2.0&audience=sts.amazonaws.com HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer request-token"));
    }

    #[tokio::test]
    async fn missing_value_field() {
        let (url, server) = serve_once("200 OK", "{}").await;
        let out = SharedBuffer::new();
        let env = MapEnvironment::new().with("ACTIONS_ID_TOKEN_REQUEST_URL", url);
        let channel = CommandChannel::new(Arc::new(env), Box::new(out.clone()));

        let err = channel.get_id_token_with(&client(), None).await.unwrap_err();
        assert!(matches!(err, CommandError::IdToken(_)));
        assert!(out.is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn http_error_status() {
        let (url, server) = serve_once("403 Forbidden", r#"{"message":"denied"}"#).await;
        let env = MapEnvironment::new().with("ACTIONS_ID_TOKEN_REQUEST_URL", url);
        let channel = CommandChannel::new(Arc::new(env), Box::new(SharedBuffer::new()));

        let err = channel.get_id_token_with(&client(), None).await.unwrap_err();
        assert!(matches!(err, CommandError::Http(_)));
        server.await.unwrap();
    }
}
