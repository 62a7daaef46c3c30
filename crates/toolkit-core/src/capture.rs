// SharedBuffer: an in-memory stdout for a CommandChannel.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// A cloneable `Write` sink. Every clone appends to the same buffer, so one
/// clone can be handed to a `CommandChannel` while another inspects what was
/// written.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Return the contents and clear the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.inner.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
