//! Clipboard backends for the `+` register.

use crate::traits::Clipboard;

/// Process-local clipboard. The default when the host provides none.
#[derive(Default, Debug, Clone)]
pub struct MemoryClipboard {
    content: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.content = Some(text);
    }
}

/// The operating system clipboard.
///
/// Construction never fails: when no clipboard is reachable (headless
/// sessions) reads return `None` and writes are dropped.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("system clipboard unavailable: {err}");
                None
            }
        };
        Self { inner }
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        self.inner.as_mut()?.get_text().ok()
    }

    fn set(&mut self, text: String) {
        if let Some(clipboard) = self.inner.as_mut()
            && let Err(err) = clipboard.set_text(text)
        {
            log::warn!("failed to write system clipboard: {err}");
        }
    }
}
