#![allow(dead_code)]

pub mod mock_buffer;
pub mod mock_clipboard;

use vim_modal::{Document, Engine, KeyEvent};

pub use mock_buffer::MockBuffer;
pub use mock_clipboard::MockClipboard;

/// Feed a command string, one key per character. `\x1b` is Esc and `\n`
/// is Enter; other control characters become Ctrl chords.
pub fn feed(engine: &mut Engine, doc: &mut dyn Document, keys: &str) {
    for c in keys.chars() {
        engine.handle_key(doc, KeyEvent::from_text(c));
    }
}

/// Feed keys and run any macro playback they scheduled.
pub fn feed_all(engine: &mut Engine, doc: &mut dyn Document, keys: &str) {
    feed(engine, doc, keys);
    engine.run_macros(doc);
}
