use std::cell::RefCell;
use std::rc::Rc;

use vim_modal::Clipboard;

/// A clipboard whose content stays visible to the test after the engine
/// takes ownership of a clone.
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Rc<RefCell<Option<String>>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.content.borrow().clone()
    }

    pub fn put(&self, text: &str) {
        *self.content.borrow_mut() = Some(text.to_string());
    }
}

impl Clipboard for MockClipboard {
    fn get(&mut self) -> Option<String> {
        self.content.borrow().clone()
    }

    fn set(&mut self, text: String) {
        *self.content.borrow_mut() = Some(text);
    }
}
