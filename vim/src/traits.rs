use crate::types::LineInfo;

/// The host text buffer the interpreter drives.
///
/// All positions are character offsets into the document's flat character
/// stream. Lines are separated by `'\n'`. The trait is object safe; the
/// engine works against `&mut dyn Document`.
pub trait Document {
    // Text
    fn len(&self) -> usize;
    fn text_in_range(&self, start: usize, end: usize) -> String;
    fn insert_text(&mut self, pos: usize, text: &str);
    fn delete_range(&mut self, start: usize, end: usize);

    // Cursor and selection. The selection is half-open and independent of
    // the cursor position.
    fn position(&self) -> usize;
    fn set_position(&mut self, pos: usize);
    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);

    // Lines
    fn line_count(&self) -> usize;
    fn line_at(&self, line: usize) -> LineInfo;
    fn line_number_of(&self, pos: usize) -> usize;

    // Search-in-document: start offset of the first match at or after
    // `from` (forward) or at or before `from` (backward).
    fn find_forward(&self, pattern: &str, from: usize, case_sensitive: bool) -> Option<usize>;
    fn find_backward(&self, pattern: &str, from: usize, case_sensitive: bool) -> Option<usize>;

    /// Identifies the document for marks and the jump list.
    fn file_path(&self) -> &str;

    /// Toggle line comments on `first_line..=last_line` using the host's
    /// comment syntax.
    fn toggle_comment(&mut self, first_line: usize, last_line: usize);

    /// Replace `[start, end)` with `text` as one edit. Hosts with an undo
    /// history override this so `r`, `~`, case operators and `cs` undo in
    /// one step.
    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        self.delete_range(start, end);
        self.insert_text(start, text);
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len() {
            return None;
        }
        self.text_in_range(pos, pos + 1).chars().next()
    }

    /// The visible `[start, end)` range of the viewport.
    fn visible_range(&self) -> (usize, usize) {
        (0, self.len())
    }

    fn undo(&mut self) {}
    fn redo(&mut self) {}

    /// Ask the host's code intelligence to move the cursor to a definition.
    fn goto_definition(&mut self) {}

    /// Switch the host to another file. Returns `false` when unsupported.
    fn open_file(&mut self, _path: &str) -> bool {
        false
    }

    /// Briefly highlight a range, used for yank feedback.
    fn highlight_range(&mut self, _start: usize, _end: usize, _duration_ms: u64) {}
}

pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}
