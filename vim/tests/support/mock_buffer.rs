use std::collections::HashMap;

use ropey::Rope;
use vim_modal::{Document, LineInfo};

/// A rope-backed document with one cursor and a snapshot undo stack.
pub struct MockBuffer {
    rope: Rope,
    path: String,
    cursor: usize,
    selection: (usize, usize),
    viewport: Option<(usize, usize)>,
    undo_stack: Vec<(String, usize)>,
    redo_stack: Vec<(String, usize)>,
    /// Other files the host can switch to, by path.
    files: HashMap<String, String>,
    /// Where `goto_definition` lands, if anywhere.
    pub definition: Option<usize>,
    pub highlights: Vec<(usize, usize)>,
}

impl MockBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: "main.rs".to_string(),
            cursor: 0,
            selection: (0, 0),
            viewport: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            files: HashMap::new(),
            definition: None,
            highlights: Vec::new(),
        }
    }

    pub fn with_cursor(mut self, pos: usize) -> Self {
        self.cursor = pos;
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_viewport(mut self, start: usize, end: usize) -> Self {
        self.viewport = Some((start, end));
        self
    }

    /// Register another file that `open_file` can switch to.
    pub fn add_file(&mut self, path: &str, text: &str) {
        self.files.insert(path.to_string(), text.to_string());
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the whole text behind the engine's back.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = self.cursor.min(self.rope.len_chars());
    }

    fn snapshot(&mut self) {
        self.undo_stack.push((self.rope.to_string(), self.cursor));
        self.redo_stack.clear();
    }
}

impl Document for MockBuffer {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn text_in_range(&self, start: usize, end: usize) -> String {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn insert_text(&mut self, pos: usize, text: &str) {
        self.snapshot();
        let pos = pos.min(self.len());
        self.rope.insert(pos, text);
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return;
        }
        self.snapshot();
        self.rope.remove(start..end);
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len).max(start.min(len)));
        self.snapshot();
        self.rope.remove(start..end);
        self.rope.insert(start, text);
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn set_position(&mut self, pos: usize) {
        self.cursor = pos.min(self.len());
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = (start, end);
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_at(&self, line: usize) -> LineInfo {
        let line = line.min(self.line_count().saturating_sub(1));
        let start = self.rope.line_to_char(line);
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        let end = start + text.chars().count();
        LineInfo { start, end, text }
    }

    fn line_number_of(&self, pos: usize) -> usize {
        self.rope.char_to_line(pos.min(self.len()))
    }

    fn find_forward(&self, pattern: &str, from: usize, case_sensitive: bool) -> Option<usize> {
        let haystack: Vec<char> = self.rope.chars().collect();
        let needle: Vec<char> = pattern.chars().collect();
        if needle.is_empty() || needle.len() > haystack.len() {
            return None;
        }
        (from..=haystack.len() - needle.len()).find(|&i| matches_at(&haystack, &needle, i, case_sensitive))
    }

    fn find_backward(&self, pattern: &str, from: usize, case_sensitive: bool) -> Option<usize> {
        let haystack: Vec<char> = self.rope.chars().collect();
        let needle: Vec<char> = pattern.chars().collect();
        if needle.is_empty() || needle.len() > haystack.len() {
            return None;
        }
        let last = from.min(haystack.len() - needle.len());
        (0..=last).rev().find(|&i| matches_at(&haystack, &needle, i, case_sensitive))
    }

    fn file_path(&self) -> &str {
        &self.path
    }

    fn toggle_comment(&mut self, first_line: usize, last_line: usize) {
        for number in (first_line..=last_line).rev() {
            let line = self.line_at(number);
            if line.text.starts_with("// ") {
                self.delete_range(line.start, line.start + 3);
            } else {
                self.insert_text(line.start, "// ");
            }
        }
    }

    fn visible_range(&self) -> (usize, usize) {
        self.viewport.unwrap_or((0, self.len()))
    }

    fn undo(&mut self) {
        if let Some((text, cursor)) = self.undo_stack.pop() {
            self.redo_stack.push((self.rope.to_string(), self.cursor));
            self.rope = Rope::from_str(&text);
            self.cursor = cursor;
        }
    }

    fn redo(&mut self) {
        if let Some((text, cursor)) = self.redo_stack.pop() {
            self.undo_stack.push((self.rope.to_string(), self.cursor));
            self.rope = Rope::from_str(&text);
            self.cursor = cursor;
        }
    }

    fn goto_definition(&mut self) {
        if let Some(target) = self.definition {
            self.cursor = target;
        }
    }

    fn open_file(&mut self, path: &str) -> bool {
        let Some(text) = self.files.remove(path) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.path, path.to_string());
        self.files.insert(previous, self.rope.to_string());
        self.rope = Rope::from_str(&text);
        self.cursor = 0;
        true
    }

    fn highlight_range(&mut self, start: usize, end: usize, _duration_ms: u64) {
        self.highlights.push((start, end));
    }
}

fn matches_at(haystack: &[char], needle: &[char], at: usize, case_sensitive: bool) -> bool {
    haystack[at..at + needle.len()].iter().zip(needle).all(|(a, b)| {
        if case_sensitive {
            a == b
        } else {
            a.to_lowercase().eq(b.to_lowercase())
        }
    })
}
