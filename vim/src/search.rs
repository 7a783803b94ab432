use crate::traits::Document;

/// The last `/` or `?` search and its match ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pattern: String,
    matches: Vec<(usize, usize)>,
    case_sensitive: bool,
    backward: bool,
    stale: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every match of `pattern`, overlapping ones included.
    pub fn search(&mut self, doc: &dyn Document, pattern: &str, case_sensitive: bool) {
        self.pattern = pattern.to_string();
        self.case_sensitive = case_sensitive;
        self.stale = false;
        self.matches.clear();
        let width = pattern.chars().count();
        if width == 0 {
            return;
        }
        let len = doc.len();
        let mut from = 0;
        while from < len {
            let Some(at) = doc.find_forward(pattern, from, case_sensitive) else {
                break;
            };
            if at < from {
                break;
            }
            self.matches.push((at, at + width));
            from = at + 1;
        }
    }

    /// Start of the `count`-th match strictly after `pos`, wrapping around.
    pub fn next(&mut self, doc: &dyn Document, pos: usize, count: usize) -> Option<usize> {
        self.prune(doc);
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        let first = self.matches.partition_point(|m| m.0 <= pos);
        let idx = (first + count.max(1) - 1) % total;
        Some(self.matches[idx].0)
    }

    /// Start of the `count`-th match strictly before `pos`, wrapping around.
    pub fn previous(&mut self, doc: &dyn Document, pos: usize, count: usize) -> Option<usize> {
        self.prune(doc);
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        let before = self.matches.partition_point(|m| m.0 < pos);
        let steps = count.max(1) % total;
        let idx = (before + total - steps) % total;
        Some(self.matches[idx].0)
    }

    /// Matches are re-checked against the text on the next navigation.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    fn prune(&mut self, doc: &dyn Document) {
        if !self.stale {
            return;
        }
        self.stale = false;
        let len = doc.len();
        let pattern = &self.pattern;
        let case_sensitive = self.case_sensitive;
        let before = self.matches.len();
        self.matches.retain(|&(start, end)| {
            if end > len {
                return false;
            }
            let text = doc.text_in_range(start, end);
            if case_sensitive {
                text == *pattern
            } else {
                text.to_lowercase() == pattern.to_lowercase()
            }
        });
        if self.matches.len() != before {
            log::debug!("dropped {} stale search matches", before - self.matches.len());
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self) -> &[(usize, usize)] {
        &self.matches
    }

    pub fn is_backward(&self) -> bool {
        self.backward
    }

    pub fn set_backward(&mut self, backward: bool) {
        self.backward = backward;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}
