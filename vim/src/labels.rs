//! Jump labels: single-key targets inside the viewport.
//!
//! The engine only computes targets and their labels; drawing them is up to
//! the host (see [`Engine::jump_labels`](crate::Engine::jump_labels)).

use crate::motion::{first_non_blank, next_word_start, visible_lines, word_backward};
use crate::traits::Document;

pub const LABEL_ALPHABET: &str = "asdfghjklqwertyuiopzxcvbnm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelScope {
    WordsForward,
    WordsBackward,
    LinesForward,
    LinesBackward,
}

impl LabelScope {
    pub fn from_key(key: char) -> Option<LabelScope> {
        match key {
            'w' => Some(LabelScope::WordsForward),
            'b' => Some(LabelScope::WordsBackward),
            'j' => Some(LabelScope::LinesForward),
            'k' => Some(LabelScope::LinesBackward),
            _ => None,
        }
    }

    pub fn is_linewise(self) -> bool {
        matches!(self, LabelScope::LinesForward | LabelScope::LinesBackward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel {
    pub label: char,
    pub position: usize,
}

/// Label the targets of `scope` nearest to `pos`, closest first.
pub fn compute(doc: &dyn Document, pos: usize, scope: LabelScope) -> Vec<JumpLabel> {
    let capacity = LABEL_ALPHABET.chars().count();
    let (view_start, view_end) = doc.visible_range();
    let mut targets = Vec::new();
    match scope {
        LabelScope::WordsForward => {
            let mut at = pos;
            while targets.len() < capacity {
                let next = next_word_start(doc, at, false);
                if next <= at || next >= view_end.min(doc.len()) {
                    break;
                }
                targets.push(next);
                at = next;
            }
        }
        LabelScope::WordsBackward => {
            let mut at = pos;
            while targets.len() < capacity {
                let Some(prev) = word_backward(doc, at, 1, false).target else {
                    break;
                };
                if prev >= at || prev < view_start {
                    break;
                }
                targets.push(prev);
                at = prev;
            }
        }
        LabelScope::LinesForward => {
            let (_, last) = visible_lines(doc);
            let current = doc.line_number_of(pos);
            targets.extend(
                (current + 1..=last)
                    .take(capacity)
                    .map(|n| first_non_blank(&doc.line_at(n))),
            );
        }
        LabelScope::LinesBackward => {
            let (first, _) = visible_lines(doc);
            let current = doc.line_number_of(pos);
            targets.extend(
                (first..current)
                    .rev()
                    .take(capacity)
                    .map(|n| first_non_blank(&doc.line_at(n))),
            );
        }
    }
    LABEL_ALPHABET
        .chars()
        .zip(targets)
        .map(|(label, position)| JumpLabel { label, position })
        .collect()
}
