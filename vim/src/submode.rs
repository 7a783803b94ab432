//! Submodes: transient states that own the next keystrokes.
//!
//! A submode receives only the characters typed since it was entered and
//! resolves them into a key, a character, a pair of characters or a line of
//! text. The engine then carries out what the submode was entered for
//! (its [`Then`]) with the counts gathered on the way.

use std::borrow::Cow;

use crate::motion::FindKind;
use crate::operator::Operator;
use crate::types::Span;

/// The count typed in front of a command, as a number and as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Count {
    pub value: usize,
    pub text: String,
}

impl Count {
    pub fn parse(text: &str) -> Self {
        let value = text
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0usize, |acc, d| acc.saturating_mul(10).saturating_add(d as usize));
        Self {
            value: if text.is_empty() { 1 } else { value.max(1) },
            text: text.to_string(),
        }
    }

    pub fn is_explicit(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Counts gathered by every nesting level. `2d3w` holds `[2, 3]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Counts {
    values: Vec<usize>,
    texts: Vec<String>,
}

impl Counts {
    pub fn from_count(count: &Count) -> Self {
        let mut counts = Self::default();
        counts.push(count);
        counts
    }

    pub fn push(&mut self, count: &Count) {
        self.values.push(count.value.max(1));
        self.texts.push(count.text.clone());
    }

    pub fn with(&self, count: &Count) -> Self {
        let mut counts = self.clone();
        counts.push(count);
        counts
    }

    /// The effective count; absent levels count as one.
    pub fn product(&self) -> usize {
        self.values.iter().fold(1usize, |acc, v| acc.saturating_mul(*v))
    }

    /// Whether any level had a count typed.
    pub fn is_explicit(&self) -> bool {
        self.texts.iter().any(|t| !t.is_empty())
    }
}

/// What to do with the motion a submode resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Then {
    /// Move the cursor (Normal mode).
    Move,
    /// Extend the selection (Visual modes).
    Select,
    /// Apply an operator to the motion's range.
    Operate(Operator),
    /// Ask for a surround character, then wrap the motion's range.
    SurroundWrap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubModeKind {
    /// Waiting for the motion of an operator. `op_key` repeated selects
    /// whole lines (`dd`, `gUU`, `yss`).
    Motion { op_key: char },
    /// After `g`.
    GPrefix,
    TextObject { around: bool },
    FindChar(FindKind),
    Sneak { forward: bool },
    /// Collects a pattern up to Enter.
    Search { forward: bool },
    /// `'` (line-wise) or `` ` `` (exact).
    JumpToMark { exact: bool },
    SetMark,
    SelectRegister,
    RecordMacro,
    PlayMacro,
    ReplaceChar,
    SurroundDelete,
    SurroundChange,
    SurroundWith { span: Span },
    Leader,
    JumpLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMode {
    pub kind: SubModeKind,
    pub counts: Counts,
    pub then: Then,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Pending,
    Cancelled,
    Key { count: Count, key: char },
    Char(char),
    Pair(char, char),
    Text(String),
}

const ESCAPE: char = '\x1b';

impl SubMode {
    pub fn new(kind: SubModeKind, counts: Counts, then: Then) -> Self {
        Self { kind, counts, then }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            SubModeKind::Motion { .. } => "motion",
            SubModeKind::GPrefix => "g",
            SubModeKind::TextObject { .. } => "text-object",
            SubModeKind::FindChar(_) => "find-char",
            SubModeKind::Sneak { .. } => "sneak",
            SubModeKind::Search { .. } => "search",
            SubModeKind::JumpToMark { .. } => "jump-to-mark",
            SubModeKind::SetMark => "set-mark",
            SubModeKind::SelectRegister => "register",
            SubModeKind::RecordMacro => "record-macro",
            SubModeKind::PlayMacro => "play-macro",
            SubModeKind::ReplaceChar => "replace",
            SubModeKind::SurroundDelete => "surround-delete",
            SubModeKind::SurroundChange => "surround-change",
            SubModeKind::SurroundWith { .. } => "surround-with",
            SubModeKind::Leader => "leader",
            SubModeKind::JumpLabel => "jump-label",
        }
    }

    /// Interpret the characters typed since the submode was entered.
    pub fn resolve(&self, own: &str) -> Resolution {
        match &self.kind {
            SubModeKind::Motion { .. } => resolve_key(own),
            SubModeKind::Sneak { .. } | SubModeKind::SurroundChange => {
                let mut chars = own.chars();
                match (chars.next(), chars.next()) {
                    (Some(ESCAPE), _) | (_, Some(ESCAPE)) => Resolution::Cancelled,
                    (Some(a), Some(b)) => Resolution::Pair(a, b),
                    _ => Resolution::Pending,
                }
            }
            SubModeKind::Search { .. } => {
                if own.contains(ESCAPE) {
                    Resolution::Cancelled
                } else if let Some(pattern) = own.strip_suffix('\n') {
                    Resolution::Text(pattern.to_string())
                } else {
                    Resolution::Pending
                }
            }
            _ => match own.chars().next() {
                None => Resolution::Pending,
                Some(ESCAPE) => Resolution::Cancelled,
                Some(c) => Resolution::Char(c),
            },
        }
    }
}

/// `(\d*)(char)`, with a lone `0` standing for the start-of-line motion.
fn resolve_key(own: &str) -> Resolution {
    if own.contains(ESCAPE) {
        return Resolution::Cancelled;
    }
    if own == "0" {
        return Resolution::Key {
            count: Count::parse(""),
            key: '0',
        };
    }
    let digits: String = own.chars().take_while(char::is_ascii_digit).collect();
    match own.chars().nth(digits.chars().count()) {
        Some(key) => Resolution::Key {
            count: Count::parse(&digits),
            key,
        },
        None => Resolution::Pending,
    }
}

/// Name a command character is looked up under.
pub fn key_name(c: char) -> Cow<'static, str> {
    let name = match c {
        '$' => "dollar",
        '^' => "caret",
        '%' => "percent",
        ';' => "semicolon",
        ',' => "comma",
        '~' => "tilde",
        '.' => "dot",
        '"' => "quote",
        '\'' => "apostrophe",
        '`' => "backtick",
        '@' => "at",
        '>' => "greater",
        '<' => "less",
        '/' => "slash",
        '?' => "question",
        '*' => "asterisk",
        '#' => "hash",
        '{' => "lbrace",
        '}' => "rbrace",
        '_' => "underscore",
        '-' => "minus",
        '+' => "plus",
        ' ' => "space",
        '\x1b' => "escape",
        '\n' | '\r' => "enter",
        '\x08' | '\x7f' => "backspace",
        '\t' => "tab",
        '\x0f' => "ctrl_o",
        '\x12' => "ctrl_r",
        '\x04' => "ctrl_d",
        '\x15' => "ctrl_u",
        other => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_multiply_across_levels() {
        let counts = Counts::from_count(&Count::parse("2")).with(&Count::parse("3"));
        assert_eq!(counts.product(), 6);
        assert!(counts.is_explicit());
        assert_eq!(Counts::from_count(&Count::parse("")).product(), 1);
    }

    #[test]
    fn motion_resolution_waits_for_digits() {
        let sub = SubMode::new(SubModeKind::Motion { op_key: 'd' }, Counts::default(), Then::Move);
        assert_eq!(sub.resolve("3"), Resolution::Pending);
        assert_eq!(
            sub.resolve("3w"),
            Resolution::Key {
                count: Count::parse("3"),
                key: 'w'
            }
        );
        assert_eq!(sub.resolve("\x1b"), Resolution::Cancelled);
    }

    #[test]
    fn search_resolves_on_enter() {
        let sub = SubMode::new(SubModeKind::Search { forward: true }, Counts::default(), Then::Move);
        assert_eq!(sub.resolve("fo"), Resolution::Pending);
        assert_eq!(sub.resolve("foo\n"), Resolution::Text("foo".into()));
    }
}
