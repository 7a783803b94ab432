//! Text objects (`iw`, `a"`, `i(` ...).
//!
//! Every object resolves to an explicit `[start, end)` range reported as a
//! [`Wise::Block`](crate::types::Wise::Block) motion result.

use crate::motion::{CharClass, char_class, line_of};
use crate::traits::Document;
use crate::types::MotionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObject {
    Word { big: bool },
    Quote(char),
    Bracket { open: char, close: char },
}

impl TextObject {
    pub fn from_char(c: char) -> Option<TextObject> {
        let object = match c {
            'w' => TextObject::Word { big: false },
            'W' => TextObject::Word { big: true },
            '"' | '\'' | '`' => TextObject::Quote(c),
            '(' | ')' | 'b' => TextObject::Bracket { open: '(', close: ')' },
            '[' | ']' => TextObject::Bracket { open: '[', close: ']' },
            '{' | '}' | 'B' => TextObject::Bracket { open: '{', close: '}' },
            '<' | '>' => TextObject::Bracket { open: '<', close: '>' },
            _ => return None,
        };
        Some(object)
    }
}

pub fn select(
    doc: &dyn Document,
    pos: usize,
    object: TextObject,
    around: bool,
    count: usize,
) -> MotionResult {
    let range = match object {
        TextObject::Word { big } => word(doc, pos, big, around, count.max(1)),
        TextObject::Quote(quote) => quoted(doc, pos, quote, around),
        TextObject::Bracket { open, close } => bracketed(doc, pos, open, close, around, count.max(1)),
    };
    match range {
        Some((start, end)) => MotionResult::block(start, end),
        None => MotionResult::failed(),
    }
}

/// Runs of same-class characters on a line, as `(start, end, class)`
/// column ranges.
fn class_runs(chars: &[char], big: bool) -> Vec<(usize, usize, CharClass)> {
    let mut runs: Vec<(usize, usize, CharClass)> = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        let class = char_class(c, big);
        match runs.last_mut() {
            Some(run) if run.2 == class => run.1 = i + 1,
            _ => runs.push((i, i + 1, class)),
        }
    }
    runs
}

fn word(doc: &dyn Document, pos: usize, big: bool, around: bool, count: usize) -> Option<(usize, usize)> {
    let line = line_of(doc, pos);
    let chars: Vec<char> = line.text.chars().collect();
    if chars.is_empty() {
        return None;
    }
    let col = pos.saturating_sub(line.start).min(chars.len() - 1);
    let runs = class_runs(&chars, big);
    let idx = runs.iter().position(|run| run.0 <= col && col < run.1)?;

    if !around {
        let last = (idx + count - 1).min(runs.len() - 1);
        return Some((line.start + runs[idx].0, line.start + runs[last].1));
    }

    let mut start = runs[idx].0;
    let mut last = idx;
    let mut words = 0;
    if runs[idx].2 == CharClass::Blank {
        // Leading blanks plus the following words.
        while words < count && last + 1 < runs.len() {
            last += 1;
            if runs[last].2 != CharClass::Blank {
                words += 1;
            }
        }
        return Some((line.start + start, line.start + runs[last].1));
    }

    words = 1;
    while words < count && last + 1 < runs.len() {
        last += 1;
        if runs[last].2 != CharClass::Blank {
            words += 1;
        }
    }
    let mut end = runs[last].1;
    if last + 1 < runs.len() && runs[last + 1].2 == CharClass::Blank {
        end = runs[last + 1].1;
    } else if idx > 0 && runs[idx - 1].2 == CharClass::Blank {
        start = runs[idx - 1].0;
    }
    Some((line.start + start, line.start + end))
}

fn quoted(doc: &dyn Document, pos: usize, quote: char, around: bool) -> Option<(usize, usize)> {
    let line = line_of(doc, pos);
    let chars: Vec<char> = line.text.chars().collect();
    let col = pos.saturating_sub(line.start);
    let quotes: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| c == quote && (i == 0 || chars[i - 1] != '\\'))
        .map(|(i, _)| i)
        .collect();

    // Quote parity from the line start decides which quotes open a string.
    let pair = quotes
        .chunks_exact(2)
        .find(|pair| pair[0] <= col && col <= pair[1])
        .or_else(|| quotes.chunks_exact(2).find(|pair| pair[0] > col))?;
    let (open, close) = (pair[0], pair[1]);

    if !around {
        return Some((line.start + open + 1, line.start + close));
    }
    let trailing = chars[close + 1..].iter().take_while(|c| **c == ' ' || **c == '\t').count();
    if trailing > 0 {
        return Some((line.start + open, line.start + close + 1 + trailing));
    }
    let leading = chars[..open].iter().rev().take_while(|c| **c == ' ' || **c == '\t').count();
    Some((line.start + open - leading, line.start + close + 1))
}

fn find_open(doc: &dyn Document, pos: usize, open: char, close: char, count: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut found = 0usize;
    let mut i = pos.min(doc.len().checked_sub(1)?);
    loop {
        match doc.char_at(i) {
            Some(c) if c == close && i != pos => depth += 1,
            Some(c) if c == open => {
                if depth == 0 {
                    found += 1;
                    if found == count {
                        return Some(i);
                    }
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
        if i == 0 {
            return None;
        }
        i -= 1;
    }
}

fn find_close(doc: &dyn Document, open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for i in open_at + 1..doc.len() {
        match doc.char_at(i) {
            Some(c) if c == open => depth += 1,
            Some(c) if c == close => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Offsets of the `open`/`close` pair enclosing `pos`, `count` levels out.
pub fn enclosing_pair(
    doc: &dyn Document,
    pos: usize,
    open: char,
    close: char,
    count: usize,
) -> Option<(usize, usize)> {
    let open_at = find_open(doc, pos, open, close, count)?;
    let close_at = find_close(doc, open_at, open, close)?;
    Some((open_at, close_at))
}

fn bracketed(
    doc: &dyn Document,
    pos: usize,
    open: char,
    close: char,
    around: bool,
    count: usize,
) -> Option<(usize, usize)> {
    let (open_at, close_at) = enclosing_pair(doc, pos, open, close, count)?;
    if around {
        return Some((open_at, close_at + 1));
    }
    let mut start = open_at + 1;
    let mut end = close_at;
    if doc.line_number_of(open_at) != doc.line_number_of(close_at) {
        if doc.char_at(start) == Some('\n') {
            start += 1;
        }
        let close_line = line_of(doc, close_at);
        let before_close = doc.text_in_range(close_line.start, close_at);
        if before_close.chars().all(char::is_whitespace) {
            end = close_line.start;
        }
    }
    Some((start, end.max(start)))
}

/// The pair of quote characters around `pos` on its line.
pub fn enclosing_quotes(doc: &dyn Document, pos: usize, quote: char) -> Option<(usize, usize)> {
    let (start, end) = quoted(doc, pos, quote, false)?;
    Some((start - 1, end))
}
