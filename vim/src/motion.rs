//! Motion computation.
//!
//! Every function here is pure: it reads the document and returns a
//! [`MotionResult`] without mutating anything, so calling it twice on the
//! same input yields the same result. Counts are already multiplied across
//! nested submodes by the caller.

use unicode_segmentation::UnicodeSegmentation;

use crate::operator::Operator;
use crate::traits::Document;
use crate::types::{LineInfo, MotionResult};

/// A motion bound to a single key (or the second key of a `g` chord).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Down,
    Up,
    WordForward { big: bool },
    /// `w` after `d`, `y` and friends: stops at the end of the line.
    WordForwardDelete { big: bool },
    /// `w` after `c`: behaves like `e` when the cursor is on a word.
    WordForwardChange { big: bool },
    WordBackward { big: bool },
    WordEnd { big: bool },
    WordEndBackward { big: bool },
    LineStart,
    FirstNonBlank,
    LineEnd,
    LastNonBlank,
    NextLineStart,
    PrevLineStart,
    FirstLine,
    LastLine,
    ParagraphForward,
    ParagraphBackward,
    MatchPair,
    ScreenTop,
    ScreenMiddle,
    ScreenBottom,
    HalfPageDown,
    HalfPageUp,
    SearchNext,
    SearchPrevious,
    RepeatFind,
    RepeatFindReverse,
}

impl Motion {
    /// Look up the motion bound to a key name (after symbol substitution).
    pub fn from_key(key: &str) -> Option<Motion> {
        let motion = match key {
            "h" | "backspace" => Motion::Left,
            "l" | "space" => Motion::Right,
            "j" => Motion::Down,
            "k" => Motion::Up,
            "w" => Motion::WordForward { big: false },
            "W" => Motion::WordForward { big: true },
            "b" => Motion::WordBackward { big: false },
            "B" => Motion::WordBackward { big: true },
            "e" => Motion::WordEnd { big: false },
            "E" => Motion::WordEnd { big: true },
            "0" => Motion::LineStart,
            "caret" => Motion::FirstNonBlank,
            "dollar" => Motion::LineEnd,
            "enter" | "plus" => Motion::NextLineStart,
            "minus" => Motion::PrevLineStart,
            "G" => Motion::LastLine,
            "lbrace" => Motion::ParagraphBackward,
            "rbrace" => Motion::ParagraphForward,
            "percent" => Motion::MatchPair,
            "H" => Motion::ScreenTop,
            "M" => Motion::ScreenMiddle,
            "L" => Motion::ScreenBottom,
            "ctrl_d" => Motion::HalfPageDown,
            "ctrl_u" => Motion::HalfPageUp,
            "n" => Motion::SearchNext,
            "N" => Motion::SearchPrevious,
            "semicolon" => Motion::RepeatFind,
            "comma" => Motion::RepeatFindReverse,
            _ => return None,
        };
        Some(motion)
    }

    /// The second key of a `g` chord.
    pub fn from_g_key(key: char) -> Option<Motion> {
        match key {
            'g' => Some(Motion::FirstLine),
            'e' => Some(Motion::WordEndBackward { big: false }),
            'E' => Some(Motion::WordEndBackward { big: true }),
            '_' => Some(Motion::LastNonBlank),
            _ => None,
        }
    }

    /// Swap in the operator-flavoured forward word motions.
    pub fn for_operator(self, op: Operator) -> Motion {
        match self {
            Motion::WordForward { big } if op == Operator::Change => {
                Motion::WordForwardChange { big }
            }
            Motion::WordForward { big } => Motion::WordForwardDelete { big },
            other => other,
        }
    }

    /// Motions that change "location" and therefore feed the jump list.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Motion::FirstLine
                | Motion::LastLine
                | Motion::ParagraphForward
                | Motion::ParagraphBackward
                | Motion::MatchPair
                | Motion::ScreenTop
                | Motion::ScreenMiddle
                | Motion::ScreenBottom
                | Motion::SearchNext
                | Motion::SearchPrevious
        )
    }

    /// Whether the motion keeps the preferred column of `j`/`k`.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Motion::Down | Motion::Up | Motion::HalfPageDown | Motion::HalfPageUp
        )
    }
}

/// The four single-character searches within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    /// `f`
    Forward,
    /// `F`
    Backward,
    /// `t`
    TillForward,
    /// `T`
    TillBackward,
}

impl FindKind {
    pub fn from_char(key: char) -> Option<FindKind> {
        match key {
            'f' => Some(FindKind::Forward),
            'F' => Some(FindKind::Backward),
            't' => Some(FindKind::TillForward),
            'T' => Some(FindKind::TillBackward),
            _ => None,
        }
    }

    pub fn reversed(self) -> FindKind {
        match self {
            FindKind::Forward => FindKind::Backward,
            FindKind::Backward => FindKind::Forward,
            FindKind::TillForward => FindKind::TillBackward,
            FindKind::TillBackward => FindKind::TillForward,
        }
    }

    fn is_forward(self) -> bool {
        matches!(self, FindKind::Forward | FindKind::TillForward)
    }

    fn is_till(self) -> bool {
        matches!(self, FindKind::TillForward | FindKind::TillBackward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Blank,
    Punct,
    Word,
}

pub(crate) fn char_class(c: char, big: bool) -> CharClass {
    if c.is_whitespace() {
        CharClass::Blank
    } else if big || c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

pub fn line_of(doc: &dyn Document, pos: usize) -> LineInfo {
    doc.line_at(doc.line_number_of(pos))
}

/// Number of the last line holding text. The empty line after a final
/// terminator does not count.
pub fn last_line(doc: &dyn Document) -> usize {
    let last = doc.line_count().saturating_sub(1);
    if last > 0 && doc.line_at(last).start == doc.len() {
        last - 1
    } else {
        last
    }
}

pub fn first_non_blank(line: &LineInfo) -> usize {
    let indent = line.text.chars().take_while(|c| c.is_whitespace()).count();
    (line.start + indent).min(line.end)
}

/// Offset of `col` on `line`, clamped to its last character.
pub fn column_in(line: &LineInfo, col: usize) -> usize {
    if line.is_empty() {
        line.start
    } else {
        line.start + col.min(line.len() - 1)
    }
}

fn is_blank_at(doc: &dyn Document, pos: usize) -> bool {
    doc.char_at(pos).is_none_or(char::is_whitespace)
}

/// An empty line is a word of its own for `w`, `b`, `ge`.
fn is_empty_line_at(doc: &dyn Document, pos: usize) -> bool {
    doc.char_at(pos) == Some('\n') && (pos == 0 || doc.char_at(pos - 1) == Some('\n'))
}

fn same_class(doc: &dyn Document, pos: usize, class: CharClass, big: bool) -> bool {
    match doc.char_at(pos) {
        Some(c) => !c.is_whitespace() && char_class(c, big) == class,
        None => false,
    }
}

/// Character offsets of the grapheme boundaries of a line, including the
/// line end.
fn grapheme_bounds(text: &str) -> Vec<usize> {
    let mut bounds = Vec::with_capacity(text.len() + 1);
    let mut offset = 0;
    for grapheme in text.graphemes(true) {
        bounds.push(offset);
        offset += grapheme.chars().count();
    }
    bounds.push(offset);
    bounds
}

pub fn left(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let line = line_of(doc, pos);
    let bounds = grapheme_bounds(&line.text);
    let col = pos.saturating_sub(line.start);
    let idx = bounds.partition_point(|&b| b <= col).saturating_sub(1);
    MotionResult::exclusive(line.start + bounds[idx.saturating_sub(count)])
}

/// Moves up to the line end (one past the last character), which lets
/// `dl`/`x` reach the final character. Cursor placement clamps back.
pub fn right(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let line = line_of(doc, pos);
    let bounds = grapheme_bounds(&line.text);
    let col = pos.saturating_sub(line.start);
    let idx = bounds.partition_point(|&b| b <= col).saturating_sub(1);
    let next = (idx + count).min(bounds.len() - 1);
    MotionResult::exclusive(line.start + bounds[next])
}

pub fn down(doc: &dyn Document, pos: usize, count: usize, col: usize) -> MotionResult {
    let current = doc.line_number_of(pos);
    let last = last_line(doc);
    if current >= last {
        return MotionResult::failed();
    }
    let target = doc.line_at((current + count).min(last));
    MotionResult::line(column_in(&target, col))
}

pub fn up(doc: &dyn Document, pos: usize, count: usize, col: usize) -> MotionResult {
    let current = doc.line_number_of(pos);
    if current == 0 {
        return MotionResult::failed();
    }
    let target = doc.line_at(current.saturating_sub(count));
    MotionResult::line(column_in(&target, col))
}

pub fn next_word_start(doc: &dyn Document, pos: usize, big: bool) -> usize {
    let len = doc.len();
    if pos >= len {
        return len;
    }
    let mut i = pos;
    if let Some(c) = doc.char_at(i)
        && !c.is_whitespace()
    {
        let class = char_class(c, big);
        while i < len && same_class(doc, i, class, big) {
            i += 1;
        }
    }
    while let Some(c) = doc.char_at(i) {
        if c == '\n' {
            i += 1;
            if doc.char_at(i) == Some('\n') {
                return i;
            }
            continue;
        }
        if !c.is_whitespace() {
            return i;
        }
        i += 1;
    }
    len
}

fn next_word_end(doc: &dyn Document, pos: usize, big: bool) -> usize {
    let len = doc.len();
    if len == 0 {
        return 0;
    }
    let mut i = pos + 1;
    while i < len && is_blank_at(doc, i) {
        i += 1;
    }
    if i >= len {
        return len - 1;
    }
    let class = char_class(doc.char_at(i).unwrap_or(' '), big);
    while i + 1 < len && same_class(doc, i + 1, class, big) {
        i += 1;
    }
    i
}

fn prev_word_start(doc: &dyn Document, pos: usize, big: bool) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut i = pos - 1;
    while i > 0 && is_blank_at(doc, i) {
        if is_empty_line_at(doc, i) {
            return i;
        }
        i -= 1;
    }
    if is_blank_at(doc, i) {
        return i;
    }
    let class = char_class(doc.char_at(i).unwrap_or(' '), big);
    while i > 0 && same_class(doc, i - 1, class, big) {
        i -= 1;
    }
    i
}

fn prev_word_end(doc: &dyn Document, pos: usize, big: bool) -> usize {
    let mut i = pos;
    if let Some(c) = doc.char_at(i)
        && !c.is_whitespace()
    {
        let class = char_class(c, big);
        while i > 0 && same_class(doc, i - 1, class, big) {
            i -= 1;
        }
    }
    if i == 0 {
        return 0;
    }
    i -= 1;
    while i > 0 && is_blank_at(doc, i) {
        if is_empty_line_at(doc, i) {
            return i;
        }
        i -= 1;
    }
    i
}

/// Last offset of the word run containing `pos`.
fn end_of_run(doc: &dyn Document, pos: usize, big: bool) -> usize {
    let class = char_class(doc.char_at(pos).unwrap_or(' '), big);
    let mut i = pos;
    while same_class(doc, i + 1, class, big) {
        i += 1;
    }
    i
}

pub fn word_forward(doc: &dyn Document, pos: usize, count: usize, big: bool) -> MotionResult {
    let mut cur = pos;
    for _ in 0..count {
        cur = next_word_start(doc, cur, big);
    }
    MotionResult::exclusive(cur)
}

/// `dw`: like `w`, except that the last word never crosses into the next
/// line while text remains on the current one. Starting on an empty line
/// consumes the blank lines up to the next word.
pub fn word_forward_delete(doc: &dyn Document, pos: usize, count: usize, big: bool) -> MotionResult {
    let mut cur = pos;
    for n in 0..count {
        let next = next_word_start(doc, cur, big);
        if n + 1 == count {
            let line = line_of(doc, cur);
            if next > line.end && cur < line.end {
                return MotionResult::exclusive(line.end);
            }
        }
        cur = next;
    }
    MotionResult::exclusive(cur)
}

/// `cw`: on a word it changes up to the end of the word, leaving the
/// following blanks alone. On blanks it falls back to `dw`.
pub fn word_forward_change(doc: &dyn Document, pos: usize, count: usize, big: bool) -> MotionResult {
    match doc.char_at(pos) {
        Some(c) if !c.is_whitespace() => {
            let mut end = end_of_run(doc, pos, big);
            for _ in 1..count {
                end = next_word_end(doc, end, big);
            }
            MotionResult::inclusive(end)
        }
        _ => word_forward_delete(doc, pos, count, big),
    }
}

pub fn word_backward(doc: &dyn Document, pos: usize, count: usize, big: bool) -> MotionResult {
    let mut cur = pos;
    for _ in 0..count {
        cur = prev_word_start(doc, cur, big);
    }
    MotionResult::exclusive(cur)
}

pub fn word_end(doc: &dyn Document, pos: usize, count: usize, big: bool) -> MotionResult {
    if doc.is_empty() {
        return MotionResult::failed();
    }
    let mut cur = pos;
    for _ in 0..count {
        cur = next_word_end(doc, cur, big);
    }
    MotionResult::inclusive(cur)
}

pub fn word_end_backward(doc: &dyn Document, pos: usize, count: usize, big: bool) -> MotionResult {
    let mut cur = pos;
    for _ in 0..count {
        cur = prev_word_end(doc, cur, big);
    }
    MotionResult::inclusive(cur)
}

pub fn line_start(doc: &dyn Document, pos: usize) -> MotionResult {
    MotionResult::exclusive(line_of(doc, pos).start)
}

pub fn first_non_blank_of(doc: &dyn Document, pos: usize) -> MotionResult {
    MotionResult::exclusive(first_non_blank(&line_of(doc, pos)))
}

/// `$`: last character of the line `count - 1` lines down.
pub fn line_end(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let line = doc.line_at((doc.line_number_of(pos) + count - 1).min(last_line(doc)));
    if line.is_empty() {
        MotionResult::exclusive(line.start)
    } else {
        MotionResult::inclusive(line.end - 1)
    }
}

/// `g_`: last non-blank character of the line `count - 1` lines down.
pub fn last_non_blank(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let line = doc.line_at((doc.line_number_of(pos) + count - 1).min(last_line(doc)));
    let trimmed = line.text.trim_end().chars().count();
    if trimmed == 0 {
        MotionResult::exclusive(line.start)
    } else {
        MotionResult::inclusive(line.start + trimmed - 1)
    }
}

pub fn next_line_start(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let current = doc.line_number_of(pos);
    let last = last_line(doc);
    if current >= last {
        return MotionResult::failed();
    }
    MotionResult::line(first_non_blank(&doc.line_at((current + count).min(last))))
}

pub fn prev_line_start(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let current = doc.line_number_of(pos);
    if current == 0 {
        return MotionResult::failed();
    }
    MotionResult::line(first_non_blank(&doc.line_at(current.saturating_sub(count))))
}

/// Jump to a zero-based line, landing on its first non-blank.
pub fn goto_line(doc: &dyn Document, line: usize) -> MotionResult {
    MotionResult::line(first_non_blank(&doc.line_at(line.min(last_line(doc)))))
}

/// `N%`: the line `N` percent into the file.
pub fn percent_line(doc: &dyn Document, percent: usize) -> MotionResult {
    let lines = last_line(doc) + 1;
    let line = (percent.min(100) * lines).div_ceil(100);
    goto_line(doc, line.saturating_sub(1))
}

pub fn paragraph_forward(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let last = doc.line_count().saturating_sub(1);
    let mut line = doc.line_number_of(pos);
    for _ in 0..count {
        while line < last && doc.line_at(line).is_empty() {
            line += 1;
        }
        while line < last && !doc.line_at(line).is_empty() {
            line += 1;
        }
        if !doc.line_at(line).is_empty() {
            return MotionResult::exclusive(doc.len());
        }
    }
    MotionResult::exclusive(doc.line_at(line).start)
}

pub fn paragraph_backward(doc: &dyn Document, pos: usize, count: usize) -> MotionResult {
    let mut line = doc.line_number_of(pos);
    for _ in 0..count {
        while line > 0 && doc.line_at(line).is_empty() {
            line -= 1;
        }
        while line > 0 && !doc.line_at(line).is_empty() {
            line -= 1;
        }
        if !doc.line_at(line).is_empty() {
            return MotionResult::exclusive(0);
        }
    }
    MotionResult::exclusive(doc.line_at(line).start)
}

fn bracket_partner(c: char) -> Option<(char, bool)> {
    match c {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

/// Offset of the bracket balancing the one at `pos`.
pub(crate) fn matching_bracket(doc: &dyn Document, pos: usize) -> Option<usize> {
    let c = doc.char_at(pos)?;
    let (partner, forward) = bracket_partner(c)?;
    let mut depth = 0usize;
    if forward {
        for i in pos + 1..doc.len() {
            match doc.char_at(i) {
                Some(x) if x == c => depth += 1,
                Some(x) if x == partner => {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    } else {
        for i in (0..pos).rev() {
            match doc.char_at(i) {
                Some(x) if x == c => depth += 1,
                Some(x) if x == partner => {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }
    None
}

/// `%`: the nearest bracket at or after the cursor on this line, then its
/// balancing partner.
pub fn match_pair(doc: &dyn Document, pos: usize) -> MotionResult {
    let line = line_of(doc, pos);
    let Some(bracket) = (pos..line.end).find(|&i| doc.char_at(i).is_some_and(|c| bracket_partner(c).is_some())) else {
        return MotionResult::failed();
    };
    match matching_bracket(doc, bracket) {
        Some(target) => MotionResult::inclusive(target),
        None => MotionResult::failed(),
    }
}

/// First and last line of the viewport.
pub fn visible_lines(doc: &dyn Document) -> (usize, usize) {
    let (start, end) = doc.visible_range();
    let first = doc.line_number_of(start);
    let last = doc.line_number_of(end.saturating_sub(1).max(start));
    (first, last.max(first))
}

pub fn screen_top(doc: &dyn Document, count: usize) -> MotionResult {
    let (first, last) = visible_lines(doc);
    goto_line(doc, (first + count - 1).min(last))
}

pub fn screen_middle(doc: &dyn Document) -> MotionResult {
    let (first, last) = visible_lines(doc);
    goto_line(doc, (first + last) / 2)
}

pub fn screen_bottom(doc: &dyn Document, count: usize) -> MotionResult {
    let (first, last) = visible_lines(doc);
    goto_line(doc, last.saturating_sub(count - 1).max(first))
}

pub fn half_page(doc: &dyn Document, pos: usize, forward: bool, col: usize) -> MotionResult {
    let (first, last) = visible_lines(doc);
    let half = ((last - first + 1) / 2).max(1);
    if forward {
        down(doc, pos, half, col)
    } else {
        up(doc, pos, half, col)
    }
}

/// `f`/`F`/`t`/`T` within the current line.
///
/// When repeating a till search with a count of one, the character right
/// next to the cursor is skipped so that `;` advances instead of sticking
/// to the match it already stands before.
pub fn find_char(
    doc: &dyn Document,
    pos: usize,
    ch: char,
    kind: FindKind,
    count: usize,
    repeat: bool,
) -> MotionResult {
    let line = line_of(doc, pos);
    let chars: Vec<char> = line.text.chars().collect();
    let col = pos.saturating_sub(line.start);
    let skip = usize::from(repeat && count == 1 && kind.is_till());
    let mut remaining = count.max(1);

    if kind.is_forward() {
        for (i, &c) in chars.iter().enumerate().skip(col + 1 + skip) {
            if c == ch {
                remaining -= 1;
                if remaining == 0 {
                    let target = if kind.is_till() { i - 1 } else { i };
                    return MotionResult::inclusive(line.start + target);
                }
            }
        }
    } else {
        let Some(from) = col.checked_sub(1 + skip) else {
            return MotionResult::failed();
        };
        for i in (0..=from.min(chars.len().saturating_sub(1))).rev() {
            if chars.get(i) == Some(&ch) {
                remaining -= 1;
                if remaining == 0 {
                    let target = if kind.is_till() { i + 1 } else { i };
                    return MotionResult::exclusive(line.start + target);
                }
            }
        }
    }
    MotionResult::failed()
}

/// Two-character search across lines.
pub fn sneak(
    doc: &dyn Document,
    pos: usize,
    pair: (char, char),
    forward: bool,
    count: usize,
) -> MotionResult {
    let pattern: String = [pair.0, pair.1].iter().collect();
    let mut at = pos;
    for _ in 0..count.max(1) {
        let next = if forward {
            doc.find_forward(&pattern, at + 1, true)
        } else if at == 0 {
            None
        } else {
            doc.find_backward(&pattern, at - 1, true)
        };
        match next {
            Some(found) => at = found,
            None => return MotionResult::failed(),
        }
    }
    MotionResult::exclusive(at)
}

/// The keyword under or after the cursor on its line, for `*` and `#`.
pub fn word_under_cursor(doc: &dyn Document, pos: usize) -> Option<(usize, String)> {
    let line = line_of(doc, pos);
    let chars: Vec<char> = line.text.chars().collect();
    let col = pos.saturating_sub(line.start);
    let is_keyword = |c: &char| c.is_alphanumeric() || *c == '_';
    let mut start = (col..chars.len()).find(|&i| is_keyword(&chars[i]))?;
    while start > 0 && is_keyword(&chars[start - 1]) {
        start -= 1;
    }
    let word: String = chars[start..].iter().take_while(|c| is_keyword(c)).collect();
    Some((line.start + start, word))
}
