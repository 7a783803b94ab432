//! Surround pairs: add (`ys`, `S`), change (`cs`) and delete (`ds`).

use crate::motion::{first_non_blank, line_of};
use crate::textobject::{enclosing_pair, enclosing_quotes};
use crate::traits::Document;
use crate::types::Span;

/// Text inserted around a range for a surround character.
///
/// Opening brackets pad the contents with a space, closing brackets and
/// their aliases do not. Anything else wraps with the character itself.
pub fn pair_for(c: char) -> (String, String) {
    let (open, close) = match c {
        '(' => ("( ", " )"),
        ')' | 'b' => ("(", ")"),
        '[' => ("[ ", " ]"),
        ']' | 'r' => ("[", "]"),
        '{' => ("{ ", " }"),
        '}' | 'B' => ("{", "}"),
        '<' => ("< ", " >"),
        '>' | 'a' => ("<", ">"),
        other => return (other.to_string(), other.to_string()),
    };
    (open.to_string(), close.to_string())
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

/// Bracket characters searched for when deleting or changing a surround.
fn target_for(c: char) -> Option<(char, char)> {
    match c {
        '(' | ')' | 'b' => Some(('(', ')')),
        '[' | ']' | 'r' => Some(('[', ']')),
        '{' | '}' | 'B' => Some(('{', '}')),
        '<' | '>' | 'a' => Some(('<', '>')),
        _ => None,
    }
}

/// Offsets of the surrounding pair characters named by `c`.
pub fn find_pair(doc: &dyn Document, pos: usize, c: char) -> Option<(usize, usize)> {
    if is_quote(c) {
        return enclosing_quotes(doc, pos, c);
    }
    let (open, close) = target_for(c)?;
    enclosing_pair(doc, pos, open, close, 1)
}

/// Remove the pair around `pos`. Returns the opening offset.
pub fn delete(doc: &mut dyn Document, pos: usize, c: char) -> Option<usize> {
    let (open, close) = find_pair(doc, pos, c)?;
    let inner = doc.text_in_range(open + 1, close);
    doc.replace_range(open, close + 1, &inner);
    Some(open)
}

/// Replace the pair around `pos` named by `from` with the one for `to`.
pub fn change(doc: &mut dyn Document, pos: usize, from: char, to: char) -> Option<usize> {
    let (open, close) = find_pair(doc, pos, from)?;
    let (left, right) = pair_for(to);
    let inner = doc.text_in_range(open + 1, close);
    doc.replace_range(open, close + 1, &format!("{left}{inner}{right}"));
    Some(open)
}

/// Wrap `span` with the pair for `c`. Line-wise spans wrap the text of the
/// lines without their indentation. Returns the opening offset.
pub fn wrap(doc: &mut dyn Document, span: Span, c: char) -> usize {
    let (start, end) = if span.linewise {
        let first = line_of(doc, span.start);
        let last = line_of(doc, span.end);
        let trailing = last.text.chars().rev().take_while(|c| c.is_whitespace()).count();
        (first_non_blank(&first), (last.end - trailing).max(first_non_blank(&first)))
    } else {
        (span.start, span.end)
    };
    let (left, right) = pair_for(c);
    let inner = doc.text_in_range(start, end);
    doc.replace_range(start, end, &format!("{left}{inner}{right}"));
    start
}

#[cfg(test)]
mod tests {
    use super::pair_for;

    #[test]
    fn opening_brackets_pad() {
        assert_eq!(pair_for('('), ("( ".to_string(), " )".to_string()));
        assert_eq!(pair_for('b'), ("(".to_string(), ")".to_string()));
        assert_eq!(pair_for('"'), ("\"".to_string(), "\"".to_string()));
    }
}
