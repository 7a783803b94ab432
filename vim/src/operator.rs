//! Operators and the other buffer-mutating commands.

use crate::engine::Engine;
use crate::motion::{column_in, first_non_blank, last_line, line_of};
use crate::registers::{RegisterWise, UNNAMED};
use crate::traits::Document;
use crate::types::{MotionResult, Span, Wise};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Yank,
    Delete,
    Change,
    Indent,
    Unindent,
    Lowercase,
    Uppercase,
    ToggleCase,
    Comment,
}

impl Operator {
    /// The key that, typed again, applies the operator to whole lines.
    /// For the `g` family this is the key after `g`.
    pub fn key(self) -> char {
        match self {
            Operator::Yank => 'y',
            Operator::Delete => 'd',
            Operator::Change => 'c',
            Operator::Indent => '>',
            Operator::Unindent => '<',
            Operator::Lowercase => 'u',
            Operator::Uppercase => 'U',
            Operator::ToggleCase => '~',
            Operator::Comment => 'c',
        }
    }

    /// Operators reached through `g`.
    pub fn from_g_key(key: char) -> Option<Operator> {
        match key {
            'u' => Some(Operator::Lowercase),
            'U' => Some(Operator::Uppercase),
            '~' => Some(Operator::ToggleCase),
            'c' => Some(Operator::Comment),
            _ => None,
        }
    }

    pub fn is_g_family(self) -> bool {
        matches!(
            self,
            Operator::Lowercase | Operator::Uppercase | Operator::ToggleCase | Operator::Comment
        )
    }

    pub fn mutates(self) -> bool {
        self != Operator::Yank
    }
}

/// Turn a motion result into the range an operator acts on. `None` when
/// the motion failed.
pub fn resolve_span(doc: &dyn Document, cursor: usize, result: &MotionResult) -> Option<Span> {
    let target = result.target?;
    let len = doc.len();
    let (lo, hi) = (cursor.min(target), cursor.max(target));
    let span = match result.wise {
        Wise::CharExclusive => Span::chars(lo.min(len), hi.min(len)),
        Wise::CharInclusive => Span::chars(lo.min(len), (hi + 1).min(len)),
        Wise::Line => Span::lines(line_of(doc, lo).start, line_of(doc, hi).end),
        Wise::Block => Span::chars(result.sel_start?.min(len), result.sel_end?.min(len)),
    };
    Some(span)
}

/// First and last line numbers a span touches.
pub(crate) fn span_lines(doc: &dyn Document, span: Span) -> (usize, usize) {
    let last_pos = if !span.linewise && span.end > span.start {
        span.end - 1
    } else {
        span.end
    };
    (doc.line_number_of(span.start), doc.line_number_of(last_pos.max(span.start)))
}

fn toggle_char(c: char) -> String {
    if c.is_lowercase() {
        c.to_uppercase().collect()
    } else if c.is_uppercase() {
        c.to_lowercase().collect()
    } else {
        c.to_string()
    }
}

fn convert(op: Operator, text: &str) -> String {
    match op {
        Operator::Lowercase => text.to_lowercase(),
        Operator::Uppercase => text.to_uppercase(),
        _ => text.chars().map(toggle_char).collect(),
    }
}

impl Engine {
    /// Apply `op` over the range implied by `result`. A failed motion
    /// aborts without touching the document or the registers.
    pub(crate) fn apply_operator(&mut self, doc: &mut dyn Document, op: Operator, result: MotionResult) {
        match resolve_span(doc, doc.position(), &result) {
            Some(span) => self.run_operator(doc, op, span),
            None => {
                log::debug!("{op:?} aborted: motion failed");
                self.pending_register = None;
            }
        }
    }

    pub(crate) fn run_operator(&mut self, doc: &mut dyn Document, op: Operator, span: Span) {
        if span.is_empty() && !span.linewise && op != Operator::Change {
            log::debug!("{op:?} over an empty range");
            self.pending_register = None;
            self.leave_visual(doc);
            return;
        }
        if op.mutates() {
            self.record_change(doc);
        }
        match op {
            Operator::Yank => self.yank(doc, span),
            Operator::Delete => self.delete(doc, span),
            Operator::Change => self.change(doc, span),
            Operator::Indent | Operator::Unindent => self.shift(doc, span, op == Operator::Indent),
            Operator::Lowercase | Operator::Uppercase | Operator::ToggleCase => {
                let text = doc.text_in_range(span.start, span.end);
                let converted = convert(op, &text);
                if converted != text {
                    doc.replace_range(span.start, span.end, &converted);
                }
                self.leave_visual(doc);
                self.set_cursor(doc, span.start);
            }
            Operator::Comment => {
                let (first, last) = span_lines(doc, span);
                doc.toggle_comment(first, last);
                self.leave_visual(doc);
                let line = doc.line_at(first);
                self.set_cursor(doc, first_non_blank(&line));
            }
        }
        if op.mutates() {
            self.search.mark_stale();
        }
    }

    fn store(&mut self, text: String, wise: RegisterWise, yank: bool) {
        let target = self.pending_register.take();
        if let Err(err) = self.registers.store(target, text, wise, yank) {
            self.set_status(err.to_string());
        }
    }

    fn yank(&mut self, doc: &mut dyn Document, span: Span) {
        let mut text = doc.text_in_range(span.start, span.end);
        let (first, last) = span_lines(doc, span);
        let wise = if span.linewise {
            text.push('\n');
            RegisterWise::Line
        } else {
            RegisterWise::Char
        };
        self.store(text, wise, true);
        if self.config.highlight_yank && !self.dot.is_running() {
            doc.highlight_range(span.start, span.end, self.config.highlight_yank_duration_ms);
        }
        let lines = last - first + 1;
        if lines > 1 {
            self.set_status(format!("{lines} lines yanked"));
        }

        let pos = doc.position();
        let dest = if span.linewise && !self.mode.is_visual() {
            let col = pos - line_of(doc, pos).start;
            column_in(&doc.line_at(first), col)
        } else {
            span.start
        };
        self.leave_visual(doc);
        self.set_cursor(doc, dest);
    }

    fn delete(&mut self, doc: &mut dyn Document, span: Span) {
        let mut text = doc.text_in_range(span.start, span.end);
        let (first, last) = span_lines(doc, span);
        self.leave_visual(doc);
        let before = doc.line_count();
        if !span.linewise {
            self.store(text, RegisterWise::Char, false);
            doc.delete_range(span.start, span.end);
            self.set_cursor(doc, span.start);
            self.report_fewer_lines(before.saturating_sub(doc.line_count()));
            return;
        }

        text.push('\n');
        self.store(text, RegisterWise::Line, false);
        // Take one terminator with the lines: the one after, or the one
        // before when the span runs to the end of the document.
        let len = doc.len();
        let (start, end) = if span.end < len {
            (span.start, span.end + 1)
        } else if span.start > 0 {
            (span.start - 1, span.end)
        } else {
            (span.start, span.end)
        };
        doc.delete_range(start, end);
        let line = doc.line_at(first.min(doc.line_count().saturating_sub(1)));
        self.set_cursor(doc, first_non_blank(&line));
        // Deleting every line leaves one empty line behind.
        let removed = before.saturating_sub(doc.line_count()).max(last - first + 1);
        self.report_fewer_lines(removed);
    }

    fn report_fewer_lines(&mut self, removed: usize) {
        if removed > 1 {
            self.set_status(format!("{removed} fewer lines"));
        }
    }

    fn change(&mut self, doc: &mut dyn Document, span: Span) {
        let mut text = doc.text_in_range(span.start, span.end);
        let wise = if span.linewise {
            text.push('\n');
            RegisterWise::Line
        } else {
            RegisterWise::Char
        };
        self.store(text, wise, false);
        doc.delete_range(span.start, span.end);
        self.enter_insert(doc, span.start);
    }

    fn shift(&mut self, doc: &mut dyn Document, span: Span, indent: bool) {
        let (first, last) = span_lines(doc, span);
        let width = self.config.indent_width.max(1);
        for number in (first..=last).rev() {
            let line = doc.line_at(number);
            if indent {
                if !line.is_empty() {
                    doc.insert_text(line.start, &" ".repeat(width));
                }
                continue;
            }
            let mut remove = 0;
            for c in line.text.chars() {
                match c {
                    '\t' if remove == 0 => {
                        remove = 1;
                        break;
                    }
                    ' ' if remove < width => remove += 1,
                    _ => break,
                }
            }
            if remove > 0 {
                doc.delete_range(line.start, line.start + remove);
            }
        }
        self.leave_visual(doc);
        let line = doc.line_at(first);
        self.set_cursor(doc, first_non_blank(&line));
        let lines = last - first + 1;
        if lines > 1 {
            let arrow = if indent { '>' } else { '<' };
            self.set_status(format!("{lines} lines {arrow}ed 1 time"));
        }
    }

    /// `p` / `P`.
    pub(crate) fn put(&mut self, doc: &mut dyn Document, before: bool, count: usize) {
        let name = self.pending_register.take().unwrap_or(UNNAMED);
        let register = match self.registers.read(name) {
            Some(register) if !register.content.is_empty() => register,
            _ => {
                self.set_status(format!("Nothing in register {name}"));
                return;
            }
        };
        self.record_change(doc);
        let pos = doc.position();
        let line = line_of(doc, pos);
        match register.wise {
            RegisterWise::Char => {
                let text = register.content.repeat(count.max(1));
                let at = if before || line.is_empty() {
                    pos
                } else {
                    (pos + 1).min(line.end)
                };
                doc.insert_text(at, &text);
                self.set_cursor(doc, at + text.chars().count() - 1);
            }
            RegisterWise::Line => {
                let mut body = register.content;
                if !body.ends_with('\n') {
                    body.push('\n');
                }
                let body = body.repeat(count.max(1));
                let target = if before {
                    doc.insert_text(line.start, &body);
                    line.start
                } else if line.end < doc.len() {
                    doc.insert_text(line.end + 1, &body);
                    line.end + 1
                } else {
                    let trimmed = body.strip_suffix('\n').unwrap_or(&body);
                    doc.insert_text(line.end, &format!("\n{trimmed}"));
                    line.end + 1
                };
                let landed = line_of(doc, target);
                self.set_cursor(doc, first_non_blank(&landed));
                let lines = body.matches('\n').count();
                if lines > 1 {
                    self.set_status(format!("{lines} more lines"));
                }
            }
        }
        self.search.mark_stale();
    }

    /// `J`: join `count` lines (at least two) with single spaces.
    pub(crate) fn join_lines(&mut self, doc: &mut dyn Document, first: usize, count: usize) {
        let joins = count.saturating_sub(1).max(1);
        if !self.has_real_line(doc, first + 1) {
            return;
        }
        self.record_change(doc);
        let mut cursor = None;
        for _ in 0..joins {
            if !self.has_real_line(doc, first + 1) {
                break;
            }
            let line = doc.line_at(first);
            let next = doc.line_at(first + 1);
            let indent = next.text.chars().take_while(|c| c.is_whitespace()).count();
            let rest = next.text.chars().nth(indent);
            doc.delete_range(line.end, next.start + indent);
            let pad = rest.is_some_and(|c| c != ')')
                && !line.is_empty()
                && !line.text.ends_with(char::is_whitespace);
            if pad {
                doc.insert_text(line.end, " ");
            }
            cursor = Some(line.end);
        }
        self.leave_visual(doc);
        if let Some(cursor) = cursor {
            self.set_cursor(doc, cursor);
        }
        self.search.mark_stale();
    }

    /// A line that exists in the text. The empty line after a final
    /// terminator does not count.
    fn has_real_line(&self, doc: &dyn Document, number: usize) -> bool {
        number < doc.line_count() && !(number + 1 == doc.line_count() && doc.line_at(number).start == doc.len())
    }

    /// `r<c>` in Normal mode.
    pub(crate) fn replace_chars(&mut self, doc: &mut dyn Document, c: char, count: usize) {
        let pos = doc.position();
        let line = line_of(doc, pos);
        if line.is_empty() || pos + count > line.end {
            log::debug!("replace past the end of the line");
            return;
        }
        self.record_change(doc);
        if c == '\n' || c == '\r' {
            doc.replace_range(pos, pos + count, "\n");
            self.set_cursor(doc, pos + 1);
        } else {
            doc.replace_range(pos, pos + count, &c.to_string().repeat(count));
            self.set_cursor(doc, pos + count - 1);
        }
        self.search.mark_stale();
    }

    /// `r<c>` over a Visual selection.
    pub(crate) fn replace_span(&mut self, doc: &mut dyn Document, span: Span, c: char) {
        self.record_change(doc);
        let text = doc.text_in_range(span.start, span.end);
        let replaced: String = text.chars().map(|x| if x == '\n' { x } else { c }).collect();
        doc.replace_range(span.start, span.end, &replaced);
        self.leave_visual(doc);
        self.set_cursor(doc, span.start);
        self.search.mark_stale();
    }

    /// `~` in Normal mode: toggle `count` characters and step past them.
    pub(crate) fn toggle_case_chars(&mut self, doc: &mut dyn Document, count: usize) {
        let pos = doc.position();
        let line = line_of(doc, pos);
        if line.is_empty() {
            return;
        }
        self.record_change(doc);
        let end = (pos + count).min(line.end);
        let text = doc.text_in_range(pos, end);
        let converted = convert(Operator::ToggleCase, &text);
        if converted != text {
            doc.replace_range(pos, end, &converted);
        }
        self.set_cursor(doc, end.min(line.end - 1));
        self.search.mark_stale();
    }

    /// Linewise span for `count` lines from the cursor line, as used by the
    /// doubled operators.
    pub(crate) fn current_lines(&self, doc: &dyn Document, count: usize) -> MotionResult {
        let first = doc.line_number_of(doc.position());
        let last = (first + count.max(1) - 1).min(last_line(doc)).max(first);
        MotionResult::line(doc.line_at(last).start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_mixed_case() {
        assert_eq!(convert(Operator::ToggleCase, "aBc1"), "AbC1");
        assert_eq!(convert(Operator::Uppercase, "abc"), "ABC");
    }

    #[test]
    fn g_operators_double_on_their_key() {
        for key in ['u', 'U', '~', 'c'] {
            let op = Operator::from_g_key(key).unwrap();
            assert!(op.is_g_family());
            assert_eq!(op.key(), key);
        }
    }
}
