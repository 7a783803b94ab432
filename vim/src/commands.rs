//! Command tables and handlers.
//!
//! Each mode has a table from key name to command, built once when the
//! engine is constructed. Handlers either finish the command or return the
//! submode that will own the next keystrokes.

use std::collections::HashMap;

use crate::engine::{Engine, LastFind};
use crate::error::Error;
use crate::jumplist::Jump;
use crate::labels::{self, LabelScope};
use crate::macros::MacroTask;
use crate::motion::{self, FindKind, Motion, first_non_blank, line_of};
use crate::operator::Operator;
use crate::registers::Registers;
use crate::submode::{Count, Counts, Resolution, SubMode, SubModeKind, Then, key_name};
use crate::surround;
use crate::textobject::{self, TextObject};
use crate::traits::Document;
use crate::types::{Mode, MotionResult};

pub(crate) type Handler = fn(&mut Engine, &mut dyn Document, &Count) -> Option<(SubMode, bool)>;

#[derive(Clone, Copy)]
pub(crate) enum Command {
    Motion(Motion),
    Action(Handler),
}

pub(crate) type CommandTable = HashMap<&'static str, Command>;

const MOTION_KEYS: &[&str] = &[
    "h", "backspace", "l", "space", "j", "k", "w", "W", "b", "B", "e", "E", "0", "caret", "dollar",
    "enter", "plus", "minus", "G", "lbrace", "rbrace", "percent", "H", "M", "L", "ctrl_d", "ctrl_u",
    "n", "N", "semicolon", "comma",
];

fn motion_table() -> CommandTable {
    MOTION_KEYS
        .iter()
        .filter_map(|key| Motion::from_key(key).map(|motion| (*key, Command::Motion(motion))))
        .collect()
}

pub(crate) fn normal_table() -> CommandTable {
    let mut table = motion_table();
    let actions: &[(&'static str, Handler)] = &[
        ("escape", escape),
        ("i", insert_before),
        ("a", insert_after),
        ("I", insert_line_start),
        ("A", insert_line_end),
        ("o", open_below),
        ("O", open_above),
        ("v", visual),
        ("V", visual_line),
        ("d", delete),
        ("c", change),
        ("y", yank),
        ("greater", indent),
        ("less", unindent),
        ("g", g_prefix),
        ("x", delete_char),
        ("X", delete_char_before),
        ("s", substitute),
        ("S", substitute_line),
        ("D", delete_to_end),
        ("C", change_to_end),
        ("Y", yank_line),
        ("p", put_after),
        ("P", put_before),
        ("r", replace),
        ("J", join),
        ("tilde", toggle_case),
        ("u", undo),
        ("ctrl_r", redo),
        ("dot", repeat_change),
        ("f", find_forward),
        ("F", find_backward),
        ("t", till_forward),
        ("T", till_backward),
        ("quote", select_register),
        ("q", record_macro),
        ("at", play_macro),
        ("m", set_mark),
        ("apostrophe", jump_to_mark_line),
        ("backtick", jump_to_mark),
        ("slash", search_forward),
        ("question", search_backward),
        ("asterisk", search_word_forward),
        ("hash", search_word_backward),
        ("ctrl_o", jump_back),
        ("tab", jump_forward),
    ];
    for (key, handler) in actions {
        table.insert(key, Command::Action(*handler));
    }
    table
}

pub(crate) fn visual_table() -> CommandTable {
    let mut table = motion_table();
    let actions: &[(&'static str, Handler)] = &[
        ("escape", escape),
        ("v", visual),
        ("V", visual_line),
        ("o", swap_anchor),
        ("i", inner_object),
        ("a", around_object),
        ("d", visual_delete),
        ("x", visual_delete),
        ("y", visual_yank),
        ("c", visual_change),
        ("s", substitute),
        ("greater", visual_indent),
        ("less", visual_unindent),
        ("tilde", visual_toggle_case),
        ("u", visual_lowercase),
        ("U", visual_uppercase),
        ("J", visual_join),
        ("r", replace),
        ("S", visual_surround),
        ("Z", sneak_backward),
        ("g", g_prefix),
        ("p", visual_put),
        ("P", visual_put),
        ("f", find_forward),
        ("F", find_backward),
        ("t", till_forward),
        ("T", till_backward),
        ("quote", select_register),
        ("apostrophe", jump_to_mark_line),
        ("backtick", jump_to_mark),
        ("slash", search_forward),
        ("question", search_backward),
    ];
    for (key, handler) in actions {
        table.insert(key, Command::Action(*handler));
    }
    table
}

fn submode(engine: &Engine, kind: SubModeKind, count: &Count) -> Option<(SubMode, bool)> {
    Some((SubMode::new(kind, Counts::from_count(count), engine.motion_then()), false))
}

fn operator_pending(op: Operator, count: &Count) -> Option<(SubMode, bool)> {
    let kind = SubModeKind::Motion { op_key: op.key() };
    Some((SubMode::new(kind, Counts::from_count(count), Then::Operate(op)), false))
}

fn escape(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.pending_register = None;
    engine.labels.clear();
    if engine.mode.is_visual() {
        engine.enter_mode(doc, Mode::Normal);
        let pos = doc.position();
        engine.set_cursor(doc, pos);
    }
    None
}

// Insert

fn insert_before(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.record_change(doc);
    let pos = doc.position();
    engine.enter_insert(doc, pos);
    None
}

fn insert_after(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.record_change(doc);
    let pos = doc.position();
    let line = line_of(doc, pos);
    let at = if line.is_empty() { pos } else { (pos + 1).min(line.end) };
    engine.enter_insert(doc, at);
    None
}

fn insert_line_start(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.record_change(doc);
    let line = line_of(doc, doc.position());
    engine.enter_insert(doc, first_non_blank(&line));
    None
}

fn insert_line_end(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.record_change(doc);
    let line = line_of(doc, doc.position());
    engine.enter_insert(doc, line.end);
    None
}

fn open_below(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.record_change(doc);
    let line = line_of(doc, doc.position());
    doc.insert_text(line.end, "\n");
    engine.search.mark_stale();
    engine.enter_insert(doc, line.end + 1);
    None
}

fn open_above(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.record_change(doc);
    let line = line_of(doc, doc.position());
    doc.insert_text(line.start, "\n");
    engine.search.mark_stale();
    engine.enter_insert(doc, line.start);
    None
}

// Visual

fn visual(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    let mode = if engine.mode == Mode::Visual {
        Mode::Normal
    } else {
        Mode::Visual
    };
    engine.enter_mode(doc, mode);
    None
}

fn visual_line(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    let mode = if engine.mode == Mode::VisualLine {
        Mode::Normal
    } else {
        Mode::VisualLine
    };
    engine.enter_mode(doc, mode);
    None
}

fn swap_anchor(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    let head = doc.position();
    doc.set_position(engine.anchor);
    engine.anchor = head;
    engine.update_selection(doc);
    None
}

fn inner_object(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::TextObject { around: false }, count)
}

fn around_object(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::TextObject { around: true }, count)
}

fn run_visual(engine: &mut Engine, doc: &mut dyn Document, op: Operator) {
    let span = engine.visual_span(doc);
    engine.run_operator(doc, op, span);
}

fn visual_delete(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Delete);
    None
}

fn visual_yank(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Yank);
    None
}

fn visual_change(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Change);
    None
}

fn visual_indent(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Indent);
    None
}

fn visual_unindent(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Unindent);
    None
}

fn visual_toggle_case(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::ToggleCase);
    None
}

fn visual_lowercase(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Lowercase);
    None
}

fn visual_uppercase(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    run_visual(engine, doc, Operator::Uppercase);
    None
}

fn visual_join(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    let head = doc.position();
    let first = doc.line_number_of(engine.anchor.min(head));
    let last = doc.line_number_of(engine.anchor.max(head));
    engine.join_lines(doc, first, last - first + 1);
    engine.leave_visual(doc);
    None
}

fn visual_surround(engine: &mut Engine, doc: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    let span = engine.visual_span(doc);
    let sub = SubMode::new(SubModeKind::SurroundWith { span }, Counts::default(), Then::Select);
    Some((sub, false))
}

fn visual_put(engine: &mut Engine, _: &mut dyn Document, _: &Count) -> Option<(SubMode, bool)> {
    engine.set_status("Put over a selection is not supported");
    None
}

// Operators

fn delete(_: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    operator_pending(Operator::Delete, count)
}

fn change(_: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    operator_pending(Operator::Change, count)
}

fn yank(_: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    operator_pending(Operator::Yank, count)
}

fn indent(_: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    operator_pending(Operator::Indent, count)
}

fn unindent(_: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    operator_pending(Operator::Unindent, count)
}

fn g_prefix(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::GPrefix, count)
}

fn delete_char(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let result = motion::right(doc, doc.position(), count.value);
    engine.apply_operator(doc, Operator::Delete, result);
    None
}

fn delete_char_before(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let result = motion::left(doc, doc.position(), count.value);
    engine.apply_operator(doc, Operator::Delete, result);
    None
}

/// `s`: sneak forward when enabled, otherwise `cl` (or `c` in Visual mode).
fn substitute(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    if engine.config.use_sneak {
        return submode(engine, SubModeKind::Sneak { forward: true }, count);
    }
    if engine.mode.is_visual() {
        run_visual(engine, doc, Operator::Change);
        return None;
    }
    let result = motion::right(doc, doc.position(), count.value);
    engine.apply_operator(doc, Operator::Change, result);
    None
}

/// `S`: sneak backward when enabled, otherwise `cc`.
fn substitute_line(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    if engine.config.use_sneak {
        return submode(engine, SubModeKind::Sneak { forward: false }, count);
    }
    let result = engine.current_lines(doc, count.value);
    engine.apply_operator(doc, Operator::Change, result);
    None
}

fn sneak_backward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    if !engine.config.use_sneak {
        engine.set_status("Unknown key: Z");
        return None;
    }
    submode(engine, SubModeKind::Sneak { forward: false }, count)
}

fn delete_to_end(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let result = motion::line_end(doc, doc.position(), count.value);
    engine.apply_operator(doc, Operator::Delete, result);
    None
}

fn change_to_end(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let result = motion::line_end(doc, doc.position(), count.value);
    engine.apply_operator(doc, Operator::Change, result);
    None
}

fn yank_line(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let result = engine.current_lines(doc, count.value);
    engine.apply_operator(doc, Operator::Yank, result);
    None
}

fn put_after(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    engine.put(doc, false, count.value);
    None
}

fn put_before(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    engine.put(doc, true, count.value);
    None
}

fn replace(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::ReplaceChar, count)
}

fn join(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let first = doc.line_number_of(doc.position());
    engine.join_lines(doc, first, count.value);
    None
}

fn toggle_case(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    engine.toggle_case_chars(doc, count.value);
    None
}

fn undo(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    for _ in 0..count.value {
        doc.undo();
    }
    engine.search.mark_stale();
    let pos = doc.position();
    engine.set_cursor(doc, pos);
    None
}

fn redo(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    for _ in 0..count.value {
        doc.redo();
    }
    engine.search.mark_stale();
    let pos = doc.position();
    engine.set_cursor(doc, pos);
    None
}

fn repeat_change(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    if engine.dot.last().is_none() {
        log::debug!("nothing to repeat");
        return None;
    }
    engine.pending_dot = Some(count.is_explicit().then(|| count.text.clone()));
    None
}

// Finds and searches

fn find(engine: &Engine, kind: FindKind, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::FindChar(kind), count)
}

fn find_forward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    find(engine, FindKind::Forward, count)
}

fn find_backward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    find(engine, FindKind::Backward, count)
}

fn till_forward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    find(engine, FindKind::TillForward, count)
}

fn till_backward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    find(engine, FindKind::TillBackward, count)
}

fn search_forward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::Search { forward: true }, count)
}

fn search_backward(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::Search { forward: false }, count)
}

fn search_word(engine: &mut Engine, doc: &mut dyn Document, count: &Count, forward: bool) {
    let Some((start, word)) = motion::word_under_cursor(doc, doc.position()) else {
        engine.set_status("No string under cursor");
        return;
    };
    let case_sensitive = engine.config.case_sensitive(&word);
    engine.search.search(doc, &word, case_sensitive);
    engine.search.set_backward(!forward);
    let found = if forward {
        engine.search.next(doc, start, count.value)
    } else {
        engine.search.previous(doc, start, count.value)
    };
    let result = engine.search_result(found);
    engine.finish(doc, result, Then::Move, true);
}

fn search_word_forward(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    search_word(engine, doc, count, true);
    None
}

fn search_word_backward(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    search_word(engine, doc, count, false);
    None
}

// Registers, macros, marks, jumps

fn select_register(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let sub = SubMode::new(SubModeKind::SelectRegister, Counts::from_count(count), engine.motion_then());
    Some((sub, true))
}

fn record_macro(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    if let Some(name) = engine.macros.stop() {
        engine.set_status(format!("Recorded @{name}"));
        return None;
    }
    submode(engine, SubModeKind::RecordMacro, count)
}

fn play_macro(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    if engine.is_recording_macro() {
        log::debug!("refusing to play a macro while recording one");
        engine.macros.reject_play();
        return None;
    }
    submode(engine, SubModeKind::PlayMacro, count)
}

fn set_mark(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::SetMark, count)
}

fn jump_to_mark_line(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::JumpToMark { exact: false }, count)
}

fn jump_to_mark(engine: &mut Engine, _: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    submode(engine, SubModeKind::JumpToMark { exact: true }, count)
}

fn jump_back(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let here = Jump::new(doc.file_path(), doc.position());
    if engine.jumps.at_end() && engine.jumps.last() != Some(&here) {
        engine.jumps.push(here);
    }
    let mut target = None;
    for _ in 0..count.value {
        match engine.jumps.back() {
            Some(jump) => target = Some(jump.clone()),
            None => break,
        }
    }
    match target {
        Some(jump) => {
            engine.goto_jump(doc, &jump);
        }
        None => log::debug!("at the start of the jump list"),
    }
    None
}

fn jump_forward(engine: &mut Engine, doc: &mut dyn Document, count: &Count) -> Option<(SubMode, bool)> {
    let mut target = None;
    for _ in 0..count.value {
        match engine.jumps.forward() {
            Some(jump) => target = Some(jump.clone()),
            None => break,
        }
    }
    match target {
        Some(jump) => {
            engine.goto_jump(doc, &jump);
        }
        None => log::debug!("at the end of the jump list"),
    }
    None
}

impl Engine {
    fn unknown_key(&mut self, context: &str, key: char) -> Option<(SubMode, bool)> {
        log::debug!("unknown key {key:?} after {context}");
        self.set_status(format!("Unknown key: {}", key_name(key)));
        None
    }

    /// Carry out a submode once its keystrokes resolved.
    pub(crate) fn resolve_submode(
        &mut self,
        doc: &mut dyn Document,
        sub: SubMode,
        resolution: Resolution,
    ) -> Option<(SubMode, bool)> {
        let SubMode { kind, counts, then } = sub;
        match (kind, resolution) {
            (SubModeKind::Motion { op_key }, Resolution::Key { count, key }) => {
                self.resolve_operator_key(doc, op_key, key, counts.with(&count), then)
            }
            (SubModeKind::GPrefix, Resolution::Char(c)) => self.resolve_g(doc, c, counts, then),
            (SubModeKind::TextObject { around }, Resolution::Char(c)) => {
                let Some(object) = TextObject::from_char(c) else {
                    return self.unknown_key("text object", c);
                };
                let result = textobject::select(doc, doc.position(), object, around, counts.product());
                self.finish(doc, result, then, false)
            }
            (SubModeKind::FindChar(kind), Resolution::Char(ch)) => {
                self.last_find = Some(LastFind::Char { ch, kind });
                let result = motion::find_char(doc, doc.position(), ch, kind, counts.product(), false);
                self.finish(doc, result, then, false)
            }
            (SubModeKind::Sneak { forward }, Resolution::Pair(a, b)) => {
                self.last_find = Some(LastFind::Sneak { pair: (a, b), forward });
                let result = motion::sneak(doc, doc.position(), (a, b), forward, counts.product());
                self.finish(doc, result, then, false)
            }
            (SubModeKind::Search { forward }, Resolution::Text(pattern)) => {
                let result = self.run_search(doc, pattern, forward, counts.product());
                self.finish(doc, result, then, true)
            }
            (SubModeKind::JumpToMark { exact }, Resolution::Char(name)) => {
                let result = self.mark_motion(doc, name, exact);
                self.finish(doc, result, then, true)
            }
            (SubModeKind::SetMark, Resolution::Char(name)) => {
                let mark = self.mark_at(doc, doc.position());
                if let Err(err) = self.marks.set(name, mark) {
                    self.set_status(err.to_string());
                }
                None
            }
            (SubModeKind::SelectRegister, Resolution::Char(name)) => {
                if Registers::is_valid(name) {
                    self.pending_register = Some(name);
                } else {
                    self.set_status(Error::InvalidRegister(name).to_string());
                }
                None
            }
            (SubModeKind::RecordMacro, Resolution::Char(name)) => {
                if self.macros.start(name) {
                    self.set_status(format!("recording @{name}"));
                } else {
                    self.set_status(Error::InvalidRegister(name).to_string());
                }
                None
            }
            (SubModeKind::PlayMacro, Resolution::Char(name)) => {
                self.schedule_macro(name, counts.product());
                None
            }
            (SubModeKind::ReplaceChar, Resolution::Char(c)) => {
                if then == Then::Select {
                    let span = self.visual_span(doc);
                    self.replace_span(doc, span, c);
                } else {
                    self.replace_chars(doc, c, counts.product());
                }
                None
            }
            (SubModeKind::SurroundDelete, Resolution::Char(c)) => {
                let pos = doc.position();
                if surround::find_pair(doc, pos, c).is_none() {
                    self.set_status(format!("No surrounding {c}"));
                    return None;
                }
                self.record_change(doc);
                if let Some(open) = surround::delete(doc, pos, c) {
                    self.set_cursor(doc, open);
                }
                self.search.mark_stale();
                None
            }
            (SubModeKind::SurroundChange, Resolution::Pair(from, to)) => {
                let pos = doc.position();
                if surround::find_pair(doc, pos, from).is_none() {
                    self.set_status(format!("No surrounding {from}"));
                    return None;
                }
                self.record_change(doc);
                if let Some(open) = surround::change(doc, pos, from, to) {
                    self.set_cursor(doc, open);
                }
                self.search.mark_stale();
                None
            }
            (SubModeKind::SurroundWith { span }, Resolution::Char(c)) => {
                self.record_change(doc);
                let open = surround::wrap(doc, span, c);
                self.leave_visual(doc);
                self.set_cursor(doc, open);
                self.search.mark_stale();
                None
            }
            (SubModeKind::Leader, Resolution::Char(c)) => {
                let Some(scope) = LabelScope::from_key(c) else {
                    return self.unknown_key("leader", c);
                };
                self.labels = labels::compute(doc, doc.position(), scope);
                self.labels_linewise = scope.is_linewise();
                if self.labels.is_empty() {
                    self.set_status("No jump targets");
                    return None;
                }
                Some((SubMode::new(SubModeKind::JumpLabel, counts, then), false))
            }
            (SubModeKind::JumpLabel, Resolution::Char(c)) => {
                let target = self.labels.iter().find(|label| label.label == c).map(|label| label.position);
                self.labels.clear();
                let result = match target {
                    Some(pos) if self.labels_linewise => MotionResult::line(pos),
                    Some(pos) => MotionResult::exclusive(pos),
                    None => return self.unknown_key("jump label", c),
                };
                self.finish(doc, result, then, true)
            }
            (kind, resolution) => {
                log::debug!("{kind:?} cannot use {resolution:?}");
                None
            }
        }
    }

    /// The key after an operator: a repeated operator key, a chained
    /// submode, or a motion.
    fn resolve_operator_key(
        &mut self,
        doc: &mut dyn Document,
        op_key: char,
        key: char,
        counts: Counts,
        then: Then,
    ) -> Option<(SubMode, bool)> {
        let chain = |kind| Some((SubMode::new(kind, counts.clone(), then), false));
        if key == op_key {
            let result = self.current_lines(doc, counts.product());
            return self.finish_motion(doc, result, then);
        }
        if key == self.config.leader_key {
            return chain(SubModeKind::Leader);
        }
        if let Some(kind) = FindKind::from_char(key) {
            return chain(SubModeKind::FindChar(kind));
        }
        match key {
            'g' => chain(SubModeKind::GPrefix),
            'i' | 'a' => chain(SubModeKind::TextObject { around: key == 'a' }),
            '\'' | '`' => chain(SubModeKind::JumpToMark { exact: key == '`' }),
            '/' | '?' => chain(SubModeKind::Search { forward: key == '/' }),
            'z' | 'Z' if self.config.use_sneak => chain(SubModeKind::Sneak { forward: key == 'z' }),
            's' => match then {
                Then::Operate(Operator::Delete) => {
                    Some((SubMode::new(SubModeKind::SurroundDelete, counts, Then::Move), false))
                }
                Then::Operate(Operator::Change) => {
                    Some((SubMode::new(SubModeKind::SurroundChange, counts, Then::Move), false))
                }
                Then::Operate(Operator::Yank) => {
                    let kind = SubModeKind::Motion { op_key: 's' };
                    Some((SubMode::new(kind, counts, Then::SurroundWrap), false))
                }
                _ => self.unknown_key("operator", key),
            },
            _ => match Motion::from_key(&key_name(key)) {
                Some(motion) => self.run_motion(doc, motion, &counts, then),
                None => self.unknown_key("operator", key),
            },
        }
    }

    fn resolve_g(&mut self, doc: &mut dyn Document, c: char, counts: Counts, then: Then) -> Option<(SubMode, bool)> {
        if let Then::Operate(op) = then
            && op.is_g_family()
            && op.key() == c
        {
            let result = self.current_lines(doc, counts.product());
            return self.finish_motion(doc, result, then);
        }
        if let Some(motion) = Motion::from_g_key(c) {
            return self.run_motion(doc, motion, &counts, then);
        }
        match (c, then) {
            ('d', Then::Move) => {
                self.goto_definition(doc);
                None
            }
            (_, Then::Move) => match Operator::from_g_key(c) {
                Some(op) => {
                    let kind = SubModeKind::Motion { op_key: op.key() };
                    Some((SubMode::new(kind, counts, Then::Operate(op)), false))
                }
                None => self.unknown_key("g", c),
            },
            (_, Then::Select) => match Operator::from_g_key(c) {
                Some(op) => {
                    let span = self.visual_span(doc);
                    self.run_operator(doc, op, span);
                    None
                }
                None => self.unknown_key("g", c),
            },
            _ => self.unknown_key("g", c),
        }
    }

    fn run_search(&mut self, doc: &mut dyn Document, pattern: String, forward: bool, count: usize) -> MotionResult {
        let pattern = if pattern.is_empty() {
            self.search.pattern().to_string()
        } else {
            pattern
        };
        if pattern.is_empty() {
            self.set_status("No previous search pattern");
            return MotionResult::failed();
        }
        let case_sensitive = self.config.case_sensitive(&pattern);
        self.search.search(doc, &pattern, case_sensitive);
        self.search.set_backward(!forward);
        let pos = doc.position();
        let found = if forward {
            self.search.next(doc, pos, count)
        } else {
            self.search.previous(doc, pos, count)
        };
        self.search_result(found)
    }

    fn schedule_macro(&mut self, name: char, repeat: usize) {
        if self.macro_task.is_some() {
            log::debug!("macro playback already running; ignoring @{name}");
            return;
        }
        match self.macros.take_for_play(name) {
            Some(keys) if keys.is_empty() => log::debug!("macro @{name} is empty"),
            Some(keys) => self.macro_task = Some(MacroTask::new(keys, repeat)),
            None => self.set_status(format!("Nothing recorded in @{name}")),
        }
    }
}
