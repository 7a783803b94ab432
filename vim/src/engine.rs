use crate::commands::{self, Command, CommandTable};
use crate::config::Config;
use crate::dot::{DotCommand, DotRecorder, Geometry};
use crate::jumplist::{Jump, JumpList};
use crate::key::{KeyCode, KeyEvent, Modifiers, Origin};
use crate::labels::JumpLabel;
use crate::macros::{MacroRecorder, MacroTask};
use crate::marks::{CONTEXT, Mark, Marks};
use crate::motion::{self, FindKind, Motion, column_in, first_non_blank, line_of};
use crate::operator::{Operator, resolve_span};
use crate::registers::{Register, Registers};
use crate::search::SearchState;
use crate::submode::{Count, Counts, Resolution, SubMode, SubModeKind, Then, key_name};
use crate::traits::{Clipboard, Document};
use crate::types::{Mode, MotionResult, Span, Wise};

/// The last `f`/`t`/sneak search, for `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LastFind {
    Char { ch: char, kind: FindKind },
    Sneak { pair: (char, char), forward: bool },
}

/// The interpreter session. Owns every piece of state: mode, pending
/// input, registers, marks, jump list, search, dot-repeat and macros.
pub struct Engine {
    pub(crate) mode: Mode,
    pub(crate) config: Config,
    pub(crate) input: String,
    pub(crate) submode: Option<SubMode>,
    /// Characters of `input` typed before the submode was entered.
    pub(crate) sub_offset: usize,
    normal_commands: CommandTable,
    visual_commands: CommandTable,
    pub(crate) registers: Registers,
    pub(crate) pending_register: Option<char>,
    pub(crate) marks: Marks,
    pub(crate) jumps: JumpList,
    pub(crate) search: SearchState,
    pub(crate) last_find: Option<LastFind>,
    pub(crate) dot: DotRecorder,
    /// A `.` waiting to run once the current dispatch returns, with the
    /// count that overrides the recorded one.
    pub(crate) pending_dot: Option<Option<String>>,
    pub(crate) macros: MacroRecorder,
    pub(crate) macro_task: Option<MacroTask>,
    pub(crate) labels: Vec<JumpLabel>,
    pub(crate) labels_linewise: bool,
    pub(crate) preferred_col: Option<usize>,
    /// The fixed end of a Visual selection; the cursor is the other end.
    pub(crate) anchor: usize,
    status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub mode: Mode,
    pub pending_input: String,
    pub submode: Option<&'static str>,
    pub recording: Option<char>,
    pub pending_register: Option<char>,
    pub preferred_col: Option<usize>,
}

pub struct EngineBuilder {
    mode: Mode,
    config: Config,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            config: Config::default(),
            clipboard: None,
        }
    }
}

impl EngineBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn build(self) -> Engine {
        let marks = match &self.config.global_marks_file {
            Some(path) => Marks::with_file(path.clone()),
            None => Marks::new(),
        };
        let registers = match self.clipboard {
            Some(clipboard) => Registers::with_clipboard(clipboard),
            None => Registers::new(),
        };
        Engine {
            mode: self.mode,
            input: String::new(),
            submode: None,
            sub_offset: 0,
            normal_commands: commands::normal_table(),
            visual_commands: commands::visual_table(),
            registers,
            pending_register: None,
            marks,
            jumps: JumpList::with_capacity(self.config.jump_list_capacity),
            search: SearchState::new(),
            last_find: None,
            dot: DotRecorder::default(),
            pending_dot: None,
            macros: MacroRecorder::default(),
            macro_task: None,
            labels: Vec::new(),
            labels_linewise: false,
            preferred_col: None,
            anchor: 0,
            status: None,
            config: self.config,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            pending_input: self.input.clone(),
            submode: self.submode.as_ref().map(SubMode::name),
            recording: self.macros.recording(),
            pending_register: self.pending_register,
            preferred_col: self.preferred_col,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Read a register. `+` goes through the clipboard.
    pub fn register(&mut self, name: char) -> Option<Register> {
        self.registers.read(name)
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    pub fn marks_mut(&mut self) -> &mut Marks {
        &mut self.marks
    }

    pub fn jump_list(&self) -> &JumpList {
        &self.jumps
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// Labels waiting for a key, for the host to draw.
    pub fn jump_labels(&self) -> &[JumpLabel] {
        &self.labels
    }

    pub fn last_change(&self) -> Option<&DotCommand> {
        self.dot.last()
    }

    pub fn is_recording_macro(&self) -> bool {
        self.macros.recording().is_some()
    }

    pub fn has_pending_macro(&self) -> bool {
        self.macro_task.is_some()
    }

    pub fn macros(&self) -> &MacroRecorder {
        &self.macros
    }

    /// The host's "document changed" signal.
    pub fn document_changed(&mut self) {
        self.search.mark_stale();
    }

    /// Host entry point for every keystroke.
    ///
    /// In Insert mode the key edits the document; otherwise it extends the
    /// pending command input and is dispatched. While a macro is being
    /// recorded the key is stored along with where it went.
    pub fn handle_key(&mut self, doc: &mut dyn Document, key: KeyEvent) {
        let origin = if self.mode == Mode::Insert {
            Origin::Document
        } else {
            Origin::CommandLine
        };
        let key = key.with_origin(origin);
        self.macros.record(key);
        self.deliver(doc, key);
    }

    fn deliver(&mut self, doc: &mut dyn Document, key: KeyEvent) {
        match key.origin {
            Origin::Document => self.insert_key(doc, key),
            Origin::CommandLine => self.command_key(doc, key),
        }
    }

    fn command_key(&mut self, doc: &mut dyn Document, key: KeyEvent) {
        if key.code == KeyCode::Backspace && (self.submode.is_some() || !self.input.is_empty()) {
            let own = self.input.chars().count().saturating_sub(self.sub_offset);
            if let Some(sub) = &self.submode
                && own == 0
            {
                log::debug!("{} cancelled", sub.name());
                self.submode = None;
                self.input.clear();
                self.sub_offset = 0;
            } else {
                self.input.pop();
            }
            return;
        }
        self.feed_command_char(doc, key.text());
    }

    /// Append one character to the pending input and dispatch it.
    pub(crate) fn feed_command_char(&mut self, doc: &mut dyn Document, c: char) {
        self.input.push(c);
        let text = self.input.clone();
        if self.handle_input(doc, &text) {
            self.input.clear();
        }
    }

    /// Dispatch the characters typed since the last reset. Returns `true`
    /// when the input buffer should be cleared.
    pub fn handle_input(&mut self, doc: &mut dyn Document, text: &str) -> bool {
        self.input = text.to_string();
        let clear = match self.submode.clone() {
            Some(sub) => {
                let own: String = text.chars().skip(self.sub_offset).collect();
                self.run_submode(doc, sub, &own)
            }
            None => self.dispatch(doc, text),
        };
        self.flush_dot(doc);
        clear
    }

    fn dispatch(&mut self, doc: &mut dyn Document, text: &str) -> bool {
        let leader = self.config.leader_key;
        if text.chars().eq(std::iter::once(leader)) {
            let sub = SubMode::new(SubModeKind::Leader, Counts::default(), self.motion_then());
            return self.enter_submode(sub, false);
        }

        let (count, key) = if text == "0" {
            (Count::parse(""), '0')
        } else {
            let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
            match text.chars().nth(digits.len()) {
                Some(key) => (Count::parse(&digits), key),
                None => return false,
            }
        };

        let name = key_name(key);
        let table = if self.mode.is_visual() {
            &self.visual_commands
        } else {
            &self.normal_commands
        };
        let Some(command) = table.get(name.as_ref()).copied() else {
            self.submode = None;
            log::debug!("unknown key {name:?} in {} mode", self.mode.as_str());
            self.set_status(format!("Unknown key: {name}"));
            return true;
        };

        let next = match command {
            Command::Motion(motion) => {
                let then = self.motion_then();
                self.run_motion(doc, motion, &Counts::from_count(&count), then)
            }
            Command::Action(handler) => handler(self, doc, &count),
        };
        match next {
            Some((sub, clear)) => self.enter_submode(sub, clear),
            None => true,
        }
    }

    /// Hand the following keystrokes to `sub`. Without `clear` the typed
    /// command keeps accumulating, so the full string is available for
    /// dot-repeat once it resolves.
    pub(crate) fn enter_submode(&mut self, sub: SubMode, clear: bool) -> bool {
        self.sub_offset = if clear { 0 } else { self.input.chars().count() };
        self.submode = Some(sub);
        clear
    }

    fn run_submode(&mut self, doc: &mut dyn Document, sub: SubMode, own: &str) -> bool {
        match sub.resolve(own) {
            Resolution::Pending => false,
            Resolution::Cancelled => {
                log::debug!("{} cancelled", sub.name());
                self.submode = None;
                self.pending_register = None;
                self.labels.clear();
                if self.mode.is_visual() {
                    self.leave_visual(doc);
                    let pos = doc.position();
                    self.set_cursor(doc, pos);
                }
                true
            }
            resolution => {
                self.submode = None;
                match self.resolve_submode(doc, sub, resolution) {
                    Some((next, clear)) => self.enter_submode(next, clear),
                    None => true,
                }
            }
        }
    }

    pub(crate) fn motion_then(&self) -> Then {
        if self.mode.is_visual() {
            Then::Select
        } else {
            Then::Move
        }
    }

    /// Run the cooperative macro task for one key. Returns `false` once no
    /// playback is pending.
    pub fn tick(&mut self, doc: &mut dyn Document) -> bool {
        let Some(task) = self.macro_task.as_mut() else {
            return false;
        };
        let Some(key) = task.next() else {
            self.macro_task = None;
            if self.mode == Mode::Insert {
                self.leave_insert(doc);
            }
            return false;
        };
        match key.origin {
            Origin::Document if self.mode != Mode::Insert => {
                let pos = doc.position();
                self.enter_insert(doc, pos);
            }
            Origin::CommandLine if self.mode == Mode::Insert => self.leave_insert(doc),
            _ => {}
        }
        self.deliver(doc, key);
        true
    }

    /// Drive pending macro playback to completion.
    pub fn run_macros(&mut self, doc: &mut dyn Document) {
        while self.tick(doc) {}
    }

    fn insert_key(&mut self, doc: &mut dyn Document, key: KeyEvent) {
        if key.code != KeyCode::Esc {
            self.dot.capture(key);
        }
        let pos = doc.position().min(doc.len());
        match key.code {
            KeyCode::Esc => {
                self.leave_insert(doc);
                return;
            }
            KeyCode::Backspace => {
                if pos > 0 {
                    doc.delete_range(pos - 1, pos);
                    doc.set_position(pos - 1);
                }
            }
            KeyCode::Enter => {
                doc.insert_text(pos, "\n");
                doc.set_position(pos + 1);
            }
            KeyCode::Tab => {
                doc.insert_text(pos, "\t");
                doc.set_position(pos + 1);
            }
            KeyCode::Char(_) if key.mods.intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META) => {
                log::debug!("ignoring chord {key:?} in insert mode");
                return;
            }
            KeyCode::Char(c) => {
                doc.insert_text(pos, &c.to_string());
                doc.set_position(pos + 1);
            }
        }
        self.search.mark_stale();
    }

    /// Run a queued `.` now that the command that asked for it returned.
    fn flush_dot(&mut self, doc: &mut dyn Document) {
        let Some(count) = self.pending_dot.take() else {
            return;
        };
        let Some(command) = self.dot.last().cloned() else {
            return;
        };
        let replay = command.replay_string(count.as_deref());
        log::debug!("repeating {replay:?}");
        self.dot.set_running(true);
        self.input.clear();
        self.submode = None;
        self.sub_offset = 0;
        for c in replay.chars() {
            self.feed_command_char(doc, c);
        }
        if self.mode == Mode::Insert {
            for key in &command.insert_keys {
                self.insert_key(doc, *key);
            }
            if self.mode == Mode::Insert {
                self.leave_insert(doc);
            }
        }
        self.input.clear();
        self.submode = None;
        self.dot.set_running(false);
    }

    /// Remember the command being executed as the last change.
    pub(crate) fn record_change(&mut self, doc: &dyn Document) {
        if self.dot.is_running() {
            return;
        }
        let geometry = self.mode.is_visual().then(|| {
            let head = doc.position();
            let (lo, hi) = (self.anchor.min(head), self.anchor.max(head));
            Geometry {
                block_start: doc.line_number_of(lo),
                block_end: doc.line_number_of(hi),
                col_start: lo - line_of(doc, lo).start,
                col_end: hi - line_of(doc, hi).start,
            }
        });
        self.dot.record(DotCommand::new(self.mode, &self.input, geometry));
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("status: {message}");
        self.status = Some(message);
    }

    // Modes

    /// Switch mode, resetting the selection for the new mode.
    pub(crate) fn enter_mode(&mut self, doc: &mut dyn Document, mode: Mode) {
        if self.mode == Mode::Insert && mode != Mode::Insert {
            self.dot.stop_capture();
        }
        let pos = doc.position();
        if mode.is_visual() && !self.mode.is_visual() {
            self.anchor = pos;
        }
        self.mode = mode;
        if mode.is_visual() {
            self.update_selection(doc);
        } else {
            doc.set_selection(pos, pos);
        }
    }

    pub(crate) fn leave_visual(&mut self, doc: &mut dyn Document) {
        if self.mode.is_visual() {
            self.enter_mode(doc, Mode::Normal);
        }
    }

    pub(crate) fn enter_insert(&mut self, doc: &mut dyn Document, pos: usize) {
        self.enter_mode(doc, Mode::Insert);
        let pos = pos.min(doc.len());
        doc.set_position(pos);
        doc.set_selection(pos, pos);
        if !self.dot.is_running() {
            self.dot.start_capture();
        }
    }

    /// Back to Normal mode with the cursor stepping left, as after `Esc`.
    pub(crate) fn leave_insert(&mut self, doc: &mut dyn Document) {
        self.enter_mode(doc, Mode::Normal);
        let pos = doc.position();
        let line = line_of(doc, pos);
        let target = if pos > line.start { pos - 1 } else { pos };
        self.set_cursor(doc, target);
    }

    // Cursor and selection

    /// Clamp to a valid Normal-mode position: inside the document and not
    /// on the terminator of a non-empty line.
    pub(crate) fn clamp(&self, doc: &dyn Document, pos: usize) -> usize {
        let len = doc.len();
        if len == 0 {
            return 0;
        }
        let p = pos.min(len - 1);
        let on_terminator = doc.char_at(p) == Some('\n') && p > 0 && doc.char_at(p - 1) != Some('\n');
        if self.mode != Mode::Insert && on_terminator {
            p - 1
        } else {
            p
        }
    }

    pub(crate) fn set_cursor(&mut self, doc: &mut dyn Document, pos: usize) {
        let pos = self.clamp(doc, pos);
        doc.set_position(pos);
        if self.mode.is_visual() {
            self.update_selection(doc);
        } else {
            doc.set_selection(pos, pos);
        }
    }

    fn column(&self, doc: &dyn Document) -> usize {
        let pos = doc.position();
        self.preferred_col.unwrap_or_else(|| pos - line_of(doc, pos).start)
    }

    /// The range covered by the Visual selection.
    pub(crate) fn visual_span(&self, doc: &dyn Document) -> Span {
        let head = doc.position();
        let (lo, hi) = (self.anchor.min(head), self.anchor.max(head));
        if self.mode == Mode::VisualLine {
            Span::lines(line_of(doc, lo).start, line_of(doc, hi).end)
        } else {
            Span::chars(lo, (hi + 1).min(doc.len()))
        }
    }

    pub(crate) fn update_selection(&mut self, doc: &mut dyn Document) {
        let span = self.visual_span(doc);
        let end = if span.linewise {
            (span.end + 1).min(doc.len())
        } else {
            span.end
        };
        doc.set_selection(span.start, end);
    }

    fn select_to(&mut self, doc: &mut dyn Document, result: &MotionResult) {
        let Some(target) = result.target else {
            log::debug!("selection motion failed");
            return;
        };
        if result.wise == Wise::Block
            && let (Some(start), Some(end)) = (result.sel_start, result.sel_end)
        {
            if self.mode == Mode::VisualLine {
                self.enter_mode(doc, Mode::Visual);
            }
            self.anchor = start;
            doc.set_position(end.saturating_sub(1).max(start));
            self.update_selection(doc);
            return;
        }
        doc.set_position(target.min(doc.len().saturating_sub(1)));
        self.update_selection(doc);
    }

    // Motions

    pub(crate) fn run_motion(
        &mut self,
        doc: &mut dyn Document,
        motion: Motion,
        counts: &Counts,
        then: Then,
    ) -> Option<(SubMode, bool)> {
        let motion = match then {
            Then::Operate(op) => motion.for_operator(op),
            Then::SurroundWrap => motion.for_operator(Operator::Yank),
            _ => motion,
        };
        let col = self.column(doc);
        let result = self.compute_motion(doc, motion, counts);
        let next = self.finish(doc, result, then, motion.is_jump());
        if matches!(then, Then::Move | Then::Select) && !result.is_failed() {
            if motion.is_vertical() {
                self.preferred_col = Some(col);
            } else if motion == Motion::LineEnd {
                self.preferred_col = Some(usize::MAX);
            }
        }
        next
    }

    pub(crate) fn compute_motion(&mut self, doc: &dyn Document, motion: Motion, counts: &Counts) -> MotionResult {
        let pos = doc.position();
        let n = counts.product();
        let explicit = counts.is_explicit();
        let col = self.column(doc);
        match motion {
            Motion::Left => motion::left(doc, pos, n),
            Motion::Right => motion::right(doc, pos, n),
            Motion::Down => motion::down(doc, pos, n, col),
            Motion::Up => motion::up(doc, pos, n, col),
            Motion::WordForward { big } => motion::word_forward(doc, pos, n, big),
            Motion::WordForwardDelete { big } => motion::word_forward_delete(doc, pos, n, big),
            Motion::WordForwardChange { big } => motion::word_forward_change(doc, pos, n, big),
            Motion::WordBackward { big } => motion::word_backward(doc, pos, n, big),
            Motion::WordEnd { big } => motion::word_end(doc, pos, n, big),
            Motion::WordEndBackward { big } => motion::word_end_backward(doc, pos, n, big),
            Motion::LineStart => motion::line_start(doc, pos),
            Motion::FirstNonBlank => motion::first_non_blank_of(doc, pos),
            Motion::LineEnd => motion::line_end(doc, pos, n),
            Motion::LastNonBlank => motion::last_non_blank(doc, pos, n),
            Motion::NextLineStart => motion::next_line_start(doc, pos, n),
            Motion::PrevLineStart => motion::prev_line_start(doc, pos, n),
            Motion::FirstLine => motion::goto_line(doc, if explicit { n - 1 } else { 0 }),
            Motion::LastLine => {
                let line = if explicit { n - 1 } else { motion::last_line(doc) };
                motion::goto_line(doc, line)
            }
            Motion::ParagraphForward => motion::paragraph_forward(doc, pos, n),
            Motion::ParagraphBackward => motion::paragraph_backward(doc, pos, n),
            Motion::MatchPair if explicit => motion::percent_line(doc, n),
            Motion::MatchPair => motion::match_pair(doc, pos),
            Motion::ScreenTop => motion::screen_top(doc, n),
            Motion::ScreenMiddle => motion::screen_middle(doc),
            Motion::ScreenBottom => motion::screen_bottom(doc, n),
            Motion::HalfPageDown => motion::half_page(doc, pos, true, col),
            Motion::HalfPageUp => motion::half_page(doc, pos, false, col),
            Motion::SearchNext => self.search_motion(doc, pos, n, false),
            Motion::SearchPrevious => self.search_motion(doc, pos, n, true),
            Motion::RepeatFind => self.repeat_find(doc, pos, n, false),
            Motion::RepeatFindReverse => self.repeat_find(doc, pos, n, true),
        }
    }

    fn search_motion(&mut self, doc: &dyn Document, pos: usize, count: usize, reverse: bool) -> MotionResult {
        if self.search.pattern().is_empty() {
            self.set_status("No previous search pattern");
            return MotionResult::failed();
        }
        let forward = self.search.is_backward() == reverse;
        let found = if forward {
            self.search.next(doc, pos, count)
        } else {
            self.search.previous(doc, pos, count)
        };
        self.search_result(found)
    }

    pub(crate) fn search_result(&mut self, found: Option<usize>) -> MotionResult {
        match found {
            Some(at) => MotionResult::exclusive(at),
            None => {
                let message = format!("Pattern not found: {}", self.search.pattern());
                self.set_status(message);
                MotionResult::failed()
            }
        }
    }

    fn repeat_find(&mut self, doc: &dyn Document, pos: usize, count: usize, reverse: bool) -> MotionResult {
        match self.last_find {
            None => MotionResult::failed(),
            Some(LastFind::Char { ch, kind }) => {
                let kind = if reverse { kind.reversed() } else { kind };
                motion::find_char(doc, pos, ch, kind, count, true)
            }
            Some(LastFind::Sneak { pair, forward }) => motion::sneak(doc, pos, pair, forward != reverse, count),
        }
    }

    /// Carry out `then` with a computed motion. Jumps from Normal mode
    /// record the origin and destination in the jump list and set the
    /// context mark.
    pub(crate) fn finish(
        &mut self,
        doc: &mut dyn Document,
        result: MotionResult,
        then: Then,
        jump: bool,
    ) -> Option<(SubMode, bool)> {
        if !jump || then != Then::Move || result.is_failed() {
            return self.finish_motion(doc, result, then);
        }
        let from = doc.position();
        self.push_jump(doc, from);
        self.set_context_mark(doc, from);
        let next = self.finish_motion(doc, result, then);
        let to = doc.position();
        self.push_jump(doc, to);
        next
    }

    pub(crate) fn finish_motion(
        &mut self,
        doc: &mut dyn Document,
        result: MotionResult,
        then: Then,
    ) -> Option<(SubMode, bool)> {
        match then {
            Then::Move => {
                match result.target {
                    Some(target) => {
                        self.preferred_col = None;
                        self.set_cursor(doc, target);
                    }
                    None => log::debug!("motion failed"),
                }
                None
            }
            Then::Select => {
                if !result.is_failed() {
                    self.preferred_col = None;
                }
                self.select_to(doc, &result);
                None
            }
            Then::Operate(op) => {
                self.apply_operator(doc, op, result);
                None
            }
            Then::SurroundWrap => {
                let Some(span) = resolve_span(doc, doc.position(), &result) else {
                    log::debug!("surround aborted: motion failed");
                    return None;
                };
                let sub = SubMode::new(SubModeKind::SurroundWith { span }, Counts::default(), Then::Move);
                Some((sub, false))
            }
        }
    }

    // Jumps and marks

    pub(crate) fn push_jump(&mut self, doc: &dyn Document, position: usize) {
        self.jumps.push(Jump::new(doc.file_path(), position));
    }

    pub(crate) fn goto_jump(&mut self, doc: &mut dyn Document, jump: &Jump) -> bool {
        if jump.file != doc.file_path() && !doc.open_file(&jump.file) {
            self.set_status(format!("Cannot open {}", jump.file));
            return false;
        }
        self.set_cursor(doc, jump.position);
        true
    }

    pub(crate) fn mark_at(&self, doc: &dyn Document, pos: usize) -> Mark {
        let line = doc.line_number_of(pos);
        Mark {
            file: doc.file_path().to_string(),
            line,
            column: pos - doc.line_at(line).start,
        }
    }

    fn set_context_mark(&mut self, doc: &dyn Document, pos: usize) {
        let mark = self.mark_at(doc, pos);
        if let Err(err) = self.marks.set(CONTEXT, mark) {
            log::debug!("context mark not set: {err}");
        }
    }

    /// Where `'name` (line-wise) or `` `name `` (exact) leads. A mark whose
    /// line is gone is dropped and the jump fails.
    pub(crate) fn mark_motion(&mut self, doc: &mut dyn Document, name: char, exact: bool) -> MotionResult {
        let file = doc.file_path().to_string();
        let Some(mark) = self.marks.get(name, &file).cloned() else {
            self.set_status(format!("Mark not set: {name}"));
            return MotionResult::failed();
        };
        if mark.file != file && !doc.open_file(&mark.file) {
            self.set_status(format!("Cannot open {}", mark.file));
            return MotionResult::failed();
        }
        if mark.line >= doc.line_count() {
            log::debug!("dropping mark {name:?}: line {} is gone", mark.line);
            self.marks.remove(name, &mark.file);
            return MotionResult::failed();
        }
        let line = doc.line_at(mark.line);
        if exact {
            MotionResult::exclusive(column_in(&line, mark.column))
        } else {
            MotionResult::line(first_non_blank(&line))
        }
    }

    /// `gd`: the host moves the cursor; a jump that went nowhere is
    /// retracted from the jump list.
    pub(crate) fn goto_definition(&mut self, doc: &mut dyn Document) {
        let before = doc.position();
        let file = doc.file_path().to_string();
        let len_before = self.jumps.len();
        let context = self.mark_at(doc, before);
        self.push_jump(doc, before);
        doc.goto_definition();
        if doc.position() == before && doc.file_path() == file {
            if self.jumps.len() > len_before {
                self.jumps.pop_last();
            }
            return;
        }
        if let Err(err) = self.marks.set(CONTEXT, context) {
            log::debug!("context mark not set: {err}");
        }
        let after = doc.position();
        self.push_jump(doc, after);
    }
}
