//! Terminal demo hosting the interpreter with crossterm and ratatui.
//!
//! Run with: cargo run --example tui_crossterm [FILE]
//! Quit with Ctrl-C.

use crossterm::{
    event::{self, Event, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use ropey::Rope;
use std::io;
use vim_modal::{Document, Engine, KeyCode, KeyEvent, LineInfo, Modifiers};

const WELCOME: &str = "Welcome to vim_modal!\n\n\
Press 'i' to enter insert mode and Esc to leave it.\n\
Try hjkl, w/b/e, dw, ciw, yy and p, / to search,\n\
qa ... q and @a for macros, ma and 'a for marks.\n\
Ctrl-C quits.\n";

/// A rope buffer with a snapshot undo history.
struct RopeBuffer {
    rope: Rope,
    path: String,
    cursor: usize,
    selection: (usize, usize),
    undo: Vec<(Rope, usize)>,
    redo: Vec<(Rope, usize)>,
}

impl RopeBuffer {
    fn new(path: &str, text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: path.to_string(),
            cursor: 0,
            selection: (0, 0),
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    fn checkpoint(&mut self) {
        self.undo.push((self.rope.clone(), self.cursor));
        self.redo.clear();
    }
}

impl Document for RopeBuffer {
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
        self.checkpoint();
        let pos = pos.min(self.len());
        self.rope.insert(pos, text);
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        if start < end {
            self.checkpoint();
            self.rope.remove(start..end);
        }
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len).max(start.min(len)));
        self.checkpoint();
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
        let (text, pattern) = folded(&self.rope.slice(from.min(self.len())..).to_string(), pattern, case_sensitive);
        let byte = text.find(&pattern)?;
        Some(from + text[..byte].chars().count())
    }

    fn find_backward(&self, pattern: &str, from: usize, case_sensitive: bool) -> Option<usize> {
        let end = (from + pattern.chars().count()).min(self.len());
        let (text, pattern) = folded(&self.rope.slice(..end).to_string(), pattern, case_sensitive);
        let byte = text.rfind(&pattern)?;
        Some(text[..byte].chars().count())
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

    fn undo(&mut self) {
        if let Some((rope, cursor)) = self.undo.pop() {
            self.redo.push((std::mem::replace(&mut self.rope, rope), self.cursor));
            self.cursor = cursor;
        }
    }

    fn redo(&mut self) {
        if let Some((rope, cursor)) = self.redo.pop() {
            self.undo.push((std::mem::replace(&mut self.rope, rope), self.cursor));
            self.cursor = cursor;
        }
    }
}

/// ASCII case folding keeps char offsets stable.
fn folded(text: &str, pattern: &str, case_sensitive: bool) -> (String, String) {
    if case_sensitive {
        (text.to_string(), pattern.to_string())
    } else {
        (text.to_ascii_lowercase(), pattern.to_ascii_lowercase())
    }
}

fn convert_key(event: CKeyEvent) -> Option<KeyEvent> {
    let mut mods = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        mods |= Modifiers::ALT;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        _ => return None,
    };
    Some(KeyEvent::new(code, mods))
}

struct App {
    engine: Engine,
    buffer: RopeBuffer,
    message: String,
}

impl App {
    fn handle(&mut self, event: CKeyEvent) {
        let Some(key) = convert_key(event) else {
            return;
        };
        self.engine.handle_key(&mut self.buffer, key);
        self.engine.run_macros(&mut self.buffer);
        if let Some(status) = self.engine.take_status() {
            self.message = status;
        }
    }

    fn status_line(&self) -> String {
        let snapshot = self.engine.snapshot();
        let mut line = format!("-- {} --", snapshot.mode.as_str().to_uppercase());
        if let Some(name) = snapshot.recording {
            line.push_str(&format!(" recording @{name}"));
        }
        if !snapshot.pending_input.is_empty() {
            line.push_str(&format!("  {}", snapshot.pending_input.escape_debug()));
        }
        if !self.message.is_empty() {
            line.push_str(&format!("  | {}", self.message));
        }
        line
    }
}

fn render_line(info: &LineInfo, selection: (usize, usize)) -> Line<'static> {
    let (start, end) = selection;
    if start >= end || end <= info.start || start > info.end {
        return Line::from(info.text.clone());
    }
    let chars: Vec<char> = info.text.chars().collect();
    let lo = start.saturating_sub(info.start).min(chars.len());
    let hi = (end - info.start).min(chars.len());
    let piece = |range: std::ops::Range<usize>| chars[range].iter().collect::<String>();
    Line::from(vec![
        Span::raw(piece(0..lo)),
        Span::styled(piece(lo..hi), Style::default().bg(Color::Blue)),
        Span::raw(piece(hi..chars.len())),
    ])
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    let buffer = &app.buffer;
    let height = chunks[0].height.saturating_sub(2) as usize;
    let cursor_line = buffer.line_number_of(buffer.position());
    let top = cursor_line.saturating_sub(height.saturating_sub(1));
    let lines: Vec<Line> = (top..buffer.line_count().min(top + height))
        .map(|n| render_line(&buffer.line_at(n), buffer.selection()))
        .collect();

    let title = format!("vim_modal demo: {}", buffer.file_path());
    let text = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(text, chunks[0]);

    let status = Paragraph::new(app.status_line())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    let col = buffer.position() - buffer.line_at(cursor_line).start;
    f.set_cursor(
        chunks[0].x + 1 + col as u16,
        chunks[0].y + 1 + (cursor_line - top) as u16,
    );
}

fn main() -> io::Result<()> {
    let (path, text) = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            (path, text)
        }
        None => ("scratch".to_string(), WELCOME.to_string()),
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App {
        engine: Engine::new(),
        buffer: RopeBuffer::new(&path, &text),
        message: String::new(),
    };

    loop {
        terminal.draw(|f| ui(f, &app))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == CKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            app.handle(key);
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
