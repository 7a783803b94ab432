/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key, already shifted by the host ('A' rather than SHIFT+'a').
    Char(char),
    /// The Escape key, used to exit modes and cancel pending commands.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
    /// The Tab key. Doubles as Ctrl-I (jump forward) on the command line.
    Tab,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// Where a keystroke was delivered.
///
/// Recorded macros remember the destination of every key so playback can
/// move focus between the command line and the document the same way the
/// user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// The command dispatcher (Normal and Visual modes).
    #[default]
    CommandLine,
    /// The host document widget (Insert mode).
    Document,
}

/// A key press event with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
    /// Destination the key was routed to. Filled in by the engine.
    pub origin: Origin,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self {
            code,
            mods,
            origin: Origin::CommandLine,
        }
    }

    /// A plain character key.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::empty())
    }

    /// A character key with CTRL held.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }

    pub fn esc() -> Self {
        Self::new(KeyCode::Esc, Modifiers::empty())
    }

    pub fn enter() -> Self {
        Self::new(KeyCode::Enter, Modifiers::empty())
    }

    pub fn backspace() -> Self {
        Self::new(KeyCode::Backspace, Modifiers::empty())
    }

    pub fn tab() -> Self {
        Self::new(KeyCode::Tab, Modifiers::empty())
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// The logical character this key contributes to the command input.
    ///
    /// Control chords map onto their ASCII control characters so that they
    /// can travel through the same text-based dispatch as printable keys.
    pub fn text(&self) -> char {
        match self.code {
            KeyCode::Char(c) if self.mods.contains(Modifiers::CTRL) && c.is_ascii_alphabetic() => {
                ((c.to_ascii_lowercase() as u8) - b'a' + 1) as char
            }
            KeyCode::Char(c) => c,
            KeyCode::Esc => '\x1b',
            KeyCode::Enter => '\n',
            KeyCode::Backspace => '\x08',
            KeyCode::Tab => '\t',
        }
    }

    /// Build the key a character of a command string stands for.
    pub fn from_text(c: char) -> Self {
        match c {
            '\x1b' => Self::esc(),
            '\n' | '\r' => Self::enter(),
            '\x08' | '\x7f' => Self::backspace(),
            '\t' => Self::tab(),
            c if (c as u32) >= 1 && (c as u32) <= 26 => Self::ctrl((b'a' + c as u8 - 1) as char),
            c => Self::char(c),
        }
    }
}
