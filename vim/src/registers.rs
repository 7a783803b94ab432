//! Register storage.
//!
//! Registers are keyed by a `char`:
//! - `"`: unnamed, written by every yank, delete and change
//! - `0`: the most recent explicit yank
//! - `a`..`z`: named; the uppercase name appends to the lowercase register
//! - `+`: the clipboard, read and written through [`Clipboard`]

use std::collections::HashMap;
use std::fmt;

use crate::clipboard::MemoryClipboard;
use crate::error::{Error, Result};
use crate::traits::Clipboard;

pub const UNNAMED: char = '"';
pub const YANK: char = '0';
pub const CLIPBOARD: char = '+';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWise {
    Char,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub name: char,
    pub content: String,
    pub wise: RegisterWise,
}

pub struct Registers {
    inner: HashMap<char, Register>,
    clipboard: Box<dyn Clipboard>,
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registers").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::with_clipboard(Box::new(MemoryClipboard::new()))
    }
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clipboard(clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            inner: HashMap::new(),
            clipboard,
        }
    }

    pub fn is_valid(name: char) -> bool {
        matches!(name, UNNAMED | YANK | CLIPBOARD) || name.is_ascii_alphabetic()
    }

    pub fn read(&mut self, name: char) -> Option<Register> {
        match name {
            CLIPBOARD => {
                let content = self.clipboard.get()?;
                // The clipboard keeps no wise; a trailing newline marks lines.
                let wise = if content.ends_with('\n') {
                    RegisterWise::Line
                } else {
                    RegisterWise::Char
                };
                Some(Register { name, content, wise })
            }
            _ => self.inner.get(&name.to_ascii_lowercase()).cloned(),
        }
    }

    /// Write one register. Uppercase names append to their lowercase
    /// register.
    pub fn write(&mut self, name: char, content: String, wise: RegisterWise) -> Result<()> {
        if !Self::is_valid(name) {
            return Err(Error::InvalidRegister(name));
        }
        if name == CLIPBOARD {
            self.clipboard.set(content);
            return Ok(());
        }
        let key = name.to_ascii_lowercase();
        let register = match self.inner.remove(&key) {
            Some(mut existing) if name.is_ascii_uppercase() => {
                if wise == RegisterWise::Line && !existing.content.ends_with('\n') {
                    existing.content.push('\n');
                }
                existing.content.push_str(&content);
                if wise == RegisterWise::Line {
                    existing.wise = RegisterWise::Line;
                }
                existing
            }
            _ => Register {
                name: key,
                content,
                wise,
            },
        };
        self.inner.insert(key, register);
        Ok(())
    }

    /// Store the text of an operator. The unnamed register always receives
    /// it, register `0` only for explicit yanks, and `target` when given.
    pub fn store(
        &mut self,
        target: Option<char>,
        content: String,
        wise: RegisterWise,
        yank: bool,
    ) -> Result<()> {
        if let Some(name) = target
            && name != UNNAMED
        {
            self.write(name, content.clone(), wise)?;
        }
        if yank {
            self.write(YANK, content.clone(), wise)?;
        }
        self.write(UNNAMED, content, wise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_appends() {
        let mut registers = Registers::new();
        registers.write('a', "one".into(), RegisterWise::Char).unwrap();
        registers.write('A', "two".into(), RegisterWise::Char).unwrap();
        assert_eq!(registers.read('a').unwrap().content, "onetwo");
    }

    #[test]
    fn delete_leaves_yank_register_alone() {
        let mut registers = Registers::new();
        registers.store(None, "kept".into(), RegisterWise::Char, true).unwrap();
        registers.store(None, "gone".into(), RegisterWise::Char, false).unwrap();
        assert_eq!(registers.read(YANK).unwrap().content, "kept");
        assert_eq!(registers.read(UNNAMED).unwrap().content, "gone");
    }

    #[test]
    fn rejects_unknown_names() {
        let mut registers = Registers::new();
        assert!(matches!(
            registers.write('%', String::new(), RegisterWise::Char),
            Err(Error::InvalidRegister('%'))
        ));
    }
}
