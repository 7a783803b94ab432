//! A modal, Vim-style command interpreter that drives a host text editor.
//!
//! The host implements [`Document`] and forwards every keystroke to
//! [`Engine::handle_key`]. The engine owns modes, registers, marks, the jump
//! list, search, dot-repeat and macros.

pub mod clipboard;
mod commands;
pub mod config;
pub mod dot;
pub mod engine;
pub mod error;
pub mod jumplist;
pub mod key;
pub mod labels;
pub mod macros;
pub mod marks;
pub mod motion;
pub mod operator;
pub mod registers;
pub mod search;
pub mod submode;
pub mod surround;
pub mod textobject;
pub mod traits;
pub mod types;

#[cfg(feature = "clipboard")]
pub use crate::clipboard::SystemClipboard;
pub use crate::clipboard::MemoryClipboard;
pub use crate::config::Config;
pub use crate::dot::DotCommand;
pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::error::{Error, Result};
pub use crate::jumplist::{Jump, JumpList};
pub use crate::key::{KeyCode, KeyEvent, Modifiers, Origin};
pub use crate::labels::JumpLabel;
pub use crate::marks::{Mark, Marks};
pub use crate::motion::Motion;
pub use crate::operator::Operator;
pub use crate::registers::{Register, RegisterWise, Registers};
pub use crate::search::SearchState;
pub use crate::traits::{Clipboard, Document};
pub use crate::types::{LineInfo, Mode, MotionResult, Span, Wise};
