//! The last change, kept for `.`.

use crate::key::KeyEvent;
use crate::types::Mode;

/// Shape of the Visual selection a change was made on. Lines and columns
/// are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub block_start: usize,
    pub block_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotCommand {
    pub mode: Mode,
    pub count_string: String,
    pub command_string: String,
    pub geometry: Option<Geometry>,
    pub insert_keys: Vec<KeyEvent>,
}

impl DotCommand {
    /// Split a typed command into its leading count and the rest.
    pub fn new(mode: Mode, input: &str, geometry: Option<Geometry>) -> Self {
        let count_len = input.chars().take_while(char::is_ascii_digit).count();
        let count_string: String = input.chars().take(count_len).collect();
        let command_string: String = input.chars().skip(count_len).collect();
        Self {
            mode,
            count_string,
            command_string,
            geometry,
            insert_keys: Vec::new(),
        }
    }

    /// The Normal-mode keys that redo the change from the cursor. Visual
    /// changes re-select a selection of the same shape first. `count`
    /// replaces the recorded count when given.
    pub fn replay_string(&self, count: Option<&str>) -> String {
        let count = count.unwrap_or(&self.count_string);
        let selection = match (self.mode, self.geometry) {
            (Mode::VisualLine, Some(g)) => format!("V{}", repeat_key(g.block_end - g.block_start, 'j')),
            (Mode::Visual, Some(g)) if g.block_start == g.block_end => {
                format!("v{}", repeat_key(g.col_end.saturating_sub(g.col_start), 'l'))
            }
            (Mode::Visual, Some(g)) => format!(
                "v{}0{}",
                repeat_key(g.block_end - g.block_start, 'j'),
                repeat_key(g.col_end, 'l')
            ),
            _ => String::new(),
        };
        format!("{selection}{count}{}", self.command_string)
    }
}

fn repeat_key(times: usize, key: char) -> String {
    if times == 0 {
        String::new()
    } else {
        format!("{times}{key}")
    }
}

#[derive(Debug, Default)]
pub struct DotRecorder {
    last: Option<DotCommand>,
    capturing: bool,
    running: bool,
}

impl DotRecorder {
    pub fn record(&mut self, command: DotCommand) {
        self.last = Some(command);
        self.capturing = false;
    }

    /// Start collecting the keys typed in Insert mode for the last change.
    pub fn start_capture(&mut self) {
        if self.last.is_some() {
            self.capturing = true;
        }
    }

    pub fn stop_capture(&mut self) {
        self.capturing = false;
    }

    pub fn capture(&mut self, key: KeyEvent) {
        if !self.capturing {
            return;
        }
        if let Some(last) = self.last.as_mut() {
            last.insert_keys.push(key);
        }
    }

    pub fn last(&self) -> Option<&DotCommand> {
        self.last.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}
