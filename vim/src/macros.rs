//! Macro recording (`q`) and playback (`@`).

use std::collections::HashMap;

use crate::key::{KeyCode, KeyEvent};

#[derive(Debug, Default)]
pub struct MacroRecorder {
    registers: HashMap<char, Vec<KeyEvent>>,
    recording: Option<char>,
    last_played: Option<char>,
}

impl MacroRecorder {
    /// Begin recording into `name`, replacing its content. Only lowercase
    /// registers can be recorded.
    pub fn start(&mut self, name: char) -> bool {
        if !name.is_ascii_lowercase() || self.recording.is_some() {
            return false;
        }
        self.registers.insert(name, Vec::new());
        self.recording = Some(name);
        true
    }

    /// Stop recording and drop the `q` that stopped it.
    pub fn stop(&mut self) -> Option<char> {
        let name = self.recording.take()?;
        self.pop_trailing(name, 'q');
        Some(name)
    }

    pub fn record(&mut self, key: KeyEvent) {
        if let Some(name) = self.recording {
            self.registers.entry(name).or_default().push(key);
        }
    }

    /// Drop the `@` typed while recording.
    pub fn reject_play(&mut self) {
        if let Some(name) = self.recording {
            self.pop_trailing(name, '@');
        }
    }

    fn pop_trailing(&mut self, name: char, c: char) {
        if let Some(keys) = self.registers.get_mut(&name)
            && keys.last().is_some_and(|key| key.code == KeyCode::Char(c))
        {
            keys.pop();
        }
    }

    pub fn recording(&self) -> Option<char> {
        self.recording
    }

    pub fn get(&self, name: char) -> Option<&[KeyEvent]> {
        self.registers.get(&name).map(Vec::as_slice)
    }

    /// Keys to play for `@name`; `@@` repeats the last played macro.
    pub fn take_for_play(&mut self, name: char) -> Option<Vec<KeyEvent>> {
        let name = if name == '@' { self.last_played? } else { name };
        let keys = self.registers.get(&name)?.clone();
        self.last_played = Some(name);
        Some(keys)
    }
}

/// A scheduled playback. Yields the recorded keys `repeat` times.
#[derive(Debug, Clone)]
pub struct MacroTask {
    keys: Vec<KeyEvent>,
    repeat: usize,
    pass: usize,
    index: usize,
}

impl MacroTask {
    pub fn new(keys: Vec<KeyEvent>, repeat: usize) -> Self {
        Self {
            keys,
            repeat: repeat.max(1),
            pass: 0,
            index: 0,
        }
    }
}

impl Iterator for MacroTask {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        if self.keys.is_empty() {
            return None;
        }
        if self.index == self.keys.len() {
            self.index = 0;
            self.pass += 1;
        }
        if self.pass >= self.repeat {
            return None;
        }
        let key = self.keys[self.index];
        self.index += 1;
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_repeats_keys() {
        let keys = vec![KeyEvent::char('x'), KeyEvent::char('j')];
        let played: Vec<_> = MacroTask::new(keys, 2).collect();
        assert_eq!(played.len(), 4);
        assert_eq!(played[2], KeyEvent::char('x'));
    }

    #[test]
    fn stop_drops_trailing_q() {
        let mut recorder = MacroRecorder::default();
        assert!(recorder.start('a'));
        recorder.record(KeyEvent::char('x'));
        recorder.record(KeyEvent::char('q'));
        assert_eq!(recorder.stop(), Some('a'));
        assert_eq!(recorder.get('a'), Some(&[KeyEvent::char('x')][..]));
    }
}
