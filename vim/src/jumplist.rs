/// A location visited by a jump motion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jump {
    pub file: String,
    pub position: usize,
}

impl Jump {
    pub fn new(file: impl Into<String>, position: usize) -> Self {
        Self {
            file: file.into(),
            position,
        }
    }
}

/// Bounded back/forward history of jump locations.
///
/// `index` counts the entries at or behind the current location, so the
/// entry "under" the cursor is `entries[index - 1]` and a fresh push leaves
/// `index == len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpList {
    entries: Vec<Jump>,
    index: usize,
    capacity: usize,
}

impl Default for JumpList {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}

impl JumpList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a location. Pushing after walking back discards the forward
    /// history; a duplicate of the newest entry is dropped.
    pub fn push(&mut self, jump: Jump) {
        if self.index < self.entries.len() {
            self.entries.truncate(self.index);
        }
        if self.entries.last() != Some(&jump) {
            self.entries.push(jump);
            if self.entries.len() > self.capacity {
                let overflow = self.entries.len() - self.capacity;
                self.entries.drain(..overflow);
            }
        }
        self.index = self.entries.len();
    }

    pub fn back(&mut self) -> Option<&Jump> {
        if self.index <= 1 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index - 1)
    }

    pub fn forward(&mut self) -> Option<&Jump> {
        if self.index >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index - 1)
    }

    /// Retract the newest entry, for jumps that did not move.
    pub fn pop_last(&mut self) -> Option<Jump> {
        let jump = self.entries.pop();
        self.index = self.index.min(self.entries.len());
        jump
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Jump] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Jump> {
        self.entries.last()
    }

    pub fn at_end(&self) -> bool {
        self.index == self.entries.len()
    }
}
