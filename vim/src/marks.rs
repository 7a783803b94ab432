use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A remembered location. `line` and `column` are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub file: String,
    pub line: usize,
    #[serde(rename = "col")]
    pub column: usize,
}

/// The mark set before the latest jump, reached with `''` and ``` `` ```.
pub const CONTEXT: char = '\'';

/// Local marks (`a`..`z`, plus the context mark) are kept per file; global
/// marks (`A`..`Z`) are shared and persisted when a file is configured.
#[derive(Debug, Default)]
pub struct Marks {
    local: HashMap<String, HashMap<char, Mark>>,
    global: BTreeMap<String, Mark>,
    path: Option<PathBuf>,
}

impl Marks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks backed by `path`. A missing or corrupt file yields no global
    /// marks.
    pub fn with_file(path: PathBuf) -> Self {
        let global = match Self::load(&path) {
            Ok(global) => global,
            Err(err) => {
                log::warn!("ignoring global marks at {}: {err}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            local: HashMap::new(),
            global,
            path: Some(path),
        }
    }

    pub fn load(path: &Path) -> Result<BTreeMap<String, Mark>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(&self.global)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            log::warn!("failed to save global marks: {err}");
        }
    }

    pub fn is_global(name: char) -> bool {
        name.is_ascii_uppercase()
    }

    pub fn set(&mut self, name: char, mark: Mark) -> Result<()> {
        if Self::is_global(name) {
            self.global.insert(name.to_string(), mark);
            self.persist();
            return Ok(());
        }
        if !(name.is_ascii_lowercase() || name == CONTEXT) {
            return Err(Error::InvalidMark(name));
        }
        self.local.entry(mark.file.clone()).or_default().insert(name, mark);
        Ok(())
    }

    /// Look up a mark as seen from `file`. The backtick is an alias of the
    /// context mark.
    pub fn get(&self, name: char, file: &str) -> Option<&Mark> {
        if Self::is_global(name) {
            return self.global.get(&name.to_string());
        }
        let name = if name == '`' { CONTEXT } else { name };
        self.local.get(file)?.get(&name)
    }

    pub fn remove(&mut self, name: char, file: &str) -> Option<Mark> {
        if Self::is_global(name) {
            let removed = self.global.remove(&name.to_string());
            if removed.is_some() {
                self.persist();
            }
            return removed;
        }
        let name = if name == '`' { CONTEXT } else { name };
        self.local.get_mut(file)?.remove(&name)
    }

    pub fn global(&self) -> &BTreeMap<String, Mark> {
        &self.global
    }
}
