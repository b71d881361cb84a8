//! Display theme preference, loaded once at startup and saved on every change.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const THEME_KEY: &str = "cn-theme";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
    Nature,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Classic, Theme::Modern, Theme::Nature];

    /// Unknown names fall back to classic.
    pub fn from_name(name: &str) -> Theme {
        match name.trim().to_lowercase().as_str() {
            "modern" => Theme::Modern,
            "nature" => Theme::Nature,
            _ => Theme::Classic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
            Theme::Nature => "nature",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Classic => "Classic",
            Theme::Modern => "Modern",
            Theme::Nature => "Nature",
        }
    }

    pub fn css_class(self) -> String {
        format!("theme-{}", self.name())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Durable key/value storage for UI preferences.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept as a JSON object in a single file.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// A missing file is an empty store and an unreadable one is an error.
    /// Contents that do not parse, or entries that are not strings, are
    /// skipped with a warning.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading preferences from {}", path.display()))?;
            parse_values(&path, &raw)
        } else {
            BTreeMap::new()
        };
        Ok(FilePreferences { path, values })
    }

    /// Like [`FilePreferences::open`], but an unreadable file also starts empty.
    pub fn open_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        FilePreferences::open(path).unwrap_or_else(|e| {
            log::warn!("Ignoring preferences: {:#}", e);
            FilePreferences {
                path: path.to_path_buf(),
                values: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_values(path: &Path, raw: &str) -> BTreeMap<String, String> {
    let parsed: BTreeMap<String, Value> = match serde_json::from_str(raw) {
        Ok(map) => map,
        Err(e) => {
            log::warn!("Ignoring unparsable preferences in {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };
    parsed
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            other => {
                log::warn!("Ignoring preference {:?} = {} in {}", key, other, path.display());
                None
            }
        })
        .collect()
}

impl PreferenceStore for FilePreferences {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing preferences to {}", self.path.display()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug)]
pub struct ThemeState<S: PreferenceStore> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeState<S> {
    pub fn load(store: S) -> Self {
        let current = store
            .load(THEME_KEY)
            .map(|name| Theme::from_name(&name))
            .unwrap_or_default();
        log::debug!("Theme loaded: {}", current);
        ThemeState { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn set(&mut self, theme: Theme) -> Result<()> {
        self.current = theme;
        self.store.save(THEME_KEY, theme.name())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
