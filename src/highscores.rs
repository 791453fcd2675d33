//! High score persistence
//!
//! A single integer under a fixed namespace. Read once at session start,
//! written whenever a finished session beats it. Missing or unreadable values
//! count as zero; write failures are logged and otherwise ignored.

/// Namespace the high score is stored under
pub const STORAGE_KEY: &str = "breakout_highscore";

/// Get/set of the persisted high score
pub trait HighScoreStore {
    fn load(&mut self) -> u64;
    fn save(&mut self, score: u64);
}

/// Parse a stored value; anything but a non-negative integer reads as zero
pub fn parse_stored(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// Process-lifetime store (tests, headless runs without a file)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn with_score(score: u64) -> Self {
        Self { value: Some(score) }
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> u64 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, score: u64) {
        self.value = Some(score);
    }
}

#[cfg(not(target_arch = "wasm32"))]
use std::collections::BTreeMap;

/// JSON file holding `{ "<namespace>": <score> }`; other keys are preserved
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> BTreeMap<String, serde_json::Value> {
        let Ok(json) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable high score file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&mut self) -> u64 {
        let score = match self.read_map().get(STORAGE_KEY) {
            Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(serde_json::Value::String(s)) => parse_stored(Some(s)),
            _ => 0,
        };
        log::info!("Loaded high score {}", score);
        score
    }

    fn save(&mut self, score: u64) {
        let mut map = self.read_map();
        map.insert(STORAGE_KEY.to_string(), serde_json::Value::from(score));
        let result = serde_json::to_string_pretty(&map)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.path, json));
        match result {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("Cannot save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> u64 {
        let raw = Self::storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        let score = parse_stored(raw.as_deref());
        log::info!("Loaded high score {}", score);
        score
    }

    fn save(&mut self, score: u64) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(STORAGE_KEY, &score.to_string()).is_err() {
                log::warn!("LocalStorage rejected high score");
            }
        }
    }
}
