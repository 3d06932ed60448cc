//! String key/value storage
//!
//! Storage is best effort: a failed read is `None`, a failed write is logged
//! and dropped. Nothing here can stop the game.

use std::collections::HashMap;

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Volatile store (tests, or browsers without LocalStorage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// None when the page has no LocalStorage (private mode, sandboxed iframe)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("LocalStorage rejected write to {}", key);
        }
    }

    fn remove(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

/// One file per key inside a directory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Environment variable overriding the storage directory
    pub const HOME_ENV: &'static str = "FLAPPY_FEATHER_HOME";
    const DEFAULT_DIR: &'static str = ".flappy-feather";

    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$FLAPPY_FEATHER_HOME`, or `.flappy-feather` in the working directory
    pub fn from_env() -> Self {
        let dir = std::env::var_os(Self::HOME_ENV)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from(Self::DEFAULT_DIR));
        Self::new(dir)
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        // Keys are ours, but keep them from escaping the directory anyway
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.path(key), value));
        if let Err(err) = result {
            log::warn!("Failed to write {} to {}: {}", key, self.dir.display(), err);
        }
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.path(key));
    }
}

/// Platform default store
#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            log::warn!("LocalStorage unavailable, scores will not persist");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Platform default store
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Box<dyn KeyValueStore> {
    Box::new(FileStorage::from_env())
}
