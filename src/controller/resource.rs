use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::LoadError;
use crate::model::LevelPack;

/// Countdown over one batch of named loads.
///
/// `mark_loaded` returns true exactly once: for the load that finishes the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBatch {
    remaining: usize,
    completed: bool,
}

impl LoadBatch {
    pub fn new(total: usize) -> Self {
        Self {
            remaining: total,
            completed: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn mark_loaded(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 && !self.completed {
            self.completed = true;
            return true;
        }
        false
    }
}

/// Loaded JSON documents keyed by resource name
pub struct Resources {
    /// Directory holding `<name>.json` files for native builds
    pub asset_root: PathBuf,
    data: HashMap<String, serde_json::Value>,
}

impl Resources {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            data: HashMap::new(),
        }
    }

    /// Fetch and parse `<name>.json` for every name, in order.
    ///
    /// Resolves once the whole batch has landed; the first failure aborts it.
    pub async fn load_data(&mut self, names: &[&str]) -> Result<(), LoadError> {
        let mut batch = LoadBatch::new(names.len());
        for name in names {
            let text = self.fetch_text(name).await?;
            let value = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
                name: name.to_string(),
                source,
            })?;
            self.data.insert(name.to_string(), value);
            if batch.mark_loaded() {
                info!(count = names.len(), "resource batch loaded");
            }
        }
        Ok(())
    }

    /// Store an already-parsed document under `name`
    pub fn insert(&mut self, name: &str, value: serde_json::Value) {
        self.data.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.data.get(name)
    }

    /// Interpret a loaded resource as a level pack
    pub fn levels(&self, name: &str) -> Result<LevelPack, LoadError> {
        let value = self
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::Missing(name.to_string()))?;
        let pack = LevelPack::from_value(value).map_err(|source| LoadError::Parse {
            name: name.to_string(),
            source,
        })?;
        if pack.is_empty() {
            warn!(name, "level pack is empty");
            return Err(LoadError::NoLevels(name.to_string()));
        }
        Ok(pack)
    }

    #[cfg(target_arch = "wasm32")]
    async fn fetch_text(&self, name: &str) -> Result<String, LoadError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let url = format!("{name}.json");
        let fetch_error = |e: wasm_bindgen::JsValue| LoadError::Fetch {
            name: name.to_string(),
            message: format!("{e:?}"),
        };

        let window = web_sys::window().ok_or_else(|| LoadError::Fetch {
            name: name.to_string(),
            message: "no global `window`".to_string(),
        })?;
        let promise: js_sys::Promise = window.fetch_with_str(&url);
        let response: web_sys::Response = JsFuture::from(promise)
            .await
            .map_err(fetch_error)?
            .dyn_into()
            .map_err(fetch_error)?;
        if !response.ok() {
            return Err(LoadError::Fetch {
                name: name.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }
        let text = JsFuture::from(response.text().map_err(fetch_error)?)
            .await
            .map_err(fetch_error)?;
        text.as_string().ok_or_else(|| LoadError::Fetch {
            name: name.to_string(),
            message: "response body is not text".to_string(),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn fetch_text(&self, name: &str) -> Result<String, LoadError> {
        let path = self.asset_root.join(format!("{name}.json"));
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            name: path.display().to_string(),
            source,
        })
    }
}
