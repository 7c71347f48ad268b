use std::env;
use std::path::PathBuf;

/// Environment variable overriding where native builds read `<name>.json`
pub const ASSETS_ENV: &str = "SLIDESTONE_ASSETS";

/// Startup settings shared by the browser and native front ends
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    pub width: u32,
    pub height: u32,
    /// Frames per second the update step is capped to; dt never exceeds 1/frame_cap
    pub frame_cap: u32,
    /// Resource name of the level pack, without the `.json` suffix
    pub levels: String,
    pub asset_root: PathBuf,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frame_cap: 30,
            levels: "levels".to_string(),
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl GameOptions {
    /// Defaults with the asset root taken from the environment when set
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(root) = env::var(ASSETS_ENV) {
            options.asset_root = PathBuf::from(root);
        }
        options
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }
}
