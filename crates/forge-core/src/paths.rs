use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const FORGE_DIR: &str = ".forge";
pub const CONFIG_FILE: &str = ".forge/config.yaml";
pub const IDEAS_FILE: &str = ".forge/ideas.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn ideas_path(root: &Path) -> PathBuf {
    root.join(IDEAS_FILE)
}
