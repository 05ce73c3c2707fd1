//! Namespace engine and upload configuration.

use serde::{Deserialize, Serialize};

/// Namespace engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Display name of the synthetic breadcrumb root.
    #[serde(default = "default_root_label")]
    pub root_label: String,
    /// Maximum number of sibling writes in flight per cascade level.
    #[serde(default = "default_cascade_concurrency")]
    pub cascade_concurrency: usize,
    /// Create `default_folders` when the store holds no folder at all.
    #[serde(default)]
    pub seed_default_folders: bool,
    /// Root folders created by seeding, in display order.
    #[serde(default = "default_folders")]
    pub default_folders: Vec<String>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            root_label: default_root_label(),
            cascade_concurrency: default_cascade_concurrency(),
            seed_default_folders: false,
            default_folders: default_folders(),
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes (default 50 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// First segment of every object-storage key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_root_label() -> String {
    "Home".to_string()
}

fn default_cascade_concurrency() -> usize {
    16
}

fn default_folders() -> Vec<String> {
    vec![
        "#ecycle".to_string(),
        "1 - Expertise".to_string(),
        "2 - Gestion technique".to_string(),
        "3 - Gestion technique expertise".to_string(),
    ]
}

fn default_max_file_size() -> u64 {
    52_428_800 // 50 MiB
}

fn default_key_prefix() -> String {
    "files".to_string()
}
