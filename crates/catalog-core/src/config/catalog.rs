//! Catalog validation limits.

use serde::{Deserialize, Serialize};

/// Size caps applied to catalog input before any change tracking runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Maximum length, in characters, of a project's notes.
    #[serde(default = "default_max_notes_length")]
    pub max_notes_length: usize,
    /// Maximum length, in characters, of any entity name.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Maximum length, in characters, of a description or attachment URL.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_notes_length: default_max_notes_length(),
            max_name_length: default_max_name_length(),
            max_text_length: default_max_text_length(),
        }
    }
}

fn default_max_notes_length() -> usize {
    4000
}

fn default_max_name_length() -> usize {
    200
}

fn default_max_text_length() -> usize {
    1000
}
