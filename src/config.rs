//! Configuration for linear memory and string handling.
//!
//! Provides centralized configuration with sensible defaults. Every section
//! is serde-serializable so hosts can keep it next to their own settings.

use crate::error::{MemViewError, Result};
use serde::{Deserialize, Serialize};

/// Master configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemViewConfig {
    /// Linear memory sizing.
    pub memory: MemoryConfig,
    /// NUL-terminated string helpers.
    pub strings: StringsConfig,
}

impl MemViewConfig {
    /// Parse a configuration from JSON; absent sections take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MemViewError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MemViewError::Config(e.to_string()))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.memory.validate()?;
        if self.strings.max_scan_bytes == 0 {
            return Err(MemViewError::Config(
                "strings.max_scan_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Page-based sizing of a `LinearMemory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Bytes per page (default: 65536).
    pub page_size: u32,
    /// Pages allocated at creation (default: 1).
    pub initial_pages: u32,
    /// Upper bound for `grow` (default: 65536, i.e. 4 GiB with 64 KiB pages).
    pub maximum_pages: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_size: 65536,
            initial_pages: 1,
            maximum_pages: 65536,
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(MemViewError::Config(
                "memory.page_size must be positive".to_string(),
            ));
        }
        if self.initial_pages > self.maximum_pages {
            return Err(MemViewError::Config(format!(
                "memory.initial_pages ({}) exceeds memory.maximum_pages ({})",
                self.initial_pages, self.maximum_pages
            )));
        }
        Ok(())
    }

    /// Byte length of `pages` pages.
    pub fn bytes_for(&self, pages: u32) -> u64 {
        pages as u64 * self.page_size as u64
    }
}

/// Text encoding used by the string helpers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringEncoding {
    #[default]
    Utf8,
    /// One byte per character; bytes above 0x7f read as Latin-1.
    Ascii,
}

/// Configuration for the NUL-terminated string helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsConfig {
    /// Encoding used for reads and writes
    pub encoding: StringEncoding,
    /// Maximum number of bytes searched for the terminator
    pub max_scan_bytes: usize,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            encoding: StringEncoding::Utf8,
            max_scan_bytes: 1_048_576, // 1 MiB
        }
    }
}

impl StringsConfig {
    pub fn ascii() -> Self {
        Self {
            encoding: StringEncoding::Ascii,
            ..Self::default()
        }
    }
}
