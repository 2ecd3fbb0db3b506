//! # Configuration
//!
//! Optional `lexicon.toml` file. Command-line flags override the file, the
//! file overrides built-in defaults.
//!
//! ```toml
//! database = "words.lexi"
//! default_limit = 100
//!
//! [orphan_policy]
//! prune = ["translation", "entry_note"]
//! ```

use lexicon_core::primitives::DEFAULT_LIST_LIMIT;
use lexicon_core::{EdgeKind, LexiconError, OrphanPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lexicon.toml";

/// Snapshot path used when neither flag nor file names one.
pub const DEFAULT_DATABASE: &str = "lexicon.db";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// FILE FORMAT
// =============================================================================

/// Contents of `lexicon.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexiconConfig {
    /// Snapshot file path.
    pub database: Option<PathBuf>,
    /// Row limit for `list` when `--limit` is absent.
    pub default_limit: Option<usize>,
    pub orphan_policy: OrphanPolicyConfig,
}

/// `[orphan_policy]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrphanPolicyConfig {
    /// Edge kinds whose removal deletes the detached side once it is orphaned.
    /// Absent means the store default; an empty list disables pruning.
    pub prune: Option<Vec<String>>,
}

impl OrphanPolicyConfig {
    /// Build the runtime policy, rejecting unknown edge names.
    pub fn to_policy(&self) -> Result<OrphanPolicy, LexiconError> {
        match &self.prune {
            None => Ok(OrphanPolicy::default()),
            Some(names) => {
                let edges = names
                    .iter()
                    .map(|name| name.parse::<EdgeKind>())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(OrphanPolicy::pruning(edges))
            }
        }
    }
}

impl LexiconConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, LexiconError> {
        toml::from_str(text)
            .map_err(|e| LexiconError::DeserializationError(format!("Invalid config: {e}")))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LexiconError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LexiconError::DeserializationError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            LexiconError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `explicit` if given, else `lexicon.toml` if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, LexiconError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    tracing::debug!("Using config file {}", fallback.display());
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

/// Effective settings for one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: PathBuf,
    pub default_limit: usize,
    pub policy: OrphanPolicy,
    pub json_mode: bool,
}

impl Settings {
    /// Merge command-line flags over a loaded config.
    pub fn resolve(
        config: &LexiconConfig,
        database_flag: Option<PathBuf>,
        json_mode: bool,
    ) -> Result<Self, LexiconError> {
        let database = database_flag
            .or_else(|| config.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        Ok(Self {
            database,
            default_limit: config.default_limit.unwrap_or(DEFAULT_LIST_LIMIT),
            policy: config.orphan_policy.to_policy()?,
            json_mode,
        })
    }
}
