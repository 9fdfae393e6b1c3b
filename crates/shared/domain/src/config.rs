use crate::bag::{Map, Value};
use crate::constants::keys;
use crate::descriptor::FeatureTypeDescriptor;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of a trellis process.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrellisConfigInner {
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
    /// Declaration of the site root.
    pub site: SiteConfig,
    /// Feature types added to the catalog on top of the built-in ones.
    pub feature_types: Vec<FeatureTypeDescriptor>,
    /// Declarations registered at the site once plugins are installed.
    pub declarations: Vec<DeclarationConfig>,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct TrellisConfig {
    #[serde(flatten, default)]
    inner: Arc<TrellisConfigInner>,
}

impl Deref for TrellisConfig {
    type Target = TrellisConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for TrellisConfig {
    fn deref_mut(&mut self) -> &mut TrellisConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logger name, also the prefix of rolling log files.
    pub name: String,
    /// Minimum level (`error`, `warn`, `info`, `debug`, `trace`, `off`).
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files; no file output when unset.
    pub path: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub json: bool,
    /// Module directives such as `trellis_kernel=debug`.
    pub filter: Option<String>,
    /// File rotation: `minutely`, `hourly`, `daily` or `never`.
    pub rotation: String,
    pub max_files: usize,
}

/// Activation engine limits.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest context chain a feature may be attached to.
    pub max_context_depth: usize,
    /// Deepest nesting of recursive child activation.
    pub max_activation_depth: usize,
    /// Reject unknown capability names instead of ignoring them.
    pub strict_capabilities: bool,
}

/// The site root declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SiteConfig(pub Map);

/// One entry of the `declarations` list.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationConfig {
    #[serde(rename = "type")]
    pub feature_type: String,
    /// Activate right after registration.
    #[serde(default = "activate_by_default")]
    pub activate: bool,
    #[serde(flatten)]
    pub config: Map,
}

const fn activate_by_default() -> bool {
    true
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "trellis".to_owned(),
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
            filter: None,
            rotation: "daily".to_owned(),
            max_files: 10,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_context_depth: 64, max_activation_depth: 32, strict_capabilities: false }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut map = Map::new();
        map.insert(keys::NAME.to_owned(), Value::String("site".to_owned()));
        Self(map)
    }
}
