use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides (`TRELLIS__ENGINE__MAX_CONTEXT_DEPTH`).
pub const ENV_PREFIX: &str = "TRELLIS";

/// File stem looked up when no explicit path is given.
pub const DEFAULT_CONFIG: &str = "trellis";

#[trellis_derive::trellis_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration tree from a file, overlaid with environment variables.
///
/// 1. **Base file**: `path`, or `trellis` (any extension the `config` crate knows:
///    `.toml`, `.json`, `.yaml`) in the working directory.
/// 2. **Environment**: variables prefixed with `TRELLIS__`, nested with double
///    underscores (`TRELLIS__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// Returns [`ConfigError`] when the file is missing or its content does not fit `T`.
///
/// # Example
/// ```rust
/// use trellis_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct ShellConfig {
///     verbose: bool,
/// }
///
/// let cfg: ShellConfig = load_config(Some("config/local")).unwrap_or_default();
/// assert!(!cfg.verbose);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
