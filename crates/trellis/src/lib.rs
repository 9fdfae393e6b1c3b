//! Facade crate for trellis.
//! Re-exports domain/kernel primitives and turns a [`TrellisConfig`] into a live tree.
//! Keep this crate thin: it should compose other crates, not implement engine logic.
//!
//! ## Usage
//! - Load a [`TrellisConfig`] (see [`kernel::config::load_config`]).
//! - Call [`boot`] to get an [`Engine`] with the site booted, the enabled plugins
//!   installed and the configured declarations activated.
//! - Optionally [`install`] the engine in the process-global slot.
//!
//! ```rust
//! use trellis::domain::config::TrellisConfig;
//!
//! let engine = trellis::boot(&TrellisConfig::default()).unwrap();
//! assert_eq!(engine.site().unwrap().name(), "site");
//! ```

mod error;

pub use crate::error::{BootError, BootErrorExt};
pub use trellis_domain as domain;
pub use trellis_kernel as kernel;
#[cfg(feature = "login")]
pub use trellis_login as login;

use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument};
use trellis_domain::Map;
use trellis_domain::config::TrellisConfig;
use trellis_kernel::{Catalog, Engine, KernelError, StandardConstructor};

/// Plugin registry for runtime introspection.
pub mod features {
    /// Build-time enabled plugins (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "login")]
        "login",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Builds an engine from `config` and activates the configured tree.
///
/// 1. Extra feature types join the built-in catalog; a type whose constructor is not
///    known yet gets a standard one.
/// 2. The site is booted from `config.site`.
/// 3. Enabled plugins are installed.
/// 4. Every declaration is registered at the site, and activated unless it opts out.
///
/// # Errors
/// Returns the first descriptor, activation or plugin error; nothing is retried.
#[instrument(level = "info", skip_all)]
pub fn boot(config: &TrellisConfig) -> Result<Engine, BootError> {
    let catalog = catalog(config).context("Registering configured feature types")?;
    let engine = Engine::builder().catalog(catalog).config(config.engine).build();

    let site = engine.boot_site(config.site.0.clone()).context("Booting the site")?;

    #[cfg(feature = "login")]
    trellis_login::init(&engine)?;

    for declaration in &config.declarations {
        let name = engine
            .register(&site, &declaration.feature_type, declaration.config.clone())
            .context("Registering a configured declaration")?;
        if declaration.activate {
            engine
                .activate(&site, &declaration.feature_type, name.as_str(), Map::new())
                .context(format!("Activating `{name}`"))?;
        } else {
            debug!(%name, feature_type = %declaration.feature_type, "Declared without activation");
        }
    }

    info!(
        site = site.name(),
        children = site.children().len(),
        plugins = ?features::ENABLED,
        "Trellis booted"
    );
    Ok(engine)
}

fn catalog(config: &TrellisConfig) -> Result<Catalog, KernelError> {
    let catalog = Catalog::builtin();
    for descriptor in &config.feature_types {
        let descriptor = catalog.register_type(descriptor.clone())?;
        let constructor = descriptor.constructor_name();
        if !catalog.has_constructor(constructor) {
            catalog.register_constructor(
                constructor,
                Arc::new(StandardConstructor::new(descriptor.type_name.clone())),
            );
        }
    }
    Ok(catalog)
}

static GLOBAL_ENGINE: OnceLock<Engine> = OnceLock::new();

/// Places `engine` in the process-global slot. The slot is filled once.
///
/// # Errors
/// [`BootError::AlreadyInstalled`] when an engine is already installed.
pub fn install(engine: Engine) -> Result<&'static Engine, BootError> {
    GLOBAL_ENGINE.set(engine).map_err(|_| BootError::AlreadyInstalled {
        message: "the global engine slot is filled once per process".into(),
        context: None,
    })?;
    GLOBAL_ENGINE.get().ok_or_else(|| BootError::from("global engine slot is empty after install"))
}

/// The engine placed with [`install`], if any.
#[must_use]
pub fn global() -> Option<&'static Engine> {
    GLOBAL_ENGINE.get()
}
