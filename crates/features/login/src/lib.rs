//! Login addon plugin.
//!
//! Installs the `login_addon` constructor and declares the `login` addon at the
//! site. Once activated the addon carries a `login` view (`/login`) and the
//! `login` and `register` forms.

mod addon;
mod error;

pub use crate::addon::{CONSTRUCTOR, LoginAddon, NAME};
pub use crate::error::{LoginError, LoginErrorExt};

use std::sync::Arc;
use trellis_domain::constants::{ADDON, keys};
use trellis_domain::{Map, Value};
use trellis_kernel::{Engine, FeatureRef};

/// Registers the constructor, then declares and activates the addon at the site.
///
/// # Errors
/// [`LoginError::MissingSite`] before the site is booted, [`LoginError::Kernel`]
/// when registration or activation fails.
pub fn init(engine: &Engine) -> Result<FeatureRef, LoginError> {
    engine.catalog().register_constructor(CONSTRUCTOR, Arc::new(LoginAddon));

    let site = engine.site().ok_or_else(|| LoginError::MissingSite {
        message: "boot the site before installing plugins".into(),
        context: None,
    })?;

    let mut declaration = Map::new();
    declaration.insert(keys::NAME.to_owned(), Value::String(NAME.to_owned()));
    declaration.insert(keys::CONSTRUCTOR.to_owned(), Value::String(CONSTRUCTOR.to_owned()));
    engine.register(&site, ADDON, declaration).context("Declaring the login addon")?;

    let addon = engine
        .activate(&site, ADDON, NAME, Map::new())
        .context("Activating the login addon")?
        .ok_or_else(|| LoginError::from("login addon vanished after registration"))?;

    tracing::info!(url = addon.find("views/login").and_then(|v| v.url()).as_deref(), "Login addon initialized");
    Ok(addon)
}
