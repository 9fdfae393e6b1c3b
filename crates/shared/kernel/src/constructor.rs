use crate::error::KernelError;
use crate::feature::Feature;
use std::fmt;
use trellis_domain::Map;

/// Factory behaviour behind a `_constructor` reference.
///
/// The engine builds the property bag itself; a constructor contributes the
/// feature type it produces, extra default properties and a hook that runs once
/// the bag is populated.
pub trait Constructor: fmt::Debug + Send + Sync {
    /// Type name of the features this constructor builds.
    fn feature_type(&self) -> &str;

    /// Defaults merged under the declaration, on top of the descriptor defaults.
    fn defaults(&self) -> Map {
        Map::new()
    }

    /// Runs right after the property bag is built, before any wiring.
    ///
    /// # Errors
    /// A failure aborts the activation of this feature.
    fn initialize(&self, feature: &Feature) -> Result<(), KernelError> {
        let _ = feature;
        Ok(())
    }
}

/// The constructor every built-in and configuration-declared type falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardConstructor {
    feature_type: String,
}

impl StandardConstructor {
    #[must_use]
    pub fn new(feature_type: impl Into<String>) -> Self {
        Self { feature_type: feature_type.into() }
    }
}

impl Constructor for StandardConstructor {
    fn feature_type(&self) -> &str {
        &self.feature_type
    }
}
