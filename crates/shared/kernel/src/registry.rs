//! Per-container declaration store.

use crate::catalog::Catalog;
use crate::error::KernelError;
use crate::feature::{Feature, FeatureRef};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::trace;
use trellis_domain::constants::keys;
use trellis_domain::{Map, Value, merge, name_of};

/// A registered but not yet activated feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub feature_type: String,
    pub name: String,
    /// Declared configuration merged over the descriptor defaults.
    pub config: Map,
}

/// Content of a registry entry.
#[derive(Debug, Clone)]
pub enum Slot {
    Declaration(Declaration),
    Active(FeatureRef),
}

impl Slot {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    #[must_use]
    pub const fn feature(&self) -> Option<&FeatureRef> {
        match self {
            Self::Active(feature) => Some(feature),
            Self::Declaration(_) => None,
        }
    }

    /// The declaration this slot would be re-activated from.
    ///
    /// Live features are turned back into a declaration from their `args`.
    #[must_use]
    pub fn to_declaration(&self) -> Declaration {
        match self {
            Self::Declaration(declaration) => declaration.clone(),
            Self::Active(feature) => {
                let mut config = feature.args().unwrap_or_default();
                config.insert(keys::NAME.to_owned(), Value::String(feature.name().to_owned()));
                Declaration {
                    feature_type: feature.feature_type().to_owned(),
                    name: feature.name().to_owned(),
                    config,
                }
            },
        }
    }
}

/// What [`Registry::register`] accepts.
#[derive(Debug, Clone)]
pub enum Registrable {
    Config(Map),
    Feature(FeatureRef),
}

impl From<Map> for Registrable {
    fn from(config: Map) -> Self {
        Self::Config(config)
    }
}

impl From<FeatureRef> for Registrable {
    fn from(feature: FeatureRef) -> Self {
        Self::Feature(feature)
    }
}

impl From<&FeatureRef> for Registrable {
    fn from(feature: &FeatureRef) -> Self {
        Self::Feature(Arc::clone(feature))
    }
}

/// What [`Registry::is_registered`] looks for.
#[derive(Debug, Clone, Copy)]
pub enum FeatureKey<'a> {
    Name(&'a str),
    Feature(&'a Feature),
    Config(&'a Map),
}

impl<'a> From<&'a str> for FeatureKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for FeatureKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a FeatureRef> for FeatureKey<'a> {
    fn from(feature: &'a FeatureRef) -> Self {
        Self::Feature(feature)
    }
}

impl<'a> From<&'a Map> for FeatureKey<'a> {
    fn from(config: &'a Map) -> Self {
        Self::Config(config)
    }
}

/// Children of one container, grouped by plural key then by name.
pub struct Registry {
    catalog: Arc<Catalog>,
    buckets: RwLock<IndexMap<String, IndexMap<String, Slot>>>,
}

impl Registry {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog, buckets: RwLock::new(IndexMap::new()) }
    }

    /// Declares a feature, or stores a live one, under its type's bucket.
    ///
    /// Configurations are merged over the descriptor defaults. Registering an
    /// existing name overwrites the previous entry. Returns the stored name.
    ///
    /// # Errors
    /// * [`KernelError::UnknownFeatureType`] when `feature_type` is not in the catalog.
    /// * [`KernelError::NameRequired`] when the configuration has no usable `name`.
    /// * [`KernelError::ActivationFailed`] when a live feature has another type.
    pub fn register(
        &self,
        feature_type: &str,
        input: impl Into<Registrable>,
    ) -> Result<String, KernelError> {
        let descriptor = self.catalog.require(feature_type)?;

        let (name, slot) = match input.into() {
            Registrable::Config(config) => {
                let mut config = merge(&config, &descriptor.defaults());
                let name =
                    name_of(&config).ok_or_else(|| KernelError::name_required(feature_type))?;
                config.insert(keys::NAME.to_owned(), Value::String(name.clone()));
                let declaration =
                    Declaration { feature_type: descriptor.type_name.clone(), name, config };
                (declaration.name.clone(), Slot::Declaration(declaration))
            },
            Registrable::Feature(feature) => {
                if feature.feature_type() != descriptor.type_name {
                    return Err(KernelError::activation(format!(
                        "`{}` is a {}, not a {feature_type}",
                        feature.name(),
                        feature.feature_type()
                    )));
                }
                (feature.name().to_owned(), Slot::Active(feature))
            },
        };

        trace!(plural = %descriptor.plural, %name, active = slot.is_active(), "Registered");
        self.store(&descriptor.plural, &name, slot);
        Ok(name)
    }

    /// Whether a name, a live feature or a configuration's name is stored for the type.
    pub fn is_registered<'a>(&self, feature_type: &str, key: impl Into<FeatureKey<'a>>) -> bool {
        let Some(descriptor) = self.catalog.by_type_name(feature_type) else {
            return false;
        };
        let name = match key.into() {
            FeatureKey::Name(name) => name.to_owned(),
            FeatureKey::Feature(feature) => feature.name().to_owned(),
            FeatureKey::Config(config) => match name_of(config) {
                Some(name) => name,
                None => return false,
            },
        };
        self.buckets.read().get(&descriptor.plural).is_some_and(|bucket| bucket.contains_key(&name))
    }

    #[must_use]
    pub fn lookup(&self, feature_type: &str, name: &str) -> Option<Slot> {
        let descriptor = self.catalog.by_type_name(feature_type)?;
        self.slot_in(&descriptor.plural, name)
    }

    /// Entry stored under a plural key.
    #[must_use]
    pub fn slot_in(&self, plural: &str, name: &str) -> Option<Slot> {
        self.buckets.read().get(plural)?.get(name).cloned()
    }

    /// Bucket keys in creation order.
    #[must_use]
    pub fn buckets(&self) -> Vec<String> {
        self.buckets.read().keys().cloned().collect()
    }

    /// Names stored under a plural key, in registration order.
    #[must_use]
    pub fn names(&self, plural: &str) -> Vec<String> {
        self.buckets.read().get(plural).map(|b| b.keys().cloned().collect()).unwrap_or_default()
    }

    /// Entries of a bucket, in registration order.
    #[must_use]
    pub fn slots(&self, plural: &str) -> Vec<(String, Slot)> {
        self.buckets
            .read()
            .get(plural)
            .map(|b| b.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// Every live feature, bucket by bucket.
    #[must_use]
    pub fn features(&self) -> Vec<FeatureRef> {
        self.buckets
            .read()
            .values()
            .flat_map(IndexMap::values)
            .filter_map(|slot| slot.feature().cloned())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.read().values().map(IndexMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn ensure_bucket(&self, plural: &str) {
        if !self.buckets.read().contains_key(plural) {
            self.buckets.write().entry(plural.to_owned()).or_default();
        }
    }

    pub(crate) fn store(&self, plural: &str, name: &str, slot: Slot) {
        self.buckets.write().entry(plural.to_owned()).or_default().insert(name.to_owned(), slot);
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buckets = self.buckets.read();
        let mut map = f.debug_map();
        for (plural, bucket) in buckets.iter() {
            map.entry(plural, &bucket.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::new(Arc::new(Catalog::builtin()))
    }

    fn map(value: Value) -> Map {
        serde_json::from_value(value).expect("object literal")
    }

    #[test]
    fn registration_merges_descriptor_defaults() {
        let registry = registry();
        let name = registry.register("app", map(json!({ "name": "shop" }))).expect("register");
        assert_eq!(name, "shop");

        let Some(Slot::Declaration(declaration)) = registry.lookup("app", "shop") else {
            panic!("declaration expected");
        };
        assert_eq!(declaration.config["_plural"], "apps");
        assert_eq!(declaration.config["_constructor"], "app");
        assert_eq!(registry.buckets(), ["apps"]);
    }

    #[test]
    fn numeric_names_are_stringified() {
        let registry = registry();
        registry.register("form", map(json!({ "name": 7 }))).expect("register");
        assert!(registry.is_registered("form", "7"));
        assert!(registry.is_registered("form", &map(json!({ "name": 7 }))));
    }

    #[test]
    fn missing_name_and_unknown_type_are_rejected() {
        let registry = registry();
        let err = registry.register("app", map(json!({ "url": "shop" }))).expect_err("no name");
        assert_eq!(err.code(), "name-required");

        let err = registry.register("widget", map(json!({ "name": "w" }))).expect_err("no type");
        assert_eq!(err.code(), "unknown-feature-type");
        assert!(registry.is_empty());
        assert!(!registry.is_registered("widget", "w"));
    }

    #[test]
    fn re_registration_overwrites_in_place() {
        let registry = registry();
        registry.register("view", map(json!({ "name": "a", "url": "one" }))).expect("first");
        registry.register("view", map(json!({ "name": "b" }))).expect("second");
        registry.register("view", map(json!({ "name": "a", "url": "two" }))).expect("third");

        assert_eq!(registry.names("views"), ["a", "b"]);
        let slot = registry.lookup("view", "a").expect("slot");
        assert_eq!(slot.to_declaration().config["url"], "two");
        assert_eq!(registry.len(), 2);
    }
}
