//! The activation engine.
//!
//! An [`Engine`] owns the catalog, the capability table, the post-activation hooks
//! and the singleton slots. It is a cheap, cloneable handle (`Arc` inside), and is
//! `Send + Sync`: every piece of shared state sits behind its own lock.

mod activation;
mod site;
mod support;

use crate::capabilities::CapabilityRegistry;
use crate::catalog::Catalog;
use crate::error::KernelError;
use crate::feature::{Feature, FeatureRef};
use crate::hooks::Hooks;
use crate::i18n::{Localizer, PassThrough};
use crate::registry::Registrable;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::sync::Arc;
use trellis_domain::config::EngineConfig;
use trellis_domain::{Map, Value};

/// What [`Engine::activate`] is asked to activate.
#[derive(Debug, Clone)]
pub enum Target {
    /// An existing feature, stored under its own name.
    Feature(FeatureRef),
    /// A full declaration; anything but a mapping is rejected.
    Config(Value),
    /// A name looked up in the container's registry.
    Name(String),
}

impl From<FeatureRef> for Target {
    fn from(feature: FeatureRef) -> Self {
        Self::Feature(feature)
    }
}

impl From<&FeatureRef> for Target {
    fn from(feature: &FeatureRef) -> Self {
        Self::Feature(Arc::clone(feature))
    }
}

impl From<Map> for Target {
    fn from(config: Map) -> Self {
        Self::Config(Value::Object(config))
    }
}

impl From<Value> for Target {
    fn from(config: Value) -> Self {
        Self::Config(config)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

#[derive(Debug)]
struct EngineInner {
    catalog: Arc<Catalog>,
    capabilities: CapabilityRegistry,
    hooks: RwLock<Hooks>,
    localizer: Arc<dyn Localizer>,
    config: EngineConfig,
    /// Live instance per singleton type name; the site lives here.
    singletons: RwLock<FxHashMap<String, FeatureRef>>,
}

#[derive(Debug, Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// An engine with the built-in catalog and capabilities, and no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.inner.capabilities
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Appends a post-activation hook. Activations already running keep the list
    /// they started with.
    pub fn add_hook<F>(&self, name: impl Into<Cow<'static, str>>, hook: F)
    where
        F: Fn(FeatureRef) -> Result<FeatureRef, KernelError> + Send + Sync + 'static,
    {
        self.inner.hooks.write().push(name, hook);
    }

    /// Declares `input` in the registry of `container`.
    ///
    /// # Errors
    /// [`KernelError::ContextCycle`] when a live feature would be stored below itself,
    /// otherwise see [`crate::registry::Registry::register`].
    pub fn register(
        &self,
        container: &Feature,
        feature_type: &str,
        input: impl Into<Registrable>,
    ) -> Result<String, KernelError> {
        let input = input.into();
        if let Registrable::Feature(feature) = &input
            && encloses(feature, container)
        {
            return Err(KernelError::ContextCycle {
                message: format!(
                    "`{}` cannot be registered below itself in `{}`",
                    feature.name(),
                    container.name()
                )
                .into(),
                context: None,
            });
        }
        container.children().register(feature_type, input)
    }

    /// Human-readable text of an error, through the localizer.
    #[must_use]
    pub fn describe(&self, error: &KernelError) -> String {
        let fallback = error.to_string();
        self.inner.localizer.translate(error.code(), &fallback).into_owned()
    }
}

/// Whether `feature` is `container` or one of its contexts.
fn encloses(feature: &FeatureRef, container: &Feature) -> bool {
    if std::ptr::eq(Arc::as_ptr(feature), container) {
        return true;
    }
    let mut current = container.raw_context();
    while let Some(ancestor) = current {
        if Arc::ptr_eq(&ancestor, feature) {
            return true;
        }
        current = ancestor.raw_context();
    }
    false
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct EngineBuilder {
    catalog: Option<Arc<Catalog>>,
    capabilities: Option<CapabilityRegistry>,
    hooks: Hooks,
    localizer: Option<Arc<dyn Localizer>>,
    config: EngineConfig,
}

impl EngineBuilder {
    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: CapabilityRegistry) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    #[must_use]
    pub fn hook<F>(mut self, name: impl Into<Cow<'static, str>>, hook: F) -> Self
    where
        F: Fn(FeatureRef) -> Result<FeatureRef, KernelError> + Send + Sync + 'static,
    {
        self.hooks.push(name, hook);
        self
    }

    #[must_use]
    pub fn localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Some(Arc::new(localizer));
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn build(self) -> Engine {
        Engine {
            inner: Arc::new(EngineInner {
                catalog: self.catalog.unwrap_or_else(|| Arc::new(Catalog::builtin())),
                capabilities: self.capabilities.unwrap_or_else(CapabilityRegistry::builtin),
                hooks: RwLock::new(self.hooks),
                localizer: self.localizer.unwrap_or_else(|| Arc::new(PassThrough)),
                config: self.config,
                singletons: RwLock::new(FxHashMap::default()),
            }),
        }
    }
}
