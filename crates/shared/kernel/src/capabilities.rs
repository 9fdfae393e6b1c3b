//! Capability behaviours and their typed accessors.

use crate::error::KernelError;
use crate::feature::{Feature, FeatureRef};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use trellis_domain::constants::{CONTEXTUAL, ROUTABLE, keys};
use trellis_domain::{Capabilities, Value};

/// Behaviour attached to a feature when it is granted a capability.
pub trait CapabilityBehavior: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Bits recorded on the feature; unnamed bits are allowed for plugin capabilities.
    fn flag(&self) -> Capabilities;

    /// Runs once during activation, before children are expanded.
    ///
    /// # Errors
    /// A failure aborts the activation of the feature.
    fn attach(&self, feature: &Feature) -> Result<(), KernelError>;
}

/// `routable`: normalises the local URL segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutableBehavior;

impl CapabilityBehavior for RoutableBehavior {
    fn name(&self) -> &str {
        ROUTABLE
    }

    fn flag(&self) -> Capabilities {
        Capabilities::ROUTABLE
    }

    fn attach(&self, feature: &Feature) -> Result<(), KernelError> {
        if let Some(url) = feature.get_str(keys::URL) {
            let trimmed = url.trim_matches('/');
            if trimmed.len() != url.len() {
                feature.set(keys::URL, trimmed.to_owned());
            }
        }
        Ok(())
    }
}

/// `contextual`: the link itself is assigned by the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextualBehavior;

impl CapabilityBehavior for ContextualBehavior {
    fn name(&self) -> &str {
        CONTEXTUAL
    }

    fn flag(&self) -> Capabilities {
        Capabilities::CONTEXTUAL
    }

    fn attach(&self, _feature: &Feature) -> Result<(), KernelError> {
        Ok(())
    }
}

/// Capability name to behaviour table.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    behaviors: IndexMap<String, Arc<dyn CapabilityBehavior>>,
}

impl CapabilityRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `routable` and `contextual`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(RoutableBehavior));
        registry.register(Arc::new(ContextualBehavior));
        registry
    }

    /// Adds or replaces the behaviour registered under its own name.
    pub fn register(&mut self, behavior: Arc<dyn CapabilityBehavior>) {
        self.behaviors.insert(behavior.name().to_owned(), behavior);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CapabilityBehavior>> {
        self.behaviors.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.behaviors.keys().map(String::as_str)
    }
}

/// Capability names a feature asks for: the descriptor set, then `_duck_types`.
pub(crate) fn requested(feature: &Feature) -> Vec<String> {
    let mut names: Vec<String> =
        feature.descriptor().capabilities.names().into_iter().map(str::to_owned).collect();

    let declared = match feature.get(keys::DUCK_TYPES) {
        Some(Value::Array(items)) => items,
        Some(Value::String(name)) => vec![Value::String(name)],
        _ => Vec::new(),
    };
    for name in declared.iter().filter_map(Value::as_str) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    names
}

/// Links `feature` to `context` after checking the resulting chain.
///
/// # Errors
/// [`KernelError::ContextCycle`] when `feature` already sits above `context`, or the
/// chain would grow longer than `max_depth`.
pub fn assign_context(
    feature: &Feature,
    context: &FeatureRef,
    max_depth: usize,
) -> Result<(), KernelError> {
    let mut depth = 0;
    let mut ancestor = Some(Arc::clone(context));
    while let Some(current) = ancestor {
        if std::ptr::eq(Arc::as_ptr(&current), feature) {
            return Err(KernelError::ContextCycle {
                message: format!(
                    "`{}` cannot be its own ancestor through `{}`",
                    feature.name(),
                    context.name()
                )
                .into(),
                context: None,
            });
        }
        depth += 1;
        if depth > max_depth {
            return Err(KernelError::ContextCycle {
                message: format!("context chain of `{}` exceeds {max_depth} levels", feature.name())
                    .into(),
                context: None,
            });
        }
        ancestor = current.raw_context();
    }

    feature.set_context(context);
    Ok(())
}

/// Accessor for features holding `routable`.
#[derive(Debug, Clone, Copy)]
pub struct Routable<'a> {
    feature: &'a Feature,
}

impl<'a> Routable<'a> {
    pub(crate) const fn new(feature: &'a Feature) -> Self {
        Self { feature }
    }

    /// The local segment, `None` when unset or empty.
    #[must_use]
    pub fn segment(&self) -> Option<String> {
        self.feature.get_str(keys::URL).filter(|s| !s.is_empty())
    }

    /// The segment prefixed with the URL of the contextual parent, when that parent
    /// is routable and has a non-empty URL of its own.
    #[must_use]
    pub fn resolve_url(&self) -> Option<String> {
        let segment = self.segment()?;
        let base = self
            .feature
            .context()
            .and_then(|parent| parent.url())
            .filter(|base| !base.is_empty());

        Some(match base {
            Some(base) => format!("{base}/{segment}"),
            None => segment,
        })
    }
}

/// Accessor for features holding `contextual`.
#[derive(Debug, Clone, Copy)]
pub struct Contextual<'a> {
    feature: &'a Feature,
}

impl<'a> Contextual<'a> {
    pub(crate) const fn new(feature: &'a Feature) -> Self {
        Self { feature }
    }

    #[must_use]
    pub fn context(&self) -> Option<FeatureRef> {
        self.feature.raw_context()
    }
}
