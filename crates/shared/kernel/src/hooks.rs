use crate::error::{KernelError, KernelErrorExt};
use crate::feature::FeatureRef;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Post-activation handler. It may return the feature it was given or a replacement
/// of the same type; the returned feature is the one stored.
pub type Hook = Arc<dyn Fn(FeatureRef) -> Result<FeatureRef, KernelError> + Send + Sync>;

/// Ordered list of post-activation hooks.
#[derive(Clone, Default)]
pub struct Hooks {
    hooks: Vec<(Cow<'static, str>, Hook)>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, name: impl Into<Cow<'static, str>>, hook: F)
    where
        F: Fn(FeatureRef) -> Result<FeatureRef, KernelError> + Send + Sync + 'static,
    {
        self.hooks.push((name.into(), Arc::new(hook)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Threads `feature` through every hook in registration order.
    ///
    /// # Errors
    /// The first hook failure, with the hook name attached as context.
    pub fn run(&self, mut feature: FeatureRef) -> Result<FeatureRef, KernelError> {
        for (name, hook) in &self.hooks {
            trace!(hook = %name, feature = feature.name(), "Running post-activation hook");
            let expected = feature.feature_type().to_owned();
            feature = hook(feature).context(format!("hook `{name}`"))?;
            if feature.feature_type() != expected {
                return Err(KernelError::ActivationFailed {
                    message: format!(
                        "hook returned a {} in place of a {expected}",
                        feature.feature_type()
                    )
                    .into(),
                    context: Some(Cow::Owned(format!("hook `{name}`"))),
                });
            }
        }
        Ok(feature)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.hooks.iter().map(|(name, _)| name)).finish()
    }
}
