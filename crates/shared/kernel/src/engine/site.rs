use super::Engine;
use crate::error::KernelError;
use crate::feature::FeatureRef;
use tracing::{info, instrument};
use trellis_domain::constants::SITE;
use trellis_domain::{Map, merge};

impl Engine {
    /// Builds the site root from `config` and activates everything it declares.
    ///
    /// # Errors
    /// [`KernelError::AlreadySingleton`] when a site is already live (it is left
    /// untouched), or any fatal error raised while expanding its children.
    #[instrument(level = "info", skip_all)]
    pub fn boot_site(&self, config: Map) -> Result<FeatureRef, KernelError> {
        let descriptor = self.inner.catalog.require(SITE)?;
        let config = merge(&config, &descriptor.defaults());
        let site = self.build(&[], 0, &descriptor, config)?;
        info!(site = site.name(), children = site.children().len(), "Site booted");
        Ok(site)
    }

    /// The live site root.
    #[must_use]
    pub fn site(&self) -> Option<FeatureRef> {
        self.inner.singletons.read().get(SITE).cloned()
    }

    /// Live instance of a singleton type.
    #[must_use]
    pub fn singleton(&self, type_name: &str) -> Option<FeatureRef> {
        self.inner.singletons.read().get(type_name).cloned()
    }

    /// Releases the site and every other singleton slot.
    pub fn teardown(&self) {
        let released = {
            let mut slots = self.inner.singletons.write();
            let count = slots.len();
            slots.clear();
            count
        };
        info!(released, "Engine torn down");
    }
}
