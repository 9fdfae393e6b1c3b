use super::{Engine, Target};
use crate::capabilities::{assign_context, requested};
use crate::error::KernelError;
use crate::feature::{Feature, FeatureRef};
use crate::registry::{FeatureKey, Slot};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};
use trellis_domain::constants::keys;
use trellis_domain::{Capabilities, FeatureTypeDescriptor, Map, PropertyBag, Value, merge, name_of};

impl Engine {
    /// Activates a feature of `feature_type` inside `container`.
    ///
    /// * A live feature is wired (once) and stored under its name.
    /// * A declaration mapping is merged over the descriptor defaults and built.
    /// * A name is looked up in the container's registry: a declaration is built with
    ///   `extra` merged over it and replaces its slot, a live feature is reused, and an
    ///   unknown name yields `Ok(None)`.
    ///
    /// # Errors
    /// * [`KernelError::UnknownFeatureType`] for a type missing from the catalog.
    /// * [`KernelError::NameRequired`] when the merged configuration has no name.
    /// * [`KernelError::AlreadySingleton`] when a singleton type is built twice.
    /// * [`KernelError::ActivationFailed`] for a non-mapping declaration, an unknown or
    ///   mismatched constructor, a feature of another type, or runaway nesting.
    #[instrument(level = "debug", skip_all, fields(container = %container.name(), %feature_type))]
    pub fn activate(
        &self,
        container: &FeatureRef,
        feature_type: &str,
        target: impl Into<Target>,
        extra: Map,
    ) -> Result<Option<FeatureRef>, KernelError> {
        let lineage = lineage_of(container);
        self.activate_in(&lineage, 0, feature_type, target.into(), extra)
    }

    /// Builds a feature straight from a constructor.
    ///
    /// Unless `_activated` is set in `config`, the feature then registers and
    /// activates itself in `context` (contextual types) or the site, when no entry of
    /// that name exists there yet. With nowhere to live it is wired as a free root.
    ///
    /// # Errors
    /// Same as [`Engine::activate`].
    #[instrument(level = "debug", skip(self, config, context))]
    pub fn construct(
        &self,
        constructor_name: &str,
        config: Map,
        context: Option<&FeatureRef>,
    ) -> Result<FeatureRef, KernelError> {
        let constructor = self.inner.catalog.constructor(constructor_name).ok_or_else(|| {
            KernelError::activation(format!("unknown constructor `{constructor_name}`"))
        })?;
        let descriptor = self.inner.catalog.require(constructor.feature_type())?;

        let mut config = merge(&config, &descriptor.defaults());
        config.insert(keys::CONSTRUCTOR.to_owned(), Value::String(constructor_name.to_owned()));
        let feature = self.instantiate(&descriptor, config)?;

        if feature.get_bool(keys::ACTIVATED) {
            trace!(feature = feature.name(), "Constructed without activation");
            return Ok(feature);
        }

        let home = if descriptor.capabilities.contains(Capabilities::CONTEXTUAL) {
            context.cloned().or_else(|| self.site())
        } else {
            self.site()
        }
        .filter(|home| !Arc::ptr_eq(home, &feature));

        let Some(home) = home else {
            return self.wire_built(&[], 0, &descriptor, feature);
        };
        if home.children().is_registered(&descriptor.type_name, FeatureKey::Feature(&feature)) {
            debug!(feature = feature.name(), home = home.name(), "Already registered; not activating");
            return Ok(feature);
        }

        home.children().register(&descriptor.type_name, &feature)?;
        let activated = self.activate(&home, &descriptor.type_name, &feature, Map::new())?;
        Ok(activated.unwrap_or(feature))
    }

    pub(super) fn activate_in(
        &self,
        lineage: &[FeatureRef],
        depth: usize,
        feature_type: &str,
        target: Target,
        extra: Map,
    ) -> Result<Option<FeatureRef>, KernelError> {
        let max = self.inner.config.max_activation_depth;
        if depth > max {
            return Err(KernelError::activation(format!(
                "`{feature_type}` nested deeper than {max} levels"
            )));
        }

        let descriptor = self.inner.catalog.require(feature_type)?;
        let Some(container) = lineage.last() else {
            return Err(KernelError::from("activation requested without a container"));
        };
        let registry = container.children();
        registry.ensure_bucket(&descriptor.plural);

        let feature = match target {
            Target::Name(name) => match registry.slot_in(&descriptor.plural, &name) {
                None => {
                    debug!(%name, "Nothing declared under this name");
                    return Ok(None);
                },
                Some(Slot::Active(feature)) if feature.is_activated() => feature,
                Some(Slot::Active(feature)) => self.wire(lineage, depth, feature)?,
                Some(Slot::Declaration(declaration)) => {
                    let mut config = merge(&extra, &declaration.config);
                    config.insert(keys::NAME.to_owned(), Value::String(declaration.name));
                    self.build(lineage, depth, &descriptor, config)?
                },
            },
            Target::Config(Value::Object(config)) => {
                let config = merge(&merge(&extra, &config), &descriptor.defaults());
                self.build(lineage, depth, &descriptor, config)?
            },
            Target::Config(other) => {
                return Err(KernelError::activation(format!(
                    "a {feature_type} declaration must be a mapping, got `{other}`"
                )));
            },
            Target::Feature(feature) => {
                if feature.feature_type() != descriptor.type_name {
                    return Err(KernelError::activation(format!(
                        "`{}` is a {}, not a {feature_type}",
                        feature.name(),
                        feature.feature_type()
                    )));
                }
                if feature.is_activated() { feature } else { self.wire(lineage, depth, feature)? }
            },
        };

        if lineage.iter().any(|ancestor| Arc::ptr_eq(ancestor, &feature)) {
            return Err(KernelError::ContextCycle {
                message: format!(
                    "`{}` cannot be stored below itself in `{}`",
                    feature.name(),
                    container.name()
                )
                .into(),
                context: None,
            });
        }
        registry.store(&descriptor.plural, feature.name(), Slot::Active(Arc::clone(&feature)));
        Ok(Some(feature))
    }

    /// Instantiates and wires, giving the singleton slot back if wiring fails.
    pub(super) fn build(
        &self,
        lineage: &[FeatureRef],
        depth: usize,
        descriptor: &Arc<FeatureTypeDescriptor>,
        config: Map,
    ) -> Result<FeatureRef, KernelError> {
        let feature = self.instantiate(descriptor, config)?;
        self.wire_built(lineage, depth, descriptor, feature)
    }

    fn wire_built(
        &self,
        lineage: &[FeatureRef],
        depth: usize,
        descriptor: &FeatureTypeDescriptor,
        feature: FeatureRef,
    ) -> Result<FeatureRef, KernelError> {
        match self.wire(lineage, depth, Arc::clone(&feature)) {
            Ok(wired) => {
                if descriptor.singleton && !Arc::ptr_eq(&wired, &feature) {
                    self.inner.singletons.write().insert(descriptor.type_name.clone(), Arc::clone(&wired));
                }
                Ok(wired)
            },
            Err(err) => {
                if descriptor.singleton {
                    self.release_singleton(&feature);
                }
                Err(err)
            },
        }
    }

    /// Builds the property bag and runs the constructor hook. No wiring happens here.
    fn instantiate(
        &self,
        descriptor: &Arc<FeatureTypeDescriptor>,
        config: Map,
    ) -> Result<FeatureRef, KernelError> {
        let constructor_name = config
            .get(keys::CONSTRUCTOR)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| descriptor.constructor_name())
            .to_owned();

        let constructor = self.inner.catalog.constructor(&constructor_name).ok_or_else(|| {
            KernelError::activation(format!(
                "unknown constructor `{constructor_name}` for a {}",
                descriptor.type_name
            ))
        })?;
        if constructor.feature_type() != descriptor.type_name {
            return Err(KernelError::activation(format!(
                "constructor `{constructor_name}` builds a {}, not a {}",
                constructor.feature_type(),
                descriptor.type_name
            )));
        }

        let defaults = merge(&constructor.defaults(), &descriptor.defaults());
        let mut properties = PropertyBag::new(config, defaults);
        let name = properties
            .args()
            .and_then(name_of)
            .ok_or_else(|| KernelError::name_required(&descriptor.type_name))?;
        properties.set(keys::NAME, name.clone());
        properties.set(keys::CONSTRUCTOR, constructor_name.clone());

        let feature = Arc::new(Feature::new(
            name,
            Arc::clone(descriptor),
            constructor_name,
            properties,
            Arc::clone(&self.inner.catalog),
        ));

        if descriptor.singleton {
            self.claim_singleton(&feature)?;
        }
        if let Err(err) = constructor.initialize(&feature) {
            if descriptor.singleton {
                self.release_singleton(&feature);
            }
            return Err(err);
        }

        trace!(feature = feature.name(), feature_type = feature.feature_type(), "Instantiated");
        Ok(feature)
    }

    /// Capabilities, children, context link, then hooks. A replacement returned by the
    /// hooks that is not live yet gets its own capabilities and context link.
    pub(super) fn wire(
        &self,
        lineage: &[FeatureRef],
        depth: usize,
        feature: FeatureRef,
    ) -> Result<FeatureRef, KernelError> {
        self.attach_capabilities(&feature)?;
        self.expand_supports(lineage, depth, &feature)?;
        self.link(lineage, &feature)?;

        let hooks = self.inner.hooks.read().clone();
        let returned = hooks.run(Arc::clone(&feature))?;
        let feature = if Arc::ptr_eq(&returned, &feature) || returned.is_activated() {
            returned
        } else {
            trace!(feature = returned.name(), "Wiring hook replacement");
            self.attach_capabilities(&returned)?;
            self.link(lineage, &returned)?;
            returned
        };

        debug!(
            feature = feature.name(),
            feature_type = feature.feature_type(),
            url = feature.url().as_deref().unwrap_or("-"),
            "Activated"
        );
        Ok(feature)
    }

    /// Context link to the innermost container, then the activated mark.
    fn link(&self, lineage: &[FeatureRef], feature: &Feature) -> Result<(), KernelError> {
        if feature.capabilities().contains(Capabilities::CONTEXTUAL)
            && let Some(container) = lineage.last()
        {
            assign_context(feature, container, self.inner.config.max_context_depth)?;
        }
        feature.mark_activated();
        Ok(())
    }

    fn attach_capabilities(&self, feature: &Feature) -> Result<(), KernelError> {
        let mut flags = Capabilities::empty();
        let mut attached = Vec::new();

        for name in requested(feature) {
            match self.inner.capabilities.get(&name) {
                Some(behavior) => {
                    behavior.attach(feature)?;
                    flags |= behavior.flag();
                    attached.push(name);
                },
                None if self.inner.config.strict_capabilities => {
                    return Err(KernelError::activation(format!(
                        "unknown capability `{name}` requested by `{}`",
                        feature.name()
                    )));
                },
                None => {
                    warn!(capability = %name, feature = feature.name(), "Ignoring unknown capability");
                },
            }
        }

        feature.grant(flags, attached);
        Ok(())
    }

    fn claim_singleton(&self, feature: &FeatureRef) -> Result<(), KernelError> {
        let mut slots = self.inner.singletons.write();
        if slots.contains_key(feature.feature_type()) {
            return Err(KernelError::AlreadySingleton {
                type_name: feature.feature_type().to_owned().into(),
                context: None,
            });
        }
        slots.insert(feature.feature_type().to_owned(), Arc::clone(feature));
        Ok(())
    }

    fn release_singleton(&self, feature: &FeatureRef) {
        let mut slots = self.inner.singletons.write();
        if slots.get(feature.feature_type()).is_some_and(|held| Arc::ptr_eq(held, feature)) {
            slots.remove(feature.feature_type());
        }
    }
}

/// `container` and its context chain, outermost first.
fn lineage_of(container: &FeatureRef) -> Vec<FeatureRef> {
    let mut lineage = vec![Arc::clone(container)];
    let mut current = container.raw_context();
    while let Some(parent) = current {
        current = parent.raw_context();
        lineage.push(parent);
    }
    lineage.reverse();
    lineage
}
