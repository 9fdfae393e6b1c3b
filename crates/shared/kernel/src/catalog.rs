//! Feature type descriptors and constructors known to an engine.

use crate::constructor::{Constructor, StandardConstructor};
use crate::error::KernelError;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::debug;
use trellis_domain::{BuiltinType, FeatureTypeDescriptor};

/// Descriptor field used by [`Catalog::by_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorField {
    TypeName,
    Plural,
    Constructor,
}

#[derive(Debug, Default)]
pub struct Catalog {
    descriptors: RwLock<IndexMap<String, Arc<FeatureTypeDescriptor>>>,
    constructors: RwLock<IndexMap<String, Arc<dyn Constructor>>>,
}

impl Catalog {
    /// A catalog without any type.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A catalog seeded with the five built-in types and their standard constructors.
    #[must_use]
    pub fn builtin() -> Self {
        let catalog = Self::empty();
        {
            let mut descriptors = catalog.descriptors.write();
            let mut constructors = catalog.constructors.write();
            for ty in BuiltinType::iter() {
                let descriptor = ty.descriptor();
                constructors.insert(
                    descriptor.constructor_name().to_owned(),
                    Arc::new(StandardConstructor::new(descriptor.type_name.clone())),
                );
                descriptors.insert(descriptor.type_name.clone(), Arc::new(descriptor));
            }
        }
        catalog
    }

    #[must_use]
    pub fn by_type_name(&self, type_name: &str) -> Option<Arc<FeatureTypeDescriptor>> {
        self.descriptors.read().get(type_name).cloned()
    }

    /// First descriptor whose `field` equals `value`.
    #[must_use]
    pub fn by_field(&self, field: DescriptorField, value: &str) -> Option<Arc<FeatureTypeDescriptor>> {
        if field == DescriptorField::TypeName {
            return self.by_type_name(value);
        }
        self.descriptors
            .read()
            .values()
            .find(|d| match field {
                DescriptorField::Plural => d.plural == value,
                DescriptorField::Constructor => d.constructor_name() == value,
                DescriptorField::TypeName => d.type_name == value,
            })
            .cloned()
    }

    /// Looks a type up, failing with [`KernelError::UnknownFeatureType`].
    ///
    /// # Errors
    /// When `type_name` is not in the catalog.
    pub fn require(&self, type_name: &str) -> Result<Arc<FeatureTypeDescriptor>, KernelError> {
        self.by_type_name(type_name).ok_or_else(|| KernelError::unknown_type(type_name))
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    /// [`KernelError::InvalidDescriptor`] when the descriptor is incomplete, or its type
    /// name or plural key is already taken.
    pub fn register_type(
        &self,
        descriptor: FeatureTypeDescriptor,
    ) -> Result<Arc<FeatureTypeDescriptor>, KernelError> {
        if descriptor.type_name.trim().is_empty() || descriptor.plural.trim().is_empty() {
            return Err(KernelError::InvalidDescriptor {
                message: "type name and plural key must not be empty".into(),
                context: None,
            });
        }

        let mut descriptors = self.descriptors.write();
        if descriptors.contains_key(&descriptor.type_name) {
            return Err(KernelError::InvalidDescriptor {
                message: format!("type `{}` is already registered", descriptor.type_name).into(),
                context: None,
            });
        }
        if let Some(owner) = descriptors.values().find(|d| d.plural == descriptor.plural) {
            return Err(KernelError::InvalidDescriptor {
                message: format!(
                    "plural key `{}` already belongs to type `{}`",
                    descriptor.plural, owner.type_name
                )
                .into(),
                context: None,
            });
        }

        debug!(type_name = %descriptor.type_name, plural = %descriptor.plural, "Registered feature type");
        let descriptor = Arc::new(descriptor);
        descriptors.insert(descriptor.type_name.clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Installs `constructor` under `name`, replacing any previous one.
    pub fn register_constructor(&self, name: impl Into<String>, constructor: Arc<dyn Constructor>) {
        let name = name.into();
        debug!(%name, feature_type = constructor.feature_type(), "Registered constructor");
        self.constructors.write().insert(name, constructor);
    }

    #[must_use]
    pub fn constructor(&self, name: &str) -> Option<Arc<dyn Constructor>> {
        self.constructors.read().get(name).cloned()
    }

    #[must_use]
    pub fn has_constructor(&self, name: &str) -> bool {
        self.constructors.read().contains_key(name)
    }

    /// All descriptors in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<Arc<FeatureTypeDescriptor>> {
        self.descriptors.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_domain::Capabilities;

    fn widget(plural: &str) -> FeatureTypeDescriptor {
        FeatureTypeDescriptor::builder()
            .type_name("widget")
            .plural(plural)
            .capabilities(Capabilities::ROUTABLE)
            .build()
    }

    #[test]
    fn builtin_catalog_answers_every_field() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.descriptors().len(), 5);
        assert_eq!(
            catalog.by_field(DescriptorField::Plural, "addons").map(|d| d.type_name.clone()),
            Some("addon".to_owned())
        );
        assert_eq!(
            catalog.by_field(DescriptorField::Constructor, "view").map(|d| d.plural.clone()),
            Some("views".to_owned())
        );
        assert!(catalog.by_field(DescriptorField::TypeName, "widget").is_none());
        assert!(catalog.has_constructor("site"));
    }

    #[test]
    fn duplicate_type_or_plural_is_rejected() {
        let catalog = Catalog::builtin();
        assert!(catalog.register_type(widget("widgets")).is_ok());

        let err = catalog.register_type(widget("gadgets")).expect_err("duplicate type");
        assert_eq!(err.code(), "invalid-descriptor");

        let clash = FeatureTypeDescriptor::builder().type_name("panel").plural("views").build();
        let err = catalog.register_type(clash).expect_err("plural clash");
        assert!(err.to_string().contains("`view`"));
    }

    #[test]
    fn unknown_types_fail_lookup() {
        let err = Catalog::empty().require("site").expect_err("empty catalog");
        assert_eq!(err.code(), "unknown-feature-type");
    }
}
