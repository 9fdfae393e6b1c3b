use crate::bag::{Map, Value};
use crate::capabilities::Capabilities;
use crate::constants::keys;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Static description of a feature type.
///
/// ```rust
/// use trellis_domain::{Capabilities, FeatureTypeDescriptor};
///
/// let widget = FeatureTypeDescriptor::builder()
///     .type_name("widget")
///     .plural("widgets")
///     .supports(vec!["forms".to_owned()])
///     .capabilities(Capabilities::ROUTABLE | Capabilities::CONTEXTUAL)
///     .build();
///
/// assert_eq!(widget.constructor_name(), "widget");
/// assert!(widget.supports("forms"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct FeatureTypeDescriptor {
    #[builder(setter(into))]
    pub type_name: String,
    /// Bucket name inside a parent's registry.
    #[builder(setter(into))]
    pub plural: String,
    /// Plural keys of the feature types this type may contain, in activation order.
    #[serde(default)]
    #[builder(default)]
    pub supports: Vec<String>,
    #[serde(default = "Capabilities::empty")]
    #[builder(default = Capabilities::empty())]
    pub capabilities: Capabilities,
    /// Constructor reference; empty means "same as the type name".
    #[serde(default)]
    #[builder(default, setter(into))]
    pub constructor: String,
    /// At most one live instance per engine.
    #[serde(default)]
    #[builder(default)]
    pub singleton: bool,
}

impl FeatureTypeDescriptor {
    #[must_use]
    pub fn constructor_name(&self) -> &str {
        if self.constructor.is_empty() { &self.type_name } else { &self.constructor }
    }

    #[must_use]
    pub fn supports(&self, plural: &str) -> bool {
        self.supports.iter().any(|p| p == plural)
    }

    /// Properties every declaration of this type starts from.
    #[must_use]
    pub fn defaults(&self) -> Map {
        let mut map = Map::new();
        map.insert(keys::FEATURE_TYPE.to_owned(), Value::String(self.type_name.clone()));
        map.insert(keys::PLURAL.to_owned(), Value::String(self.plural.clone()));
        map.insert(keys::CONSTRUCTOR.to_owned(), Value::String(self.constructor_name().to_owned()));
        map
    }
}
