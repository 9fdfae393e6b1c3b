//! Everything a plugin or an application usually needs.

pub use crate::capabilities::{CapabilityBehavior, CapabilityRegistry, Contextual, Routable};
pub use crate::catalog::{Catalog, DescriptorField};
pub use crate::constructor::{Constructor, StandardConstructor};
pub use crate::engine::{Engine, EngineBuilder, Target};
pub use crate::error::{KernelError, KernelErrorExt};
pub use crate::feature::{Feature, FeatureRef};
pub use crate::hooks::Hooks;
pub use crate::i18n::{Localizer, MessageTable, PassThrough};
pub use crate::registry::{Declaration, FeatureKey, Registrable, Registry, Slot};
pub use crate::snapshot::FeatureSnapshot;
pub use trellis_domain::config::{EngineConfig, TrellisConfig};
pub use trellis_domain::constants::keys;
pub use trellis_domain::{
    BuiltinType, Capabilities, FeatureTypeDescriptor, Map, PropertyBag, Value, merge,
};
