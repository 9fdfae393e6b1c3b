//! # Domain Models
//!
//! Pure data types shared by the kernel, the plugins and the applications.
//! Keep it lean: no I/O, locking or logging here, just data and small helpers.
//!
//! * [`PropertyBag`]: the ordered key/value store every feature is built on.
//! * [`Capabilities`]: the capability (duck type) set granted to a feature.
//! * [`FeatureTypeDescriptor`]: static description of one feature type.
//! * [`BuiltinType`]: the five feature types the catalog is seeded with.
//! * [`config`]: the configuration tree loaded by applications.

pub mod bag;
pub mod capabilities;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod types;

pub use bag::{Map, PropertyBag, Value, merge, name_of};
pub use capabilities::Capabilities;
pub use descriptor::FeatureTypeDescriptor;
pub use types::BuiltinType;
