//! # Trellis kernel
//!
//! The feature registry and activation engine. A tree of nested declarations is
//! turned into a tree of live [`Feature`]s: each one is built from its constructor,
//! granted its capabilities, has the children it declares activated into its own
//! [`Registry`], and is linked to the container it lives in.
//!
//! ```rust
//! use serde_json::json;
//! use trellis_kernel::Engine;
//!
//! let engine = Engine::new();
//! let site = engine
//!     .boot_site(serde_json::from_value(json!({
//!         "name": "root",
//!         "apps": { "shop": { "url": "shop", "addons": [{ "name": "cart", "url": "/cart/" }] } }
//!     })).unwrap())
//!     .unwrap();
//!
//! let cart = site.find("apps/shop/addons/cart").unwrap();
//! assert_eq!(cart.url().as_deref(), Some("shop/cart"));
//! assert_eq!(cart.context().unwrap().name(), "shop");
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use trellis_domain::config::TrellisConfig;
//! use trellis_kernel::config::load_config;
//!
//! let cfg: TrellisConfig = load_config(Some("trellis.toml")).unwrap();
//! ```
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod constructor;
pub mod engine;
pub mod error;
pub mod feature;
pub mod hooks;
pub mod i18n;
pub mod prelude;
pub mod registry;
pub mod snapshot;

pub use catalog::{Catalog, DescriptorField};
pub use constructor::{Constructor, StandardConstructor};
pub use engine::{Engine, EngineBuilder, Target};
pub use error::{KernelError, KernelErrorExt};
pub use feature::{Feature, FeatureRef};
pub use registry::{Declaration, FeatureKey, Registrable, Registry, Slot};
pub use trellis_domain as domain;
