//! Live feature instances.

use crate::capabilities::{Contextual, Routable};
use crate::catalog::Catalog;
use crate::error::KernelError;
use crate::registry::{Registry, Slot};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};
use trellis_domain::{Capabilities, FeatureTypeDescriptor, Map, PropertyBag, Value};

/// Shared handle to a live feature.
pub type FeatureRef = Arc<Feature>;

/// A live node of the feature tree.
///
/// Identity (name, type, constructor) is fixed at construction. Properties,
/// capabilities and the context link sit behind one lock; the child registry has
/// its own. Neither lock is held while the engine recurses.
pub struct Feature {
    name: String,
    descriptor: Arc<FeatureTypeDescriptor>,
    constructor: String,
    state: RwLock<FeatureState>,
    children: Registry,
}

#[derive(Debug, Default)]
struct FeatureState {
    properties: PropertyBag,
    capabilities: Capabilities,
    /// Names of the attached capability behaviours, in attachment order.
    duck_types: Vec<String>,
    context: Weak<Feature>,
    activated: bool,
}

impl Feature {
    pub(crate) fn new(
        name: String,
        descriptor: Arc<FeatureTypeDescriptor>,
        constructor: String,
        properties: PropertyBag,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            name,
            descriptor,
            constructor,
            state: RwLock::new(FeatureState { properties, ..FeatureState::default() }),
            children: Registry::new(catalog),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn feature_type(&self) -> &str {
        &self.descriptor.type_name
    }

    #[must_use]
    pub fn plural(&self) -> &str {
        &self.descriptor.plural
    }

    #[must_use]
    pub fn descriptor(&self) -> &Arc<FeatureTypeDescriptor> {
        &self.descriptor
    }

    /// Name of the constructor that built this feature.
    #[must_use]
    pub fn constructor_name(&self) -> &str {
        &self.constructor
    }

    // --- Properties ---

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.read().properties.get(key).cloned()
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.state.read().properties.get_str(key).map(str::to_owned)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.state.read().properties.get_bool(key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.state.read().properties.has(key)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.write().properties.set(key, value);
    }

    pub fn load(&self, values: Map) {
        self.state.write().properties.load(values);
    }

    /// The merged construction arguments.
    #[must_use]
    pub fn args(&self) -> Option<Map> {
        self.state.read().properties.args().cloned()
    }

    /// A copy of the whole property bag.
    #[must_use]
    pub fn properties(&self) -> PropertyBag {
        self.state.read().properties.clone()
    }

    // --- Capabilities ---

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.state.read().capabilities
    }

    /// `true` when a capability of that name was attached during activation.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.state.read().duck_types.iter().any(|n| n == name)
    }

    /// Attached capability names, in attachment order.
    #[must_use]
    pub fn duck_types(&self) -> Vec<String> {
        self.state.read().duck_types.clone()
    }

    #[must_use]
    pub fn as_routable(&self) -> Option<Routable<'_>> {
        self.capabilities().contains(Capabilities::ROUTABLE).then(|| Routable::new(self))
    }

    /// Like [`Feature::as_routable`], for callers that cannot go on without it.
    ///
    /// # Errors
    /// [`KernelError::MissingCapability`] when `routable` was not attached.
    pub fn require_routable(&self) -> Result<Routable<'_>, KernelError> {
        self.as_routable().ok_or_else(|| KernelError::MissingCapability {
            message: format!("{} `{}` is not routable", self.feature_type(), self.name).into(),
            context: None,
        })
    }

    #[must_use]
    pub fn as_contextual(&self) -> Option<Contextual<'_>> {
        self.capabilities().contains(Capabilities::CONTEXTUAL).then(|| Contextual::new(self))
    }

    /// Resolved URL of a routable feature.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.as_routable().and_then(|r| r.resolve_url())
    }

    /// The container this feature was activated in; `None` unless contextual.
    #[must_use]
    pub fn context(&self) -> Option<FeatureRef> {
        self.as_contextual().and_then(|c| c.context())
    }

    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.state.read().activated
    }

    // --- Children ---

    #[must_use]
    pub fn children(&self) -> &Registry {
        &self.children
    }

    /// Live child stored under `plural` / `name`.
    #[must_use]
    pub fn child(&self, plural: &str, name: &str) -> Option<FeatureRef> {
        match self.children.slot_in(plural, name)? {
            Slot::Active(feature) => Some(feature),
            Slot::Declaration(_) => None,
        }
    }

    /// Walks a `plural/name/plural/name…` path over live children.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use trellis_kernel::Engine;
    ///
    /// let engine = Engine::new();
    /// let site = engine
    ///     .boot_site(serde_json::from_value(json!({
    ///         "name": "root",
    ///         "apps": [{ "name": "shop", "url": "shop", "views": { "home": { "url": "home" } } }]
    ///     })).unwrap())
    ///     .unwrap();
    ///
    /// let home = site.find("apps/shop/views/home").unwrap();
    /// assert_eq!(home.url().as_deref(), Some("shop/home"));
    /// assert!(site.find("apps/shop/forms/login").is_none());
    /// ```
    #[must_use]
    pub fn find(self: &Arc<Self>, path: &str) -> Option<FeatureRef> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let mut current = Arc::clone(self);
        while let Some(plural) = segments.next() {
            let name = segments.next()?;
            current = current.child(plural, name)?;
        }
        Some(current)
    }

    // --- Engine-side mutation ---

    pub(crate) fn grant(&self, capabilities: Capabilities, duck_types: Vec<String>) {
        let mut state = self.state.write();
        state.capabilities = capabilities;
        state.duck_types = duck_types;
    }

    pub(crate) fn set_context(&self, context: &FeatureRef) {
        self.state.write().context = Arc::downgrade(context);
    }

    /// The context link regardless of capabilities.
    pub(crate) fn raw_context(&self) -> Option<FeatureRef> {
        self.state.read().context.upgrade()
    }

    pub(crate) fn mark_activated(&self) {
        self.state.write().activated = true;
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("feature_type", &self.descriptor.type_name)
            .field("capabilities", &state.capabilities)
            .field("activated", &state.activated)
            .field("children", &self.children.buckets())
            .finish_non_exhaustive()
    }
}
