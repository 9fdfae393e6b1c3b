//! Reserved property keys and capability names.

/// Property keys with a meaning to the engine.
pub mod keys {
    /// Feature name, unique per container and type.
    pub const NAME: &str = "name";
    /// Merged construction arguments, kept for inspection.
    pub const ARGS: &str = "args";
    /// Local URL segment of a routable feature.
    pub const URL: &str = "url";
    /// Extra capability names declared on top of the descriptor set.
    pub const DUCK_TYPES: &str = "_duck_types";
    /// Name of the constructor used to build the feature.
    pub const CONSTRUCTOR: &str = "_constructor";
    pub const FEATURE_TYPE: &str = "_feature_type";
    pub const PLURAL: &str = "_plural";
    /// Set by callers that construct a feature directly and activate it themselves.
    pub const ACTIVATED: &str = "_activated";
}

pub const ROUTABLE: &str = "routable";
pub const CONTEXTUAL: &str = "contextual";

pub const SITE: &str = "site";
pub const APP: &str = "app";
pub const ADDON: &str = "addon";
pub const VIEW: &str = "view";
pub const FORM: &str = "form";
