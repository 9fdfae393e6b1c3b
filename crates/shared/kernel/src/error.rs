use std::borrow::Cow;

/// Failures raised by the registry and the activation engine.
///
/// Activating a name that was never declared is not an error: it yields `Ok(None)`.
#[trellis_derive::trellis_error]
pub enum KernelError {
    #[error("Unknown feature type{}: {feature_type}", format_context(.context))]
    UnknownFeatureType { feature_type: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Feature name required{}: a `{feature_type}` declaration has no name", format_context(.context))]
    NameRequired { feature_type: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Activation failed{}: {message}", format_context(.context))]
    ActivationFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Singleton already constructed{}: {type_name}", format_context(.context))]
    AlreadySingleton { type_name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Context chain rejected{}: {message}", format_context(.context))]
    ContextCycle { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Missing capability{}: {message}", format_context(.context))]
    MissingCapability { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid feature type descriptor{}: {message}", format_context(.context))]
    InvalidDescriptor { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal kernel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl KernelError {
    pub(crate) fn unknown_type(feature_type: &str) -> Self {
        Self::UnknownFeatureType { feature_type: feature_type.to_owned().into(), context: None }
    }

    pub(crate) fn name_required(feature_type: &str) -> Self {
        Self::NameRequired { feature_type: feature_type.to_owned().into(), context: None }
    }

    pub(crate) fn activation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ActivationFailed { message: message.into(), context: None }
    }

    /// Errors that abort a whole subtree instead of skipping one child.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::AlreadySingleton { .. } | Self::UnknownFeatureType { .. })
    }
}
