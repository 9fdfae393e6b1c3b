use std::borrow::Cow;
use trellis_kernel::KernelError;

/// A specialized [`LoginError`] enum of this crate.
#[trellis_derive::trellis_error]
pub enum LoginError {
    /// Registration or activation of the addon failed.
    #[error("Login addon kernel error{}: {source}", format_context(.context))]
    Kernel { source: KernelError, context: Option<Cow<'static, str>> },
    /// The addon is installed before the site was booted.
    #[error("Login addon needs a site{}: {message}", format_context(.context))]
    MissingSite { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Internal login addon error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
