use std::borrow::Cow;
use trellis_kernel::KernelError;

/// A specialized [`BootError`] enum of the facade.
#[trellis_derive::trellis_error]
pub enum BootError {
    #[error("Boot kernel error{}: {source}", format_context(.context))]
    Kernel { source: KernelError, context: Option<Cow<'static, str>> },
    #[cfg(feature = "login")]
    #[error("Login plugin error{}: {source}", format_context(.context))]
    Login { source: trellis_login::LoginError, context: Option<Cow<'static, str>> },
    /// A second engine was offered to the process-global slot.
    #[error("Engine already installed{}: {message}", format_context(.context))]
    AlreadyInstalled { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Internal boot error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
