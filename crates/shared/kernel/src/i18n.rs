//! Message lookup for human-readable error text.

use fxhash::FxHashMap;
use std::borrow::Cow;
use std::fmt;

/// Translates a message code, falling back to the given text.
pub trait Localizer: fmt::Debug + Send + Sync {
    fn translate<'a>(&'a self, code: &str, fallback: &'a str) -> Cow<'a, str>;
}

/// Returns the fallback untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Localizer for PassThrough {
    fn translate<'a>(&'a self, _code: &str, fallback: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(fallback)
    }
}

/// Fixed code to message table. `{detail}` in a message is replaced by the fallback.
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    messages: FxHashMap<String, String>,
}

impl MessageTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(code, message);
        self
    }

    pub fn insert(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(code.into(), message.into());
    }
}

impl<C, M> FromIterator<(C, M)> for MessageTable
where
    C: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, M)>>(iter: I) -> Self {
        Self { messages: iter.into_iter().map(|(c, m)| (c.into(), m.into())).collect() }
    }
}

impl Localizer for MessageTable {
    fn translate<'a>(&'a self, code: &str, fallback: &'a str) -> Cow<'a, str> {
        match self.messages.get(code) {
            Some(message) if message.contains("{detail}") => {
                Cow::Owned(message.replace("{detail}", fallback))
            },
            Some(message) => Cow::Borrowed(message),
            None => Cow::Borrowed(fallback),
        }
    }
}
