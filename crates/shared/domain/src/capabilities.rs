use crate::constants::{CONTEXTUAL, ROUTABLE};
use bitflags::bitflags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Capabilities (duck types) a feature may hold.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u32 {
        /// Addressable through a hierarchical URL.
        const ROUTABLE = 1 << 0;
        /// Linked to the container that activated it.
        const CONTEXTUAL = 1 << 1;
    }
}

const NAMED: [(&str, Capabilities); 2] =
    [(ROUTABLE, Capabilities::ROUTABLE), (CONTEXTUAL, Capabilities::CONTEXTUAL)];

impl Capabilities {
    /// Looks up a single capability by its declared name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        NAMED.iter().find(|(n, _)| *n == name).map(|(_, flag)| *flag)
    }

    /// Folds a list of names into a set, returning the names that were not recognised.
    pub fn from_names<'a, I>(names: I) -> (Self, Vec<&'a str>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::empty();
        let mut unknown = Vec::new();
        for name in names {
            match Self::by_name(name) {
                Some(flag) => set |= flag,
                None => unknown.push(name),
            }
        }
        (set, unknown)
    }

    /// Names of the capabilities in this set, in declaration order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        NAMED.iter().filter(|(_, flag)| self.contains(*flag)).map(|(name, _)| *name).collect()
    }
}

impl Serialize for Capabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        let (set, unknown) = Self::from_names(names.iter().map(String::as_str));
        if let Some(name) = unknown.first() {
            return Err(D::Error::custom(format!("unknown capability `{name}`")));
        }
        Ok(set)
    }
}
