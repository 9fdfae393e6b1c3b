use crate::feature::Feature;
use crate::registry::Slot;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use trellis_domain::Capabilities;

/// Serializable picture of a feature subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub name: String,
    pub feature_type: String,
    pub capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Live children, per plural key.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, Vec<FeatureSnapshot>>,
    /// Names that are declared but not activated, per plural key.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub declared: IndexMap<String, Vec<String>>,
}

impl FeatureSnapshot {
    /// Number of live features in the subtree, this one included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.values().flatten().map(Self::count).sum::<usize>()
    }
}

impl Feature {
    #[must_use]
    pub fn snapshot(&self) -> FeatureSnapshot {
        let mut children: IndexMap<String, Vec<FeatureSnapshot>> = IndexMap::new();
        let mut declared: IndexMap<String, Vec<String>> = IndexMap::new();

        for plural in self.children().buckets() {
            for (name, slot) in self.children().slots(&plural) {
                match slot {
                    Slot::Active(child) => {
                        children.entry(plural.clone()).or_default().push(child.snapshot());
                    },
                    Slot::Declaration(_) => declared.entry(plural.clone()).or_default().push(name),
                }
            }
        }

        FeatureSnapshot {
            name: self.name().to_owned(),
            feature_type: self.feature_type().to_owned(),
            capabilities: self.capabilities(),
            url: self.url(),
            children,
            declared,
        }
    }
}
