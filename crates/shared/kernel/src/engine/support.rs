//! Recursive activation of the children a feature declares.

use super::{Engine, Target};
use crate::catalog::DescriptorField;
use crate::error::KernelError;
use crate::feature::FeatureRef;
use std::sync::Arc;
use tracing::{trace, warn};
use trellis_domain::constants::keys;
use trellis_domain::{Map, Value};

/// One child entry under a supported plural key.
#[derive(Debug, Clone, PartialEq)]
enum ChildEntry {
    /// Positional name: activate what is declared under it.
    Reference(String),
    /// Positional mapping: a full declaration.
    Declaration(Map),
    /// `name: value` pair: `value` is the extra configuration.
    Named { name: String, value: Value },
}

impl ChildEntry {
    fn parse(value: Value) -> Vec<Self> {
        match value {
            Value::Array(items) => items.into_iter().filter_map(Self::positional).collect(),
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(key, value)| {
                    if is_positional(&key) {
                        Self::positional(value)
                    } else {
                        Some(Self::Named { name: key, value })
                    }
                })
                .collect(),
            Value::String(name) if !name.is_empty() => vec![Self::Reference(name)],
            _ => Vec::new(),
        }
    }

    fn positional(value: Value) -> Option<Self> {
        match value {
            Value::String(name) if !name.is_empty() => Some(Self::Reference(name)),
            Value::Number(number) => Some(Self::Reference(number.to_string())),
            Value::Object(config) => Some(Self::Declaration(config)),
            _ => None,
        }
    }
}

fn is_positional(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

impl Engine {
    /// Activates the children listed under each plural key the feature's type supports.
    ///
    /// A failing child is logged and skipped; only fatal errors abort the parent.
    pub(super) fn expand_supports(
        &self,
        lineage: &[FeatureRef],
        depth: usize,
        feature: &FeatureRef,
    ) -> Result<(), KernelError> {
        let mut scope = lineage.to_vec();
        scope.push(Arc::clone(feature));

        for plural in &feature.descriptor().supports {
            let Some(value) = feature.get(plural) else {
                continue;
            };
            let Some(child) = self.inner.catalog.by_field(DescriptorField::Plural, plural) else {
                warn!(%plural, parent = feature.name(), "No feature type owns this plural key");
                continue;
            };

            for entry in ChildEntry::parse(value) {
                match self.activate_entry(&scope, depth + 1, &child.type_name, entry) {
                    Ok(_) => {},
                    Err(err) if err.is_fatal() => return Err(err),
                    Err(err) => warn!(
                        parent = feature.name(),
                        %plural,
                        code = err.code(),
                        error = %err,
                        "Skipping child that failed to activate"
                    ),
                }
            }
        }
        Ok(())
    }

    fn activate_entry(
        &self,
        scope: &[FeatureRef],
        depth: usize,
        feature_type: &str,
        entry: ChildEntry,
    ) -> Result<Option<FeatureRef>, KernelError> {
        let Some(parent) = scope.last() else {
            return Ok(None);
        };

        match entry {
            ChildEntry::Reference(name) => {
                self.inherit(scope, feature_type, &name)?;
                self.activate_in(scope, depth, feature_type, Target::Name(name), Map::new())
            },
            ChildEntry::Declaration(config) => {
                let name = parent.children().register(feature_type, config)?;
                self.activate_in(scope, depth, feature_type, Target::Name(name), Map::new())
            },
            ChildEntry::Named { name, value } => {
                if !self.inherit(scope, feature_type, &name)?
                    && let Value::Object(config) = &value
                {
                    let mut declaration = config.clone();
                    declaration.insert(keys::NAME.to_owned(), Value::String(name.clone()));
                    parent.children().register(feature_type, declaration)?;
                }
                let extra = match value {
                    Value::Object(extra) => extra,
                    _ => Map::new(),
                };
                self.activate_in(scope, depth, feature_type, Target::Name(name), extra)
            },
        }
    }

    /// Makes `name` resolvable in the innermost registry of `scope`, copying the
    /// declaration of the nearest ancestor that has one. Returns whether it resolves.
    fn inherit(
        &self,
        scope: &[FeatureRef],
        feature_type: &str,
        name: &str,
    ) -> Result<bool, KernelError> {
        let Some((local, ancestors)) = scope.split_last() else {
            return Ok(false);
        };
        if local.children().is_registered(feature_type, name) {
            return Ok(true);
        }

        for ancestor in ancestors.iter().rev() {
            if let Some(slot) = ancestor.children().lookup(feature_type, name) {
                trace!(%name, from = ancestor.name(), into = local.name(), "Inheriting declaration");
                local.children().register(feature_type, slot.to_declaration().config)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
