//! Plain-text rendering of feature snapshots and catalogs.

use std::io::{self, Write};
use trellis::kernel::prelude::{FeatureSnapshot, FeatureTypeDescriptor};

const INDENT: &str = "  ";

/// Writes one line per feature, children grouped under their plural key.
pub fn tree(out: &mut impl Write, snapshot: &FeatureSnapshot) -> io::Result<()> {
    feature(out, snapshot, 0)
}

fn feature(out: &mut impl Write, snapshot: &FeatureSnapshot, depth: usize) -> io::Result<()> {
    let pad = INDENT.repeat(depth);
    write!(out, "{pad}{} ({})", snapshot.name, snapshot.feature_type)?;
    if let Some(url) = &snapshot.url {
        write!(out, " /{url}")?;
    }
    writeln!(out)?;

    for (plural, children) in &snapshot.children {
        writeln!(out, "{pad}{INDENT}{plural}")?;
        for child in children {
            feature(out, child, depth + 2)?;
        }
    }
    for (plural, names) in &snapshot.declared {
        writeln!(out, "{pad}{INDENT}{plural} (declared): {}", names.join(", "))?;
    }
    Ok(())
}

/// Writes one line per descriptor.
pub fn types(out: &mut impl Write, descriptors: &[impl AsRef<FeatureTypeDescriptor>]) -> io::Result<()> {
    for descriptor in descriptors {
        let descriptor = descriptor.as_ref();
        write!(
            out,
            "{:<10} {:<10} [{}]",
            descriptor.type_name,
            descriptor.plural,
            descriptor.capabilities.names().join(", ")
        )?;
        if descriptor.singleton {
            write!(out, " singleton")?;
        }
        if !descriptor.supports.is_empty() {
            write!(out, " supports: {}", descriptor.supports.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis::kernel::Engine;

    #[test]
    fn tree_lists_live_children_and_declarations() {
        let engine = Engine::new();
        let site = engine
            .boot_site(
                serde_json::from_value(json!({
                    "name": "root",
                    "apps": { "shop": { "url": "shop", "views": [{ "name": "home", "url": "home" }] } }
                }))
                .expect("map"),
            )
            .expect("site");
        let later: trellis::domain::Map =
            serde_json::from_value(json!({ "name": "later" })).expect("map");
        engine.register(&site, "app", later).expect("declared");

        let mut out = Vec::new();
        tree(&mut out, &site.snapshot()).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert_eq!(
            text,
            "root (site)\n  apps\n    shop (app) /shop\n      views\n        home (view) /shop/home\n  apps (declared): later\n"
        );
    }

    #[test]
    fn types_lists_the_builtin_catalog() {
        let engine = Engine::new();
        let mut out = Vec::new();
        types(&mut out, &engine.catalog().descriptors()).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("site"));
        assert!(lines[0].contains("singleton"));
        assert!(lines[4].starts_with("form"));
    }
}
