use serde_json::json;
use std::sync::Arc;
use trellis_kernel::prelude::*;

fn map(value: Value) -> Map {
    serde_json::from_value(value).expect("object literal")
}

fn booted() -> (Engine, FeatureRef) {
    let engine = Engine::new();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site boots");
    (engine, site)
}

#[test]
fn every_builtin_type_activates_with_its_capabilities() {
    let (engine, site) = booted();

    for ty in ["app", "addon", "view", "form"] {
        engine.register(&site, ty, map(json!({ "name": "x" }))).expect("register");
        let feature = engine.activate(&site, ty, "x", Map::new()).expect("activate").expect("live");

        let descriptor = engine.catalog().require(ty).expect("descriptor");
        assert_eq!(feature.feature_type(), ty);
        assert!(feature.capabilities().contains(descriptor.capabilities));
        assert!(feature.is_activated());
    }
}

#[test]
fn scenario_root_shop_home() {
    let (engine, site) = booted();
    engine
        .register(
            &site,
            "app",
            map(json!({ "name": "shop", "url": "shop", "views": [{ "name": "home", "url": "home" }] })),
        )
        .expect("register shop");

    let shop = engine.activate(&site, "app", "shop", Map::new()).expect("activate").expect("live");
    let home = shop.child("views", "home").expect("home is live in shop's registry");

    assert_eq!(home.url().as_deref(), Some("shop/home"));
    assert!(Arc::ptr_eq(&home.context().expect("context"), &shop));
    assert!(Arc::ptr_eq(&site.child("apps", "shop").expect("shop stored"), &shop));
}

#[test]
fn activating_a_live_feature_twice_returns_the_same_instance() {
    let (engine, site) = booted();
    engine.register(&site, "app", map(json!({ "name": "shop" }))).expect("register");

    let first = engine.activate(&site, "app", "shop", Map::new()).expect("first").expect("live");
    let again = engine.activate(&site, "app", &first, Map::new()).expect("again").expect("live");
    let by_name = engine.activate(&site, "app", "shop", Map::new()).expect("name").expect("live");

    assert!(Arc::ptr_eq(&first, &again));
    assert!(Arc::ptr_eq(&first, &by_name));
    assert_eq!(site.children().names("apps"), ["shop"]);
}

#[test]
fn unknown_names_are_a_silent_no_op() {
    let (engine, site) = booted();
    let nothing = engine.activate(&site, "view", "ghost", Map::new()).expect("not an error");
    assert!(nothing.is_none());
    assert_eq!(site.children().buckets(), ["views"]);
}

#[test]
fn unknown_types_and_missing_names_are_errors() {
    let (engine, site) = booted();

    let err = engine.register(&site, "not-a-type", map(json!({ "name": "x" }))).expect_err("type");
    assert!(matches!(err, KernelError::UnknownFeatureType { .. }));

    for ty in ["site", "app", "addon", "view", "form"] {
        let err = engine.register(&site, ty, Map::new()).expect_err("name");
        assert!(matches!(err, KernelError::NameRequired { .. }), "{ty}");
    }

    let err = engine.activate(&site, "view", map(json!({ "url": "x" })), Map::new()).expect_err("name");
    assert_eq!(err.code(), "name-required");
}

#[test]
fn extra_config_is_merged_over_the_declaration() {
    let (engine, site) = booted();
    engine.register(&site, "view", map(json!({ "name": "home", "url": "home", "title": "Home" }))).expect("register");

    let home = engine
        .activate(&site, "view", "home", map(json!({ "title": "Welcome", "name": "ignored" })))
        .expect("activate")
        .expect("live");

    assert_eq!(home.name(), "home");
    assert_eq!(home.get_str("title").as_deref(), Some("Welcome"));
    assert_eq!(home.get_str("url").as_deref(), Some("home"));
    assert_eq!(home.args().expect("args")["title"], "Welcome");
}

#[test]
fn declaration_slots_are_replaced_by_live_features() {
    let (engine, site) = booted();
    engine.register(&site, "form", map(json!({ "name": "login" }))).expect("register");
    assert!(!site.children().lookup("form", "login").expect("slot").is_active());

    engine.activate(&site, "form", "login", Map::new()).expect("activate");
    assert!(site.children().lookup("form", "login").expect("slot").is_active());
    assert_eq!(site.children().len(), 1);
}

#[test]
fn raw_mappings_must_be_objects() {
    let (engine, site) = booted();
    let err = engine.activate(&site, "view", json!(["home"]), Map::new()).expect_err("array");
    assert_eq!(err.code(), "activation-failed");
}

#[test]
fn unknown_or_mismatched_constructors_fail_activation() {
    let (engine, site) = booted();

    let err = engine
        .activate(&site, "view", map(json!({ "name": "v", "_constructor": "nope" })), Map::new())
        .expect_err("unknown constructor");
    assert_eq!(err.code(), "activation-failed");

    let err = engine
        .activate(&site, "view", map(json!({ "name": "v", "_constructor": "form" })), Map::new())
        .expect_err("form constructor for a view");
    assert!(err.to_string().contains("builds a form"));
}

#[test]
fn features_of_another_type_are_rejected() {
    let (engine, site) = booted();
    let form = engine
        .activate(&site, "form", map(json!({ "name": "f" })), Map::new())
        .expect("form")
        .expect("live");

    let err = engine.activate(&site, "view", &form, Map::new()).expect_err("wrong type");
    assert_eq!(err.code(), "activation-failed");
}

#[test]
fn declared_duck_types_are_unioned_and_unknown_names_ignored() {
    let (engine, site) = booted();
    let form = engine
        .activate(
            &site,
            "form",
            map(json!({ "name": "search", "url": "/search/", "_duck_types": ["routable", "flying"] })),
            Map::new(),
        )
        .expect("activate")
        .expect("live");

    assert!(form.has_capability("routable"));
    assert!(!form.has_capability("flying"));
    assert!(!form.has_capability("contextual"));
    assert_eq!(form.url().as_deref(), Some("search"));
    assert!(form.context().is_none());
}

#[test]
fn strict_engines_reject_unknown_capabilities() {
    let engine = Engine::builder()
        .config(EngineConfig { strict_capabilities: true, ..EngineConfig::default() })
        .build();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");

    let err = engine
        .activate(&site, "form", map(json!({ "name": "f", "_duck_types": ["flying"] })), Map::new())
        .expect_err("strict");
    assert!(err.to_string().contains("flying"));
}

#[test]
fn describe_goes_through_the_localizer() {
    let engine = Engine::builder()
        .localizer(MessageTable::new().with("name-required", "Every feature needs a name"))
        .build();

    let err = KernelError::NameRequired { feature_type: "view".into(), context: None };
    assert_eq!(engine.describe(&err), "Every feature needs a name");

    let err = KernelError::from("boom");
    assert_eq!(Engine::new().describe(&err), "Internal kernel error: boom");
}
