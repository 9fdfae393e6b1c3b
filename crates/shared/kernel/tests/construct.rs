use serde_json::json;
use std::sync::Arc;
use trellis_kernel::prelude::*;

fn map(value: Value) -> Map {
    serde_json::from_value(value).expect("object literal")
}

#[derive(Debug)]
struct Greeter;

impl Constructor for Greeter {
    fn feature_type(&self) -> &str {
        "view"
    }

    fn defaults(&self) -> Map {
        map(json!({ "url": "hello", "greeting": "hi" }))
    }

    fn initialize(&self, feature: &Feature) -> Result<(), KernelError> {
        let greeting = feature.get_str("greeting").unwrap_or_default();
        feature.set("banner", format!("{greeting}, {}", feature.name()));
        Ok(())
    }
}

fn engine_with_greeter() -> Engine {
    let engine = Engine::new();
    engine.catalog().register_constructor("greeter", Arc::new(Greeter));
    engine
}

#[test]
fn direct_construction_self_registers_in_its_context() {
    let engine = engine_with_greeter();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");
    let shop = engine
        .activate(&site, "app", map(json!({ "name": "shop", "url": "shop" })), Map::new())
        .expect("shop")
        .expect("live");

    let hello = engine.construct("greeter", map(json!({ "name": "hello" })), Some(&shop)).expect("construct");

    assert!(hello.is_activated());
    assert_eq!(hello.get_str("banner").as_deref(), Some("hi, hello"));
    assert_eq!(hello.url().as_deref(), Some("shop/hello"));
    assert!(Arc::ptr_eq(&shop.child("views", "hello").expect("registered"), &hello));
}

#[test]
fn direct_construction_matches_declared_activation() {
    let engine = engine_with_greeter();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");

    let constructed = engine.construct("greeter", map(json!({ "name": "a" })), None).expect("construct");
    let declared = engine
        .activate(&site, "view", map(json!({ "name": "b", "_constructor": "greeter" })), Map::new())
        .expect("activate")
        .expect("live");

    assert_eq!(constructed.snapshot().url.as_deref(), Some("hello"));
    assert_eq!(declared.snapshot().url, constructed.snapshot().url);
    assert_eq!(declared.capabilities(), constructed.capabilities());
    assert_eq!(declared.constructor_name(), "greeter");
    assert!(site.child("views", "a").is_some());
}

#[test]
fn the_activated_guard_skips_self_registration() {
    let engine = engine_with_greeter();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");

    let quiet = engine
        .construct("greeter", map(json!({ "name": "quiet", "_activated": true })), None)
        .expect("construct");

    assert!(!quiet.is_activated());
    assert!(site.children().lookup("view", "quiet").is_none());

    let live = engine.activate(&site, "view", &quiet, Map::new()).expect("activate").expect("live");
    assert!(Arc::ptr_eq(&live, &quiet));
    assert!(live.is_activated());
}

#[test]
fn existing_entries_are_not_activated_twice() {
    let engine = engine_with_greeter();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");
    engine.register(&site, "view", map(json!({ "name": "taken" }))).expect("declare");

    let taken = engine.construct("greeter", map(json!({ "name": "taken" })), None).expect("construct");
    assert!(!taken.is_activated());
    assert!(!site.children().lookup("view", "taken").expect("slot").is_active());
}

#[test]
fn teardown_releases_the_site() {
    let engine = Engine::new();
    let first = engine.boot_site(map(json!({ "name": "root" }))).expect("first");
    assert!(engine.site().is_some());

    engine.teardown();
    assert!(engine.site().is_none());

    let second = engine.boot_site(map(json!({ "name": "root" }))).expect("second");
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&engine.singleton("site").expect("slot"), &second));
}

#[test]
fn engines_do_not_share_singletons() {
    let a = Engine::new();
    let b = Engine::new();
    a.boot_site(map(json!({ "name": "a" }))).expect("a");
    b.boot_site(map(json!({ "name": "b" }))).expect("b");
    assert_eq!(a.site().expect("a").name(), "a");
    assert_eq!(b.site().expect("b").name(), "b");
}

#[test]
fn constructing_a_site_directly_claims_the_slot() {
    let engine = Engine::new();
    let site = engine
        .construct("site", map(json!({ "name": "root", "views": [{ "name": "home" }] })), None)
        .expect("site");

    assert!(site.is_activated());
    assert!(site.find("views/home").is_some());
    let err = engine.construct("site", map(json!({ "name": "other" })), None).expect_err("second");
    assert_eq!(err.code(), "already-singleton");
}
