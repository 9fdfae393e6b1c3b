use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use trellis_kernel::prelude::*;

fn map(value: Value) -> Map {
    serde_json::from_value(value).expect("object literal")
}

#[test]
fn hooks_run_in_registration_order_and_see_earlier_mutations() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let engine = Engine::builder()
        .hook("stamp", |feature: FeatureRef| {
            feature.set("stamp", 1);
            Ok(feature)
        })
        .hook("record", move |feature: FeatureRef| {
            log.lock().push((feature.name().to_owned(), feature.get("stamp")));
            Ok(feature)
        })
        .build();

    engine
        .boot_site(map(json!({ "name": "root", "views": [{ "name": "home" }] })))
        .expect("site");

    let seen = seen.lock();
    assert_eq!(
        *seen,
        [("home".to_owned(), Some(json!(1))), ("root".to_owned(), Some(json!(1)))]
    );
}

#[test]
fn hook_results_replace_the_stored_feature() {
    let engine = Engine::new();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");
    let shop = engine
        .activate(&site, "app", map(json!({ "name": "shop", "url": "shop" })), Map::new())
        .expect("shop")
        .expect("live");

    let replacement = engine
        .construct("view", map(json!({ "name": "home", "url": "/welcome/", "_activated": true })), None)
        .expect("construct");
    assert!(!replacement.is_activated());
    let swap = Arc::clone(&replacement);
    engine.add_hook("swap", move |feature: FeatureRef| {
        Ok(if feature.name() == "home" { Arc::clone(&swap) } else { feature })
    });

    let stored = engine
        .activate(&shop, "view", map(json!({ "name": "home", "url": "home" })), Map::new())
        .expect("activate")
        .expect("live");

    assert!(Arc::ptr_eq(&stored, &replacement));
    assert!(Arc::ptr_eq(&shop.child("views", "home").expect("stored"), &replacement));

    assert!(stored.is_activated());
    assert!(stored.capabilities().contains(Capabilities::ROUTABLE | Capabilities::CONTEXTUAL));
    assert!(Arc::ptr_eq(&stored.context().expect("context"), &shop));
    assert_eq!(stored.url().as_deref(), Some("shop/welcome"));
}

#[test]
fn failing_hooks_fail_activation_with_context() {
    let engine = Engine::new();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");
    engine.add_hook("deny-forms", |feature: FeatureRef| {
        if feature.feature_type() == "form" {
            Err(KernelError::from("forms are disabled"))
        } else {
            Ok(feature)
        }
    });

    let err = engine
        .activate(&site, "form", map(json!({ "name": "login" })), Map::new())
        .expect_err("hook refuses");
    assert_eq!(err.to_string(), "Internal kernel error (hook `deny-forms`): forms are disabled");

    assert!(engine.activate(&site, "view", map(json!({ "name": "v" })), Map::new()).is_ok());
}

#[test]
fn hooks_cannot_change_the_feature_type() {
    let engine = Engine::new();
    let site = engine.boot_site(map(json!({ "name": "root" }))).expect("site");
    let form = engine
        .activate(&site, "form", map(json!({ "name": "f" })), Map::new())
        .expect("form")
        .expect("live");

    engine.add_hook("wrong", move |_feature: FeatureRef| Ok(Arc::clone(&form)));
    let err = engine
        .activate(&site, "view", map(json!({ "name": "v" })), Map::new())
        .expect_err("type changed");
    assert_eq!(err.code(), "activation-failed");
}
