use serde_json::json;
use trellis_kernel::Engine;
use trellis_login::{LoginError, init};

#[test]
fn init_needs_a_site() {
    let err = init(&Engine::new()).expect_err("no site yet");
    assert!(matches!(err, LoginError::MissingSite { .. }));
}

#[test]
fn init_builds_the_login_tree() {
    let engine = Engine::new();
    let site = engine
        .boot_site(serde_json::from_value(json!({ "name": "root" })).expect("map"))
        .expect("site");

    let addon = init(&engine).expect("init should succeed");
    assert_eq!(addon.constructor_name(), "login_addon");
    assert!(std::sync::Arc::ptr_eq(&site.find("addons/login").expect("stored"), &addon));

    let view = addon.find("views/login").expect("login view");
    assert_eq!(view.url().as_deref(), Some("login"));
    assert_eq!(view.get("callbacks").expect("callbacks")["POST"], "process_submission");

    assert_eq!(addon.children().names("forms"), ["login", "register"]);
    let register = addon.find("forms/register").expect("register form");
    assert_eq!(register.get_str("title").as_deref(), Some("Register"));
    assert!(register.url().is_none());
}

#[test]
fn the_addon_has_no_segment_so_its_view_is_not_prefixed() {
    let engine = Engine::new();
    engine
        .boot_site(serde_json::from_value(json!({ "name": "root", "url": "portal" })).expect("map"))
        .expect("site");

    let addon = init(&engine).expect("init");
    assert!(addon.url().is_none());
    assert_eq!(addon.find("views/login").and_then(|v| v.url()).as_deref(), Some("login"));
}
