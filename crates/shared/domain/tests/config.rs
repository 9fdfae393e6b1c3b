use serde_json::json;
use trellis_domain::Capabilities;
use trellis_domain::config::{EngineConfig, LoggingConfig, TrellisConfig};

#[test]
fn config_defaults_are_sane() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.name, "trellis");
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.path.is_none());
    assert_eq!(logging.rotation, "daily");

    let engine = EngineConfig::default();
    assert_eq!(engine.max_context_depth, 64);
    assert_eq!(engine.max_activation_depth, 32);
    assert!(!engine.strict_capabilities);

    let cfg = TrellisConfig::default();
    assert_eq!(cfg.site.0["name"], json!("site"));
    assert!(cfg.declarations.is_empty());
}

#[test]
fn trellis_config_deserializes() {
    let raw = json!({
        "logging": { "level": "debug", "json": true },
        "engine": { "strict_capabilities": true },
        "site": { "name": "root", "url": "https://example.org" },
        "feature_types": [
            { "type_name": "widget", "plural": "widgets", "supports": ["forms"], "capabilities": ["routable"] }
        ],
        "declarations": [
            { "type": "app", "name": "shop", "url": "shop", "views": [{ "name": "home", "url": "home" }] },
            { "type": "addon", "name": "cart", "activate": false }
        ]
    });

    let cfg: TrellisConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert_eq!(cfg.logging.name, "trellis");
    assert!(cfg.engine.strict_capabilities);
    assert_eq!(cfg.engine.max_context_depth, 64);
    assert_eq!(cfg.site.0["name"], json!("root"));

    let widget = &cfg.feature_types[0];
    assert_eq!(widget.capabilities, Capabilities::ROUTABLE);
    assert_eq!(widget.constructor_name(), "widget");
    assert!(!widget.singleton);

    let shop = &cfg.declarations[0];
    assert_eq!(shop.feature_type, "app");
    assert!(shop.activate);
    assert_eq!(shop.config["name"], json!("shop"));
    assert!(shop.config.get("type").is_none());
    assert!(!cfg.declarations[1].activate);
}

#[test]
fn unknown_capability_names_are_rejected() {
    let raw = json!({
        "feature_types": [{ "type_name": "widget", "plural": "widgets", "capabilities": ["flying"] }]
    });

    let err = serde_json::from_value::<TrellisConfig>(raw).expect_err("unknown capability");
    assert!(err.to_string().contains("flying"));
}
