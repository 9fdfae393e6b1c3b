use serde_json::json;
use trellis_domain::Map;
use trellis_domain::constants::ADDON;
use trellis_kernel::Constructor;

/// Constructor reference of the login addon.
pub const CONSTRUCTOR: &str = "login_addon";

/// Name the addon is declared under at the site.
pub const NAME: &str = "login";

/// Builds the `login` addon: one routable view and the two forms it serves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginAddon;

impl Constructor for LoginAddon {
    fn feature_type(&self) -> &str {
        ADDON
    }

    fn defaults(&self) -> Map {
        let defaults = json!({
            "views": [{
                "name": "login",
                "url": "login",
                "callbacks": { "GET": "show_views", "POST": "process_submission" }
            }],
            "forms": {
                "login": {
                    "title": "Login",
                    "fields": [
                        { "name": "username", "type": "text", "validation": ["required"] },
                        { "name": "password", "type": "password", "validation": ["required"] }
                    ]
                },
                "register": {
                    "title": "Register",
                    "fields": [
                        { "name": "givenName", "type": "text", "validation": ["required"] },
                        { "name": "familyName", "type": "text", "validation": ["required"] }
                    ]
                }
            }
        });
        match defaults {
            serde_json::Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}
