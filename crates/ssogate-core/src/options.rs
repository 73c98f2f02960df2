use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ME_PATH;

/// Options the host application passes when it registers the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Path of the current-user endpoint, relative to the API base.
    #[serde(default = "default_me_path")]
    pub me: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            me: default_me_path(),
        }
    }
}

fn default_me_path() -> String {
    DEFAULT_ME_PATH.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let options: PluginOptions = serde_yaml::from_str("debug: true\n").expect("parse");
        assert!(options.debug);
        assert_eq!(options.endpoints.me, "me");

        let options: PluginOptions =
            serde_yaml::from_str("endpoints:\n  me: users/current\n").expect("parse");
        assert!(!options.debug);
        assert_eq!(options.endpoints.me, "users/current");
    }
}
