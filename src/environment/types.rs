use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub const DEFAULT_CONTAINER: &str = "iCloud.com.aleksandermaj.podlej-test";
pub const DEFAULT_BASE_URL: &str = "https://api.apple-cloudkit.com";

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CloudKitEnvironment {
    #[default]
    Development,
    Production,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Settings {
    /// The CloudKit container that holds the plant records
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default)]
    pub environment: CloudKitEnvironment,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub web_auth_token: Option<String>,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container: default_container(),
            environment: CloudKitEnvironment::default(),
            base_url: default_base_url(),
            api_token: None,
            web_auth_token: None,
        }
    }
}

impl Settings {
    /// Apply `PODLEJ_*` overrides. `lookup` is `std::env::var` outside of
    /// tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(container) = lookup("PODLEJ_CONTAINER") {
            self.container = container;
        }
        if let Some(environment) = lookup("PODLEJ_ENVIRONMENT") {
            match environment.parse() {
                Ok(e) => self.environment = e,
                Err(_) => log::warn!("Ignoring unknown CloudKit environment {environment:?}"),
            }
        }
        if let Some(base_url) = lookup("PODLEJ_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(token) = lookup("PODLEJ_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(token) = lookup("PODLEJ_WEB_AUTH_TOKEN") {
            self.web_auth_token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn overrides_replace_only_what_is_set() {
        let vars: HashMap<&str, &str> = [
            ("PODLEJ_ENVIRONMENT", "production"),
            ("PODLEJ_API_TOKEN", "token"),
        ]
        .into_iter()
        .collect();
        let mut settings = Settings::default();
        settings.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.environment, CloudKitEnvironment::Production);
        assert_eq!(settings.api_token.as_deref(), Some("token"));
        assert_eq!(settings.container, DEFAULT_CONTAINER);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn unknown_environments_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_overrides(|key| (key == "PODLEJ_ENVIRONMENT").then(|| "staging".to_string()));
        assert_eq!(settings.environment, CloudKitEnvironment::Development);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "container": "iCloud.other", "environment": "production" }"#)
                .unwrap();
        assert_eq!(settings.container, "iCloud.other");
        assert_eq!(settings.environment, CloudKitEnvironment::Production);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.environment.to_string(), "production");
    }
}
