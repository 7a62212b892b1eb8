use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::{
    view::DEFAULT_ITEMS_PER_PAGE, ClientConfig, DateParamStyle, DEFAULT_LOCALE,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_TIMETABLE_URL,
};
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "flight_board.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub locale: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
    pub date_params: DateParamStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_TIMETABLE_URL.into(),
            locale: DEFAULT_LOCALE.into(),
            page_size: DEFAULT_ITEMS_PER_PAGE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            date_params: DateParamStyle::default(),
        }
    }
}

impl Settings {
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let base_url = Url::parse(self.api_url.trim())
            .with_context(|| format!("invalid timetable api url '{}'", self.api_url))?;
        Ok(ClientConfig {
            base_url,
            locale: self.locale.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            date_params: self.date_params,
        })
    }
}

/// Defaults, then the optional config file, then the environment.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!("ignoring unreadable flight board config file: {err}");
            return;
        }
    };

    let value = |key: &str| {
        file_cfg.get(key).map(|v| match v {
            toml::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    };

    if let Some(v) = value("api_url") {
        settings.api_url = v;
    }
    if let Some(v) = value("locale") {
        settings.locale = v;
    }
    if let Some(v) = value("page_size") {
        set_page_size(settings, &v);
    }
    if let Some(v) = value("request_timeout_secs") {
        set_timeout(settings, &v);
    }
    if let Some(v) = value("date_params") {
        set_date_params(settings, &v);
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("FLIGHT_BOARD_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = lookup("APP__LOCALE") {
        settings.locale = v;
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        set_page_size(settings, &v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        set_timeout(settings, &v);
    }

    if let Some(v) = lookup("APP__DATE_PARAMS") {
        set_date_params(settings, &v);
    }
}

fn set_page_size(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => settings.page_size = parsed,
        _ => warn!(value = raw, "ignoring invalid page_size"),
    }
}

fn set_timeout(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
        _ => warn!(value = raw, "ignoring invalid request_timeout_secs"),
    }
}

fn set_date_params(settings: &mut Settings, raw: &str) {
    match DateParamStyle::parse(raw) {
        Some(style) => settings.date_params = style,
        None => warn!(value = raw, "ignoring unknown date_params style"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_timetable() {
        let settings = Settings::default();

        assert_eq!(settings.api_url, "https://www.svo.aero/bitrix/timetable/");
        assert_eq!(settings.locale, "ru");
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.date_params, DateParamStyle::StartEnd);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut settings = Settings::default();

        apply_file_overrides(
            &mut settings,
            r#"
api_url = "http://127.0.0.1:9000/timetable/"
page_size = 10
request_timeout_secs = "30"
date_params = "from_to"
"#,
        );

        assert_eq!(settings.api_url, "http://127.0.0.1:9000/timetable/");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.date_params, DateParamStyle::FromTo);
        assert_eq!(settings.locale, "ru");
    }

    #[test]
    fn unreadable_file_keeps_defaults() {
        let mut settings = Settings::default();

        apply_file_overrides(&mut settings, "this is = = not toml");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn app_prefixed_env_wins_over_legacy_name() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = [
            ("FLIGHT_BOARD_API_URL", "http://legacy/"),
            ("APP__API_URL", "http://preferred/"),
            ("APP__LOCALE", "en"),
            ("APP__PAGE_SIZE", "0"),
            ("APP__DATE_PARAMS", "sideways"),
        ]
        .into_iter()
        .collect();

        apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.api_url, "http://preferred/");
        assert_eq!(settings.locale, "en");
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.date_params, DateParamStyle::StartEnd);
    }

    #[test]
    fn client_config_rejects_invalid_urls() {
        let settings = Settings {
            api_url: "not a url".to_string(),
            ..Settings::default()
        };

        assert!(settings.client_config().is_err());

        let config = Settings::default().client_config().expect("default url parses");
        assert_eq!(config.base_url.host_str(), Some("www.svo.aero"));
        assert_eq!(config.timeout, Duration::from_secs(15));
    }
}
