use crate::config::toml_config::TomlConfig;
use crate::utils::error::{ResponderError, Result};
use crate::utils::validation::{
    parse_positive_number, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const FALLBACK_KEY: &str = "fallback";

pub const DEFAULT_TEMPLATES: [(&str, &str); 6] = [
    (
        "5",
        "Thanks so much for the 5-star review, {name}! We're excited to serve you again.",
    ),
    (
        "4",
        "Thanks for the great review, {name}! Let us know if there's anything we can do to earn that 5th star.",
    ),
    (
        "3",
        "Thanks for the feedback, {name}. We're always working to improve and would love to learn more.",
    ),
    (
        "2",
        "Thanks for sharing, {name}. We're sorry to hear we missed the mark and would like to make it right.",
    ),
    (
        "1",
        "Thanks for letting us know, {name}. We want to make this right—please contact us so we can help.",
    ),
    (FALLBACK_KEY, "Thanks for your feedback, {name}! We appreciate you."),
];

pub const DEFAULT_DATABASE_PATH: &str = "review_state.sqlite3";
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_MAX_REVIEWS_PER_LOCATION: usize = 200;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_API_BASE_URL: &str = "https://mybusiness.googleapis.com/v4";

pub const ENV_ACCOUNT_ID: &str = "GOOGLE_ACCOUNT_ID";
pub const ENV_LOCATION_IDS: &str = "LOCATION_IDS";
pub const ENV_TEMPLATES: &str = "RESPONSE_TEMPLATES";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";
pub const ENV_PAGE_SIZE: &str = "REVIEWS_PAGE_SIZE";
pub const ENV_MAX_REVIEWS: &str = "MAX_REVIEWS_PER_LOCATION";
pub const ENV_LANGUAGE: &str = "DEFAULT_LANGUAGE";
pub const ENV_API_BASE_URL: &str = "REVIEWS_API_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";
pub const ENV_CONFIG_FILE: &str = "REVIEW_RESPONDER_CONFIG";

/// 單次執行的完整設定，載入後不再變動
#[derive(Clone)]
pub struct Settings {
    pub account_id: String,
    pub location_ids: Vec<String>,
    pub response_templates: HashMap<String, String>,
    pub database_path: PathBuf,
    pub reviews_page_size: usize,
    pub max_reviews_per_location: usize,
    pub default_language: String,
    pub api_base_url: String,
    pub access_token: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("account_id", &self.account_id)
            .field("location_ids", &self.location_ids)
            .field("response_templates", &self.response_templates)
            .field("database_path", &self.database_path)
            .field("reviews_page_size", &self.reviews_page_size)
            .field("max_reviews_per_location", &self.max_reviews_per_location)
            .field("default_language", &self.default_language)
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub fn default_templates() -> HashMap<String, String> {
    DEFAULT_TEMPLATES
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Parses `key=value|key=value` overrides. Entries without `=` are skipped.
pub fn parse_template_overrides(raw: &str) -> HashMap<String, String> {
    raw.split('|')
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

pub fn parse_location_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// 讀取 `.env` 檔（預設為工作目錄的 `.env`），不修改行程環境。
/// 檔案不存在時回傳空表；無法解析的行會記錄警告後略過。
pub fn read_dotenv(path: Option<&Path>) -> HashMap<String, String> {
    let iter = match path {
        Some(path) => dotenvy::from_path_iter(path),
        None => dotenvy::dotenv_iter(),
    };

    let iter = match iter {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return HashMap::new(),
        Err(e) => {
            tracing::warn!("⚠️ Could not read .env file: {}", e);
            return HashMap::new();
        }
    };

    iter.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::warn!("⚠️ Skipping malformed .env line: {}", e);
            None
        }
    })
    .collect()
}

impl Settings {
    /// 從行程環境載入，`.env` 補上未設定的變數；
    /// 若設定了 REVIEW_RESPONDER_CONFIG 則先讀取該 TOML 檔
    pub fn load() -> Result<Self> {
        let dotenv = read_dotenv(None);
        if !dotenv.is_empty() {
            tracing::debug!("Loaded {} variable(s) from .env", dotenv.len());
        }
        let env = |key: &str| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned());

        let file = match non_blank(env(ENV_CONFIG_FILE)) {
            Some(path) => {
                tracing::debug!("Loading settings file: {}", path);
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };

        Self::from_sources(env, file.as_ref())
    }

    /// 依序合併：環境變數 > 設定檔 > 內建預設值
    pub fn from_sources<F>(env: F, file: Option<&TomlConfig>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_value = |pick: fn(&TomlConfig) -> Option<&String>| {
            file.and_then(pick).cloned()
        };
        let lookup = |key: &str, pick: fn(&TomlConfig) -> Option<&String>| {
            non_blank(env(key)).or_else(|| non_blank(file_value(pick)))
        };

        let account_id = lookup(ENV_ACCOUNT_ID, |f| f.account_id.as_ref())
            .map(|id| id.trim().to_string())
            .ok_or_else(|| ResponderError::missing(ENV_ACCOUNT_ID))?;

        let location_ids = match non_blank(env(ENV_LOCATION_IDS)) {
            Some(raw) => parse_location_ids(&raw),
            None => file
                .and_then(|f| f.location_ids.as_ref())
                .map(|list| list.to_ids())
                .unwrap_or_default(),
        };
        if location_ids.is_empty() {
            return Err(ResponderError::invalid(
                ENV_LOCATION_IDS,
                env(ENV_LOCATION_IDS).unwrap_or_default(),
                "At least one location id is required",
            ));
        }

        let mut response_templates = default_templates();
        if let Some(templates) = file.and_then(|f| f.templates.as_ref()) {
            response_templates.extend(
                templates
                    .iter()
                    .map(|(key, value)| (key.trim().to_string(), value.clone())),
            );
        }
        if let Some(raw) = non_blank(env(ENV_TEMPLATES)) {
            response_templates.extend(parse_template_overrides(&raw));
        }

        let database_path = lookup(ENV_DATABASE_PATH, |f| f.database_path.as_ref())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let reviews_page_size = match non_blank(env(ENV_PAGE_SIZE)) {
            Some(raw) => parse_positive_number(ENV_PAGE_SIZE, &raw)?,
            None => file.and_then(|f| f.page_size).unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let max_reviews_per_location = match non_blank(env(ENV_MAX_REVIEWS)) {
            Some(raw) => parse_positive_number(ENV_MAX_REVIEWS, &raw)?,
            None => file
                .and_then(|f| f.max_reviews_per_location)
                .unwrap_or(DEFAULT_MAX_REVIEWS_PER_LOCATION),
        };

        let default_language = lookup(ENV_LANGUAGE, |f| f.default_language.as_ref())
            .map(|lang| lang.trim().to_string())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let api_base_url = lookup(ENV_API_BASE_URL, |f| f.api_base_url.as_ref())
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let access_token = lookup(ENV_ACCESS_TOKEN, |f| f.access_token.as_ref())
            .map(|token| token.trim().to_string());

        let settings = Self {
            account_id,
            location_ids,
            response_templates,
            database_path: PathBuf::from(database_path),
            reviews_page_size,
            max_reviews_per_location,
            default_language,
            api_base_url,
            access_token,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string(ENV_ACCOUNT_ID, &self.account_id)?;
        if self.location_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(ResponderError::missing(ENV_LOCATION_IDS));
        }
        validate_path(ENV_DATABASE_PATH, &self.database_path.to_string_lossy())?;
        validate_positive_number(ENV_PAGE_SIZE, self.reviews_page_size, 1)?;
        validate_positive_number(ENV_MAX_REVIEWS, self.max_reviews_per_location, 1)?;
        validate_non_empty_string(ENV_LANGUAGE, &self.default_language)?;
        validate_url(ENV_API_BASE_URL, &self.api_base_url)?;
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
