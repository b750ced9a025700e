use crate::utils::error::{ResponderError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

/// 選用的 TOML 設定檔，所有欄位皆可被環境變數覆蓋
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub account_id: Option<String>,
    pub location_ids: Option<LocationList>,
    pub templates: Option<HashMap<String, String>>,
    pub database_path: Option<String>,
    pub page_size: Option<usize>,
    pub max_reviews_per_location: Option<usize>,
    pub default_language: Option<String>,
    pub api_base_url: Option<String>,
    pub access_token: Option<String>,
}

/// `location_ids = ["a", "b"]` 或 `location_ids = "a,b"`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationList {
    List(Vec<String>),
    Csv(String),
}

impl LocationList {
    pub fn to_ids(&self) -> Vec<String> {
        match self {
            LocationList::List(ids) => ids
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            LocationList::Csv(raw) => crate::config::settings::parse_location_ids(raw),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_display = path.as_ref().display().to_string();
        let content =
            std::fs::read_to_string(&path).map_err(|e| ResponderError::ConfigFile {
                path: path_display.clone(),
                message: e.to_string(),
            })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ResponderError::ConfigFile { message, .. } => ResponderError::ConfigFile {
                path: path_display,
                message,
            },
            other => other,
        })
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResponderError::ConfigFile {
            path: "<inline>".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_ACCESS_TOKEN})，未設定者保留原文
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}
