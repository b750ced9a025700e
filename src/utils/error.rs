use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Settings file {path} could not be loaded: {message}")]
    ConfigFile { path: String, message: String },

    #[error("Failed to fetch reviews for location {location_id}: {message}")]
    Fetch {
        location_id: String,
        message: String,
    },

    #[error("Failed to send reply to {review_name}: {message}")]
    Send {
        review_name: String,
        message: String,
    },

    #[error("Template {template:?} could not be rendered: {reason}")]
    TemplateRender { template: String, reason: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Template,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 遠端暫時性錯誤，下次執行可能成功
    Medium,
    /// 單筆資料處理失敗
    High,
    /// 設定或儲存層錯誤，必須由操作人員處理
    Critical,
}

impl ResponderError {
    pub fn missing(field: &str) -> Self {
        Self::MissingConfig {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. }
            | Self::ConfigFile { .. } => ErrorCategory::Configuration,
            Self::Fetch { .. } | Self::Send { .. } => ErrorCategory::Network,
            Self::TemplateRender { .. } => ErrorCategory::Template,
            Self::Ledger(_) | Self::Io(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 程序結束碼，依嚴重程度決定
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfig { field } => format!("{} is required", field),
            Self::InvalidConfigValue { field, reason, .. } => {
                format!("{} is invalid: {}", field, reason)
            }
            Self::ConfigFile { path, .. } => format!("Could not read settings file {}", path),
            Self::Fetch { location_id, .. } => {
                format!("Could not list reviews for location {}", location_id)
            }
            Self::Send { review_name, .. } => format!("Could not post reply to {}", review_name),
            Self::TemplateRender { reason, .. } => format!("Reply template is broken: {}", reason),
            Self::Ledger(_) => "The review ledger could not be read or written".to_string(),
            Self::Io(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfig { .. } | Self::InvalidConfigValue { .. } => {
                "Check the environment variables (GOOGLE_ACCOUNT_ID, LOCATION_IDS, ...)"
            }
            Self::ConfigFile { .. } => "Check REVIEW_RESPONDER_CONFIG and the TOML syntax of the file",
            Self::Fetch { .. } => "Check the access token, quota and location ids, then run again",
            Self::Send { .. } => {
                "Run again later; replies sent before the failure were not recorded and may be re-sent"
            }
            Self::TemplateRender { .. } => {
                "Only the {name} placeholder is supported; escape literal braces as {{ and }}"
            }
            Self::Ledger(_) | Self::Io(_) => "Check DATABASE_PATH points to a writable location",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResponderError>;
