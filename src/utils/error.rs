use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// 請求無法送出或沒有收到回應
    #[error("Network error: {message}")]
    Transport { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response body: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Parse {
                message: err.to_string(),
            }
        } else {
            SearchError::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl SearchError {
    /// 顯示在結果區塊的訊息
    pub fn display_message(&self) -> String {
        match self {
            SearchError::Transport { message } => message.clone(),
            SearchError::Server { message, .. } => message.clone(),
            SearchError::Parse { message } => format!("Invalid response from server: {}", message),
            SearchError::ValidationError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SearchError::Transport { .. } => {
                format!("Could not reach the therapist directory: {}", self.display_message())
            }
            SearchError::Server { .. } | SearchError::Parse { .. } => {
                format!("Search failed: {}", self.display_message())
            }
            SearchError::ValidationError { message } => format!("Invalid search input: {}", message),
            SearchError::ConfigError { .. } | SearchError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
            SearchError::IoError(e) => format!("File operation failed: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SearchError::Transport { .. } => "檢查 API base URL 是否正確以及服務是否已啟動",
            SearchError::Server { status: 401, .. } | SearchError::Server { status: 403, .. } => {
                "檢查 API key 設定"
            }
            SearchError::Server { .. } => "調整搜尋條件後重試，或聯絡服務管理員",
            SearchError::Parse { .. } => "確認 API base URL 指向 therapist directory 服務",
            SearchError::ValidationError { .. } => "experience 必須是非負整數",
            SearchError::ConfigError { .. } | SearchError::InvalidConfigValueError { .. } => {
                "檢查設定檔與命令列參數"
            }
            SearchError::IoError(_) => "檢查輸出路徑與檔案權限",
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
