use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid selection for product {product_id}: {reason}")]
    InvalidSelection { product_id: ProductId, reason: String },

    #[error("Product {product_id} is locked and cannot be toggled")]
    LockedEntry { product_id: ProductId },

    #[error("Product {product_id} is not part of the current recommendations")]
    UnknownProduct { product_id: ProductId },

    #[error(transparent)]
    CartMutation(#[from] CartMutationFailure),
}

/// 單一購物車寫入失敗的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The cart service answered but refused the item.
    Rejected,
    /// The call itself faulted (transport, decoding, ...).
    Fault(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to add product {product_id} (size {size}) to cart: {}", describe_reason(.reason))]
pub struct CartMutationFailure {
    pub product_id: ProductId,
    pub size: String,
    pub reason: FailureReason,
}

fn describe_reason(reason: &FailureReason) -> String {
    match reason {
        FailureReason::Rejected => "rejected by cart service".to_string(),
        FailureReason::Fault(message) => message.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Selection,
    Cart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WidgetError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WidgetError::ApiError(_) => ErrorCategory::Network,
            WidgetError::IoError(_) | WidgetError::SerializationError(_) => ErrorCategory::Data,
            WidgetError::ConfigError { .. }
            | WidgetError::MissingConfigError { .. }
            | WidgetError::InvalidConfigValueError { .. }
            | WidgetError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            WidgetError::InvalidSelection { .. }
            | WidgetError::LockedEntry { .. }
            | WidgetError::UnknownProduct { .. } => ErrorCategory::Selection,
            WidgetError::CartMutation(_) => ErrorCategory::Cart,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Selection => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Cart => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the shop API is reachable and try again",
            ErrorCategory::Data => "Verify the API response format and local file permissions",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::Selection => "Only select products shown in the recommendations",
            ErrorCategory::Cart => "Check your bag: some items may already have been added",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WidgetError::ApiError(_) => "Could not reach the shop service".to_string(),
            WidgetError::CartMutation(_) => {
                "Could not add every item to your bag. Some items may already be in your bag"
                    .to_string()
            }
            WidgetError::LockedEntry { .. } => {
                "The product you are viewing is always included".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
