use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid images root '{value}': {reason}")]
    InvalidImagesRoot { value: String, reason: String },

    #[error("failed to parse rule set: {0}")]
    RulesParse(#[from] toml::de::Error),

    #[error("invalid rule set: {message}")]
    InvalidRules { message: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
