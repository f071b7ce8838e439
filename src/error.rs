pub type ScrollFxResult<T> = Result<T, ScrollFxError>;

#[derive(thiserror::Error, Debug)]
pub enum ScrollFxError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("page error: {0}")]
    Page(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollFxError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn page(msg: impl Into<String>) -> Self {
        Self::Page(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
