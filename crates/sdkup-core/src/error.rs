use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkupError {
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, SdkupError>;
