use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),
}
