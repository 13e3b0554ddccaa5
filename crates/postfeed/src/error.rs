#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Coordinator is no longer running")]
    CoordinatorClosed,

    #[error("Invalid configuration: {0}")]
    Config(String),
}
