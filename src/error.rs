use thiserror::Error;

/// 无法生成推送提示的原因。两种情况都不是致命错误，调用方只需不设置 `Link` 头。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    #[error("{resource} cannot be converted to a sequence number, nothing will be pushed")]
    NotSequenceable { resource: String },
    #[error("nothing to push")]
    NothingToPush,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden path: {0}")]
    Forbidden(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Plugin error: {0}")]
    Plugin(String),
}
