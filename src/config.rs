use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 每个请求最多推送的资源数
pub const MAX_PUSH_AHEAD: u32 = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub root_dir: PathBuf,
}

/// 推送提示配置，构造 `PushHintBuilder` 时传入
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// 请求资源之后推送的资源数
    pub push_ahead: u32,
    /// 不参与推送的清单类扩展名，包含 `.`，不区分大小写
    pub passthrough_extensions: Vec<String>,
    /// 非数字资源名对应的序号，例如 `init = 0`
    pub aliases: BTreeMap<String, u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            root_dir: "./segments".into(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            push_ahead: 3,
            passthrough_extensions: vec![".mpd".to_string(), ".m3u8".to_string()],
            aliases: BTreeMap::new(),
        }
    }
}

impl PushConfig {
    pub fn with_push_ahead(mut self, push_ahead: u32) -> Self {
        self.push_ahead = push_ahead;
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>, number: u64) -> Self {
        self.aliases.insert(name.into(), number);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.push_ahead > MAX_PUSH_AHEAD {
            return Err(ConfigError::Invalid(format!(
                "push_ahead must be at most {}, got {}",
                MAX_PUSH_AHEAD, self.push_ahead
            )));
        }
        for ext in &self.passthrough_extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(ConfigError::Invalid(format!(
                    "passthrough extension must look like \".ext\", got {:?}",
                    ext
                )));
            }
        }
        for (name, number) in &self.aliases {
            if name.is_empty() {
                return Err(ConfigError::Invalid("alias name must not be empty".into()));
            }
            // n + k 必须在配置阶段就保证不溢出
            if number.checked_add(u64::from(self.push_ahead)).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "alias {} = {} overflows when pushing {} resources ahead",
                    name, number, self.push_ahead
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // 首先尝试从环境变量加载
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        // 否则使用默认配置
        Ok(Self::default())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }
        self.push.validate()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            push: PushConfig::default(),
        }
    }
}
