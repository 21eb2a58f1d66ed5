use std::collections::BTreeMap;

use crate::config::PushConfig;
use crate::error::{ConfigError, PushError};

use super::hint::PushHint;
use super::path::{decompose_path, RequestPath};

/// 为请求资源之后的连续资源生成 `Link` 预加载提示
///
/// 构造后无状态，可通过 `Arc` 在请求之间共享。
#[derive(Debug, Clone)]
pub struct PushHintBuilder {
    push_ahead: u32,
    passthrough_extensions: Vec<String>,
    aliases: BTreeMap<String, u64>,
}

impl PushHintBuilder {
    pub fn new(config: PushConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            push_ahead: config.push_ahead,
            passthrough_extensions: config
                .passthrough_extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
            aliases: config.aliases,
        })
    }

    /// 生成 `path` 之后 `push_ahead` 个资源的推送提示
    pub fn build(&self, path: &str) -> Result<PushHint, PushError> {
        if self.push_ahead == 0 {
            return Err(PushError::NothingToPush);
        }

        let request = decompose_path(path);
        if self.is_passthrough(&request) {
            return Err(PushError::NothingToPush);
        }

        let current = self
            .sequence_number(request.resource_name())
            .ok_or_else(|| PushError::NotSequenceable {
                resource: request.resource_name().to_string(),
            })?;

        // 最后一个要推送的序号必须可表示
        if current.checked_add(u64::from(self.push_ahead)).is_none() {
            return Err(PushError::NotSequenceable {
                resource: request.resource_name().to_string(),
            });
        }

        let mut hint = PushHint::with_capacity(self.push_ahead as usize);
        for i in 1..=u64::from(self.push_ahead) {
            hint.push(request.sibling(current + i));
        }

        if hint.is_empty() {
            return Err(PushError::NothingToPush);
        }
        Ok(hint)
    }

    /// `path` 对应的 `Link` 头的值，不需要推送时返回 `None`
    pub fn header_value(&self, path: &str) -> Option<String> {
        self.build(path).ok().map(|hint| hint.header_value())
    }

    fn is_passthrough(&self, request: &RequestPath) -> bool {
        let ext = request.extension();
        !ext.is_empty()
            && self
                .passthrough_extensions
                .iter()
                .any(|p| p.eq_ignore_ascii_case(ext))
    }

    fn sequence_number(&self, name: &str) -> Option<u64> {
        if let Some(number) = self.aliases.get(name) {
            return Some(*number);
        }
        // 只接受纯数字，`+5`、`-1`、` 5` 都不算序号
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        name.parse().ok()
    }
}

/// 使用默认配置、推送 `k` 个资源的一次性版本
///
/// `k` 超过 [`MAX_PUSH_AHEAD`](crate::config::MAX_PUSH_AHEAD) 属于配置错误，返回 `Err`；`Ok(None)` 表示不设置头。
pub fn build_push_header(path: &str, k: u32) -> Result<Option<String>, ConfigError> {
    let config = PushConfig::default().with_push_ahead(k);
    Ok(PushHintBuilder::new(config)?.header_value(path))
}
