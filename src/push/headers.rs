use hyper::header::{HeaderMap, HeaderValue, LINK};
use tracing::{debug, warn};

use crate::error::PushError;

use super::builder::PushHintBuilder;

/// 将 `path` 的推送提示写入 `headers`，覆盖已有的 `Link`，返回是否写入
///
/// 无法转换为序号的资源名记录一次 `warn` 日志，其余不推送的情况只记录 `debug`。
pub fn apply_push_header(headers: &mut HeaderMap, builder: &PushHintBuilder, path: &str) -> bool {
    let hint = match builder.build(path) {
        Ok(hint) => hint,
        Err(PushError::NotSequenceable { resource }) => {
            warn!(
                resource = %resource,
                "Resource name cannot be converted to a sequence number, nothing will be pushed"
            );
            return false;
        }
        Err(PushError::NothingToPush) => {
            debug!(path = %path, "No push hint for request");
            return false;
        }
    };

    match HeaderValue::from_str(&hint.header_value()) {
        Ok(value) => {
            debug!(path = %path, resources = hint.len(), "Adding push hint");
            headers.insert(LINK, value);
            true
        }
        Err(e) => {
            warn!(path = %path, "Push hint is not a valid header value: {}", e);
            false
        }
    }
}
