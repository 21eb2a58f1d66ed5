//! 为按序号命名的资源生成 `Link: <url>; rel=preload` 推送提示

mod builder;
mod headers;
mod hint;
mod path;

pub use builder::{build_push_header, PushHintBuilder};
pub use headers::apply_push_header;
pub use hint::PushHint;
pub use path::{decompose_path, RequestPath};
