use std::fmt;

/// 请求 HTTP/2 服务器推送的有序资源列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushHint {
    urls: Vec<String>,
}

impl PushHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            urls: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, url: String) {
        self.urls.push(url);
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// `Link` 头的值：以 `, ` 连接的 `<url>; rel=preload`
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PushHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, url) in self.urls.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "<{}>; rel=preload", url)?;
        }
        Ok(())
    }
}
