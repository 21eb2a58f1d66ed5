/// 拆分后的请求路径
///
/// 输入至少包含一个 `/` 时，`base_url + resource_name + extension` 等于原路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    base_url: String,
    resource_name: String,
    extension: String,
}

impl RequestPath {
    /// 路径前缀，包含末尾的 `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// 扩展名，包含 `.`；没有扩展名时为空
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// 相同前缀和扩展名的同级资源路径
    pub fn sibling(&self, name: impl std::fmt::Display) -> String {
        format!("{}{}{}", self.base_url, name, self.extension)
    }
}

/// 将 `path` 拆分为前缀、资源名和扩展名，不会失败
///
/// ```
/// use http_push_server::push::decompose_path;
///
/// let path = decompose_path("/1/2/3/4/5.mp4");
/// assert_eq!(path.base_url(), "/1/2/3/4/");
/// assert_eq!(path.resource_name(), "5");
/// assert_eq!(path.extension(), ".mp4");
/// ```
pub fn decompose_path(path: &str) -> RequestPath {
    let (base, last) = match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        // 没有 `/` 时基础路径视为空，再补上 `/`
        None => ("/", path),
    };

    let (resource_name, extension) = split_extension(last);

    RequestPath {
        base_url: base.to_string(),
        resource_name: resource_name.to_string(),
        extension: extension.to_string(),
    }
}

/// 在最后一个 `.` 处分割；开头的 `.` 不算扩展名
fn split_extension(segment: &str) -> (&str, &str) {
    match segment.rfind('.') {
        Some(idx) if segment[..idx].chars().any(|c| c != '.') => segment.split_at(idx),
        _ => (segment, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(path: &str) -> (String, String, String) {
        let p = decompose_path(path);
        (
            p.base_url().to_string(),
            p.resource_name().to_string(),
            p.extension().to_string(),
        )
    }

    #[test]
    fn test_decompose_nested() {
        assert_eq!(
            parts("/1/2/3/4/5.mp4"),
            ("/1/2/3/4/".into(), "5".into(), ".mp4".into())
        );
    }

    #[test]
    fn test_decompose_root() {
        assert_eq!(parts("/1.mp4"), ("/".into(), "1".into(), ".mp4".into()));
        assert_eq!(parts("/"), ("/".into(), "".into(), "".into()));
        assert_eq!(parts(""), ("/".into(), "".into(), "".into()));
    }

    #[test]
    fn test_decompose_without_slash() {
        assert_eq!(parts("5.mp4"), ("/".into(), "5".into(), ".mp4".into()));
    }

    #[test]
    fn test_decompose_extension_edge_cases() {
        assert_eq!(parts("/v/7"), ("/v/".into(), "7".into(), "".into()));
        assert_eq!(parts("/v/7.tar.gz"), ("/v/".into(), "7.tar".into(), ".gz".into()));
        assert_eq!(parts("/v/.hidden"), ("/v/".into(), ".hidden".into(), "".into()));
        assert_eq!(parts("/v/..mp4"), ("/v/".into(), "..mp4".into(), "".into()));
        assert_eq!(parts("/v/seg."), ("/v/".into(), "seg".into(), ".".into()));
        assert_eq!(parts("/v.d/9"), ("/v.d/".into(), "9".into(), "".into()));
    }

    #[test]
    fn test_decompose_trailing_slash() {
        assert_eq!(parts("/video/"), ("/video/".into(), "".into(), "".into()));
        assert_eq!(parts("//3.ts"), ("//".into(), "3".into(), ".ts".into()));
    }

    #[test]
    fn test_decompose_is_pure() {
        for path in ["/1/2/3/4/5.mp4", "abc", "/video/Manifest.mpd", "", "//x.y.z"] {
            assert_eq!(decompose_path(path), decompose_path(path));
        }
    }

    #[test]
    fn test_decompose_reconstructs_input() {
        let inputs = [
            "/1/2/3/4/5.mp4",
            "/video/Manifest.mpd",
            "/a/b/",
            "relative/dir/10.m4s",
            "/.hidden",
            "/x/seg.",
            "/x/y.tar.gz",
            "//",
        ];
        for input in inputs {
            let p = decompose_path(input);
            let rebuilt = format!("{}{}{}", p.base_url(), p.resource_name(), p.extension());
            assert_eq!(rebuilt, input);
        }
    }

    #[test]
    fn test_sibling() {
        let p = decompose_path("/live/stream/41.m4s");
        assert_eq!(p.sibling(42), "/live/stream/42.m4s");
    }
}
