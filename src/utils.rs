use std::path::{Component, Path, PathBuf};

/// 将请求路径拼接到根目录下
///
/// 路径中出现 `..` 等跳出根目录的部分时返回 `None`。
///
/// # Examples
/// ```
/// use http_push_server::utils::safe_join;
/// use std::path::Path;
///
/// let root = Path::new("/srv/video");
/// assert_eq!(safe_join(root, "/hd/5.mp4"), Some(root.join("hd").join("5.mp4")));
/// assert_eq!(safe_join(root, "/../etc/passwd"), None);
/// ```
pub fn safe_join(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut joined = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(joined)
}

/// 根据扩展名推断媒体分片的 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        ".mp4" => "video/mp4",
        ".m4s" => "video/iso.segment",
        ".m4a" => "audio/mp4",
        ".ts" => "video/mp2t",
        ".mpd" => "application/dash+xml",
        ".m3u8" => "application/vnd.apple.mpegurl",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_join() {
        let root = Path::new("/srv");
        assert_eq!(safe_join(root, "/a/./b.ts"), Some(PathBuf::from("/srv/a/b.ts")));
        assert_eq!(safe_join(root, "/"), Some(PathBuf::from("/srv")));
        assert_eq!(safe_join(root, "//x.mp4"), Some(PathBuf::from("/srv/x.mp4")));
        assert_eq!(safe_join(root, "/a/../../b"), None);
        assert_eq!(safe_join(root, ".."), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(".mp4"), "video/mp4");
        assert_eq!(content_type_for(".MPD"), "application/dash+xml");
        assert_eq!(content_type_for(".m3u8"), "application/vnd.apple.mpegurl");
        assert_eq!(content_type_for(""), "application/octet-stream");
    }
}
