use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Destination path for a category, e.g. `/albums/yinyue`. The pinyin comes
/// from route-addressable identifiers but is encoded anyway so an unexpected
/// value cannot break out of the path segment.
pub fn album_path(prefix: &str, pinyin: &str) -> String {
    let encoded = utf8_percent_encode(pinyin, NON_ALPHANUMERIC).to_string();
    format!("{prefix}{encoded}")
}

#[cfg(test)]
mod tests {
    use super::album_path;

    #[test]
    fn builds_plain_pinyin_paths() {
        assert_eq!(album_path("/albums/", "yinyue"), "/albums/yinyue");
    }

    #[test]
    fn encodes_unsafe_segments() {
        let path = album_path("/albums/", "you sheng shu/../x");
        assert!(!path.contains("../"));
        assert!(path.starts_with("/albums/you%20sheng%20shu"));
    }
}
