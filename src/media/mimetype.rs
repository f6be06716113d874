use infer;

/// Sniffs the actual content type from file data, ignoring whatever the
/// client declared. `None` when the bytes match no known signature.
pub fn detect_mime(data: &[u8]) -> Option<&'static str> {
    infer::get(data).map(|kind| kind.mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_mime(&data), Some("image/jpeg"));
    }

    #[test]
    fn test_detects_png() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        assert_eq!(detect_mime(&data), Some("image/png"));
    }

    #[test]
    fn test_detects_gif() {
        let data = b"GIF89a\x00\x00\x00\x00";
        assert_eq!(detect_mime(data), Some("image/gif"));
    }

    #[test]
    fn test_unknown_bytes_yield_none() {
        assert_eq!(detect_mime(b"not an image at all"), None);
        assert_eq!(detect_mime(&[]), None);
    }
}
