// ==========================================
// BOM 零件核对系统 - 图片 Data URL 编码
// ==========================================
// 格式: data:<mime>;base64,<payload>
// MIME 由文件头嗅探,无法识别时使用 application/octet-stream
// ==========================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const FALLBACK_MIME: &str = "application/octet-stream";

/// 根据文件头嗅探 MIME 类型
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// 将原始图片编码为 Data URL
pub fn to_data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime_type(bytes), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_png_and_jpeg_are_sniffed() {
        assert_eq!(sniff_mime_type(PNG_HEADER), "image/png");
        assert_eq!(sniff_mime_type(JPEG_HEADER), "image/jpeg");
    }

    #[test]
    fn test_unknown_bytes_fall_back() {
        assert_eq!(sniff_mime_type(b"hello"), FALLBACK_MIME);
        assert_eq!(to_data_url(b"hi"), "data:application/octet-stream;base64,aGk=");
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(PNG_HEADER);
        assert!(url.starts_with("data:image/png;base64,"));
        let payload = url.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(payload).unwrap(), PNG_HEADER);
    }
}
