/// 校验附件内容的魔术字节与扩展名是否一致
///
/// `extension` 带点号，如 `".png"`，大小写不敏感。
/// 只认识附件白名单里的类型，其余一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        // iPhone 照片：ISO BMFF 容器，ftyp 品牌为 heic/heix/mif1 等
        ".heic" | ".heif" => {
            data.len() >= 12
                && &data[4..8] == b"ftyp"
                && matches!(
                    &data[8..12],
                    b"heic" | b"heix" | b"hevc" | b"hevx" | b"mif1" | b"msf1"
                )
        }
        ".pdf" => data.starts_with(b"%PDF"),
        _ => false,
    }
}

/// 根据扩展名给出下载时的 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".webp" => "image/webp",
        ".heic" | ".heif" => "image/heic",
        ".pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_and_jpeg() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE1];
        assert!(validate_magic_bytes(&jpeg, ".jpeg"));
    }

    #[test]
    fn test_heic_brand() {
        let mut heic = vec![0x00, 0x00, 0x00, 0x18];
        heic.extend_from_slice(b"ftypheic");
        assert!(validate_magic_bytes(&heic, ".heic"));

        let mut mp4 = vec![0x00, 0x00, 0x00, 0x18];
        mp4.extend_from_slice(b"ftypisom");
        assert!(!validate_magic_bytes(&mp4, ".heic"));
    }

    #[test]
    fn test_pdf_and_unknown() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
        assert!(!validate_magic_bytes(&[], ".pdf"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type_for(".JPG"), "image/jpeg");
        assert_eq!(content_type_for(".bin"), "application/octet-stream");
    }
}
