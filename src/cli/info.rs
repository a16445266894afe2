use crate::carrier::analyze_cover;
use crate::config::StegConfig;
use crate::container::ContainerKind;
use crate::error::Result;
use crate::header::SecurityToken;
use std::path::{Path, PathBuf};

/// Options for the info command
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    pub token: SecurityToken,
    pub config: StegConfig,
    pub format: Option<ContainerKind>,
    /// Payload to check against the cover's capacity
    pub payload: Option<PathBuf>,
}

/// Describe a cover file and how much it can hide
pub fn show_info(cover_path: &Path, options: &InfoOptions) -> Result<String> {
    let analysis = analyze_cover(cover_path, &options.token, &options.config, options.format)?;
    let file_size = std::fs::metadata(cover_path)?.len();

    let mut output = String::new();

    output.push_str("Cover File Information\n");
    output.push_str("======================\n\n");

    output.push_str(&format!("File: {}\n", cover_path.display()));
    output.push_str(&format!("Size: {}\n", format_size(file_size)));
    output.push_str(&format!("Format: {}\n", analysis.kind));
    output.push('\n');

    output.push_str("Embeddable Region:\n");
    if analysis.kind.is_raster() {
        output.push_str("  Source: decoded RGB raster\n");
    } else {
        output.push_str(&format!("  Start: byte {}\n", analysis.start_offset));
    }
    output.push_str(&format!("  Cover bytes: {}\n", analysis.region_bytes));
    output.push_str(&format!("  Offset: {} bytes\n", analysis.offset));
    output.push('\n');

    output.push_str("Capacity:\n");
    output.push_str(&format!(
        "  Key: {} ({} header bytes)\n",
        options.token.kind(),
        analysis.header_bytes
    ));
    output.push_str(&format!(
        "  Max payload: {} ({} bytes)\n",
        format_size(analysis.max_payload_bytes),
        analysis.max_payload_bytes
    ));

    if let Some(payload_path) = &options.payload {
        let payload_len = std::fs::metadata(payload_path)?.len();
        output.push('\n');
        output.push_str("Payload:\n");
        output.push_str(&format!("  File: {}\n", payload_path.display()));
        output.push_str(&format!("  Size: {} ({} bytes)\n", format_size(payload_len), payload_len));
        if analysis.fits(payload_len) {
            output.push_str(&format!(
                "  Fits: yes, {} bytes to spare\n",
                analysis.headroom_bytes(payload_len)
            ));
        } else {
            output.push_str(&format!(
                "  Fits: no, {} bytes too large\n",
                payload_len - analysis.max_payload_bytes
            ));
        }
    }

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.txt");
        std::fs::write(&cover, vec![b'a'; 1000]).unwrap();

        let info = show_info(&cover, &InfoOptions::default()).unwrap();
        assert!(info.contains("Format: generic"));
        assert!(info.contains("Cover bytes: 1000"));
        assert!(info.contains("Max payload: 113 B (113 bytes)"));
    }

    #[test]
    fn test_show_info_wav() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("tone.wav");
        let mut bytes = b"RIFF\0\0\0\0WAVEfmt ".to_vec();
        bytes.resize(44 + 800, 0x80);
        std::fs::write(&cover, &bytes).unwrap();

        let options = InfoOptions {
            token: SecurityToken::Password("secret".into()),
            ..Default::default()
        };
        let info = show_info(&cover, &options).unwrap();
        assert!(info.contains("Format: wav"));
        assert!(info.contains("Start: byte 44"));
        assert!(info.contains("Key: password (18 header bytes)"));
        assert!(info.contains("Max payload: 82 B"));
    }

    #[test]
    fn test_show_info_payload_headroom() {
        let dir = tempdir().unwrap();
        let cover = dir.path().join("cover.txt");
        let payload = dir.path().join("payload.bin");
        std::fs::write(&cover, vec![b'a'; 1000]).unwrap();

        std::fs::write(&payload, vec![1u8; 100]).unwrap();
        let options = InfoOptions {
            payload: Some(payload.clone()),
            ..Default::default()
        };
        let info = show_info(&cover, &options).unwrap();
        assert!(info.contains("Size: 100 B (100 bytes)"));
        assert!(info.contains("Fits: yes, 13 bytes to spare"));

        std::fs::write(&payload, vec![1u8; 120]).unwrap();
        let info = show_info(&cover, &options).unwrap();
        assert!(info.contains("Fits: no, 7 bytes too large"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }
}
