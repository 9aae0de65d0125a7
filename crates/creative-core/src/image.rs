//! Data URI helpers and the image download artifact.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

/// Characters of the prompt kept in a download file name
pub const FILE_NAME_CHARS: usize = 30;
pub const FALLBACK_FILE_NAME: &str = "generated_image";
pub const DOWNLOAD_EXTENSION: &str = "jpeg";

/// Build a self-contained `data:` URI from a MIME type and base64 payload
pub fn data_uri(mime_type: &str, base64_bytes: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_bytes)
}

/// Split a base64 `data:` URI into its MIME type and decoded bytes
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("Not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("Data URI has no payload"))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| anyhow!("Data URI is not base64 encoded"))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .context("Data URI payload is not valid base64")?;
    Ok((mime_type.to_string(), bytes))
}

/// File name for a downloaded image: the first 30 prompt characters with
/// whitespace turned into underscores and path-hostile characters dropped.
pub fn download_file_name(prompt: &str) -> String {
    let stem: String = prompt
        .chars()
        .take(FILE_NAME_CHARS)
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .filter(|c| !c.is_control() || c.is_whitespace())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        stem
    };
    format!("{}.{}", stem, DOWNLOAD_EXTENSION)
}

/// First free path for `file_name` in `dir`. Taken names get a ` (n)` suffix
/// before the extension.
fn available_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = file_name
        .rsplit_once('.')
        .unwrap_or((file_name, DOWNLOAD_EXTENSION));
    (1u32..)
        .map(|n| dir.join(format!("{} ({}).{}", stem, n, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Decode `uri` and write it under `dir`, returning the written path.
/// Existing files are never overwritten.
pub fn save_image(dir: &Path, prompt: &str, uri: &str) -> Result<PathBuf> {
    let (_, bytes) = decode_data_uri(uri)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create download directory {:?}", dir))?;
    let path = available_path(dir, &download_file_name(prompt));
    fs::write(&path, &bytes).with_context(|| format!("Could not write {:?}", path))?;

    info!(path = %path.display(), bytes = bytes.len(), "saved generated image");
    Ok(path)
}

/// Human-readable payload size of a data URI, e.g. "12.4 KB"
pub fn describe_size(uri: &str) -> Option<String> {
    let (_, bytes) = decode_data_uri(uri).ok()?;
    let len = bytes.len() as f64;
    Some(if len >= 1024.0 * 1024.0 {
        format!("{:.1} MB", len / (1024.0 * 1024.0))
    } else {
        format!("{:.1} KB", len / 1024.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_uri_decodes_payload() {
        let uri = data_uri("image/jpeg", "AAEC");
        assert_eq!(uri, "data:image/jpeg;base64,AAEC");
        let (mime, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0, 1, 2]);
    }

    #[test]
    fn test_decode_rejects_plain_url() {
        assert!(decode_data_uri("https://example.com/a.jpeg").is_err());
        assert!(decode_data_uri("data:image/jpeg,AAAA").is_err());
        assert!(decode_data_uri("data:image/jpeg;base64,***").is_err());
    }

    #[test]
    fn test_file_name_replaces_whitespace_and_truncates() {
        assert_eq!(
            download_file_name("A futuristic cityscape at sunset over the bay"),
            "A_futuristic_cityscape_at_suns.jpeg"
        );
    }

    #[test]
    fn test_file_name_drops_path_characters() {
        assert_eq!(download_file_name("cats/dogs: 1"), "catsdogs_1.jpeg");
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(download_file_name(""), "generated_image.jpeg");
        assert_eq!(download_file_name("///"), "generated_image.jpeg");
        assert_eq!(download_file_name(".."), "generated_image.jpeg");
    }

    #[test]
    fn test_save_image_writes_decoded_bytes() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("downloads");
        let path = save_image(&target, "red fox", "data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(path, target.join("red_fox.jpeg"));
        assert_eq!(fs::read(&path).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_save_image_keeps_existing_download() {
        let dir = TempDir::new().unwrap();
        let first = save_image(dir.path(), "red fox", "data:image/jpeg;base64,AAEC").unwrap();
        let second = save_image(dir.path(), "red fox", "data:image/jpeg;base64,AAAA").unwrap();
        let third = save_image(dir.path(), "red fox", "data:image/jpeg;base64,AAAA").unwrap();

        assert_eq!(first, dir.path().join("red_fox.jpeg"));
        assert_eq!(second, dir.path().join("red_fox (1).jpeg"));
        assert_eq!(third, dir.path().join("red_fox (2).jpeg"));
        assert_eq!(fs::read(&first).unwrap(), vec![0, 1, 2]);
        assert_eq!(fs::read(&second).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_describe_size() {
        assert_eq!(describe_size("data:image/jpeg;base64,AAAA").as_deref(), Some("0.0 KB"));
        assert_eq!(describe_size("nope"), None);
    }
}
