use std::path::Path;

use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;

use crate::entities::Image;
use crate::error::{FeedError, Result};
use crate::repositories::RepositoryError;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
];

fn mime_of(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();

    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

fn not_an_image(src: &str) -> FeedError {
    FeedError::Validation(format!("`{}` is not an image", src))
}

/// turns a user-supplied source into an image payload.
///
/// `http(s)` urls are kept as references, local files are inlined as `data:` uris.
/// only known image extensions are accepted.
pub async fn read_image(src: &str) -> Result<Image> {
    if src.starts_with("http://") || src.starts_with("https://") {
        let path = src.split(|c| c == '?' || c == '#').next().unwrap_or(src);
        return match mime_of(path) {
            Some(_) => Ok(Image(src.to_string())),
            None => Err(not_an_image(src)),
        };
    }

    let mime = mime_of(src).ok_or_else(|| not_an_image(src))?;
    let bytes = tokio::fs::read(src).await.map_err(RepositoryError::Io)?;

    tracing::debug!("inlined {} bytes of {}", bytes.len(), mime);
    Ok(Image(format!("data:{};base64,{}", mime, b64.encode(bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn urls_stay_references() {
        let img = read_image("https://example.com/a/cat.JPG?size=2").await.unwrap();

        assert_eq!(img, Image("https://example.com/a/cat.JPG?size=2".to_string()));
    }

    #[tokio::test]
    async fn non_image_is_rejected() {
        assert!(matches!(
            read_image("https://example.com/notes.txt").await,
            Err(FeedError::Validation(_))
        ));
        assert!(matches!(
            read_image("/tmp/whatever").await,
            Err(FeedError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn files_become_data_uris() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let img = read_image(path.to_str().unwrap()).await.unwrap();

        assert_eq!(img, Image("data:image/png;base64,AQID".to_string()));
    }

    #[tokio::test]
    async fn missing_file_is_persistence_error() {
        assert!(matches!(
            read_image("/definitely/not/here.png").await,
            Err(FeedError::Persistence(_))
        ));
    }
}
