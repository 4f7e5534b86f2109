//! Image asset URLs on the Sanity CDN.

use comforty_core::ImageRef;

use crate::config::SanityConfig;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Builds CDN URLs from image asset references.
///
/// An asset reference `image-<hash>-<W>x<H>-<format>` maps to
/// `https://cdn.sanity.io/images/<project>/<dataset>/<hash>-<W>x<H>.<format>`.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SanityConfig) -> Self {
        Self::new(&config.project_id, &config.dataset)
    }

    /// Full-size URL for an asset, or `None` if the reference is not an image asset.
    #[must_use]
    pub fn url_for(&self, image: &ImageRef) -> Option<String> {
        let file = asset_file_name(image.as_str())?;
        Some(format!(
            "{CDN_BASE}/{}/{}/{file}",
            self.project_id, self.dataset
        ))
    }

    /// URL for an asset resized to `width` pixels.
    #[must_use]
    pub fn url_for_width(&self, image: &ImageRef, width: u32) -> Option<String> {
        self.url_for(image)
            .map(|url| format!("{url}?w={width}&auto=format"))
    }
}

/// `image-abc-800x600-png` -> `abc-800x600.png`
fn asset_file_name(asset_ref: &str) -> Option<String> {
    let rest = asset_ref.strip_prefix("image-")?;
    let (id_and_size, format) = rest.rsplit_once('-')?;
    let (id, size) = id_and_size.rsplit_once('-')?;

    let (width, height) = size.split_once('x')?;
    let is_dimension = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if id.is_empty() || format.is_empty() || !is_dimension(width) || !is_dimension(height) {
        return None;
    }

    Some(format!("{id}-{size}.{format}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::new("abc123", "production")
    }

    #[test]
    fn test_url_for() {
        let image = ImageRef::new("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg");
        assert_eq!(
            builder().url_for(&image).unwrap(),
            "https://cdn.sanity.io/images/abc123/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg"
        );
    }

    #[test]
    fn test_url_for_width() {
        let image = ImageRef::new("image-abc-10x20-webp");
        assert_eq!(
            builder().url_for_width(&image, 400).unwrap(),
            "https://cdn.sanity.io/images/abc123/production/abc-10x20.webp?w=400&auto=format"
        );
    }

    #[test]
    fn test_rejects_non_image_refs() {
        assert!(builder().url_for(&ImageRef::new("file-abc-pdf")).is_none());
        assert!(builder().url_for(&ImageRef::new("image-abc-wide-png")).is_none());
        assert!(builder().url_for(&ImageRef::new("image--10x10-png")).is_none());
    }
}
