/// TMDB image CDN root
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl ImageKind {
    /// CDN size segment for this kind of image
    pub fn size_segment(&self, size: ImageSize) -> &'static str {
        use ImageSize::*;
        match (self, size) {
            (_, Original) => "original",
            (ImageKind::Poster, Small) => "w185",
            (ImageKind::Poster, Medium) => "w342",
            (ImageKind::Poster, Large) => "w500",
            (ImageKind::Backdrop, Small) => "w300",
            (ImageKind::Backdrop, Medium) => "w780",
            (ImageKind::Backdrop, Large) => "w1280",
            (ImageKind::Profile, Small) => "w45",
            (ImageKind::Profile, Medium) => "w185",
            (ImageKind::Profile, Large) => "h632",
        }
    }
}

/// Full image URL for a `poster_path`/`backdrop_path`/`profile_path`
pub fn image_url(path: Option<&str>, kind: ImageKind, size: ImageSize) -> Option<String> {
    image_url_with_base(IMAGE_BASE_URL, path, kind, size)
}

pub fn image_url_with_base(
    base: &str,
    path: Option<&str>,
    kind: ImageKind,
    size: ImageSize,
) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        base.trim_end_matches('/'),
        kind.size_segment(size),
        path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageKind::Poster, ImageSize::Medium).as_deref(),
            Some("https://image.tmdb.org/t/p/w342/abc.jpg")
        );
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageKind::Backdrop, ImageSize::Original).as_deref(),
            Some("https://image.tmdb.org/t/p/original/abc.jpg")
        );
        assert_eq!(
            image_url_with_base("http://cdn.local/", Some("/p.jpg"), ImageKind::Profile, ImageSize::Large).as_deref(),
            Some("http://cdn.local/h632/p.jpg")
        );
    }

    #[test]
    fn test_image_url_without_path() {
        assert_eq!(image_url(None, ImageKind::Poster, ImageSize::Small), None);
        assert_eq!(image_url(Some(""), ImageKind::Poster, ImageSize::Small), None);
    }
}
