//! Which pages the overlay attaches to, and where thumbnails redirect.

pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".png", ".gif", ".webp"];
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "file"];

/// True for `http`, `https` and `file` URLs whose path or query contains one
/// of the image extensions.
pub fn is_image_document_url(href: &str) -> bool {
    let Some((scheme, rest)) = href.split_once("://") else {
        return false;
    };
    if !ALLOWED_SCHEMES
        .iter()
        .any(|allowed| scheme.eq_ignore_ascii_case(allowed))
    {
        return false;
    }
    let path = match rest.find('/') {
        Some(index) => &rest[index..],
        None => return false,
    };
    let path = path.split('#').next().unwrap_or(path).to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.contains(ext))
}

/// The URL of the unscaled asset when `href` carries an `@` size suffix.
pub fn original_asset_url(href: &str) -> Option<&str> {
    let (base, _suffix) = href.split_once('@')?;
    Some(base)
}
