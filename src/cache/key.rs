use crate::foundation::core::Size;

/// Cache key for the image of `name` rendered at `size`: `"{name}-{width}x{height}"`.
///
/// Dimensions are truncated to whole pixels, so sizes within the same pixel share an entry.
pub fn cache_key(name: &str, size: Size) -> String {
    format!("{name}-{}x{}", size.width as i64, size.height as i64)
}

#[cfg(test)]
#[path = "../../tests/unit/cache/key.rs"]
mod tests;
