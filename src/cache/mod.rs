pub(crate) mod image_cache;
pub(crate) mod key;
pub(crate) mod lru;
