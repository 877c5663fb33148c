pub(crate) mod parley_shaper;
pub(crate) mod shaper;
pub(crate) mod style;
