pub(crate) mod geometry;
pub(crate) mod ring_view;
