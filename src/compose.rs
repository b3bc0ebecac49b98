pub mod composite;
pub mod format;
pub mod scale;
pub mod tiler;
