pub mod grid;
pub mod presets;
