pub mod color;
pub mod decode;
