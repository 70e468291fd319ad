mod image;
mod ocr_result;

pub use image::*;
pub use ocr_result::*;
