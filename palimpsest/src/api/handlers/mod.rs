pub(crate) mod health;
pub(crate) mod ocr;

pub use health::health_check;
pub use ocr::recognize_image;
