pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod reference;
pub mod translation;
