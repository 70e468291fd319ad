pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
mod routes;
mod state;

pub use routes::{create_router, IMAGE_FIELD, MULTIPART_ALLOWANCE};
pub use state::AppState;
