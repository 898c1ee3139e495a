pub mod error;
pub mod routes;
pub mod state;
pub mod upload;

pub use error::{ApiError, UploadError};
pub use routes::create_router;
pub use state::{build_detector, AppState};
