// Service exports
pub mod api;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use session::{SessionError, SessionStore, StoredSession};
