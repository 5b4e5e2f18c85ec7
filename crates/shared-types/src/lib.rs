pub mod error;
pub mod feature_flags;

pub mod models;

// Juris domain modules (canonical locations for all case domain types)
pub mod case;
pub mod case_request;
pub mod hearing;
pub mod notification;

pub use error::*;
pub use feature_flags::*;
pub use models::*;

// Re-export all domain types
pub use case::*;
pub use case_request::*;
pub use hearing::*;
pub use notification::*;
