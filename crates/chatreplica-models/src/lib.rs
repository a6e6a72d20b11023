// Models module - data structures for completion API communication
pub mod types;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use types::{Role, WireMessage};
pub use requests::ChatRequest;
pub use responses::{
    ApiErrorBody, ApiErrorDetail,
    ChatResponse, Choice, ChoiceMessage, Usage,
    INSUFFICIENT_QUOTA_CODE,
};
