//! Request and response bodies of the HTTP API

pub mod request;
pub mod response;

pub use request::{AddDocumentsRequest, AskQuestionRequest};
pub use response::{AddDocumentsResponse, AskQuestionResponse};
