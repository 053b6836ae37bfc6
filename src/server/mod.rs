pub mod client;
pub mod errors;
pub mod types;

pub use client::{ServerClient, UPDATE_ENTRY_PATH};
pub use errors::ServerError;
pub use types::{CheckinRequest, CheckinResponse, Reachability, ENTRY_GRANTED};
