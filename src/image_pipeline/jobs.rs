//! Background job module
//!
//! Runs size-dependent pixel work off the calling thread. Each submission gets a
//! monotonically increasing request id and a cancel token; only the outcome of the
//! latest request is ever handed back, regardless of completion order.

mod runner;
mod token;
pub mod types;


pub use runner::JobRunner;
pub use token::CancelToken;
pub use types::{JobOutcome, RequestId};
