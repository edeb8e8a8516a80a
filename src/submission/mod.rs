pub mod parser;
pub mod processor;

pub use processor::{Accepted, SubmissionProcessor};
