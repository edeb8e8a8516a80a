pub mod gate;

pub use gate::{AuthDecision, AuthGate, AuthRejection};
