use std::sync::Arc;

use crate::auth::AuthGate;
use crate::submission::SubmissionProcessor;

pub type SharedState = Arc<AppState>;

/// Built once at startup, read-only afterwards.
pub struct AppState {
    pub gate: AuthGate,
    pub processor: SubmissionProcessor,
}
