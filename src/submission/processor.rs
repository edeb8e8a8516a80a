use std::sync::Arc;

use crate::auth::AuthDecision;
use crate::config::MailTemplate;
use crate::db::RecordStore;
use crate::email::templates;
use crate::error::AppError;
use crate::models::NewAttendance;
use crate::worker::NotificationDispatcher;

use super::parser;

/// What happened to an accepted submission. None of it reaches the HTTP caller.
#[derive(Debug)]
pub struct Accepted {
    pub attendance: NewAttendance,
    pub record_id: Option<i64>,
    pub notification_queued: bool,
}

pub struct SubmissionProcessor {
    store: Arc<dyn RecordStore>,
    dispatcher: NotificationDispatcher,
    mail: MailTemplate,
}

impl SubmissionProcessor {
    pub fn new(
        store: Arc<dyn RecordStore>,
        dispatcher: NotificationDispatcher,
        mail: MailTemplate,
    ) -> Self {
        Self {
            store,
            dispatcher,
            mail,
        }
    }

    /// Parse, persist and queue the confirmation mail.
    ///
    /// Only a rejected credential or an unparseable payload is an error.
    /// Storage and mail failures are logged and the submission still counts
    /// as accepted.
    pub async fn handle(
        &self,
        decision: AuthDecision,
        raw_payload: &[u8],
    ) -> Result<Accepted, AppError> {
        if let AuthDecision::Rejected(rejection) = decision {
            return Err(rejection.into());
        }

        let request = parser::decode(raw_payload).map_err(AppError::PayloadInvalid)?;
        let attendance = NewAttendance::from_request(request);

        let record_id = match self.store.insert(&attendance).await {
            Ok(record) => {
                tracing::info!(
                    "Stored attendance record {} for {}",
                    record.id,
                    record.external_id
                );
                Some(record.id)
            }
            Err(e) => {
                tracing::error!("Failed to store attendance record: {e}");
                None
            }
        };

        let message = templates::render_confirmation(&self.mail, &attendance);
        let notification_queued = self.dispatcher.dispatch(message);

        Ok(Accepted {
            attendance,
            record_id,
            notification_queued,
        })
    }
}
