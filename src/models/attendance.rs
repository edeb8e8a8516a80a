use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Body of the `request` form field. Values are taken as-is, nothing is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub name: String,
    pub external_id: String,
    pub email: String,
}

/// Keys match case-insensitively and a repeated key overwrites the earlier
/// value. `null` leaves a field untouched, unknown keys are skipped.
impl<'de> Deserialize<'de> for SubmissionRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SubmissionRequestVisitor)
    }
}

struct SubmissionRequestVisitor;

impl<'de> Visitor<'de> for SubmissionRequestVisitor {
    type Value = SubmissionRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with Name, SurfId and EMail")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut request = SubmissionRequest::default();

        while let Some(key) = map.next_key::<String>()? {
            let field = if key.eq_ignore_ascii_case("Name") {
                &mut request.name
            } else if key.eq_ignore_ascii_case("SurfId") || key.eq_ignore_ascii_case("ExternalId") {
                &mut request.external_id
            } else if key.eq_ignore_ascii_case("EMail") {
                &mut request.email
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if let Some(value) = map.next_value::<Option<String>>()? {
                *field = value;
            }
        }

        Ok(request)
    }
}

/// A record that has been accepted but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub external_id: String,
    pub email: String,
}

impl NewAttendance {
    /// Stamps the request with the server clock.
    pub fn from_request(request: SubmissionRequest) -> Self {
        Self {
            timestamp: Utc::now(),
            name: request.name,
            external_id: request.external_id,
            email: request.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    #[sqlx(rename = "when")]
    pub timestamp: DateTime<Utc>,
    pub name: String,
    #[sqlx(rename = "surf_id")]
    pub external_id: String,
    #[sqlx(rename = "e_mail")]
    pub email: String,
}

impl AttendanceRecord {
    pub fn stored(id: i64, attendance: NewAttendance) -> Self {
        Self {
            id,
            timestamp: attendance.timestamp,
            name: attendance.name,
            external_id: attendance.external_id,
            email: attendance.email,
        }
    }
}
