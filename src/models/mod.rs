pub mod attendance;

pub use attendance::{AttendanceRecord, NewAttendance, SubmissionRequest};
