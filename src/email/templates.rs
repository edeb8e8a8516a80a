use crate::config::MailTemplate;
use crate::models::NewAttendance;

use super::NotificationMessage;

pub fn render_confirmation(template: &MailTemplate, attendance: &NewAttendance) -> NotificationMessage {
    let name = &attendance.name;
    let course = &template.course;
    let signature = &template.signature;
    let when = attendance.timestamp.format("%Y-%m-%d %H:%M:%S UTC");

    let body = format!(
        "Dear student {name},\n\
         \n\
         This email confirms that your presence at the course\n\
         {course} has been registered at: {when}\n\
         \n\
         With best regards,\n\
         {signature}\n"
    );

    NotificationMessage {
        from: template.from.clone(),
        to: attendance.email.clone(),
        subject: template.subject.clone(),
        body,
    }
}
