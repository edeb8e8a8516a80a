use sqlx::SqlitePool;

use crate::models::NewAttendance;

pub async fn create(pool: &SqlitePool, attendance: &NewAttendance) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO records ("when", name, surf_id, e_mail) VALUES (?, ?, ?, ?)"#,
    )
    .bind(attendance.timestamp)
    .bind(&attendance.name)
    .bind(&attendance.external_id)
    .bind(&attendance.email)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
