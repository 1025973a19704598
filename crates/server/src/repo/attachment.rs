use shared_types::{AppError, AttachmentRow};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// List the attachments registered for a record, in display order.
pub async fn list_for_record(
    pool: &Pool<Postgres>,
    record_id: &str,
) -> Result<Vec<AttachmentRow>, AppError> {
    sqlx::query_as::<_, AttachmentRow>(
        r#"
        SELECT case_reference, document_type, file_name
        FROM case_attachments
        WHERE record_id = $1
        ORDER BY case_reference, document_type, file_name
        "#,
    )
    .bind(record_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Register an attachment for a record. Returns the new row id.
pub async fn insert(
    pool: &Pool<Postgres>,
    record_id: &str,
    row: &AttachmentRow,
) -> Result<Uuid, AppError> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO case_attachments (record_id, case_reference, document_type, file_name)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(record_id)
    .bind(&row.case_reference)
    .bind(&row.document_type)
    .bind(&row.file_name)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Remove every attachment registered for a record. Returns rows deleted.
pub async fn delete_for_record(pool: &Pool<Postgres>, record_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM case_attachments WHERE record_id = $1")
        .bind(record_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected())
}
