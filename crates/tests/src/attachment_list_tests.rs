use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use server::repo::attachment;
use shared_types::{AppErrorKind, AttachmentRow};

use crate::common::{get_json, test_app};

#[tokio::test]
async fn list_attachments_empty() {
    let Some((app, _pool, _guard)) = test_app().await else {
        return;
    };

    let (status, body) = get_json(&app, "/api/records/R-EMPTY/attachments").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_attachments_sorted_and_scoped_to_record() {
    let Some((app, pool, _guard)) = test_app().await else {
        return;
    };

    for row in [
        AttachmentRow::new("C2", "Invoice", "b.pdf"),
        AttachmentRow::new("C1", "Invoice", "z.pdf"),
        AttachmentRow::new("C1", "Contract", "a.docx"),
        AttachmentRow::new("C1", "Invoice", "a.pdf"),
    ] {
        attachment::insert(&pool, "R-1", &row).await.unwrap();
    }
    attachment::insert(&pool, "R-2", &AttachmentRow::new("C9", "Memo", "other.txt"))
        .await
        .unwrap();

    let (status, body) = get_json(&app, "/api/records/R-1/attachments").await;

    assert_eq!(status, StatusCode::OK);
    let rows: Vec<AttachmentRow> = serde_json::from_value(body).unwrap();
    assert_eq!(
        rows,
        vec![
            AttachmentRow::new("C1", "Contract", "a.docx"),
            AttachmentRow::new("C1", "Invoice", "a.pdf"),
            AttachmentRow::new("C1", "Invoice", "z.pdf"),
            AttachmentRow::new("C2", "Invoice", "b.pdf"),
        ]
    );
}

#[tokio::test]
async fn blank_record_id_is_bad_request() {
    let Some((app, _pool, _guard)) = test_app().await else {
        return;
    };

    let (status, body) = get_json(&app, "/api/records/%20/attachments").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
}

#[tokio::test]
async fn duplicate_row_is_rejected() {
    let Some((_app, pool, _guard)) = test_app().await else {
        return;
    };
    let row = AttachmentRow::new("C1", "Invoice", "a.pdf");

    attachment::insert(&pool, "R-1", &row).await.unwrap();
    let err = attachment::insert(&pool, "R-1", &row).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::BadRequest);
    // Same row under another record is fine.
    attachment::insert(&pool, "R-2", &row).await.unwrap();
}

#[tokio::test]
async fn delete_for_record_clears_only_that_record() {
    let Some((_app, pool, _guard)) = test_app().await else {
        return;
    };
    attachment::insert(&pool, "R-1", &AttachmentRow::new("C1", "Invoice", "a.pdf"))
        .await
        .unwrap();
    attachment::insert(&pool, "R-1", &AttachmentRow::new("C1", "Invoice", "b.pdf"))
        .await
        .unwrap();
    attachment::insert(&pool, "R-2", &AttachmentRow::new("C2", "Memo", "c.txt"))
        .await
        .unwrap();

    assert_eq!(attachment::delete_for_record(&pool, "R-1").await.unwrap(), 2);
    assert!(attachment::list_for_record(&pool, "R-1").await.unwrap().is_empty());
    assert_eq!(attachment::list_for_record(&pool, "R-2").await.unwrap().len(), 1);
}
