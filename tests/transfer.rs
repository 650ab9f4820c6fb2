//! Transfer pipeline behavior against a mock service: streamed downloads
//! with filename resolution, terminal progress handling, and batched
//! multipart submission.

use std::time::Duration;

use feedback_board::{
    download_attachment, ApiClient, CancelToken, DownloadedFile, Error, FeedbackSubmission,
    FileBatchAccumulator, PendingFile, ProgressTracker, Submitter,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_attachment(server: &MockServer, id: i64, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/feedbacks/{}/file", id)))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn download_resolves_filename_from_disposition_header() {
    let server = MockServer::start().await;
    mock_attachment(
        &server,
        7,
        ResponseTemplate::new(200)
            .insert_header("content-disposition", r#"attachment; filename="my file.pdf""#)
            .set_body_bytes(b"hello world".to_vec()),
    )
    .await;

    let api = ApiClient::new(server.uri()).unwrap();
    let tracker = ProgressTracker::new();
    let file = download_attachment(&api, &tracker, 7, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(file.file_name, "my file.pdf");
    assert_eq!(file.bytes, b"hello world");
    // Terminal: the progress entry is gone.
    assert!(!tracker.is_active("7"));
}

#[tokio::test]
async fn download_decodes_extended_filename_syntax() {
    let server = MockServer::start().await;
    mock_attachment(
        &server,
        7,
        ResponseTemplate::new(200)
            .insert_header(
                "content-disposition",
                "attachment; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf",
            )
            .set_body_bytes(b"pdf bytes".to_vec()),
    )
    .await;

    let api = ApiClient::new(server.uri()).unwrap();
    let file = download_attachment(&api, &ProgressTracker::new(), 7, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(file.file_name, "résumé.pdf");
}

#[tokio::test]
async fn download_without_disposition_header_uses_the_fallback_name() {
    let server = MockServer::start().await;
    mock_attachment(
        &server,
        42,
        ResponseTemplate::new(200).set_body_bytes(b"raw".to_vec()),
    )
    .await;

    let api = ApiClient::new(server.uri()).unwrap();
    let file = download_attachment(&api, &ProgressTracker::new(), 42, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(file.file_name, "file_42");
}

#[tokio::test]
async fn download_server_error_clears_progress() {
    let server = MockServer::start().await;
    mock_attachment(&server, 7, ResponseTemplate::new(404)).await;

    let api = ApiClient::new(server.uri()).unwrap();
    let tracker = ProgressTracker::new();
    let result = download_attachment(&api, &tracker, 7, &CancelToken::new()).await;

    assert!(matches!(result, Err(Error::Transfer(_))));
    assert_eq!(tracker.percent("7"), None);
    // A retry is possible right away.
    assert!(!tracker.is_active("7"));
}

#[tokio::test]
async fn download_empty_body_is_a_transfer_error() {
    let server = MockServer::start().await;
    mock_attachment(&server, 7, ResponseTemplate::new(200)).await;

    let api = ApiClient::new(server.uri()).unwrap();
    let tracker = ProgressTracker::new();
    let result = download_attachment(&api, &tracker, 7, &CancelToken::new()).await;

    assert!(matches!(result, Err(Error::Transfer(_))));
    assert!(!tracker.is_active("7"));
}

#[tokio::test]
async fn second_download_for_an_active_id_is_rejected() {
    let server = MockServer::start().await;
    mock_attachment(
        &server,
        7,
        ResponseTemplate::new(200)
            .set_body_bytes(b"slow payload".to_vec())
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    let api = ApiClient::new(server.uri()).unwrap();
    let tracker = ProgressTracker::new();
    let token = CancelToken::new();

    let (first, second) = tokio::join!(
        download_attachment(&api, &tracker, 7, &token),
        download_attachment(&api, &tracker, 7, &token),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::InFlight(_))));
    // Once the winner finished, the id is free again.
    assert!(!tracker.is_active("7"));
}

#[tokio::test]
async fn pre_cancelled_download_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feedbacks/7/file"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri()).unwrap();
    let tracker = ProgressTracker::new();
    let token = CancelToken::new();
    token.cancel();

    let result = download_attachment(&api, &tracker, 7, &token).await;
    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(!tracker.is_active("7"));
}

#[tokio::test]
async fn persisted_download_lands_under_its_resolved_name() {
    let file = DownloadedFile {
        file_name: "report.bin".to_string(),
        bytes: vec![1, 2, 3, 4],
    };

    let dir = tempfile::tempdir().unwrap();
    let path = file.persist_to(dir.path()).await.unwrap();

    assert_eq!(path.file_name().unwrap(), "report.bin");
    assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn blank_required_fields_fail_validation_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedbacks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let submitter = Submitter::new(ApiClient::new(server.uri()).unwrap());
    let tracker = ProgressTracker::new();
    let mut batch = FileBatchAccumulator::new();

    let result = submitter
        .submit(&FeedbackSubmission::new("  ", "details"), &mut batch, &tracker)
        .await;
    assert!(matches!(result, Err(Error::Validation("subject"))));

    let result = submitter
        .submit(&FeedbackSubmission::new("subject", ""), &mut batch, &tracker)
        .await;
    assert!(matches!(result, Err(Error::Validation("description"))));
    assert!(!submitter.is_submitting());
}

#[tokio::test]
async fn submission_carries_fields_and_exactly_the_ready_files() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedbacks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = Submitter::new(ApiClient::new(server.uri()).unwrap());
    let tracker = ProgressTracker::new();

    // 1 KiB budget: the first file fits, the second crosses the limit.
    let mut batch = FileBatchAccumulator::with_budget(1.0);
    batch.add([
        PendingFile::from_bytes("notes.txt", b"ready file payload".to_vec()),
        PendingFile::from_bytes("dump.log", vec![b'x'; 2048]),
    ]);

    let mut submission = FeedbackSubmission::new("broken button", "it does nothing");
    submission.email_followup = true;

    submitter
        .submit(&submission, &mut batch, &tracker)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).to_string();

    assert!(body.contains(r#"name="type_of_feedback""#));
    assert!(body.contains("General"));
    assert!(body.contains("broken button"));
    assert!(body.contains("it does nothing"));
    assert!(body.contains(r#"name="email_followup""#));
    assert!(body.contains("true"));
    assert!(body.contains("notes.txt"));
    assert!(body.contains("ready file payload"));
    assert!(!body.contains("dump.log"));

    // The submitted file left the batch; the waiting one stayed.
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.files()[0].name(), "dump.log");
}

#[tokio::test]
async fn failed_submission_keeps_the_selection_for_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedbacks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let submitter = Submitter::new(ApiClient::new(server.uri()).unwrap());
    let tracker = ProgressTracker::new();
    let mut batch = FileBatchAccumulator::new();
    batch.add([
        PendingFile::from_bytes("a.txt", b"aaa".to_vec()),
        PendingFile::from_bytes("b.txt", b"bbb".to_vec()),
    ]);

    let result = submitter
        .submit(
            &FeedbackSubmission::new("subject", "description"),
            &mut batch,
            &tracker,
        )
        .await;

    assert!(matches!(result, Err(Error::Transfer(_))));
    assert_eq!(batch.len(), 2);
    assert!(!submitter.is_submitting());
    // No progress entry may survive the failure.
    assert!(tracker.snapshot().is_empty());
}

#[tokio::test]
async fn concurrent_submission_is_rejected_while_one_is_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedbacks"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let submitter = Submitter::new(ApiClient::new(server.uri()).unwrap());
    let tracker = ProgressTracker::new();
    let mut first_batch = FileBatchAccumulator::new();
    let mut second_batch = FileBatchAccumulator::new();
    let submission = FeedbackSubmission::new("subject", "description");

    let (first, second) = tokio::join!(
        submitter.submit(&submission, &mut first_batch, &tracker),
        submitter.submit(&submission, &mut second_batch, &tracker),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::InFlight(_))));
    assert!(!submitter.is_submitting());
}
