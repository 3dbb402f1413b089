use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use faxwire::{
    FaxStatus, FaxWorkflow, FaxwireError, MockGateway, PollSettings, RecordingSleeper, SessionId,
};

/// A well-formed 10 KB PDF document on disk.
fn write_invoice(dir: &tempfile::TempDir) -> (std::path::PathBuf, Vec<u8>) {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(10 * 1024, b'x');

    let path = dir.path().join("invoice.pdf");
    std::fs::write(&path, &bytes).expect("failed to write test document");
    (path, bytes)
}

#[test_log::test(tokio::test)]
async fn end_to_end_invoice_transmission() {
    // Setup: gateway accepts the submission and reports SENDING twice
    // before SENT.
    let gateway = MockGateway::new();
    gateway.push_submit_response(Ok(SessionId::from("abc123")));
    gateway.push_poll_response(Ok(FaxStatus::Sending));
    gateway.push_poll_response(Ok(FaxStatus::Sending));
    gateway.push_poll_response(Ok(FaxStatus::Sent));

    let sleeper = RecordingSleeper::new();
    let workflow = FaxWorkflow::new(gateway.clone(), "f0", PollSettings::default())
        .with_sleeper(sleeper.clone());

    let dir = tempfile::tempdir().unwrap();
    let (path, original_bytes) = write_invoice(&dir);

    let mut observed = Vec::new();
    let report = workflow
        .run("+4912345678", &path, |status| observed.push(status.clone()))
        .await
        .expect("workflow should reach a terminal status");

    // The submitted request carries the validated inputs and an encoding
    // that decodes back to the original document bytes.
    let submitted = gateway.submitted_requests();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].faxline_id, "f0");
    assert_eq!(submitted[0].recipient, "+4912345678");
    assert_eq!(submitted[0].filename, "invoice.pdf");
    assert_eq!(
        STANDARD.decode(&submitted[0].base64_content).unwrap(),
        original_bytes
    );

    // Every status was surfaced in order and the session ended as SENT.
    assert_eq!(
        observed,
        vec![FaxStatus::Sending, FaxStatus::Sending, FaxStatus::Sent]
    );
    assert_eq!(report.session_id, SessionId::from("abc123"));
    assert_eq!(report.outcome, FaxStatus::Sent);
    assert_eq!(report.polls, 3);
    assert_eq!(gateway.polled_sessions(), vec![SessionId::from("abc123"); 3]);

    // Three polls, two five-second waits between them.
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(5), Duration::from_secs(5)]
    );
}

#[test_log::test(tokio::test)]
async fn unknown_status_values_keep_the_poller_going() {
    let gateway = MockGateway::new();
    gateway.push_submit_response(Ok(SessionId::from("s1")));
    gateway.push_poll_response(Ok(FaxStatus::Other("QUEUED".to_string())));
    gateway.push_poll_response(Ok(FaxStatus::Failed));

    let workflow = FaxWorkflow::new(gateway.clone(), "f0", PollSettings::default())
        .with_sleeper(RecordingSleeper::new());

    let dir = tempfile::tempdir().unwrap();
    let (path, _) = write_invoice(&dir);

    let report = workflow
        .run("+4912345678", &path, |_| {})
        .await
        .expect("FAILED is terminal, the workflow should finish");

    assert_eq!(report.outcome, FaxStatus::Failed);
    assert_eq!(gateway.poll_count(), 2);
}

#[test_log::test(tokio::test)]
async fn malformed_acknowledgement_stops_before_polling() {
    let gateway = MockGateway::new();
    gateway.push_submit_response(Err(FaxwireError::MalformedResponse(
        "missing field `sessionId`".to_string(),
    )));

    let workflow = FaxWorkflow::new(gateway.clone(), "f0", PollSettings::default())
        .with_sleeper(RecordingSleeper::new());

    let dir = tempfile::tempdir().unwrap();
    let (path, _) = write_invoice(&dir);

    let err = workflow
        .run("+4912345678", &path, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, FaxwireError::MalformedResponse(_)));
    assert_eq!(gateway.poll_count(), 0);
}
