use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use relay_engine::{
    ApiError, ClientSettings, EngineConfig, EngineEvent, EngineHandle, PollOutcome, PollSettings,
    StagingSettings, TaskStatus,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, staging_dir: PathBuf) -> EngineConfig {
    EngineConfig {
        client: ClientSettings {
            base_url: server.uri(),
            ..ClientSettings::default()
        },
        poll: PollSettings {
            interval: Duration::from_millis(20),
            max_attempts: 20,
        },
        staging: StagingSettings::new(staging_dir),
    }
}

fn write_source(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"frames").expect("write source file");
    path
}

fn recv(event_rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    event_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submit_flow_emits_events_through_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task-status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "in_progress"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task-status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .mount(&server)
        .await;

    let source_dir = TempDir::new().unwrap();
    let staging_root = TempDir::new().unwrap();
    let staging_dir = staging_root.path().join("videos");
    let source = write_source(&source_dir, "clip.mp4");

    let (engine, event_rx) = EngineHandle::new(config_for(&server, staging_dir.clone()));
    engine.submit(source);

    let staged_path = match recv(&event_rx) {
        EngineEvent::Staged { video_path } => video_path,
        other => panic!("expected Staged, got {other:?}"),
    };
    // The staged copy exists before the submission goes out.
    assert!(PathBuf::from(&staged_path).exists());
    assert_eq!(PathBuf::from(&staged_path), staging_dir.join("clip.mp4"));

    assert_eq!(
        recv(&event_rx),
        EngineEvent::SubmissionAccepted {
            task_id: "abc".to_string(),
        }
    );
    assert_eq!(
        recv(&event_rx),
        EngineEvent::PollProgress {
            status: TaskStatus::InProgress,
            attempt: 1,
        }
    );
    assert_eq!(
        recv(&event_rx),
        EngineEvent::PollFinished {
            outcome: PollOutcome::Completed,
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_submission_never_polls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-video"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .expect(0)
        .mount(&server)
        .await;

    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = write_source(&source_dir, "clip.mp4");

    let (engine, event_rx) =
        EngineHandle::new(config_for(&server, staging_dir.path().to_path_buf()));
    engine.submit(source);

    assert!(matches!(recv(&event_rx), EngineEvent::Staged { .. }));
    assert_eq!(
        recv(&event_rx),
        EngineEvent::SubmissionFailed {
            error: ApiError::Status {
                code: 500,
                body: "disk full".to_string(),
            },
        }
    );

    // Give a would-be poll loop time to misbehave before verification.
    tokio::time::sleep(Duration::from_millis(100)).await;
    server.verify().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_upload_reports_staging_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc"})))
        .expect(0)
        .mount(&server)
        .await;

    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = source_dir.path().join("notes.txt");
    fs::write(&source, b"text").unwrap();

    let (engine, event_rx) =
        EngineHandle::new(config_for(&server, staging_dir.path().to_path_buf()));
    engine.submit(source);

    match recv(&event_rx) {
        EngineEvent::StagingFailed { reason } => {
            assert!(reason.contains(".mp4"), "got {reason}");
        }
        other => panic!("expected StagingFailed, got {other:?}"),
    }
    server.verify().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_processing_stops_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "abc"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/task-status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = write_source(&source_dir, "clip.mp4");

    let (engine, event_rx) =
        EngineHandle::new(config_for(&server, staging_dir.path().to_path_buf()));
    engine.submit(source);

    assert!(matches!(recv(&event_rx), EngineEvent::Staged { .. }));
    assert!(matches!(
        recv(&event_rx),
        EngineEvent::SubmissionAccepted { .. }
    ));

    engine.cancel_processing();

    loop {
        match recv(&event_rx) {
            EngineEvent::PollProgress { .. } => continue,
            EngineEvent::PollFinished { outcome } => {
                assert_eq!(outcome, PollOutcome::Cancelled);
                break;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn chat_round_trip_and_error_keep_session_alive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hello"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let staging_dir = TempDir::new().unwrap();
    let (engine, event_rx) =
        EngineHandle::new(config_for(&server, staging_dir.path().to_path_buf()));

    engine.chat("hi", None);
    assert_eq!(
        recv(&event_rx),
        EngineEvent::ChatReply {
            text: "hello".to_string(),
        }
    );

    engine.chat("hi again", None);
    assert_eq!(
        recv(&event_rx),
        EngineEvent::ChatFailed {
            error: ApiError::Status {
                code: 503,
                body: "overloaded".to_string(),
            },
        }
    );
}
