//! End-to-end relay tests: webhook delivery → queued tasks → LINE replies.
//!
//! Uses [`wiremock`] to stand in for the LINE Messaging API and the in-process
//! queue to capture deferred tasks.

use std::sync::Arc;

use lambda_runtime::{Context, LambdaEvent};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linecho::api::callback::handle_callback;
use linecho::api::helpers::status_code;
use linecho::api::signature::compute_signature;
use linecho::api::task::handle_task;
use linecho::api::{ApiState, handler};
use linecho::core::config::AppConfig;
use linecho::RelayError;
use linecho::core::payload::{TaskPayload, decode_event};
use linecho::line::events::{SourceType, parse_webhook_body};
use linecho::line::{LineClient, SendMessage};
use linecho::queue::{DeferredTask, LocalTaskQueue, LocalTaskReceiver, TASK_PATH, task_data};
use linecho::worker::{TaskOutcome, TaskStage, UNSUPPORTED_MESSAGE_REPLY, process_task};

const SECRET: &str = "test-channel-secret";
const TOKEN: &str = "test-channel-token";
const REPLY_PATH: &str = "/v2/bot/message/reply";

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        channel_secret: SECRET.to_string(),
        channel_token: TOKEN.to_string(),
        task_queue_url: None,
        line_api_base_url: base_url.to_string(),
    }
}

fn local_state(base_url: &str) -> (ApiState, LocalTaskReceiver) {
    let (queue, receiver) = LocalTaskQueue::channel();
    let state = ApiState::new(Arc::new(test_config(base_url)), Arc::new(queue));
    (state, receiver)
}

/// A delivery with one text message and one sticker.
fn two_event_body() -> String {
    json!({
        "destination": "Ubot",
        "events": [
            {
                "type": "message",
                "mode": "active",
                "timestamp": 1_700_000_000_000_i64,
                "source": {"type": "user", "userId": "U1"},
                "webhookEventId": "01HTEXT",
                "deliveryContext": {"isRedelivery": false},
                "replyToken": "reply-text",
                "message": {"id": "1", "type": "text", "text": "hello"}
            },
            {
                "type": "message",
                "mode": "active",
                "timestamp": 1_700_000_000_001_i64,
                "source": {"type": "group", "groupId": "G1", "userId": "U2"},
                "webhookEventId": "01HSTICKER",
                "deliveryContext": {"isRedelivery": false},
                "replyToken": "reply-sticker",
                "message": {"id": "2", "type": "sticker", "packageId": "446", "stickerId": "1988"}
            }
        ]
    })
    .to_string()
}

fn signed_headers(body: &str) -> Value {
    json!({ "x-line-signature": compute_signature(body, SECRET) })
}

fn drain(receiver: &mut LocalTaskReceiver) -> Vec<DeferredTask> {
    std::iter::from_fn(|| receiver.try_recv()).collect()
}

fn reply_body(reply_token: &str, text: &str) -> Value {
    json!({
        "replyToken": reply_token,
        "messages": [{"type": "text", "text": text}],
        "notificationDisabled": false
    })
}

async fn mount_reply(server: &MockServer, reply_token: &str, text: &str) {
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(reply_body(reply_token, text)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

async fn expect_no_reply(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

// ── Webhook receiver ───────────────────────────────────────────────────

#[tokio::test]
async fn callback_enqueues_one_task_per_event_in_order() {
    let (state, mut receiver) = local_state("http://unused");
    let body = two_event_body();

    let response = handle_callback(&state, &signed_headers(&body), &body).await;
    assert_eq!(status_code(&response), Some(200));

    let tasks = drain(&mut receiver);
    assert_eq!(tasks.len(), 2);

    let original = parse_webhook_body(&body).unwrap().events;
    for (task, event) in tasks.iter().zip(&original) {
        assert_eq!(task.path, TASK_PATH);
        let data = task_data(&task.form_body()).unwrap();
        assert_eq!(&decode_event(&data).unwrap(), event);
    }
}

#[tokio::test]
async fn callback_without_signature_is_rejected() {
    let (state, mut receiver) = local_state("http://unused");
    let body = two_event_body();

    let response = handle_callback(&state, &json!({}), &body).await;
    assert_eq!(status_code(&response), Some(400));
    assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn callback_with_bad_signature_is_rejected() {
    let (state, mut receiver) = local_state("http://unused");
    let body = two_event_body();
    let headers = json!({ "X-Line-Signature": compute_signature(&body, "wrong-secret") });

    let response = handle_callback(&state, &headers, &body).await;
    assert_eq!(status_code(&response), Some(400));
    assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn callback_with_malformed_body_is_server_error() {
    let (state, mut receiver) = local_state("http://unused");
    let body = "{\"events\": 42}";

    let response = handle_callback(&state, &signed_headers(body), body).await;
    assert_eq!(status_code(&response), Some(500));
    assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn callback_verify_request_enqueues_nothing() {
    let (state, mut receiver) = local_state("http://unused");
    let body = r#"{"destination":"Ubot","events":[]}"#;

    let response = handle_callback(&state, &signed_headers(body), body).await;
    assert_eq!(status_code(&response), Some(200));
    assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn callback_answers_ok_when_queue_is_closed() {
    let (state, receiver) = local_state("http://unused");
    drop(receiver);
    let body = two_event_body();

    let response = handle_callback(&state, &signed_headers(&body), &body).await;
    assert_eq!(status_code(&response), Some(200));
}

// ── Task processor ─────────────────────────────────────────────────────

#[tokio::test]
async fn two_event_batch_replies_with_echo_and_fallback() {
    let server = MockServer::start().await;
    mount_reply(&server, "reply-text", "hello").await;
    mount_reply(&server, "reply-sticker", UNSUPPORTED_MESSAGE_REPLY).await;

    let (state, mut receiver) = local_state(&server.uri());
    let body = two_event_body();
    handle_callback(&state, &signed_headers(&body), &body).await;

    let tasks = drain(&mut receiver);
    assert_eq!(tasks.len(), 2);
    for task in &tasks {
        let response = handle_task(&state.config, &task.form_body()).await;
        assert_eq!(response["body"], "{}");
    }
}

#[tokio::test]
async fn missing_data_sends_no_reply() {
    let server = MockServer::start().await;
    expect_no_reply(&server).await;
    let config = test_config(&server.uri());

    assert_eq!(
        process_task(&config, None).await,
        TaskOutcome::Failed(TaskStage::Received)
    );
    assert_eq!(
        process_task(&config, Some("")).await,
        TaskOutcome::Failed(TaskStage::Received)
    );

    let response = handle_task(&config, "other=1").await;
    assert_eq!(status_code(&response), Some(200));
    assert_eq!(response["body"], "");
}

#[tokio::test]
async fn undecodable_data_sends_no_reply() {
    let server = MockServer::start().await;
    expect_no_reply(&server).await;
    let config = test_config(&server.uri());

    // Not base64
    assert_eq!(
        process_task(&config, Some("@@@")).await,
        TaskOutcome::Failed(TaskStage::Decoded)
    );

    // Valid base64, but not a serialized event
    let not_an_event = TaskPayload::new("bm90IGFuIGV2ZW50");
    assert_eq!(
        process_task(&config, Some(not_an_event.as_str())).await,
        TaskOutcome::Failed(TaskStage::Decoded)
    );
}

#[tokio::test]
async fn invalid_channel_token_fails_client_construction() {
    let server = MockServer::start().await;
    expect_no_reply(&server).await;
    let mut config = test_config(&server.uri());
    config.channel_token = "bad\ntoken".to_string();

    let (state, mut receiver) = local_state(&server.uri());
    let body = two_event_body();
    handle_callback(&state, &signed_headers(&body), &body).await;
    let task = drain(&mut receiver).remove(0);

    assert_eq!(
        process_task(&config, Some(task.payload.as_str())).await,
        TaskOutcome::Failed(TaskStage::Client)
    );
}

#[tokio::test]
async fn reply_api_error_is_reported_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid reply token"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (state, mut receiver) = local_state(&server.uri());
    let body = two_event_body();
    handle_callback(&state, &signed_headers(&body), &body).await;
    let task = drain(&mut receiver).remove(0);

    assert_eq!(
        process_task(&state.config, Some(task.payload.as_str())).await,
        TaskOutcome::Failed(TaskStage::Replied)
    );
}

#[tokio::test]
async fn reply_api_error_carries_detail_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "The request body has 1 error(s)",
            "details": [{"message": "May not be empty", "property": "messages[0].text"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LineClient::new(&test_config(&server.uri())).unwrap();
    let err = client
        .reply_message("reply-1", &[SendMessage::text("")])
        .await
        .unwrap_err();

    match err {
        RelayError::ApiError(detail) => {
            assert!(detail.starts_with("400"), "{detail}");
            assert!(detail.contains("The request body has 1 error(s)"), "{detail}");
            assert!(detail.contains("messages[0].text: May not be empty"), "{detail}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn callback_keeps_events_with_unrecognised_source() {
    let server = MockServer::start().await;
    mount_reply(&server, "reply-text", "hello").await;
    mount_reply(&server, "reply-square", UNSUPPORTED_MESSAGE_REPLY).await;

    let (state, mut receiver) = local_state(&server.uri());
    let body = json!({
        "destination": "Ubot",
        "events": [
            {
                "type": "message",
                "timestamp": 1_700_000_000_000_i64,
                "source": {"type": "user", "userId": "U1"},
                "replyToken": "reply-text",
                "message": {"id": "1", "type": "text", "text": "hello"}
            },
            {
                "type": "message",
                "timestamp": 1_700_000_000_001_i64,
                "source": {"type": "square", "squareChatId": "S1", "userId": "U9"},
                "replyToken": "reply-square",
                "message": {"id": "2", "type": "poll", "question": "?"}
            }
        ]
    })
    .to_string();

    let response = handle_callback(&state, &signed_headers(&body), &body).await;
    assert_eq!(status_code(&response), Some(200));

    let tasks = drain(&mut receiver);
    assert_eq!(tasks.len(), 2);

    let square = decode_event(tasks[1].payload.as_str()).unwrap();
    assert_eq!(
        square.source.map(|s| s.source_type),
        Some(SourceType::Unknown)
    );

    for task in &tasks {
        assert_eq!(
            process_task(&state.config, Some(task.payload.as_str())).await,
            TaskOutcome::Replied
        );
    }
}

#[tokio::test]
async fn local_receiver_drives_queued_tasks_through_task_route() {
    let server = MockServer::start().await;
    mount_reply(&server, "reply-text", "hello").await;
    mount_reply(&server, "reply-sticker", UNSUPPORTED_MESSAGE_REPLY).await;

    let (state, receiver) = local_state(&server.uri());
    let body = two_event_body();
    handle_callback(&state, &signed_headers(&body), &body).await;

    // Dropping the state closes the queue so the receiver stops after the backlog
    let config = Arc::clone(&state.config);
    drop(state);

    receiver
        .run(|task| {
            let config = Arc::clone(&config);
            async move {
                let response = handle_task(&config, &task.form_body()).await;
                assert_eq!(response["body"], "{}");
            }
        })
        .await;
}

#[tokio::test]
async fn api_state_requires_task_queue_url() {
    let result = ApiState::from_config(test_config("http://unused")).await;
    match result {
        Err(RelayError::ConfigError(msg)) => assert!(msg.contains("TASK_QUEUE_URL")),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("state built without a task queue"),
    }
}

// ── Lambda routing ─────────────────────────────────────────────────────

fn proxy_event(raw_path: &str, http_method: &str, headers: Value, body: &str) -> LambdaEvent<Value> {
    LambdaEvent::new(
        json!({
            "rawPath": raw_path,
            "requestContext": {"http": {"method": http_method}},
            "headers": headers,
            "body": body,
            "isBase64Encoded": false
        }),
        Context::default(),
    )
}

#[tokio::test]
async fn lambda_routes_callback_and_task() {
    let server = MockServer::start().await;
    mount_reply(&server, "reply-text", "hello").await;

    let (state, mut receiver) = local_state(&server.uri());
    let body = two_event_body();

    let response = handler(&state, proxy_event("/callback", "POST", signed_headers(&body), &body))
        .await
        .unwrap();
    assert_eq!(status_code(&response), Some(200));

    let task = drain(&mut receiver).remove(0);
    let response = handler(&state, proxy_event("/task", "POST", json!({}), &task.form_body()))
        .await
        .unwrap();
    assert_eq!(status_code(&response), Some(200));
    assert_eq!(response["body"], "{}");
}

#[tokio::test]
async fn lambda_rejects_unknown_route_and_method() {
    let (state, _receiver) = local_state("http://unused");

    let response = handler(&state, proxy_event("/nope", "POST", json!({}), ""))
        .await
        .unwrap();
    assert_eq!(status_code(&response), Some(404));

    let response = handler(&state, proxy_event("/callback", "GET", json!({}), ""))
        .await
        .unwrap();
    assert_eq!(status_code(&response), Some(405));

    let body = two_event_body();
    let no_method = LambdaEvent::new(
        json!({
            "rawPath": "/callback",
            "headers": signed_headers(&body),
            "body": body,
            "isBase64Encoded": false
        }),
        Context::default(),
    );
    let response = handler(&state, no_method).await.unwrap();
    assert_eq!(status_code(&response), Some(405));
}

#[tokio::test]
async fn worker_lambda_processes_every_sqs_record() {
    let server = MockServer::start().await;
    mount_reply(&server, "reply-text", "hello").await;
    mount_reply(&server, "reply-sticker", UNSUPPORTED_MESSAGE_REPLY).await;

    let (state, mut receiver) = local_state(&server.uri());
    let body = two_event_body();
    handle_callback(&state, &signed_headers(&body), &body).await;

    let records: Vec<Value> = drain(&mut receiver)
        .iter()
        .enumerate()
        .map(|(i, task)| json!({"messageId": i.to_string(), "body": task.form_body()}))
        .collect();
    let event = LambdaEvent::new(json!({ "Records": records }), Context::default());

    linecho::worker::handler(&state.config, event).await.unwrap();
}
