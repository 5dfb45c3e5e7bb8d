//! End-to-end tests for the chat client against a mock completion service.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use draftly_ai::{ChatClient, ChatConfig, ChatError, Conversation, Message};

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::new(ChatConfig::new(
        format!("{}/v1/chat", server.uri()),
        "test-key",
    ))
}

fn conversation_with(text: &str) -> Conversation {
    let mut conversation = Conversation::new();
    conversation.push(Message::user(text));
    conversation
}

#[tokio::test]
async fn streams_deltas_in_order_and_returns_final_message() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n",
        "data: [DONE]\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let conversation = conversation_with("hi");

    let mut published = Vec::new();
    let reply = client
        .stream_reply(&conversation, "chat", |message| {
            published.push(message.content.clone());
        })
        .await
        .unwrap();

    assert_eq!(reply.content, "Hello world");
    assert_eq!(published, vec!["Hello", "Hello world"]);
}

#[tokio::test]
async fn sends_bearer_auth_and_minimal_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "draft a summary"}],
            "type": "document-help",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n", "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let conversation = conversation_with("draft a summary");

    let reply = client
        .stream_reply(&conversation, "document-help", |_| {})
        .await
        .unwrap();
    assert!(reply.content.is_empty());
}

#[tokio::test]
async fn status_429_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .stream_reply(&conversation_with("hi"), "chat", |_| {
            panic!("no delta may be published for a classified status");
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChatError::RateLimited {
            retry_after_secs: Some(7)
        }
    ));
}

#[tokio::test]
async fn status_402_maps_to_payment_required() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .stream_reply(&conversation_with("hi"), "chat", |_| {
            panic!("no delta may be published for a classified status");
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::PaymentRequired));
}

#[tokio::test]
async fn other_non_success_status_maps_to_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .stream_reply(&conversation_with("hi"), "chat", |_| {})
        .await
        .unwrap_err();

    match err {
        ChatError::Transport { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn comments_and_blank_lines_do_not_publish() {
    let server = MockServer::start().await;
    let body = concat!(
        ": keep-alive\n",
        "\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"only\"}}]}\n",
        ": trailing comment\n",
        "data: [DONE]\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut publishes = 0;
    let reply = client
        .stream_reply(&conversation_with("hi"), "chat", |_| publishes += 1)
        .await
        .unwrap();

    assert_eq!(reply.content, "only");
    assert_eq!(publishes, 1);
}
