mod common;

use openai_bind::api::audio::{SpeechRequest, VOICE_ALLOY};
use openai_bind::api::chat::{ChatMessage, ChatRequest, Role};
use openai_bind::api::completions::CompletionRequest;
use openai_bind::api::embeddings::EmbeddingRequest;
use openai_bind::api::fine_tuning::FineTuningJobRequest;
use openai_bind::api::images::{ImageRequest, RESPONSE_FORMAT_B64_JSON};
use openai_bind::api::moderations::{ModerationRequest, MODEL_LATEST};
use openai_bind::ClientError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::client_for;

fn moderation_body(flagged: bool) -> serde_json::Value {
    let score = if flagged { 0.97 } else { 0.01 };
    json!({
        "id": "modr-1",
        "model": "text-moderation-007",
        "results": [{
            "flagged": flagged,
            "categories": {"violence": flagged},
            "category_scores": {"violence": score}
        }]
    })
}

#[tokio::test]
async fn test_moderation_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .and(body_json(json!({"input": ["hello"], "model": "stable"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "model": "stable",
            "results": [{"flagged": false, "categories": {}, "category_scores": {}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let request = ModerationRequest::new(vec!["hello".to_string()]).with_model("stable");
    let response = client.create_moderation(&request, None).await.unwrap();

    assert_eq!(response.id, "m1");
    assert_eq!(response.model, "stable");
    assert!(!response.results[0].flagged);
    assert!(response.results[0].categories.is_empty());
}

#[tokio::test]
async fn test_chat_completion_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "model": "gpt-4",
            "messages": [
                {"role": "system", "content": "You are terse."},
                {"role": "user", "content": "Hello!"}
            ],
            "temperature": 0.5,
            "user": "tester"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1677652288,
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11},
            "system_fingerprint": "fp_44709d6fcb"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let mut request = ChatRequest::new(
        "gpt-4",
        vec![ChatMessage::system("You are terse."), ChatMessage::user("Hello!")],
    );
    request.temperature = Some(0.5);
    request.user = Some("tester".to_string());

    let response = client.create_chat_completion(&request, None).await.unwrap();
    assert_eq!(response.id, "chatcmpl-123");
    assert_eq!(response.created, 1677652288);
    assert_eq!(response.choices[0].message.role, Role::Assistant);
    assert_eq!(response.first_content(), Some("Hi."));
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.total_tokens, 11);
    assert_eq!(response.system_fingerprint.as_deref(), Some("fp_44709d6fcb"));
}

#[tokio::test]
async fn test_empty_choices_is_endpoint_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cmpl-1",
            "object": "text_completion",
            "choices": []
        })))
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let error = client
        .create_completion(&CompletionRequest::new("gpt-3.5-turbo-instruct", "Say hi"), None)
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::EmptyResult("no choices in response")));
}

#[tokio::test]
async fn test_flagged_input_never_reaches_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .and(body_json(json!({"input": ["something awful"], "model": MODEL_LATEST})))
        .respond_with(ResponseTemplate::new(200).set_body_json(moderation_body(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let request = EmbeddingRequest::new("text-embedding-ada-002", vec!["something awful".into()]);
    let error = client
        .create_embeddings_moderated(&request, None)
        .await
        .unwrap_err();
    match error {
        ClientError::Flagged(moderation) => assert!(moderation.results[0].flagged),
        other => panic!("expected flagged error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unflagged_input_proceeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(moderation_body(false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"object": "embedding", "embedding": [0.25, -0.5], "index": 0}],
            "model": "text-embedding-ada-002",
            "usage": {"prompt_tokens": 2, "total_tokens": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let request = EmbeddingRequest::new("text-embedding-ada-002", vec!["kind words".into()]);
    let (embeddings, moderation) = client
        .create_embeddings_moderated(&request, None)
        .await
        .unwrap();
    assert!(!moderation.flagged());
    assert_eq!(embeddings.data[0].embedding, vec![0.25, -0.5]);
    assert_eq!(embeddings.usage.prompt_tokens, 2);
}

#[tokio::test]
async fn test_speech_returns_audio() {
    let server = MockServer::start().await;
    let audio: Vec<u8> = vec![0xff, 0xfb, 0x90, 0x64, 0x00];
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_json(json!({"model": "tts-1", "input": "Hello", "voice": "alloy"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let bytes = client
        .create_speech(&SpeechRequest::new("tts-1", "Hello", VOICE_ALLOY), None)
        .await
        .unwrap();
    assert_eq!(bytes.to_vec(), audio);
}

#[tokio::test]
async fn test_image_generation_inline_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_json(json!({
            "prompt": "a red fox",
            "n": 1,
            "response_format": "b64_json"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1589478378,
            "data": [{"b64_json": "iVBORw=="}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let mut request = ImageRequest::new("a red fox");
    request.n = Some(1);
    request.response_format = Some(RESPONSE_FORMAT_B64_JSON.to_string());
    let response = client.create_image(&request, None).await.unwrap();
    assert_eq!(response.created, 1589478378);
    assert_eq!(
        response.data[0].decode_b64().unwrap().unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );
}

#[tokio::test]
async fn test_file_content_download() {
    let server = MockServer::start().await;
    let content = b"{\"prompt\":\"a\"}\n{\"prompt\":\"b\"}\n";
    Mock::given(method("GET"))
        .and(path("/v1/files/file-xyz/content"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.jsonl");

    client
        .download_file_content("file-xyz", &target, false, None)
        .await
        .unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), content);

    let error = client
        .download_file_content("file-xyz", &target, false, None)
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::FileExists(_)));

    std::fs::write(&target, b"stale").unwrap();
    client
        .download_file_content("file-xyz", &target, true, None)
        .await
        .unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), content);
}

#[tokio::test]
async fn test_empty_file_download_writes_empty_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/files/file-empty/content"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let content = client.retrieve_file_content("file-empty", None).await.unwrap();
    assert!(content.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("empty.jsonl");
    client
        .download_file_content("file-empty", &target, false, None)
        .await
        .unwrap();
    assert!(target.exists());
    assert!(std::fs::read(&target).unwrap().is_empty());
}

#[tokio::test]
async fn test_file_listing_and_deletion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{
                "id": "file-1",
                "object": "file",
                "bytes": 120,
                "created_at": 1677610602,
                "filename": "train.jsonl",
                "purpose": "fine-tune"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/files/file-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "file-1",
            "object": "file",
            "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let files = client.list_files(None).await.unwrap();
    assert_eq!(files.data.len(), 1);
    assert_eq!(files.data[0].filename, "train.jsonl");

    let deleted = client.delete_file(&files.data[0].id, None).await.unwrap();
    assert!(deleted.deleted);
}

#[tokio::test]
async fn test_empty_model_listing_is_endpoint_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"object": "list", "data": []})),
        )
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let error = client.list_models(None).await.unwrap_err();
    assert!(matches!(error, ClientError::EmptyResult(_)));
}

#[tokio::test]
async fn test_fine_tuning_job_lifecycle() {
    let server = MockServer::start().await;
    let job = json!({
        "id": "ftjob-abc",
        "object": "fine_tuning.job",
        "created_at": 1692661014,
        "model": "gpt-3.5-turbo",
        "organization_id": "org-123",
        "status": "queued",
        "hyperparameters": {"n_epochs": "auto"},
        "training_file": "file-abc",
        "result_files": []
    });
    Mock::given(method("POST"))
        .and(path("/v1/fine_tuning/jobs"))
        .and(body_json(json!({"model": "gpt-3.5-turbo", "training_file": "file-abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(job.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/fine_tuning/jobs/ftjob-abc/events"))
        .and(query_param("after", "ftevent-1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{
                "id": "ftevent-2",
                "object": "fine_tuning.job.event",
                "created_at": 1692661015,
                "level": "info",
                "message": "Job started",
                "type": "message"
            }],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/fine_tuning/jobs/ftjob-abc/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ftjob-abc",
            "status": "cancelled"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server);
    let created = client
        .create_fine_tuning_job(&FineTuningJobRequest::new("gpt-3.5-turbo", "file-abc"), None)
        .await
        .unwrap();
    assert_eq!(created.status, "queued");
    assert_eq!(created.hyperparameters.n_epochs, Some(json!("auto")));
    assert_eq!(created.fine_tuned_model, None);

    let events = client
        .list_fine_tuning_events(&created.id, Some("ftevent-1"), Some(2), None)
        .await
        .unwrap();
    assert_eq!(events.data[0].message, "Job started");
    assert_eq!(events.data[0].event_type, "message");

    let cancelled = client
        .cancel_fine_tuning_job(&created.id, None)
        .await
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");
}
