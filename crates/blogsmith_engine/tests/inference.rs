use std::time::Duration;

use blogsmith_engine::{
    ApiToken, ConfigError, HuggingFaceClient, InferenceClient, InferenceFailureKind,
    InferenceSettings, TOKEN_ENV_VAR,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/test-org/test-model";

fn settings_for(server: &MockServer) -> InferenceSettings {
    InferenceSettings {
        base_url: server.uri(),
        model_id: "test-org/test-model".to_string(),
        ..InferenceSettings::default()
    }
}

fn client_for(server: &MockServer) -> HuggingFaceClient {
    HuggingFaceClient::new(settings_for(server), ApiToken::new("hf_test").unwrap()).unwrap()
}

#[tokio::test]
async fn sends_bearer_token_and_generation_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("authorization", "Bearer hf_test"))
        .and(body_partial_json(json!({
            "inputs": "Write about hybrid work",
            "parameters": {
                "max_new_tokens": 2000,
                "return_full_text": false
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_text": "\n## Hybrid Work\nBody\n" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .generate("Write about hybrid work")
        .await
        .expect("generation ok");

    assert_eq!(text, "## Hybrid Work\nBody");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).generate("prompt").await.unwrap_err();

    assert_eq!(err.kind, InferenceFailureKind::Auth);
    assert_eq!(err.message, "Invalid credentials");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("prompt").await.unwrap_err();

    assert_eq!(err.kind, InferenceFailureKind::RateLimited);
    assert!(err.is_transient());
}

#[tokio::test]
async fn model_loading_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model test-org/test-model is currently loading",
            "estimated_time": 20.0
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("prompt").await.unwrap_err();

    assert_eq!(err.kind, InferenceFailureKind::HttpStatus(503));
    assert!(err.message.contains("currently loading"));
}

#[tokio::test]
async fn empty_generation_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "" }])))
        .mount(&server)
        .await;

    let err = client_for(&server).generate("prompt").await.unwrap_err();

    assert_eq!(err.kind, InferenceFailureKind::EmptyResponse);
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "generated_text": "late" }]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let settings = InferenceSettings {
        request_timeout: Duration::from_millis(200),
        ..settings_for(&server)
    };
    let client = HuggingFaceClient::new(settings, ApiToken::new("hf_test").unwrap()).unwrap();

    let err = client.generate("prompt").await.unwrap_err();

    assert_eq!(err.kind, InferenceFailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let settings = InferenceSettings {
        base_url: format!("http://127.0.0.1:{port}"),
        ..InferenceSettings::default()
    };
    let client = HuggingFaceClient::new(settings, ApiToken::new("hf_test").unwrap()).unwrap();

    let err = client.generate("prompt").await.unwrap_err();

    assert_eq!(err.kind, InferenceFailureKind::Transport);
}

#[test]
fn missing_token_is_a_configuration_error() {
    let err = ApiToken::from_lookup(|_| None).unwrap_err();

    assert_eq!(
        err,
        ConfigError::MissingCredential {
            var: TOKEN_ENV_VAR.to_string()
        }
    );
    assert!(err.to_string().contains("HUGGINGFACEHUB_API_TOKEN"));
}
