use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use exam_assist_backend::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const BOUNDARY: &str = "exam-assist-test-boundary";

fn setup_app(config: Config) -> Router {
    let state = AppState::new(&config).expect("app state");
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/generate-questions",
            get(routes::generation::generation_info).post(routes::generation::generate_questions),
        )
        .route(
            "/extract-text",
            get(routes::extraction::extraction_info).post(routes::extraction::extract_text),
        )
        .with_state(state)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let res = app.oneshot(req).await.expect("response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

fn json_request(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn material() -> String {
    "Plate tectonics describes the large-scale motion of the lithosphere. Oceanic crust forms at \
     mid-ocean ridges and is recycled at subduction zones, producing earthquakes and volcanoes."
        .to_string()
}

#[tokio::test]
async fn health_reports_no_providers_without_keys() {
    let app = setup_app(Config::default());
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["aiProviders"], json!([]));
}

#[tokio::test]
async fn generation_descriptor_lists_capabilities() {
    let config = Config {
        gemini_api_key: Some("gm-test".into()),
        ..Config::default()
    };
    let app = setup_app(config);
    let req = Request::builder()
        .uri("/generate-questions")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["supportedQuestionTypes"],
        json!(["multiple-choice", "fill-blank", "true-false", "essay"])
    );
    assert_eq!(body["questionCount"], json!({ "min": 1, "max": 10 }));
    assert_eq!(body["providers"], json!(["gemini"]));
    assert_eq!(body["templateFallback"], true);
}

#[tokio::test]
async fn generates_template_essays_without_providers() {
    let app = setup_app(Config::default());
    let req = json_request(
        "/generate-questions",
        json!({
            "material": "x".repeat(50),
            "questionType": "essay",
            "questionCount": 3
        }),
    );
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["provider"], "template");
    assert_eq!(body["metadata"]["usedFallback"], true);
    assert_eq!(body["metadata"]["difficulty"], "medium");

    let questions = body["data"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    for q in questions {
        assert!(!q["question"].as_str().unwrap().is_empty());
        assert!(!q["explanation"].as_str().unwrap().is_empty());
        assert!(q.get("options").is_none());
        assert!(q.get("correctAnswer").is_none());
    }
}

#[tokio::test]
async fn template_output_matches_requested_count_for_every_type() {
    for question_type in ["multiple-choice", "fill-blank", "true-false", "essay"] {
        for count in [1, 4, 10] {
            let app = setup_app(Config::default());
            let req = json_request(
                "/generate-questions",
                json!({
                    "material": material(),
                    "questionType": question_type,
                    "questionCount": count,
                    "difficulty": "hard"
                }),
            );
            let (status, body) = send(app, req).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body["data"]["questions"].as_array().unwrap().len(),
                count as usize
            );
            assert_eq!(body["metadata"]["questionType"], question_type);
        }
    }
}

#[tokio::test]
async fn rejects_invalid_generation_requests() {
    let cases = [
        json!({ "material": "too short", "questionType": "essay", "questionCount": 3 }),
        json!({ "material": material(), "questionType": "matching", "questionCount": 3 }),
        json!({ "material": material(), "questionType": "essay", "questionCount": 0 }),
        json!({ "material": material(), "questionType": "essay", "questionCount": 11 }),
        json!({ "material": material(), "questionType": "essay", "questionCount": 2, "difficulty": "brutal" }),
        json!({ "questionType": "essay", "questionCount": 2 }),
    ];

    for case in cases {
        let app = setup_app(Config::default());
        let (status, body) = send(app, json_request("/generate-questions", case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case: {case}");
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = setup_app(Config::default());
    let req = Request::builder()
        .method("POST")
        .uri("/generate-questions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn no_provider_and_no_fallback_is_server_error() {
    let config = Config {
        template_fallback_enabled: false,
        ..Config::default()
    };
    let app = setup_app(config);
    let req = json_request(
        "/generate-questions",
        json!({ "material": material(), "questionType": "true-false", "questionCount": 2 }),
    );
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        exam_assist_backend::error::PROVIDER_UNAVAILABLE_MESSAGE
    );
}

#[tokio::test]
async fn extracts_text_from_txt_upload() {
    let app = setup_app(Config::default());
    let req = multipart_request(
        "file",
        "lecture.txt",
        "text/plain",
        b"Newton's second law relates force, mass and acceleration.",
    );
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["text"],
        "Newton's second law relates force, mass and acceleration."
    );
    assert_eq!(body["filename"], "lecture.txt");
    assert_eq!(body["fileType"], "text/plain");
}

#[tokio::test]
async fn tiny_txt_upload_is_empty_extraction() {
    let app = setup_app(Config::default());
    let (status, body) = send(app, multipart_request("file", "hi.txt", "text/plain", b"Hi")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["details"], "hi.txt");
}

#[tokio::test]
async fn rejects_mismatched_uploads() {
    let cases = [
        ("setup.exe", "application/pdf"),
        ("slides.pdf", "text/plain"),
        ("notes.txt", "application/octet-stream"),
    ];
    for (filename, content_type) in cases {
        let app = setup_app(Config::default());
        let req = multipart_request("file", filename, content_type, b"%PDF-1.4 some bytes here");
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{filename} as {content_type}");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn rejects_uploads_over_the_size_limit() {
    let config = Config {
        max_upload_bytes: 64,
        ..Config::default()
    };
    let app = setup_app(config);
    let data = vec![b'a'; 65];
    let (status, body) = send(app, multipart_request("file", "big.txt", "text/plain", &data)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("too large"));
}

#[tokio::test]
async fn missing_file_field_is_bad_request() {
    let app = setup_app(Config::default());
    let req = multipart_request("document", "notes.txt", "text/plain", b"plenty of text in here");
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn truncated_multipart_body_is_bad_request() {
    let app = setup_app(Config::default());
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nthe upload stops here"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn extraction_descriptor_lists_formats() {
    let app = setup_app(Config::default());
    let req = Request::builder()
        .uri("/extract-text")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supportedExtensions"], json!([".pdf", ".docx", ".txt"]));
    assert_eq!(body["maxFileSize"], 10 * 1024 * 1024);
    assert_eq!(body["minTextLength"], 10);
}
