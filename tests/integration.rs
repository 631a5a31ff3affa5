use futures::future::BoxFuture;
use quiz_extractor::state::{AppState, CompletionClient, CompletionError};
use quiz_extractor::{build_state, routes::build_router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TEXT: &str = "Q1: Water boils at 100 degrees Celsius at sea level. True or False?";

struct CannedCompletion {
    content: String,
    calls: AtomicUsize,
}

impl CompletionClient for CannedCompletion {
    fn complete_json(
        &self,
        _system_prompt: &str,
        _user_text: &str,
    ) -> BoxFuture<'static, Result<String, CompletionError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = self.content.clone();
        Box::pin(async move { Ok(content) })
    }
}

async fn spawn_server(state: AppState) -> (String, reqwest::Client) {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), reqwest::Client::new())
}

fn canned(content: Value) -> Arc<CannedCompletion> {
    Arc::new(CannedCompletion {
        content: content.to_string(),
        calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn liveness_route_answers_plain_text() {
    let stub = canned(json!({ "questions": [] }));
    let (base, client) = spawn_server(AppState::new(Ok(stub))).await;

    let resp = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "Backend for PDF Quiz Generator is running!");
}

#[tokio::test]
async fn extraction_round_trip_over_http() {
    let questions = json!([
        {"question": "Water boils at 100 degrees Celsius at sea level.", "options": ["True", "False"], "answer": "True"}
    ]);
    let stub = canned(json!({ "questions": questions }));
    let (base, client) = spawn_server(AppState::new(Ok(stub.clone()))).await;

    let resp = client
        .post(format!("{}/generate-questions", base))
        .json(&json!({ "text": TEXT }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap(), questions);

    let short = client
        .post(format!("{}/generate-questions", base))
        .json(&json!({ "text": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(short.status(), 400);
    assert!(short.json::<Value>().await.unwrap()["error"].is_string());

    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn any_origin_is_allowed() {
    let stub = canned(json!({ "questions": [] }));
    let (base, client) = spawn_server(AppState::new(Ok(stub))).await;

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("{}/generate-questions", base))
        .header("origin", "https://quiz.example.org")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(preflight.status().is_success());
    assert_eq!(
        preflight.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let resp = client
        .post(format!("{}/generate-questions", base))
        .header("origin", "http://localhost:3000")
        .json(&json!({ "text": TEXT }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn server_starts_without_api_key_and_refuses_extraction() {
    std::env::remove_var("OPENAI_API_KEY");
    let (base, client) = spawn_server(build_state()).await;

    let home = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(home.status(), 200);

    let resp = client
        .post(format!("{}/generate-questions", base))
        .json(&json!({ "text": TEXT }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    assert_eq!(
        resp.json::<Value>().await.unwrap(),
        json!({ "error": "OpenAI client not initialized. Check API key or server logs." })
    );
}
