use reqwest::Client;
use responder_core::storage::JsonFileStorage;
use responder_core::QuestionRepository;
use responder_server::api::create_router;
use responder_server::api::handlers::AppState;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

struct TestApp {
    base_url: String,
    storage_file: PathBuf,
    _tmp: TempDir,
}

async fn spawn_app() -> TestApp {
    spawn_app_with_document(json!([])).await
}

async fn spawn_app_with_document(document: Value) -> TestApp {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let storage_file = tmp.path().join("questions.json");
    std::fs::write(&storage_file, document.to_string()).expect("Failed to seed document");
    spawn_app_on(tmp, storage_file).await
}

async fn spawn_app_on(tmp: TempDir, storage_file: PathBuf) -> TestApp {
    let prometheus_handle =
        match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(_) => metrics_exporter_prometheus::PrometheusBuilder::new()
                .build_recorder()
                .handle(),
        };

    let state = AppState {
        repo: Arc::new(QuestionRepository::new(JsonFileStorage::new(&storage_file))),
        storage_path: storage_file.display().to_string(),
        prometheus_handle,
        start_time: std::time::Instant::now(),
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base_url,
        storage_file,
        _tmp: tmp,
    }
}

fn client() -> Client {
    Client::new()
}

fn seeded_document() -> Value {
    json!([
        {
            "id": "3f1d7a52-8c4e-4b7a-9e2f-0a6b5c4d3e21",
            "summary": "What is my name?",
            "author": "Jack London",
            "answers": [
                { "id": "b2c7e0f4-1a3d-4e5f-8a9b-c0d1e2f3a4b5", "summary": "Who knows", "author": "Some guy" }
            ]
        },
        {
            "id": "7e9a1c3b-5d2f-4a6e-8b0c-1d2e3f4a5b6c",
            "summary": "Who are you?",
            "author": "Tim Doods",
            "answers": []
        }
    ])
}

fn persisted(app: &TestApp) -> Value {
    let raw = std::fs::read_to_string(&app.storage_file).unwrap();
    serde_json::from_str(&raw).unwrap()
}

async fn post_question(app: &TestApp, body: Value) -> reqwest::Response {
    client()
        .post(format!("{}/questions", app.base_url))
        .json(&body)
        .send()
        .await
        .expect("Failed to post question")
}

async fn post_answer(app: &TestApp, question_id: &str, body: Value) -> reqwest::Response {
    client()
        .post(format!("{}/questions/{}/answers", app.base_url, question_id))
        .json(&body)
        .send()
        .await
        .expect("Failed to post answer")
}

// ========== Service endpoints ==========

#[tokio::test]
async fn index_returns_welcome() {
    let app = spawn_app().await;

    let resp = client().get(&app.base_url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["cache-control"], "no-store");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to responder!");
}

#[tokio::test]
async fn health_returns_ok() {
    let app = spawn_app().await;

    let resp = client()
        .get(format!("{}/health", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

// ========== Questions ==========

#[tokio::test]
async fn list_questions_empty() {
    let app = spawn_app().await;

    let resp = client()
        .get(format!("{}/questions", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Vec<Value> = resp.json().await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn list_questions_returns_document_in_order() {
    let app = spawn_app_with_document(seeded_document()).await;

    let resp = client()
        .get(format!("{}/questions", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, seeded_document());
}

#[tokio::test]
async fn get_question_by_id() {
    let app = spawn_app_with_document(seeded_document()).await;
    let expected = seeded_document()[0].clone();

    let resp = client()
        .get(format!(
            "{}/questions/{}",
            app.base_url,
            expected["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, expected);
}

#[tokio::test]
async fn get_question_not_found() {
    let app = spawn_app_with_document(seeded_document()).await;

    let resp = client()
        .get(format!("{}/questions/uuid", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn create_question_then_list() {
    let app = spawn_app().await;

    let resp = post_question(
        &app,
        json!({ "author": "Jack London", "summary": "What is my name?" }),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["author"], "Jack London");
    assert_eq!(created["summary"], "What is my name?");
    assert_eq!(created["answers"], json!([]));
    let id = created["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let resp = client()
        .get(format!("{}/questions", app.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([created.clone()]));
    assert_eq!(persisted(&app), json!([created]));
}

#[tokio::test]
async fn create_question_accepts_form_body() {
    let app = spawn_app().await;

    let resp = client()
        .post(format!("{}/questions", app.base_url))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("author=Jack+London&summary=What+is+my+name%3F")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["summary"], "What is my name?");
}

#[tokio::test]
async fn create_question_rejects_missing_or_empty_fields() {
    let app = spawn_app_with_document(seeded_document()).await;

    for body in [
        json!({ "summary": "What is my name?" }),
        json!({ "author": "Jack London" }),
        json!({ "author": "", "summary": "What is my name?" }),
        json!({ "author": "Jack London", "summary": null }),
        json!({}),
    ] {
        let resp = post_question(&app, body).await;
        assert_eq!(resp.status(), 401);
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"], "Invalid author or summary");
    }
    assert_eq!(persisted(&app), seeded_document());
}

#[tokio::test]
async fn create_question_without_body_is_rejected() {
    let app = spawn_app().await;

    let resp = client()
        .post(format!("{}/questions", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn create_question_empty_json_body_is_rejected() {
    let app = spawn_app().await;

    let resp = client()
        .post(format!("{}/questions", app.base_url))
        .header("content-type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Invalid author or summary");
    assert_eq!(persisted(&app), json!([]));
}

#[tokio::test]
async fn create_question_non_text_fields_are_rejected() {
    let app = spawn_app().await;

    for body in [
        json!({ "author": 0, "summary": "What is my name?" }),
        json!({ "author": "Jack London", "summary": false }),
        json!({ "author": ["Jack"], "summary": { "text": "s" } }),
        json!(["Jack London", "What is my name?"]),
    ] {
        let resp = post_question(&app, body).await;
        assert_eq!(resp.status(), 401);
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"], "Invalid author or summary");
    }
    assert_eq!(persisted(&app), json!([]));
}

#[tokio::test]
async fn create_question_malformed_json() {
    let app = spawn_app().await;

    let resp = client()
        .post(format!("{}/questions", app.base_url))
        .header("content-type", "application/json")
        .body("{\"author\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// ========== Answers ==========

#[tokio::test]
async fn list_answers_for_question() {
    let app = spawn_app_with_document(seeded_document()).await;
    let question = &seeded_document()[0];

    let resp = client()
        .get(format!(
            "{}/questions/{}/answers",
            app.base_url,
            question["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, question["answers"]);
}

#[tokio::test]
async fn list_answers_unknown_question() {
    let app = spawn_app_with_document(seeded_document()).await;

    let resp = client()
        .get(format!("{}/questions/uuid/answers", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn get_answer_by_id() {
    let app = spawn_app_with_document(seeded_document()).await;
    let question = &seeded_document()[0];
    let answer = &question["answers"][0];

    let resp = client()
        .get(format!(
            "{}/questions/{}/answers/{}",
            app.base_url,
            question["id"].as_str().unwrap(),
            answer["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(&body, answer);
}

#[tokio::test]
async fn get_answer_not_found_cases() {
    let app = spawn_app_with_document(seeded_document()).await;
    let doc = seeded_document();
    let q0 = doc[0]["id"].as_str().unwrap();
    let q1 = doc[1]["id"].as_str().unwrap();
    let a0 = doc[0]["answers"][0]["id"].as_str().unwrap();

    for (qid, aid) in [("uuid", a0), (q0, "uuid"), (q1, a0)] {
        let resp = client()
            .get(format!("{}/questions/{}/answers/{}", app.base_url, qid, aid))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404, "question {qid}, answer {aid}");
    }
}

#[tokio::test]
async fn create_answer_appends_to_question() {
    let app = spawn_app_with_document(seeded_document()).await;
    let doc = seeded_document();
    let qid = doc[0]["id"].as_str().unwrap();

    let resp = post_answer(&app, qid, json!({ "author": "Jane", "summary": "Forty-two" })).await;
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["author"], "Jane");
    assert_eq!(created["summary"], "Forty-two");
    assert!(created.get("answers").is_none());

    let after = persisted(&app);
    assert_eq!(after[1], doc[1]);
    assert_eq!(after[0]["answers"][0], doc[0]["answers"][0]);
    assert_eq!(after[0]["answers"][1], created);
    assert_eq!(after[0]["answers"].as_array().unwrap().len(), 2);

    let resp = client()
        .get(format!(
            "{}/questions/{}/answers/{}",
            app.base_url,
            qid,
            created["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn create_answer_unknown_question() {
    let app = spawn_app_with_document(seeded_document()).await;

    let resp = post_answer(&app, "uuid", json!({ "author": "Jane", "summary": "Forty-two" })).await;
    assert_eq!(resp.status(), 401);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Invalid questionId");
    assert_eq!(persisted(&app), seeded_document());
}

#[tokio::test]
async fn create_answer_rejects_empty_fields() {
    let app = spawn_app_with_document(seeded_document()).await;
    let qid = seeded_document()[1]["id"].as_str().unwrap().to_string();

    let resp = post_answer(&app, &qid, json!({ "author": "Jane", "summary": "" })).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(persisted(&app), seeded_document());
}

#[tokio::test]
async fn create_answer_empty_json_body_is_rejected() {
    let app = spawn_app_with_document(seeded_document()).await;
    let qid = seeded_document()[0]["id"].as_str().unwrap().to_string();

    let resp = client()
        .post(format!("{}/questions/{}/answers", app.base_url, qid))
        .header("content-type", "application/json")
        .body("")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = post_answer(&app, &qid, json!({ "author": 42, "summary": "Forty-two" })).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(persisted(&app), seeded_document());
}

// ========== Storage ==========

#[tokio::test]
async fn concurrent_creates_are_all_persisted() {
    let app = Arc::new(spawn_app().await);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                let resp = post_question(
                    &app,
                    json!({ "author": format!("author {i}"), "summary": "concurrent" }),
                )
                .await;
                assert_eq!(resp.status(), 200);
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(persisted(&app).as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn malformed_document_returns_500() {
    let tmp = TempDir::new().unwrap();
    let storage_file = tmp.path().join("questions.json");
    std::fs::write(&storage_file, "not json").unwrap();
    let app = spawn_app_on(tmp, storage_file).await;

    let resp = client()
        .get(format!("{}/questions", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Storage failure");
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let app = spawn_app().await;
    post_question(&app, json!({ "author": "a", "summary": "s" })).await;

    let resp = client()
        .get(format!("{}/metrics", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}
