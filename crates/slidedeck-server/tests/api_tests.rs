use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use slidedeck_server::startup::{AppState, build_router};
use slidedeck_store::{MemoryStore, SlideId, SlidePayload, SlideStore};
use tower::util::ServiceExt;

fn create_app(store: Arc<MemoryStore>) -> Router {
    build_router(AppState::new(store), "/")
}

async fn seeded_store(slides: &[Value]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for slide in slides {
        let payload = SlidePayload::try_from(slide.clone()).unwrap();
        store.insert(payload).await.unwrap();
    }
    store
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();

    (status, body)
}

#[tokio::test]
async fn list_on_empty_collection_is_an_empty_array() {
    let app = create_app(Arc::new(MemoryStore::new()));

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_every_slide_with_its_id() {
    let store = seeded_store(&[
        json!({ "mainTitle": "Intro", "order": 1 }),
        json!({ "mainTitle": "Problem", "rows": [{ "asIs": "slow", "toBe": "fast" }] }),
    ])
    .await;
    let app = create_app(store);

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let slides = body.as_array().unwrap();
    assert_eq!(slides.len(), 2);

    let mut first = slides[0].clone();
    let id = first.as_object_mut().unwrap().remove("_id").unwrap();
    assert!(id.as_str().unwrap().parse::<SlideId>().is_ok());
    assert_eq!(first, json!({ "mainTitle": "Intro", "order": 1 }));
}

#[tokio::test]
async fn every_listed_id_can_be_fetched() {
    let store = seeded_store(&[
        json!({ "title": "one" }),
        json!({ "title": "two" }),
        json!({ "title": "three" }),
    ])
    .await;
    let app = create_app(store);

    let (_, listed) = get(app.clone(), "/").await;

    for slide in listed.as_array().unwrap() {
        let id = slide["_id"].as_str().unwrap();
        let (status, fetched) = get(app.clone(), &format!("/{id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&fetched, slide);
    }
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let store = seeded_store(&[json!({ "title": "one" })]).await;
    let app = create_app(store);

    let (status, body) = get(app, &format!("/{}", SlideId::generate())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Slide not found" }));
}

#[tokio::test]
async fn malformed_id_is_a_server_error() {
    let app = create_app(Arc::new(MemoryStore::new()));

    let (status, body) = get(app, "/not-an-id").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("not-an-id"), "unexpected message: {message}");
}

#[tokio::test]
async fn unavailable_store_fails_both_routes() {
    let app = create_app(Arc::new(MemoryStore::unavailable()));

    let (status, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Document store is unavailable" }));

    let (status, body) = get(app, &format!("/{}", SlideId::generate())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Document store is unavailable" }));
}

#[tokio::test]
async fn routes_can_be_mounted_under_a_prefix() {
    let store = seeded_store(&[json!({ "title": "one" })]).await;
    let app = build_router(AppState::new(store), "/api/slides/");

    let (status, body) = get(app.clone(), "/api/slides").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let id = body[0]["_id"].as_str().unwrap();
    let (status, fetched) = get(app, &format!("/api/slides/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], json!("one"));
}
