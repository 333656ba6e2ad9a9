use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use selah_server::{app, AppState};
use selah_types::Persona;
use selah_voice::{InMemorySessionStore, LiveKitConfig, SessionStore, VoiceService};
use serde_json::{json, Value};
use tower::ServiceExt;

const TEST_URL: &str = "ws://localhost:7880";
const TEST_KEY: &str = "devkey";
const TEST_SECRET: &str = "devsecret";

fn setup_app(configured: bool) -> (axum::Router, Arc<InMemorySessionStore>) {
    let livekit = if configured {
        LiveKitConfig::new(TEST_URL, TEST_KEY, TEST_SECRET)
    } else {
        LiveKitConfig::default()
    };

    let store = Arc::new(InMemorySessionStore::new());
    let state = AppState {
        voice_service: Arc::new(VoiceService::new(livekit)),
        sessions: store.clone(),
    };

    (app(state), store)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, _) = setup_app(true);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn start_returns_a_room_name_for_every_persona() {
    let (app, store) = setup_app(true);

    for persona in Persona::ALL {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/voice/start",
                json!({"persona": persona.as_str()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], true);

        let room_name = body["roomName"].as_str().expect("roomName present");
        let suffix = room_name
            .strip_prefix(&format!("voice-{persona}-"))
            .expect("room name pattern");
        suffix.parse::<i64>().expect("numeric suffix");

        assert!(store.get(room_name).is_some(), "session registered");
    }
}

#[tokio::test]
async fn start_rejects_an_unknown_persona() {
    let (app, store) = setup_app(true);

    let response = app
        .oneshot(post_json("/api/voice/start", json!({"persona": "gabriel"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid_persona");
    assert_eq!(store.active_count(), 0);
}

#[tokio::test]
async fn start_rejects_a_missing_persona() {
    let (app, _) = setup_app(true);

    let response = app
        .oneshot(post_json("/api/voice/start", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "invalid_persona");
}

#[tokio::test]
async fn token_grants_are_scoped_to_the_requested_room() {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde::Deserialize;

    let (app, _) = setup_app(true);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/voice/token?roomName=voice-adina-1&participantId=user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], TEST_URL);

    #[derive(Deserialize)]
    struct Claims {
        video: VideoClaims,
    }

    #[derive(Deserialize)]
    struct VideoClaims {
        room: String,
        #[serde(rename = "roomJoin")]
        room_join: bool,
        #[serde(rename = "canPublish")]
        can_publish: bool,
        #[serde(rename = "canSubscribe")]
        can_subscribe: bool,
        #[serde(rename = "canPublishData")]
        can_publish_data: bool,
    }

    let token = body["token"].as_str().expect("token present");
    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(TEST_SECRET.as_bytes());
    let token_data = decode::<Claims>(token, &key, &validation).expect("Failed to decode token");

    let video = token_data.claims.video;
    assert_eq!(video.room, "voice-adina-1");
    assert!(video.room_join);
    assert!(video.can_publish);
    assert!(video.can_subscribe);
    assert!(video.can_publish_data);
}

#[tokio::test]
async fn token_requires_both_parameters() {
    let (app, _) = setup_app(true);

    for uri in [
        "/api/voice/token",
        "/api/voice/token?roomName=voice-adina-1",
        "/api/voice/token?participantId=user-1",
        "/api/voice/token?roomName=%20&participantId=user-1",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        let body = read_json(response).await;
        assert_eq!(body["error"], "invalid_argument");
    }
}

#[tokio::test]
async fn token_fails_without_credentials_and_issues_nothing() {
    let (app, _) = setup_app(false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/voice/token?roomName=voice-adina-1&participantId=user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "configuration_error");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn token_binds_the_participant_to_the_session() {
    let (app, store) = setup_app(true);

    let response = app
        .clone()
        .oneshot(post_json("/api/voice/start", json!({"persona": "rafa"})))
        .await
        .unwrap();
    let room_name = read_json(response).await["roomName"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/voice/token?roomName={room_name}&participantId=user-77"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session = store.get(&room_name).expect("session present");
    assert_eq!(session.participant_identity, Some("user-77".to_string()));
}

#[tokio::test]
async fn end_is_idempotent() {
    let (app, store) = setup_app(true);

    let response = app
        .clone()
        .oneshot(post_json("/api/voice/start", json!({"persona": "adina"})))
        .await
        .unwrap();
    let room_name = read_json(response).await["roomName"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(store.active_count(), 1);

    // First end removes the entry.
    let response = app
        .clone()
        .oneshot(post_json("/api/voice/end", json!({"roomName": &room_name})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["ok"], true);
    assert_eq!(store.active_count(), 0);

    // Second end for the same room still succeeds.
    let response = app
        .clone()
        .oneshot(post_json("/api/voice/end", json!({"roomName": &room_name})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["ok"], true);

    // As does ending a room that never existed.
    let response = app
        .oneshot(post_json(
            "/api/voice/end",
            json!({"roomName": "voice-rafa-0"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["ok"], true);
}

#[tokio::test]
async fn test_connection_reports_presence_flags() {
    let (app, _) = setup_app(true);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/voice/test-connection")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], true);
    assert_eq!(body["apiKey"], true);
    assert_eq!(body["apiSecret"], true);
}

#[tokio::test]
async fn test_connection_fails_on_incomplete_config() {
    let (app, _) = setup_app(false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/voice/test-connection")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["url"], false);
    assert_eq!(body["apiKey"], false);
    assert_eq!(body["apiSecret"], false);
}
