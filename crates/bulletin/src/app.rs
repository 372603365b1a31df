use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        comments::{add_comment, like_comment, list_comments},
        events::{like_event, list_events, upsert_event},
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/event", get(list_events).post(upsert_event))
        .route("/event/like", post(like_event))
        .route("/event/comment", post(add_comment))
        .route("/event/comments", get(list_comments))
        .route("/event/comment/like", post(like_comment))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, json)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create_event(app: &Router, name: &str) -> Value {
        let (status, event) = send(
            app,
            post_json(
                "/api/event",
                json!({ "name": name, "description": "desc", "img_link": "https://img" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        event
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::default());
        let (status, _) = send(&app, get_request("/livez")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_events_empty() {
        let app = create_app(AppState::default());

        let (status, json) = send(&app, get_request("/api/event")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!([]));
    }

    #[tokio::test]
    async fn test_create_update_and_list_event() {
        let app = create_app(AppState::default());

        let event = create_event(&app, "Test Event").await;
        assert_eq!(event["name"], "Test Event");
        assert_eq!(event["number_of_likes"], 0);
        let uqid = event["uqid"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            post_json("/api/event", json!({ "uqid": uqid, "name": "Renamed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["uqid"], uqid.as_str());
        assert_eq!(updated["name"], "Renamed");
        assert_eq!(updated["description"], "desc");

        let (_, events) = send(&app, get_request("/api/event")).await;
        assert_eq!(events.as_array().unwrap().len(), 1);
        assert!(events[0].get("comments").is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_event_is_404() {
        let app = create_app(AppState::default());

        let (status, json) = send(
            &app,
            post_json(
                "/api/event",
                json!({ "uqid": uuid::Uuid::new_v4(), "name": "Ghost" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_like_event_twice() {
        let app = create_app(AppState::default());
        let event = create_event(&app, "Test Event").await;

        for _ in 0..2 {
            let (status, json) = send(
                &app,
                post_json("/api/event/like", json!({ "uqid": event["uqid"] })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json, json!({ "success": true }));
        }

        let (_, events) = send(&app, get_request("/api/event")).await;
        assert_eq!(events[0]["number_of_likes"], 2);
    }

    #[tokio::test]
    async fn test_like_without_uqid_is_400() {
        let app = create_app(AppState::default());

        let (status, _) = send(&app, post_json("/api/event/like", json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_comment_flow() {
        let app = create_app(AppState::default());
        let event = create_event(&app, "Test Event").await;
        let event_uqid = event["uqid"].as_str().unwrap().to_string();

        for text in ["C1", "C2", "C3"] {
            let (status, json) = send(
                &app,
                post_json(
                    "/api/event/comment",
                    json!({ "uqid": event_uqid, "user": "ash", "text": text }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["success"], true);
            assert!(json["comment_uqid"].is_string());
        }

        let (status, first) = send(
            &app,
            get_request(&format!("/api/event/comments?uqid={event_uqid}&limit=2")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["comments"].as_array().unwrap().len(), 2);
        assert_eq!(first["comments"][0]["text"], "C1");
        let cursor = first["next_cursor"].as_str().unwrap().to_string();

        let (_, second) = send(
            &app,
            get_request(&format!(
                "/api/event/comments?uqid={event_uqid}&limit=2&cursor={cursor}"
            )),
        )
        .await;
        assert_eq!(second["comments"].as_array().unwrap().len(), 1);
        assert_eq!(second["comments"][0]["text"], "C3");
        assert_eq!(second["next_cursor"], Value::Null);

        let comment_uqid = second["comments"][0]["uqid"].clone();
        let (status, json) = send(
            &app,
            post_json(
                "/api/event/comment/like",
                json!({ "comment_uqid": comment_uqid }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "success": true }));

        let (_, page) = send(
            &app,
            get_request(&format!("/api/event/comments?uqid={event_uqid}")),
        )
        .await;
        assert_eq!(page["comments"][2]["number_of_likes"], 1);
    }

    #[tokio::test]
    async fn test_garbage_cursor_returns_first_page() {
        let app = create_app(AppState::default());
        let event = create_event(&app, "Test Event").await;
        let event_uqid = event["uqid"].as_str().unwrap().to_string();
        send(
            &app,
            post_json(
                "/api/event/comment",
                json!({ "uqid": event_uqid, "user": "ash", "text": "hi" }),
            ),
        )
        .await;

        let (status, page) = send(
            &app,
            get_request(&format!(
                "/api/event/comments?uqid={event_uqid}&cursor=garbage"
            )),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["comments"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_400() {
        let app = create_app(AppState::default());

        let (status, json) = send(
            &app,
            post_json("/api/event/like", json!({ "uqid": "not-a-uuid" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_400() {
        let app = create_app(AppState::default());
        let event_uqid = uuid::Uuid::new_v4();

        let (status, json) = send(
            &app,
            get_request(&format!("/api/event/comments?uqid={event_uqid}&limit=many")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_comments_without_event_uqid_is_400() {
        let app = create_app(AppState::default());

        let (status, _) = send(&app, get_request("/api/event/comments")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_like_unknown_comment_is_404() {
        let app = create_app(AppState::default());

        let (status, _) = send(
            &app,
            post_json(
                "/api/event/comment/like",
                json!({ "comment_uqid": uuid::Uuid::new_v4() }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
