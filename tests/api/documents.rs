use mockito::Matcher;
use serde_json::{json, Value};

use crate::helpers::{room_body, spawn_app, OWNER_EMAIL};

#[tokio::test]
async fn create_document_is_private_and_untitled() {
    let mut app = spawn_app().await;
    let create = app
        .room_api
        .mock("POST", "/v2/rooms")
        .match_body(Matcher::PartialJson(json!({
            "metadata": {"creatorId": "user_1", "email": OWNER_EMAIL, "title": "Untitled"},
            "usersAccesses": {OWNER_EMAIL: ["room:write"]},
            "defaultAccesses": []
        })))
        .with_status(200)
        .with_body(room_body("abc", "Untitled"))
        .create_async()
        .await;

    let response = app
        .client
        .post(app.url("/documents"))
        .bearer_auth(app.owner_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 201);
    let room: Value = response.json().await.unwrap();
    assert_eq!(room["metadata"]["title"], "Untitled");
    create.assert_async().await;
}

#[tokio::test]
async fn list_documents_filters_by_caller_email() {
    let mut app = spawn_app().await;
    let list = app
        .room_api
        .mock("GET", "/v2/rooms")
        .match_query(Matcher::UrlEncoded("userId".into(), OWNER_EMAIL.into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"nextCursor": null, "data": [{}, {}]}}"#,
            room_body("a", "First"),
            room_body("b", "Second")
        ))
        .create_async()
        .await;

    let response = app
        .client
        .get(app.url("/documents"))
        .bearer_auth(app.owner_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    let rooms: Vec<Value> = response.json().await.unwrap();
    assert_eq!(rooms.len(), 2);
    list.assert_async().await;
}

#[tokio::test]
async fn viewer_gets_read_only_room_view() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Plans"))
        .create_async()
        .await;

    let response = app
        .client
        .get(app.url("/documents/abc?status=loading"))
        .bearer_auth(app.viewer_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["user_type"], "viewer");
    assert_eq!(view["editor"]["editable"], false);
    assert_eq!(view["title"]["text"], "Plans");
    assert_eq!(view["title"]["view_only_badge"], true);
    assert_eq!(view["surface"], "loading");
}

#[tokio::test]
async fn outsider_is_forbidden() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Plans"))
        .create_async()
        .await;

    let response = app
        .client
        .get(app.url("/documents/abc"))
        .bearer_auth(app.signed_jwt("user_3", "u3@example.com"))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/missing")
        .with_status(404)
        .create_async()
        .await;

    let response = app
        .client
        .get(app.url("/documents/missing"))
        .bearer_auth(app.owner_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn unchanged_title_skips_room_update() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Untitled"))
        .create_async()
        .await;
    let update = app
        .room_api
        .mock("POST", "/v2/rooms/abc")
        .expect(0)
        .create_async()
        .await;

    let response = app
        .client
        .patch(app.url("/documents/abc/title"))
        .bearer_auth(app.owner_token())
        .json(&json!({"title": "Untitled"}))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    update.assert_async().await;
}

#[tokio::test]
async fn changed_title_is_persisted() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Untitled"))
        .create_async()
        .await;
    let update = app
        .room_api
        .mock("POST", "/v2/rooms/abc")
        .match_body(Matcher::Json(json!({"metadata": {"title": "Plans"}})))
        .with_status(200)
        .with_body(room_body("abc", "Plans"))
        .create_async()
        .await;

    let response = app
        .client
        .patch(app.url("/documents/abc/title"))
        .bearer_auth(app.owner_token())
        .json(&json!({"title": "Plans"}))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    let room: Value = response.json().await.unwrap();
    assert_eq!(room["metadata"]["title"], "Plans");
    update.assert_async().await;
}

#[tokio::test]
async fn viewer_cannot_rename() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Untitled"))
        .create_async()
        .await;

    let response = app
        .client
        .patch(app.url("/documents/abc/title"))
        .bearer_auth(app.viewer_token())
        .json(&json!({"title": "Mine now"}))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn failed_delete_still_redirects_to_root() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Plans"))
        .create_async()
        .await;
    let delete = app
        .room_api
        .mock("DELETE", "/v2/rooms/abc")
        .with_status(500)
        .create_async()
        .await;

    let response = app
        .client
        .delete(app.url("/documents/abc"))
        .bearer_auth(app.owner_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "/");
    delete.assert_async().await;
}

#[tokio::test]
async fn room_service_outage_is_unavailable() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("POST", "/v2/rooms")
        .with_status(502)
        .create_async()
        .await;

    let response = app
        .client
        .post(app.url("/documents"))
        .bearer_auth(app.owner_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn unverifiable_outsider_cannot_delete() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(500)
        .create_async()
        .await;
    let delete = app
        .room_api
        .mock("DELETE", "/v2/rooms/abc")
        .with_status(204)
        .expect(0)
        .create_async()
        .await;

    let response = app
        .client
        .delete(app.url("/documents/abc"))
        .bearer_auth(app.signed_jwt("user_3", "u3@example.com"))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "/");
    delete.assert_async().await;
}

#[tokio::test]
async fn viewer_cannot_delete() {
    let mut app = spawn_app().await;
    app.room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Plans"))
        .create_async()
        .await;
    let delete = app
        .room_api
        .mock("DELETE", "/v2/rooms/abc")
        .with_status(204)
        .expect(0)
        .create_async()
        .await;

    let response = app
        .client
        .delete(app.url("/documents/abc"))
        .bearer_auth(app.viewer_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 403);
    delete.assert_async().await;
}

#[tokio::test]
async fn revoked_viewer_loses_access_on_next_view() {
    let mut app = spawn_app().await;
    let shared = app
        .room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(room_body("abc", "Plans"))
        .expect(1)
        .create_async()
        .await;

    let response = app
        .client
        .get(app.url("/documents/abc"))
        .bearer_auth(app.viewer_token())
        .send()
        .await
        .expect("request sent");
    assert_eq!(response.status(), 200);
    shared.assert_async().await;
    shared.remove_async().await;

    let revoked = app
        .room_api
        .mock("GET", "/v2/rooms/abc")
        .with_status(200)
        .with_body(
            json!({
                "type": "room",
                "id": "abc",
                "metadata": {"creatorId": "user_1", "email": OWNER_EMAIL, "title": "Plans"},
                "defaultAccesses": [],
                "usersAccesses": {OWNER_EMAIL: ["room:write"]}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let response = app
        .client
        .get(app.url("/documents/abc"))
        .bearer_auth(app.viewer_token())
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 403);
    revoked.assert_async().await;
}
