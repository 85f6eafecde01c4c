use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_needs_no_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/health_check"))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn documents_require_bearer_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/documents"))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn documents_reject_forged_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/documents"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 401);
}
