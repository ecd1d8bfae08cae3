use crate::helpers::TestApp;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

fn subscriber() -> Value {
    json!({ "email": "a@b.com", "city": "Kyiv", "frequency": "daily" })
}

#[tokio::test]
async fn confirmation_without_token_is_rejected_with_a_400() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.confirm_subscription_without_token().await;

    // then
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Token is required" }));
}

#[tokio::test]
async fn confirmation_with_blank_token_is_rejected_with_a_400() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.confirm_subscription("%20%20").await;

    // then
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn confirmation_with_unknown_token_is_rejected_with_a_404() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app.confirm_subscription("nosuchtoken").await;

    // then
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Token not found" }));
}

#[tokio::test]
async fn the_link_sent_by_subscribe_returns_200_if_called() {
    // given
    let app = TestApp::spawn().await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&app.email_server)
        .await;

    app.post_subscriptions(&subscriber()).await;

    let links = app.get_confirmation_links(&app.email_server.received_requests().await.unwrap()[0]);

    // when
    let response = reqwest::get(links.html).await.unwrap();

    // then
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Subscription confirmed successfully" }));
}

#[tokio::test]
async fn subsequent_confirmations_are_rejected_with_a_404() {
    // given
    let app = TestApp::spawn().await;
    let token = app.create_unconfirmed_subscriber(&subscriber()).await;

    // when
    let first = app.confirm_subscription(&token).await;
    let second = app.confirm_subscription(&token).await;

    // then
    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 404);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Already confirmed" }));
}

#[tokio::test]
async fn confirmation_accepts_post_as_well() {
    // given
    let app = TestApp::spawn().await;
    let token = app.create_unconfirmed_subscriber(&subscriber()).await;

    // when
    let response = reqwest::Client::new()
        .post(format!("http://{}/confirm/{token}", app.address))
        .send()
        .await
        .unwrap();

    // then
    assert_eq!(response.status(), 200);
}
