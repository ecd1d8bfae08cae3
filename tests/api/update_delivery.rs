use crate::helpers::TestApp;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, method, path},
    Mock, ResponseTemplate,
};

fn subscriber(email: &str) -> Value {
    json!({ "email": email, "city": "Kyiv", "frequency": "daily" })
}

async fn mount_weather(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {
                "temp_c": 18.0,
                "humidity": 50,
                "condition": { "text": "Clear" }
            }
        })))
        .mount(&app.weather_server)
        .await;
}

#[tokio::test]
async fn confirmed_subscribers_receive_one_update_per_period() {
    // given
    let app = TestApp::spawn().await;
    app.create_confirmed_subscriber(&subscriber("a@b.com")).await;
    mount_weather(&app).await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // when
    app.dispatch_all_pending_updates().await;
    app.dispatch_all_pending_updates().await;

    // then
    let requests = app.email_server.received_requests().await.unwrap();
    let update: Value = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
    assert_eq!(update["subject"], "Weather update for Kyiv");
    assert_eq!(update["personalizations"][0]["to"][0]["email"], "a@b.com");
}

#[tokio::test]
async fn pending_subscribers_receive_no_updates() {
    // given
    let app = TestApp::spawn().await;
    app.create_unconfirmed_subscriber(&subscriber("a@b.com")).await;
    mount_weather(&app).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // when
    app.dispatch_all_pending_updates().await;
}

#[tokio::test]
async fn a_failing_weather_provider_does_not_stall_delivery() {
    // given
    let app = TestApp::spawn().await;
    app.create_confirmed_subscriber(&subscriber("a@b.com")).await;
    app.create_confirmed_subscriber(&subscriber("c@d.com")).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&app.weather_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // when
    app.dispatch_all_pending_updates().await;
}
