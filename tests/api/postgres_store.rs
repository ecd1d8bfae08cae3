//! These run against the Postgres server from `configuration/`, each test on
//! a fresh database. Run them with `cargo test -- --ignored`.

use crate::helpers::{configure_database, TestApp};
use claims::{assert_none, assert_ok, assert_ok_eq, assert_some};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use weather_subscriptions::{
    domain::{City, Frequency, NewSubscription, SubscriberEmail, SubscriptionToken},
    subscription_store::{Confirmation, InsertError, PostgresSubscriptionStore, SubscriptionStore},
};

fn new_subscription(email: &str, frequency: Frequency) -> NewSubscription {
    NewSubscription {
        email: SubscriberEmail::parse(email.into()).unwrap(),
        city: City::parse("Kyiv".into()).unwrap(),
        frequency,
    }
}

async fn store() -> PostgresSubscriptionStore {
    PostgresSubscriptionStore::new(configure_database().await)
}

async fn confirmed(store: &PostgresSubscriptionStore, email: &str, frequency: Frequency) {
    let token = SubscriptionToken::generate();
    store
        .insert_pending(&new_subscription(email, frequency), &token)
        .await
        .unwrap();
    assert_ok_eq!(store.confirm(&token).await, Confirmation::Confirmed);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn a_duplicate_email_maps_to_email_taken() {
    // given
    let store = store().await;
    let subscription = new_subscription("a@b.com", Frequency::Daily);
    assert_ok!(
        store
            .insert_pending(&subscription, &SubscriptionToken::generate())
            .await
    );

    // when
    let result = store
        .insert_pending(&subscription, &SubscriptionToken::generate())
        .await;

    // then
    assert!(matches!(result, Err(InsertError::EmailTaken)));
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn a_token_confirms_once_and_then_removes_its_subscription() {
    // given
    let store = store().await;
    let token = SubscriptionToken::generate();
    store
        .insert_pending(&new_subscription("a@b.com", Frequency::Hourly), &token)
        .await
        .unwrap();

    // when
    let first = store.confirm(&token).await;
    let second = store.confirm(&token).await;
    let removed = store.remove(&token).await;
    let removed_again = store.remove(&token).await;

    // then
    assert_ok_eq!(first, Confirmation::Confirmed);
    assert_ok_eq!(second, Confirmation::AlreadyConfirmed);
    assert_ok_eq!(removed, true);
    assert_ok_eq!(removed_again, false);
    assert_ok_eq!(store.confirm(&token).await, Confirmation::TokenNotFound);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn pending_subscriptions_are_never_due() {
    // given
    let store = store().await;
    store
        .insert_pending(
            &new_subscription("a@b.com", Frequency::Hourly),
            &SubscriptionToken::generate(),
        )
        .await
        .unwrap();

    // when
    let due = store.claim_due_update(OffsetDateTime::now_utc()).await;

    // then
    assert_none!(due.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn claimed_subscriptions_come_due_again_after_their_period() {
    // given
    let store = store().await;
    let now = OffsetDateTime::now_utc();
    confirmed(&store, "hourly@b.com", Frequency::Hourly).await;
    confirmed(&store, "daily@b.com", Frequency::Daily).await;

    // when
    let first = assert_some!(store.claim_due_update(now).await.unwrap());
    let second = assert_some!(store.claim_due_update(now).await.unwrap());
    let right_after = store.claim_due_update(now).await.unwrap();
    let an_hour_later = assert_some!(store
        .claim_due_update(now + Duration::hours(1))
        .await
        .unwrap());
    let still_an_hour_later = store
        .claim_due_update(now + Duration::hours(1))
        .await
        .unwrap();
    let a_day_later = store
        .claim_due_update(now + Duration::days(1))
        .await
        .unwrap();

    // then
    assert_eq!(first.email.as_ref(), "hourly@b.com");
    assert_eq!(second.email.as_ref(), "daily@b.com");
    assert_none!(right_after);
    assert_eq!(an_hour_later.email.as_ref(), "hourly@b.com");
    assert_none!(still_an_hour_later);
    assert_some!(a_day_later);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn concurrent_workers_never_claim_the_same_subscription() {
    // given
    let store = store().await;
    let now = OffsetDateTime::now_utc();
    confirmed(&store, "a@b.com", Frequency::Daily).await;

    // when
    let (first, second) = tokio::join!(store.claim_due_update(now), store.claim_due_update(now));

    // then
    let outcomes = [first.unwrap(), second.unwrap()];
    assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn the_subscription_lifecycle_works_on_postgres() {
    // given
    let app = TestApp::spawn_with_postgres().await;
    let body = json!({ "email": "a@b.com", "city": "Kyiv", "frequency": "daily" });
    let token = app.create_unconfirmed_subscriber(&body).await;

    // when
    let confirmed = app.confirm_subscription(&token).await;
    let confirmed_again = app.confirm_subscription(&token).await;
    let duplicate = app.post_subscriptions(&body).await;
    let unsubscribed = app.unsubscribe(&token).await;

    // then
    assert_eq!(confirmed.status(), 200);
    assert_eq!(confirmed_again.status(), 404);
    let error: Value = confirmed_again.json().await.unwrap();
    assert_eq!(error, json!({ "error": "Already confirmed" }));
    assert_eq!(duplicate.status(), 409);
    assert_eq!(unsubscribed.status(), 200);
}
