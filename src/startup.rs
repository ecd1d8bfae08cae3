use crate::{
    app_state::AppState,
    configuration::{DatabaseSettings, Settings, StorageBackend},
    email_sender::EmailSender,
    routes::{health_check, subscriptions, subscriptions_confirm, unsubscribe, weather},
    subscription_store::{InMemorySubscriptionStore, PostgresSubscriptionStore, SubscriptionStore},
    telemetry::{request_span, RequestUuid},
};
use anyhow::Context;
use axum::Router;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub struct Application {
    listener: TcpListener,
    local_addr: SocketAddr,
    app_state: AppState,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let store = get_subscription_store(&config).await?;
        let sender = config
            .email_client
            .sender()
            .map_err(|e| anyhow::anyhow!("Invalid sender email address: {e}"))?;
        let email_client = config
            .email_client
            .client()
            .context("Failed to build the email client")?;
        let weather_client = config
            .weather_client
            .client()
            .context("Failed to build the weather client")?;

        let app_state = AppState {
            store,
            email_sender: EmailSender::new(email_client, sender, config.application.base_url),
            weather_client,
        };

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            app_state,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn app_state(&self) -> AppState {
        self.app_state.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let app = router(self.app_state);

        tracing::info!("Listening on {}", self.local_addr);
        axum::serve(self.listener, app).await
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router())
        .merge(subscriptions::router())
        .merge(subscriptions_confirm::router())
        .merge(unsubscribe::router())
        .merge(weather::router())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(RequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.with_db())
}

async fn get_subscription_store(
    config: &Settings,
) -> Result<Arc<dyn SubscriptionStore>, anyhow::Error> {
    match config.application.storage {
        StorageBackend::InMemory => Ok(Arc::new(InMemorySubscriptionStore::new())),
        StorageBackend::Postgres => {
            let store = PostgresSubscriptionStore::new(get_connection_pool(&config.database));
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
