pub mod app_state;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod email_sender;
pub mod routes;
pub mod startup;
pub mod subscription_service;
pub mod subscription_store;
pub mod telemetry;
pub mod update_delivery_worker;
pub mod weather_client;
