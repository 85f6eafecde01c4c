pub mod actions;
pub mod auth;
pub mod configuration;
pub mod error;
pub mod room;
pub mod room_api;
pub mod room_view;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod title_edit;
pub mod view_cache;
