pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod files;
pub mod handlers;
pub mod metadata;
pub mod models;
pub mod portfolio;
pub mod routes;
pub mod setup;
pub mod state;
