pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod pages;
pub mod routes;
pub mod session;
pub mod shell;
pub mod terminal;
pub mod ui;
