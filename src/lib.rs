pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod list;
pub mod pages;
pub mod session;
pub mod state;
