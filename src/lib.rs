pub mod app;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod output;
