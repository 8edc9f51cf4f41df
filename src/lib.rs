pub mod app;
pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod extension;
pub mod gallery;
pub mod history;
pub mod input;
pub mod logging;
pub mod onboarding;
pub mod palette;
pub mod prefs;
pub mod presenter;
pub mod ui;
