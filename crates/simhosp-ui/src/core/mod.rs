//! Core, DOM-free primitives for the dashboard widgets.
pub mod config;
pub mod drag;
pub mod poll;
pub mod requests;
pub mod scale;
pub mod scene;
pub mod slider;
pub mod starter;
