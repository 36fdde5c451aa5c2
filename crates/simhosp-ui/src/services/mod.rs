//! HTTP client helpers for the widget endpoints.

pub(crate) mod http;
