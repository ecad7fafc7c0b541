//! Tower and Axum middleware applied to every route.

pub mod cors;
pub mod logging;
