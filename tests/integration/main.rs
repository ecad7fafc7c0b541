//! HTTP-level tests driving the full router against the in-memory store.

mod helpers;

mod catalog_test;
mod log_test;
mod project_test;
