//! Request-scoped extractors shared by the admin endpoints.

pub mod auth;
