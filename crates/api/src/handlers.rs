//! Admin-gated control/observability endpoints.

pub mod admin;
