//! Router Module Index
//!
//! Routing is split by who may call what, and access control is attached per module
//! in `create_router`.

/// Public endpoints: content reads, lead forms, login/logout.
pub mod public;

/// Admin JSON API under `/api/admin`, behind admin authentication.
pub mod admin;

/// Admin HTML pages under `/admin`, behind the session gate.
pub mod pages;
