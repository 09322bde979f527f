//! Request handlers, grouped by audience.

/// Public content reads: news, case studies, delivery options.
pub mod content;

/// Public lead intake, forwarded to the lead backend.
pub mod leads;

/// Admin session, CRUD, dashboard and the generation proxy.
pub mod admin;

/// Admin HTML pages rendered behind the session gate.
pub mod pages;
