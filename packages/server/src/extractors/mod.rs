pub mod auth;
pub mod form;
pub mod record_id;
