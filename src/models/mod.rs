pub mod alert;
pub mod auth;
pub mod document;
pub mod message;
pub mod organization;
pub mod template;
