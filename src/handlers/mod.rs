pub mod alerts;
pub mod auth;
pub mod documents;
pub mod messages;
pub mod organizations;
pub mod templates;
pub mod users;
