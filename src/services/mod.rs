pub mod alert_service;
pub mod auth;
pub mod authorization;
pub mod document_service;
pub mod message_service;
pub mod organization_service;
pub mod storage;
pub mod template_service;
pub mod user_service;
