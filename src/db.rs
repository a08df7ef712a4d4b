pub mod user_repo;
pub use user_repo::UserRepository;
pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
pub mod assignment_repo;
pub use assignment_repo::AssignmentDirectory;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod message_repo;
pub use message_repo::MessageRepository;
pub mod alert_repo;
pub use alert_repo::AlertRepository;
pub mod template_repo;
pub use template_repo::TemplateRepository;
