pub mod file_draft_repository;
pub mod in_memory_draft_repository;

pub use file_draft_repository::FileDraftRepository;
pub use in_memory_draft_repository::InMemoryDraftRepository;
