pub mod cache;
pub mod cancels_editor;
pub mod handoff;
pub mod lists;
pub mod mapping_editor;
pub mod pool;
pub mod raffle;

pub use cache::DataCache;
pub use cancels_editor::CancelsEditorService;
pub use handoff::HandoffService;
pub use lists::ListAdminService;
pub use mapping_editor::MappingEditorService;
pub use raffle::RaffleService;
