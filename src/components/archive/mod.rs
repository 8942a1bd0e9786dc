pub mod aggregate;
pub mod enrich;
pub mod models;
pub mod paginate;

pub use aggregate::fetch_all_group_events;
pub use enrich::embed_images;
pub use models::{ArchiveDocument, EventRecord, GroupArchive};
