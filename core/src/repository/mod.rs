pub mod file;
pub mod memory;
pub mod path;
pub mod traits;
mod tree;
pub mod user_data;

// Re-export
pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use path::StorePath;
pub use traits::{DocumentStore, Subscriber, SubscriptionId};
pub use user_data::{ConfigRepository, RecordRepository};
