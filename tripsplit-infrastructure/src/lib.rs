#![warn(clippy::uninlined_format_args)]

pub mod document;
pub mod file_store;
pub mod ids;
pub mod memory_store;

pub use document::{DocumentError, ExpenseDocument, GroupDocument, MemberDocument, SplitModeDocument};
pub use file_store::JsonFileGroupStore;
pub use ids::UuidIdGenerator;
pub use memory_store::InMemoryGroupStore;
