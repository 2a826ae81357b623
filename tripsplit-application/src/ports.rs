use crate::error::StoreError;
use tripsplit_domain::{Group, GroupId};

/// Document store holding one snapshot per group.
///
/// `save` replaces the whole document; the last writer wins.
pub trait GroupStore: Send + Sync {
    fn load(&self, id: &GroupId) -> Result<Group, StoreError>;

    fn save(&self, group: &Group) -> Result<(), StoreError>;

    fn list(&self) -> Result<Vec<GroupId>, StoreError>;
}

/// Source of fresh identifiers for groups, members and expenses.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}
