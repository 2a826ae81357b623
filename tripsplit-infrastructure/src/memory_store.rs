use dashmap::DashMap;
use tripsplit_application::{GroupStore, StoreError};
use tripsplit_domain::{Group, GroupId};

/// Process-local store, shareable across threads.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    groups: DashMap<GroupId, Group>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        let store = Self::new();
        for group in groups {
            store.groups.insert(group.id.clone(), group);
        }
        store
    }
}

impl GroupStore for InMemoryGroupStore {
    fn load(&self, id: &GroupId) -> Result<Group, StoreError> {
        self.groups
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&self, group: &Group) -> Result<(), StoreError> {
        self.groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<GroupId>, StoreError> {
        let mut ids: Vec<GroupId> = self.groups.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}
