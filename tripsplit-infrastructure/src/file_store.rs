use crate::document::GroupDocument;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tripsplit_application::{GroupStore, StoreError};
use tripsplit_domain::{Group, GroupId};

const EXTENSION: &str = "json";

/// One `<group-id>.json` document per group inside a directory.
///
/// Saves go through a temporary file in the same directory followed by a
/// rename, so readers only ever see a complete document.
#[derive(Debug, Clone)]
pub struct JsonFileGroupStore {
    dir: PathBuf,
}

impl JsonFileGroupStore {
    /// Opens `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &GroupId) -> Result<PathBuf, StoreError> {
        let raw = id.as_str();
        let is_plain_name = !raw.is_empty()
            && !raw.starts_with('.')
            && !raw.contains(['/', '\\'])
            && raw != "..";
        if !is_plain_name {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("group id `{raw}` cannot be used as a file name"),
            )));
        }
        Ok(self.dir.join(format!("{raw}.{EXTENSION}")))
    }

    /// The temp file is removed on drop if anything fails before `persist`.
    fn write_atomic(&self, target: &Path, contents: &str) -> io::Result<()> {
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(target).map_err(|err| err.error)?;
        Ok(())
    }
}

impl GroupStore for JsonFileGroupStore {
    fn load(&self, id: &GroupId) -> Result<Group, StoreError> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        let group = GroupDocument::from_json(&json).map_err(|err| StoreError::Corrupt {
            id: id.clone(),
            detail: err.to_string(),
        })?;
        if &group.id != id {
            return Err(StoreError::Corrupt {
                id: id.clone(),
                detail: format!("document declares id `{}`", group.id),
            });
        }

        tracing::debug!(
            group_id = %id,
            members = group.members.len(),
            expenses = group.expenses.len(),
            "loaded group document"
        );
        Ok(group)
    }

    fn save(&self, group: &Group) -> Result<(), StoreError> {
        let path = self.path_for(&group.id)?;
        let json = GroupDocument::to_json(group).map_err(|err| StoreError::Corrupt {
            id: group.id.clone(),
            detail: err.to_string(),
        })?;
        self.write_atomic(&path, &json)?;

        tracing::debug!(group_id = %group.id, path = %path.display(), "saved group document");
        Ok(())
    }

    fn list(&self) -> Result<Vec<GroupId>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) if !stem.starts_with('.') => ids.push(GroupId::new(stem)),
                Some(_) => {}
                None => tracing::warn!(path = %path.display(), "skipping non-UTF-8 file name"),
            }
        }
        ids.sort();
        Ok(ids)
    }
}
