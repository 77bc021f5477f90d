//! Slot collection stored as a JSON document on disk.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{SlotStore, new_slot_id};
use crate::error::{TimetableError, TimetableResult};
use crate::slot::{NewSlot, Slot, SlotPatch};

const COLLECTION_FILE: &str = "slots.json";

/// Slot store backed by `<dir>/slots.json`.
///
/// Every mutation reads the collection, changes it and writes it back through
/// a temporary file, so a crash never leaves a half-written collection.
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> TimetableResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        Ok(FileStore {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self) -> PathBuf {
        self.dir.join(COLLECTION_FILE)
    }

    fn load(&self) -> TimetableResult<Vec<Slot>> {
        let path = self.collection_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            TimetableError::Store(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn save(&self, slots: &[Slot]) -> TimetableResult<()> {
        let path = self.collection_path();
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(slots)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Run a read-modify-write cycle while holding the write lock.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Slot>) -> TimetableResult<T>) -> TimetableResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| TimetableError::Store("slot store lock poisoned".into()))?;

        let mut slots = self.load()?;
        let result = f(&mut slots)?;
        self.save(&slots)?;
        Ok(result)
    }
}

impl SlotStore for FileStore {
    fn list_all(&self) -> TimetableResult<Vec<Slot>> {
        self.load()
    }

    fn create(&self, new: NewSlot) -> TimetableResult<Slot> {
        let slot = new.into_slot(new_slot_id());
        self.modify(|slots| {
            slots.push(slot.clone());
            Ok(())
        })?;

        tracing::debug!(id = %slot.id, "created slot");
        Ok(slot)
    }

    fn update(&self, id: &str, patch: SlotPatch) -> TimetableResult<Slot> {
        self.modify(|slots| {
            let slot = slots
                .iter_mut()
                .find(|slot| slot.id == id)
                .ok_or_else(|| TimetableError::SlotNotFound(id.to_string()))?;

            patch.apply_to(slot);
            Ok(slot.clone())
        })
    }

    fn delete(&self, id: &str) -> TimetableResult<bool> {
        self.modify(|slots| {
            let before = slots.len();
            slots.retain(|slot| slot.id != id);
            Ok(slots.len() != before)
        })
    }
}
