//! Slot persistence.
//!
//! The store is a plain document collection: records are kept in insertion
//! order, ids are generated on create, and writes are last-write-wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::TimetableResult;
use crate::slot::{NewSlot, Slot, SlotPatch};

/// A collection of slot records.
pub trait SlotStore: Send + Sync {
    /// Every record, in insertion order.
    fn list_all(&self) -> TimetableResult<Vec<Slot>>;

    /// Records whose `user_id` equals `user_id` exactly.
    fn list_by_user(&self, user_id: &str) -> TimetableResult<Vec<Slot>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|slot| slot.user_id.as_deref() == Some(user_id))
            .collect())
    }

    /// Persist a new record under a freshly generated id.
    fn create(&self, new: NewSlot) -> TimetableResult<Slot>;

    /// Overwrite the fields present in `patch`.
    ///
    /// Fails with `SlotNotFound` if no record has this id.
    fn update(&self, id: &str, patch: SlotPatch) -> TimetableResult<Slot>;

    /// Remove a record. Returns whether it existed; a missing id is not an
    /// error.
    fn delete(&self, id: &str) -> TimetableResult<bool>;
}

/// Generate an id for a new record.
pub fn new_slot_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
