//! In-memory slot store.

use std::sync::RwLock;

use super::{SlotStore, new_slot_id};
use crate::error::{TimetableError, TimetableResult};
use crate::slot::{NewSlot, Slot, SlotPatch};

/// Slot store that lives for the duration of the process.
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<Vec<Slot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(slots: Vec<Slot>) -> Self {
        MemoryStore {
            slots: RwLock::new(slots),
        }
    }
}

fn poisoned<T>(_: T) -> TimetableError {
    TimetableError::Store("slot store lock poisoned".into())
}

impl SlotStore for MemoryStore {
    fn list_all(&self) -> TimetableResult<Vec<Slot>> {
        Ok(self.slots.read().map_err(poisoned)?.clone())
    }

    fn create(&self, new: NewSlot) -> TimetableResult<Slot> {
        let slot = new.into_slot(new_slot_id());
        self.slots.write().map_err(poisoned)?.push(slot.clone());
        Ok(slot)
    }

    fn update(&self, id: &str, patch: SlotPatch) -> TimetableResult<Slot> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        let slot = slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .ok_or_else(|| TimetableError::SlotNotFound(id.to_string()))?;

        patch.apply_to(slot);
        Ok(slot.clone())
    }

    fn delete(&self, id: &str) -> TimetableResult<bool> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        Ok(slots.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_slot(day: &str, user: Option<&str>) -> NewSlot {
        NewSlot {
            user_id: user.map(str::to_string),
            day: day.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            task: "Lecture".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_assigns_distinct_ids_in_order() {
        let store = MemoryStore::new();
        let a = store.create(new_slot("Monday", None)).unwrap();
        let b = store.create(new_slot("Tuesday", None)).unwrap();

        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
        let all = store.list_all().unwrap();
        assert_eq!(all, vec![a, b]);
    }

    #[test]
    fn list_by_user_matches_exactly() {
        let store = MemoryStore::new();
        store.create(new_slot("Monday", Some("alice"))).unwrap();
        store.create(new_slot("Tuesday", Some("Alice"))).unwrap();
        store.create(new_slot("Wednesday", None)).unwrap();

        let mine = store.list_by_user("alice").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].day, "Monday");
    }

    #[test]
    fn update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update("nope", SlotPatch::default()).unwrap_err();
        assert!(matches!(err, TimetableError::SlotNotFound(id) if id == "nope"));
    }

    #[test]
    fn update_returns_the_new_record() {
        let store = MemoryStore::new();
        let slot = store.create(new_slot("Monday", None)).unwrap();

        let patch = SlotPatch {
            day: Some("Friday".to_string()),
            ..Default::default()
        };
        let updated = store.update(&slot.id, patch).unwrap();

        assert_eq!(updated.day, "Friday");
        assert_eq!(updated.start_time, "09:00");
        assert_eq!(store.list_all().unwrap(), vec![updated]);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let slot = store.create(new_slot("Monday", None)).unwrap();
        let other = store.create(new_slot("Tuesday", None)).unwrap();

        assert!(store.delete(&slot.id).unwrap());
        let after_once = store.list_all().unwrap();
        assert!(!store.delete(&slot.id).unwrap());
        assert_eq!(store.list_all().unwrap(), after_once);
        assert_eq!(after_once, vec![other]);

        assert!(!store.delete("never-existed").unwrap());
    }
}
