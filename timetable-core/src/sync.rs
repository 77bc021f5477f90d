//! Client-side slot state and its synchronization with the server.
//!
//! The client keeps one list of slots and renders everything from it. Each
//! mutation sends exactly one request and, once the server answers, patches
//! the list locally instead of fetching it again.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::{TimetableError, TimetableResult};
use crate::mapper::{CalendarEvent, ReferenceWeek, map_slots_to_events, slot_times_from_range};
use crate::slot::{NewSlot, Slot, SlotPatch};

/// An immutable snapshot of the client's slots.
///
/// Update functions return a new snapshot and leave `self` untouched, so an
/// older snapshot can always be put back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotList {
    slots: Arc<[Slot]>,
}

impl SlotList {
    pub fn new(slots: Vec<Slot>) -> Self {
        SlotList {
            slots: slots.into(),
        }
    }

    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// New snapshot with `slot` added at the end.
    pub fn appended(&self, slot: Slot) -> Self {
        let mut slots = self.slots.to_vec();
        slots.push(slot);
        Self::new(slots)
    }

    /// New snapshot with the slot of the same id swapped for `slot`.
    ///
    /// If no slot has that id the snapshot is returned unchanged.
    pub fn replaced(&self, slot: Slot) -> Self {
        if self.get(&slot.id).is_none() {
            return self.clone();
        }

        let slots = self
            .slots
            .iter()
            .map(|existing| {
                if existing.id == slot.id {
                    slot.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        Self::new(slots)
    }

    /// New snapshot without the slot of this id.
    pub fn without(&self, id: &str) -> Self {
        Self::new(self.slots.iter().filter(|slot| slot.id != id).cloned().collect())
    }

    /// Slots at one location, for the location-scoped view.
    pub fn at_location(&self, location: &str) -> Self {
        Self::new(
            self.slots
                .iter()
                .filter(|slot| slot.location.as_deref() == Some(location))
                .cloned()
                .collect(),
        )
    }

    /// Distinct non-empty locations, in order of first appearance.
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = Vec::new();
        for location in self.slots.iter().filter_map(|slot| slot.location.as_deref()) {
            if !location.is_empty() && !locations.iter().any(|l| l == location) {
                locations.push(location.to_string());
            }
        }
        locations
    }
}

impl<'a> IntoIterator for &'a SlotList {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Client side of the slot REST API.
#[allow(async_fn_in_trait)]
pub trait SlotApi {
    async fn list_all(&self) -> TimetableResult<Vec<Slot>>;
    async fn list_by_user(&self, user_id: &str) -> TimetableResult<Vec<Slot>>;
    async fn create(&self, new: &NewSlot) -> TimetableResult<Slot>;
    async fn update(&self, id: &str, patch: &SlotPatch) -> TimetableResult<Slot>;
    async fn delete(&self, id: &str) -> TimetableResult<()>;
}

/// Owns the client's slot list and keeps it in step with the server.
pub struct SyncController<A> {
    api: A,
    slots: SlotList,
}

impl<A: SlotApi> SyncController<A> {
    pub fn new(api: A) -> Self {
        SyncController {
            api,
            slots: SlotList::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn slots(&self) -> &SlotList {
        &self.slots
    }

    /// Replace the list with every slot on the server.
    pub async fn load(&mut self) -> TimetableResult<&SlotList> {
        let slots = self
            .api
            .list_all()
            .await
            .inspect_err(|e| tracing::warn!("Error fetching slots: {}", e))?;

        self.slots = SlotList::new(slots);
        Ok(&self.slots)
    }

    /// Replace the list with one user's slots.
    pub async fn load_for_user(&mut self, user_id: &str) -> TimetableResult<&SlotList> {
        let slots = self
            .api
            .list_by_user(user_id)
            .await
            .inspect_err(|e| tracing::warn!(user_id, "Error fetching slots: {}", e))?;

        self.slots = SlotList::new(slots);
        Ok(&self.slots)
    }

    pub async fn create(&mut self, new: NewSlot) -> TimetableResult<Slot> {
        let slot = self
            .api
            .create(&new)
            .await
            .inspect_err(|e| tracing::warn!("Error adding slot: {}", e))?;

        self.slots = self.slots.appended(slot.clone());
        Ok(slot)
    }

    pub async fn update(&mut self, id: &str, patch: SlotPatch) -> TimetableResult<Slot> {
        let updated = self
            .api
            .update(id, &patch)
            .await
            .inspect_err(|e| tracing::warn!(id, "Error updating slot: {}", e))?;

        self.slots = self.slots.replaced(updated.clone());
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> TimetableResult<()> {
        self.api
            .delete(id)
            .await
            .inspect_err(|e| tracing::warn!(id, "Error deleting slot: {}", e))?;

        self.slots = self.slots.without(id);
        Ok(())
    }

    /// Move a slot to a new date-time range after a drag or resize.
    ///
    /// The list shows the new position straight away. Only `day`,
    /// `startTime` and `endTime` are sent; if the request fails the previous
    /// snapshot is restored and the error returned.
    pub async fn reschedule(
        &mut self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> TimetableResult<Slot> {
        let previous = self.slots.clone();
        let mut moved = previous
            .get(id)
            .cloned()
            .ok_or_else(|| TimetableError::SlotNotFound(id.to_string()))?;

        let patch: SlotPatch = slot_times_from_range(start, end).into();
        patch.clone().apply_to(&mut moved);
        self.slots = previous.replaced(moved);

        match self.api.update(id, &patch).await {
            Ok(updated) => {
                self.slots = self.slots.replaced(updated.clone());
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(id, "Error moving slot, rolling back: {}", e);
                self.slots = previous;
                Err(e)
            }
        }
    }

    /// Events for the main calendar.
    pub fn events(&self, week: &ReferenceWeek) -> Vec<CalendarEvent> {
        map_slots_to_events(self.slots.as_slice(), week)
    }

    /// Events for the calendar scoped to one location.
    pub fn location_events(&self, location: &str, week: &ReferenceWeek) -> Vec<CalendarEvent> {
        map_slots_to_events(self.slots.at_location(location).as_slice(), week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::WeekView;
    use crate::store::{MemoryStore, SlotStore};
    use chrono::NaiveTime;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    enum Request {
        List,
        Create,
        Update(String, SlotPatch),
        Delete(String),
    }

    /// API double backed by a memory store that records every request.
    #[derive(Default)]
    struct RecordingApi {
        store: MemoryStore,
        requests: Mutex<Vec<Request>>,
        offline: AtomicBool,
    }

    impl RecordingApi {
        fn record(&self, request: Request) -> TimetableResult<()> {
            self.requests.lock().unwrap().push(request);
            if self.offline.load(Ordering::SeqCst) {
                return Err(TimetableError::Api("connection refused".into()));
            }
            Ok(())
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl SlotApi for RecordingApi {
        async fn list_all(&self) -> TimetableResult<Vec<Slot>> {
            self.record(Request::List)?;
            self.store.list_all()
        }

        async fn list_by_user(&self, user_id: &str) -> TimetableResult<Vec<Slot>> {
            self.record(Request::List)?;
            self.store.list_by_user(user_id)
        }

        async fn create(&self, new: &NewSlot) -> TimetableResult<Slot> {
            self.record(Request::Create)?;
            self.store.create(new.clone())
        }

        async fn update(&self, id: &str, patch: &SlotPatch) -> TimetableResult<Slot> {
            self.record(Request::Update(id.to_string(), patch.clone()))?;
            self.store.update(id, patch.clone())
        }

        async fn delete(&self, id: &str) -> TimetableResult<()> {
            self.record(Request::Delete(id.to_string()))?;
            self.store.delete(id).map(|_| ())
        }
    }

    fn slot(id: &str, day: &str, location: Option<&str>) -> Slot {
        Slot {
            id: id.to_string(),
            user_id: None,
            day: day.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            task: "Lecture".to_string(),
            location: location.map(str::to_string),
            staff1: Some("A".to_string()),
            staff2: Some("B".to_string()),
        }
    }

    fn lecture() -> NewSlot {
        NewSlot {
            day: "Monday".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            task: "Lecture".to_string(),
            location: Some("K609".to_string()),
            staff1: Some("A".to_string()),
            staff2: Some("B".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn snapshots_are_not_mutated_by_updates() {
        let original = SlotList::new(vec![slot("1", "Monday", None)]);

        let appended = original.appended(slot("2", "Tuesday", None));
        let without = appended.without("1");

        assert_eq!(original.len(), 1);
        assert_eq!(appended.len(), 2);
        assert_eq!(without.len(), 1);
        assert_eq!(without.as_slice()[0].id, "2");
    }

    #[test]
    fn replacing_unknown_id_keeps_the_list() {
        let list = SlotList::new(vec![slot("1", "Monday", None)]);
        let replaced = list.replaced(slot("ghost", "Friday", None));
        assert_eq!(replaced, list);
    }

    #[test]
    fn replacing_keeps_position() {
        let list = SlotList::new(vec![
            slot("1", "Monday", None),
            slot("2", "Tuesday", None),
            slot("3", "Wednesday", None),
        ]);
        let replaced = list.replaced(slot("2", "Friday", None));
        let days: Vec<_> = replaced.iter().map(|s| s.day.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Friday", "Wednesday"]);
    }

    #[test]
    fn location_filter_and_selector() {
        let list = SlotList::new(vec![
            slot("1", "Monday", Some("K609")),
            slot("2", "Tuesday", Some("K711")),
            slot("3", "Wednesday", Some("K609")),
            slot("4", "Thursday", None),
            slot("5", "Friday", Some("")),
        ]);

        let k609: Vec<_> = list.at_location("K609").iter().map(|s| s.id.clone()).collect();
        assert_eq!(k609, vec!["1", "3"]);
        assert_eq!(list.locations(), vec!["K609", "K711"]);
        assert!(list.at_location("K612").is_empty());
    }

    #[tokio::test]
    async fn mutations_patch_the_local_list_without_refetching() {
        let mut controller = SyncController::new(RecordingApi::default());
        controller.load().await.unwrap();

        let created = controller.create(lecture()).await.unwrap();
        assert_eq!(controller.slots().len(), 1);

        let patch = SlotPatch {
            task: Some("Seminar".to_string()),
            ..Default::default()
        };
        controller.update(&created.id, patch).await.unwrap();
        assert_eq!(controller.slots().get(&created.id).unwrap().task, "Seminar");

        controller.delete(&created.id).await.unwrap();
        assert!(controller.slots().is_empty());

        let lists = controller
            .api()
            .requests()
            .into_iter()
            .filter(|r| *r == Request::List)
            .count();
        assert_eq!(lists, 1);
    }

    #[tokio::test]
    async fn dragging_sends_only_day_and_times() {
        let mut controller = SyncController::new(RecordingApi::default());
        let created = controller.create(lecture()).await.unwrap();

        let view = WeekView::default();
        let event = controller.events(&view.week).remove(0);
        let (start, end) = view
            .drop_event(&event, "Tuesday", NaiveTime::from_hms_opt(14, 0, 0).unwrap())
            .unwrap();

        let updated = controller.reschedule(&created.id, start, end).await.unwrap();

        let expected = SlotPatch {
            day: Some("Tuesday".to_string()),
            start_time: Some("14:00".to_string()),
            end_time: Some("15:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            controller.api().requests().last(),
            Some(&Request::Update(created.id.clone(), expected))
        );
        assert_eq!(updated.day, "Tuesday");
        assert_eq!(updated.task, "Lecture");
        assert_eq!(updated.location.as_deref(), Some("K609"));
        assert_eq!(controller.slots().get(&created.id), Some(&updated));
    }

    #[tokio::test]
    async fn failed_reschedule_rolls_back() {
        let mut controller = SyncController::new(RecordingApi::default());
        let created = controller.create(lecture()).await.unwrap();
        let before = controller.slots().clone();

        controller.api().offline.store(true, Ordering::SeqCst);

        let view = WeekView::default();
        let event = controller.events(&view.week).remove(0);
        let (start, end) = view
            .drop_event(&event, "Friday", NaiveTime::from_hms_opt(10, 0, 0).unwrap())
            .unwrap();

        let result = controller.reschedule(&created.id, start, end).await;
        assert!(matches!(result, Err(TimetableError::Api(_))));
        assert_eq!(controller.slots(), &before);
    }

    #[tokio::test]
    async fn failed_requests_leave_state_unchanged() {
        let mut controller = SyncController::new(RecordingApi::default());
        let created = controller.create(lecture()).await.unwrap();
        let before = controller.slots().clone();

        controller.api().offline.store(true, Ordering::SeqCst);

        assert!(controller.create(lecture()).await.is_err());
        assert!(controller.delete(&created.id).await.is_err());
        assert!(controller.load().await.is_err());
        assert_eq!(controller.slots(), &before);
    }

    #[tokio::test]
    async fn rescheduling_unknown_slot_sends_nothing() {
        let mut controller = SyncController::new(RecordingApi::default());
        let week = ReferenceWeek::default();
        let start = week.monday().and_hms_opt(9, 0, 0).unwrap();
        let end = week.monday().and_hms_opt(10, 0, 0).unwrap();

        let result = controller.reschedule("ghost", start, end).await;
        assert!(matches!(result, Err(TimetableError::SlotNotFound(_))));
        assert!(controller.api().requests().is_empty());
    }

    #[tokio::test]
    async fn location_events_come_from_the_same_list() {
        let api = RecordingApi::default();
        api.store.create(lecture()).unwrap();
        api.store
            .create(NewSlot {
                location: Some("K711".to_string()),
                ..lecture()
            })
            .unwrap();

        let mut controller = SyncController::new(api);
        controller.load().await.unwrap();

        let week = ReferenceWeek::default();
        assert_eq!(controller.events(&week).len(), 2);
        let scoped = controller.location_events("K711", &week);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].location.as_deref(), Some("K711"));
    }
}
