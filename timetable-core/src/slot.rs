//! Slot records, as persisted by the store and exchanged over the REST API.

use serde::{Deserialize, Serialize};

use crate::clock::add_hours_to_time;

/// One scheduled occurrence of a task at a day/time/location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff2: Option<String>,
}

impl Slot {
    /// Staff assignees that are set, in order.
    pub fn staff(&self) -> Vec<&str> {
        [&self.staff1, &self.staff2]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Request body for creating a slot: every slot field except the id.
///
/// `duration` (whole hours) is only used to derive `end_time` when the
/// caller sent a start time but no end time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Hours>,
    #[serde(default)]
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff2: Option<String>,
}

/// Whole hours, accepted either as a JSON number or as a numeric string
/// (HTML form selects submit strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hours {
    Number(i64),
    Text(String),
}

impl Hours {
    pub fn value(&self) -> Option<i64> {
        match self {
            Hours::Number(n) => Some(*n),
            Hours::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl NewSlot {
    /// Fill in `end_time` from `start_time + duration` when it is missing.
    ///
    /// A body that already carries an end time, or has no duration, is left
    /// as it is. So is one whose start time can't be parsed: the record is
    /// stored as sent with an empty end time.
    pub fn resolve_end_time(&mut self) {
        if !self.end_time.trim().is_empty() || self.start_time.trim().is_empty() {
            return;
        }

        let Some(hours) = self.duration.as_ref().and_then(Hours::value) else {
            return;
        };

        match add_hours_to_time(&self.start_time, hours) {
            Ok(end_time) => self.end_time = end_time,
            Err(e) => tracing::debug!("Not deriving end time: {}", e),
        }
    }

    /// Turn into a stored record with the given id.
    pub fn into_slot(self, id: String) -> Slot {
        Slot {
            id,
            user_id: self.user_id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            task: self.task,
            location: self.location,
            staff1: self.staff1,
            staff2: self.staff2,
        }
    }
}

/// Request body for updating a slot. Present fields overwrite, absent fields
/// are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff2: Option<String>,
}

impl SlotPatch {
    pub fn is_empty(&self) -> bool {
        *self == SlotPatch::default()
    }

    /// Overwrite the fields of `slot` that this patch carries.
    pub fn apply_to(self, slot: &mut Slot) {
        if let Some(user_id) = self.user_id {
            slot.user_id = Some(user_id);
        }
        if let Some(day) = self.day {
            slot.day = day;
        }
        if let Some(start_time) = self.start_time {
            slot.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            slot.end_time = end_time;
        }
        if let Some(task) = self.task {
            slot.task = task;
        }
        if let Some(location) = self.location {
            slot.location = Some(location);
        }
        if let Some(staff1) = self.staff1 {
            slot.staff1 = Some(staff1);
        }
        if let Some(staff2) = self.staff2 {
            slot.staff2 = Some(staff2);
        }
    }
}
