//! Core types for the timetable workspace.
//!
//! Shared by the server and the command-line client:
//! - `slot`: the persisted record and its create/update bodies
//! - `store`: slot persistence behind the `SlotStore` trait
//! - `mapper`: projection of slots onto a reference week and back
//! - `sync`: the client's slot list and its synchronization with the server

pub mod clock;
pub mod config;
pub mod day;
pub mod error;
pub mod mapper;
pub mod slot;
pub mod store;
pub mod sync;

pub use error::{TimetableError, TimetableResult};
pub use mapper::{CalendarEvent, ReferenceWeek, WeekView};
pub use slot::{NewSlot, Slot, SlotPatch};
