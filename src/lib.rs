//! This crate provides the presentation core of a month-by-month calendar.
//!
//! The months to display live in a [`MonthWindow`], that grows on demand when the user scrolls close to one of its edges. \
//! Events are fetched from an [`EventStore`] and kept in an [`EventIndex`], grouped by the day they start on.
//!
//! A [`CalendarController`] ties both together: it loads the initial range, extends the window,
//! handles day selection and saves user edits, keeping the window and the index consistent with each other.
//! An in-memory store is provided in the [`mock_store`] module, for tests and demos.

pub mod traits;
pub use traits::EventStore;

pub mod error;
pub use error::{CalendarError, ValidationError};
pub mod config;
pub mod feedback;

mod day_key;
pub use day_key::{start_of_day, DateRange, DayKey, MonthStart, Timestamp};
mod event;
pub use event::{Event, EventId};
mod event_index;
pub use event_index::EventIndex;
pub mod month_window;
pub use month_window::{Direction, MonthWindow};

pub mod controller;
pub use controller::CalendarController;
pub mod form;
pub mod view_model;

pub mod mock_behaviour;
pub mod mock_store;
pub use mock_store::MockEventStore;

pub mod utils;
