use std::error::Error;

use async_trait::async_trait;

use crate::day_key::DateRange;
use crate::event::Event;

/// The remote persistence service that actually stores events
///
/// Every call may fail (e.g. in case of a network error). A failed call must not have been partially applied.
#[async_trait]
pub trait EventStore {
    /// Returns the events that start within `range`
    async fn fetch_events(&self, range: &DateRange) -> Result<Vec<Event>, Box<dyn Error>>;
    /// Store a brand new event
    async fn save_event(&self, event: &Event) -> Result<(), Box<dyn Error>>;
    /// Replace the stored event that has the same ID
    async fn update_event(&self, event: &Event) -> Result<(), Box<dyn Error>>;
    /// Delete the stored event that has the same ID
    async fn delete_event(&self, event: &Event) -> Result<(), Box<dyn Error>>;
}
