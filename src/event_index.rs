//! Events bucketed by the day they start on

use std::collections::{BTreeSet, HashMap};

use crate::day_key::{DayKey, MonthStart};
use crate::event::Event;

/// Maps every day to the events starting on that day.
///
/// A day is only present in the map as long as it has at least one event.
/// Within a day, events keep their insertion order until [`EventIndex::sorted_events_on`] is called for that day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventIndex {
    days: HashMap<DayKey, Vec<Event>>,
}

impl EventIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event under the day it starts on, and return that day.
    ///
    /// In case this day already lists an event with the same ID, it is replaced (at the same position).
    /// Events with the same ID listed under other days are not looked for: callers that move an event to
    /// another day must [`remove`](Self::remove) it first.
    pub fn upsert(&mut self, event: Event) -> DayKey {
        let key = event.day_key();
        let events = self.days.entry(key).or_insert_with(Vec::new);

        match events.iter().position(|e| e.id() == event.id()) {
            Some(position) => {
                log::trace!("Replacing event {} on {}", event.id(), key);
                events[position] = event;
            },
            None => events.push(event),
        }
        key
    }

    /// Insert every event, and return how many events have been given
    pub fn merge<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = Event>,
    {
        let mut count = 0;
        for event in events {
            self.upsert(event);
            count += 1;
        }
        count
    }

    /// Remove an event (compared by ID) from a day, and return it.
    ///
    /// Removing an event that is not there is not an error, this just returns `None`.
    pub fn remove(&mut self, day: &DayKey, event: &Event) -> Option<Event> {
        let events = self.days.get_mut(day)?;
        let position = events.iter().position(|e| e.id() == event.id())?;
        let removed = events.remove(position);

        if events.is_empty() {
            self.days.remove(day);
        }
        Some(removed)
    }

    /// The events of a day, in their current order
    pub fn events_on(&self, day: &DayKey) -> &[Event] {
        match self.days.get(day) {
            None => &[],
            Some(events) => events.as_slice(),
        }
    }

    /// The events of a day, sorted by start time.
    ///
    /// Only this day is sorted. This is meant to be called for the day that is being displayed,
    /// so that merging a fetch never has to sort anything.
    pub fn sorted_events_on(&mut self, day: &DayKey) -> &[Event] {
        match self.days.get_mut(day) {
            None => &[],
            Some(events) => {
                // stable, so that events starting at the same time keep their relative order
                events.sort_by(|a, b| a.start().cmp(b.start()));
                events.as_slice()
            },
        }
    }

    pub fn contains_day(&self, day: &DayKey) -> bool {
        self.days.contains_key(day)
    }

    /// The days of a month that have at least one event
    pub fn days_with_events(&self, month: &MonthStart) -> BTreeSet<u32> {
        self.days.keys()
            .filter(|key| month.contains(key))
            .map(|key| key.day())
            .collect()
    }

    /// The days that have at least one event, in no particular order
    pub fn days(&self) -> impl Iterator<Item = &DayKey> {
        self.days.keys()
    }

    /// Number of days that have at least one event
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of events
    pub fn len(&self) -> usize {
        self.days.values().map(|events| events.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
