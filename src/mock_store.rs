//! An in-memory [`EventStore`], that can be used instead of a real persistence service in tests and demos

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::day_key::DateRange;
use crate::event::Event;
use crate::mock_behaviour::MockBehaviour;
use crate::traits::EventStore;

/// A store that keeps its events in memory.
///
/// Its calls can be made to fail with a [`MockBehaviour`].
#[derive(Debug, Default)]
pub struct MockEventStore {
    events: Mutex<Vec<Event>>,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already contains some events
    pub fn with_events(events: Vec<Event>) -> Self {
        Self { events: Mutex::new(events), mock_behaviour: None }
    }

    /// Create a store from a JSON array of events
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Ok(Self::with_events(events))
    }

    /// Make this store follow a given behaviour. The behaviour is shared, so that the test can change it later on.
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// A copy of every event this store currently contains
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn check(&self, check: fn(&mut MockBehaviour) -> Result<(), Box<dyn Error>>) -> Result<(), Box<dyn Error>> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => {
                let mut behaviour = behaviour.lock().map_err(|_| "mock behaviour lock poisoned")?;
                check(&mut *behaviour)
            },
        }
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn fetch_events(&self, range: &DateRange) -> Result<Vec<Event>, Box<dyn Error>> {
        self.check(MockBehaviour::can_fetch_events)?;

        let events = self.events.lock().map_err(|_| "mock store lock poisoned")?;
        Ok(events.iter()
            .filter(|event| range.contains(event.start()))
            .cloned()
            .collect()
        )
    }

    async fn save_event(&self, event: &Event) -> Result<(), Box<dyn Error>> {
        self.check(MockBehaviour::can_save_event)?;

        let mut events = self.events.lock().map_err(|_| "mock store lock poisoned")?;
        if events.iter().any(|e| e.id() == event.id()) {
            return Err(format!("Event {} already exists", event.id()).into());
        }
        events.push(event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<(), Box<dyn Error>> {
        self.check(MockBehaviour::can_update_event)?;

        let mut events = self.events.lock().map_err(|_| "mock store lock poisoned")?;
        match events.iter_mut().find(|e| e.id() == event.id()) {
            None => Err(format!("No event {} to update", event.id()).into()),
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            },
        }
    }

    async fn delete_event(&self, event: &Event) -> Result<(), Box<dyn Error>> {
        self.check(MockBehaviour::can_delete_event)?;

        let mut events = self.events.lock().map_err(|_| "mock store lock poisoned")?;
        let count_before = events.len();
        events.retain(|e| e.id() != event.id());
        if events.len() == count_before {
            return Err(format!("No event {} to delete", event.id()).into());
        }
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Local, TimeZone};
    use crate::day_key::MonthStart;

    fn event_on(month: u32, day: u32) -> Event {
        let start = Local.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap();
        let end = Local.with_ymd_and_hms(2024, month, day, 11, 0, 0).unwrap();
        Event::new(format!("Event {}/{}", month, day), start, end).unwrap()
    }

    #[tokio::test]
    async fn fetch_filters_by_start() {
        let store = MockEventStore::with_events(vec![event_on(2, 29), event_on(3, 1), event_on(3, 31), event_on(4, 1)]);
        let march = MonthStart::from_ym(2024, 3).unwrap();

        let fetched = store.fetch_events(&DateRange::months(march, march)).await.unwrap();
        let titles: Vec<_> = fetched.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["Event 3/1", "Event 3/31"]);
    }

    #[tokio::test]
    async fn scripted_failures() {
        let mut store = MockEventStore::new();
        let behaviour = Arc::new(Mutex::new(MockBehaviour::fail_now(1)));
        store.set_mock_behaviour(Some(Arc::clone(&behaviour)));

        let event = event_on(3, 7);
        assert!(store.save_event(&event).await.is_err());
        assert!(store.events().is_empty());

        assert!(store.save_event(&event).await.is_ok());
        assert!(store.save_event(&event).await.is_err());
        assert_eq!(store.events(), vec![event.clone()]);

        behaviour.lock().unwrap().delete_event_behaviour = (0, 1);
        assert!(store.delete_event(&event).await.is_err());
        assert!(store.delete_event(&event).await.is_ok());
        assert!(store.delete_event(&event).await.is_err());
        assert!(store.update_event(&event).await.is_err());
    }

    #[test]
    fn seed_from_json() {
        let event = event_on(3, 7);
        let json = serde_json::to_string(&vec![event.clone()]).unwrap();
        let store = MockEventStore::from_json(&json).unwrap();
        assert_eq!(store.events(), vec![event]);

        assert!(MockEventStore::from_json("{ not json").is_err());
    }
}
