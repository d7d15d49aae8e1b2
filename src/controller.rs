//! Keeps the event index and the month window consistent with an [`EventStore`]
//!
//! Every mutation goes through `&mut CalendarController`, so a single completion is applied at a time.
//! The store calls are the only suspension points. Local state is only changed once the store
//! has confirmed an operation: a failed call leaves everything as it was.

use std::collections::{HashMap, HashSet};
use std::error::Error;

use chrono::{Local, NaiveDate};

use crate::config::PagingConfig;
use crate::day_key::{DateRange, DayKey, MonthStart};
use crate::error::{CalendarError, Result, StoreAction};
use crate::event::{Event, EventId};
use crate::event_index::EventIndex;
use crate::feedback::{FeedbackSender, Notice, Notifier};
use crate::form::EventForm;
use crate::month_window::{Direction, MonthWindow};
use crate::traits::EventStore;
use crate::view_model::{EventRow, MonthCells, MonthHeader};

/// What the user currently has selected. This is transient state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    /// The day whose events are listed
    pub selected_day: Option<DayKey>,
    /// The event being edited, as a position in the list of its day.
    /// This is cleared whenever the index changes, since positions may not be valid anymore.
    pub editing: Option<(DayKey, usize)>,
}


/// A pending extension of the month window.
///
/// It holds everything needed to apply its completion, whatever happened to the window in the meantime.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionRequest {
    direction: Direction,
    batch_size: usize,
    range: DateRange,
    /// The month at the extended edge of the window when the request was made
    anchor: MonthStart,
    /// The generation of the index when the request was made
    generation: u64,
}

impl ExtensionRequest {
    pub fn direction(&self) -> Direction { self.direction }
    pub fn batch_size(&self) -> usize    { self.batch_size }
    /// The range whose events must be fetched
    pub fn range(&self) -> &DateRange    { &self.range }
}

/// How an extension cycle ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// The viewport is not close to an edge (or an extension on that side is in flight already)
    NotNeeded,
    /// New months are materialized and their events are indexed.
    ///
    /// When months have been prepended, the viewport must move `viewport_shift` positions to keep showing the same month.
    Committed { direction: Direction, months_added: usize, viewport_shift: usize },
    /// The window already contained these months (e.g. a superseded request). Events have been merged anyway.
    AlreadyCovered,
    /// The window has changed too much since the request was made, its result has been dropped
    Discarded,
}


/// The presentation core of the calendar: the months to show, the events of every day,
/// and the operations the user can trigger.
pub struct CalendarController<S>
where
    S: EventStore,
{
    store: S,
    config: PagingConfig,
    today: NaiveDate,

    window: Option<MonthWindow>,
    index: EventIndex,
    selection: SelectionState,
    /// Directions for which an extension has been dispatched but not completed
    pending: HashSet<Direction>,
    /// Bumped on every reload and every local change, so that late fetches can tell what they missed
    generation: u64,
    /// The generation of the last reload. Requests older than this are dropped.
    reload_generation: u64,
    /// The generation at which each event has last been saved, edited or deleted locally
    changed_at: HashMap<EventId, u64>,

    notifier: Notifier,
}

impl<S> CalendarController<S>
where
    S: EventStore,
{
    /// Create a controller. Nothing is loaded until [`load_initial_range`](Self::load_initial_range) is called.
    pub fn new(store: S, config: PagingConfig) -> Self {
        Self::with_today(store, config, Local::now().date_naive())
    }

    /// Same as [`new`](Self::new), but with a custom notion of "today"
    pub fn with_today(store: S, config: PagingConfig, today: NaiveDate) -> Self {
        Self {
            store, config, today,
            window: None,
            index: EventIndex::new(),
            selection: SelectionState::default(),
            pending: HashSet::new(),
            generation: 0,
            reload_generation: 0,
            changed_at: HashMap::new(),
            notifier: Notifier::new(),
        }
    }

    /// Send notices (loading, failures...) to a feedback channel
    pub fn with_feedback(mut self, sender: FeedbackSender) -> Self {
        self.notifier = Notifier::new_with_feedback_channel(sender);
        self
    }

    pub fn store(&self) -> &S                   { &self.store     }
    pub fn index(&self) -> &EventIndex          { &self.index     }
    pub fn window(&self) -> Option<&MonthWindow> { self.window.as_ref() }
    pub fn selection(&self) -> &SelectionState  { &self.selection }

    /// Build the initial window around today, and load the events of all its months with a single fetch.
    ///
    /// This can be called again to reload everything from scratch. In case the fetch fails, the previous state is kept.
    pub async fn load_initial_range(&mut self) -> Result<()> {
        let window = MonthWindow::initialize(self.today, self.config.radius())?;
        let range = window.span();
        self.notifier.feedback(Notice::Loading{ details: range.to_string() });

        let fetched = self.store.fetch_events(&range).await;
        let events = match fetched {
            Ok(events) => events,
            Err(err) => return Err(self.fail(CalendarError::persistence(StoreAction::Fetch, err))),
        };

        let mut index = EventIndex::new();
        let count = index.merge(events);
        self.notifier.info(&format!("Loaded {} events from {} to {}", count, window.first(), window.last()));

        let months = (0..window.len()).collect();
        self.window = Some(window);
        self.index = index;
        self.selection.editing = None;
        self.pending.clear();
        self.generation += 1;
        self.reload_generation = self.generation;
        self.changed_at.clear();
        self.notifier.feedback(Notice::Updated{ months });
        Ok(())
    }

    /// To be called once scrolling has settled on a month. This grows the window in case the user is close to one of its edges.
    pub async fn on_scroll_settled(&mut self, viewport_index: usize) -> Result<ExtensionOutcome> {
        let request = match self.begin_extension(viewport_index) {
            None => return Ok(ExtensionOutcome::NotNeeded),
            Some(request) => request,
        };

        // In case this future is dropped while fetching, the direction must not stay in flight
        let in_flight = InFlight { pending: &mut self.pending, direction: request.direction };
        let fetched = self.store.fetch_events(request.range()).await;
        drop(in_flight);

        self.complete_extension(request, fetched)
    }

    /// Decide whether the window must grow, and if so, return what must be fetched.
    ///
    /// The window itself is not changed until [`complete_extension`](Self::complete_extension) is called with the fetch result.
    pub fn begin_extension(&mut self, viewport_index: usize) -> Option<ExtensionRequest> {
        let window = self.window.as_ref()?;
        let direction = window.needs_extension(viewport_index)?;
        if self.pending.contains(&direction) {
            self.notifier.debug(&format!("An extension {} the window is already in flight", direction));
            return None;
        }

        let batch_size = self.config.batch_size();
        let anchor = match direction {
            Direction::Before => window.first(),
            Direction::After => window.last(),
        };
        let range = match window.range_to_load(direction, batch_size) {
            Ok(range) => range,
            Err(err) => {
                self.notifier.warn(&format!("Unable to grow the window {} {}: {}", direction, anchor, err));
                return None;
            },
        };

        self.pending.insert(direction);
        self.notifier.feedback(Notice::Loading{ details: range.to_string() });
        Some(ExtensionRequest { direction, batch_size, range, anchor, generation: self.generation })
    }

    /// Give up on a request returned by [`begin_extension`](Self::begin_extension), whose fetch will never be completed.
    ///
    /// This allows new extensions on that side.
    pub fn cancel_extension(&mut self, request: ExtensionRequest) {
        self.notifier.debug(&format!("Extension {} the window cancelled", request.direction));
        self.pending.remove(&request.direction);
    }

    /// Apply the result of the fetch of an [`ExtensionRequest`].
    ///
    /// Completions can be given in any order, and even after the window has been reloaded.
    /// In case the fetch failed, nothing changes and the error is returned.
    pub fn complete_extension(&mut self, request: ExtensionRequest, fetched: std::result::Result<Vec<Event>, Box<dyn Error>>) -> Result<ExtensionOutcome> {
        self.pending.remove(&request.direction);

        let events = match fetched {
            Ok(events) => events,
            Err(err) => return Err(self.fail(CalendarError::persistence(StoreAction::Fetch, err))),
        };

        if request.generation < self.reload_generation {
            self.notifier.debug(&format!("Extension {} the window was requested before the last reload. Dropping it", request.direction));
            return Ok(ExtensionOutcome::Discarded);
        }
        let events = self.without_local_changes(events, request.generation);

        let window = match self.window.as_mut() {
            None => {
                self.notifier.warn("Extension completed before the window was loaded. Ignoring it");
                return Ok(ExtensionOutcome::Discarded);
            },
            Some(window) => window,
        };

        if window.covers(&request.range) {
            let count = self.index.merge(events);
            self.selection.editing = None;
            self.notifier.debug(&format!("Months of {} are loaded already, merged {} events", request.range, count));
            return Ok(ExtensionOutcome::AlreadyCovered);
        }

        let edge = match request.direction {
            Direction::Before => window.first(),
            Direction::After => window.last(),
        };
        if edge != request.anchor {
            self.notifier.warn(&format!("Window edge moved from {} to {} since the extension {} was requested. Dropping it", request.anchor, edge, request.direction));
            return Ok(ExtensionOutcome::Discarded);
        }

        // Months and their events appear in the same step
        window.extend(request.direction, request.batch_size)?;
        let count = self.index.merge(events);
        self.selection.editing = None;

        let (months, viewport_shift) = match request.direction {
            Direction::Before => ((0..request.batch_size).collect::<Vec<_>>(), request.batch_size),
            Direction::After => (((window.len() - request.batch_size)..window.len()).collect(), 0),
        };
        self.notifier.info(&format!("Added {} months {} the window ({} events)", request.batch_size, request.direction, count));
        self.notifier.feedback(Notice::Updated{ months });

        Ok(ExtensionOutcome::Committed {
            direction: request.direction,
            months_added: request.batch_size,
            viewport_shift,
        })
    }

    /// Select a day, and return its events sorted by start time (possibly none)
    pub fn select_day(&mut self, day: DayKey) -> &[Event] {
        self.selection = SelectionState { selected_day: Some(day), editing: None };
        self.index.sorted_events_on(&day)
    }

    /// Select a day that has been tapped in the cell of a month.
    ///
    /// A cell also shows some days of the previous and next months, hence `month_offset` (-1, 0 or 1).
    /// Returns `None` in case this day does not exist.
    pub fn select_grid_day(&mut self, month_index: usize, month_offset: i32, day: u32) -> Option<&[Event]> {
        let month = self.window.as_ref()?.get(month_index)?.add_months(month_offset)?;
        let key = month.day(day)?;
        Some(self.select_day(key))
    }

    pub fn clear_selection(&mut self) {
        self.selection = SelectionState::default();
    }

    /// The events of the selected day, sorted by start time
    pub fn selected_events(&mut self) -> &[Event] {
        match self.selection.selected_day {
            None => &[],
            Some(day) => self.index.sorted_events_on(&day),
        }
    }

    /// Pick an event of the selected day for edition
    pub fn begin_edit(&mut self, position: usize) -> Option<Event> {
        let day = self.selection.selected_day?;
        let event = self.index.sorted_events_on(&day).get(position)?.clone();
        self.selection.editing = Some((day, position));
        Some(event)
    }

    /// The event picked by [`begin_edit`](Self::begin_edit), if it is still there
    pub fn editing_event(&self) -> Option<&Event> {
        let (day, position) = self.selection.editing?;
        self.index.events_on(&day).get(position)
    }

    /// A form for a new event, preset to the selected day
    pub fn new_event_form(&self) -> EventForm {
        EventForm::for_new(self.selection.selected_day.map(|day| day.as_date()))
    }

    /// Store a created (`original` is `None`) or edited event, then index it.
    ///
    /// Returns the indices of the months that must be re-rendered.
    pub async fn commit_event_edit(&mut self, original: Option<&Event>, edited: Event) -> Result<Vec<usize>> {
        let (id, touched_days) = match original {
            None => {
                let saved = self.store.save_event(&edited).await;
                if let Err(err) = saved {
                    return Err(self.fail(CalendarError::persistence(StoreAction::Save, err)));
                }
                let id = edited.id().clone();
                (id, vec![self.index.upsert(edited)])
            },
            Some(original) => {
                if original.id() != edited.id() {
                    let err = CalendarError::Precondition(format!("editing event {} cannot produce event {}", original.id(), edited.id()));
                    self.notifier.error(&err.to_string());
                    return Err(err);
                }

                let updated = self.store.update_event(&edited).await;
                if let Err(err) = updated {
                    return Err(self.fail(CalendarError::persistence(StoreAction::Update, err)));
                }

                let old_day = original.day_key();
                if old_day != edited.day_key() {
                    self.index.remove(&old_day, original);
                }
                let new_day = self.index.upsert(edited);
                (original.id().clone(), vec![old_day, new_day])
            },
        };

        Ok(self.after_local_change(id, &touched_days))
    }

    /// Delete an event from the store, then from the index.
    ///
    /// Returns the indices of the months that must be re-rendered.
    pub async fn commit_event_delete(&mut self, event: &Event) -> Result<Vec<usize>> {
        let deleted = self.store.delete_event(event).await;
        if let Err(err) = deleted {
            return Err(self.fail(CalendarError::persistence(StoreAction::Delete, err)));
        }

        let day = event.day_key();
        if self.index.remove(&day, event).is_none() {
            self.notifier.debug(&format!("Deleted event {} was not indexed under {}", event.id(), day));
        }
        Ok(self.after_local_change(event.id().clone(), &[day]))
    }

    fn after_local_change(&mut self, id: EventId, days: &[DayKey]) -> Vec<usize> {
        self.selection.editing = None;
        self.generation += 1;
        self.changed_at.insert(id, self.generation);

        let mut months: Vec<usize> = match &self.window {
            None => Vec::new(),
            Some(window) => days.iter()
                .flat_map(|day| window.refresh_indices(&day.month_start()))
                .collect(),
        };
        months.sort_unstable();
        months.dedup();

        self.notifier.feedback(Notice::Updated{ months: months.clone() });
        months
    }

    /// Drop the fetched events that have been saved, edited or deleted locally after `generation`.
    /// The index already holds their latest state.
    fn without_local_changes(&mut self, events: Vec<Event>, generation: u64) -> Vec<Event> {
        let changed_at = &self.changed_at;
        let (kept, outdated): (Vec<Event>, Vec<Event>) = events.into_iter()
            .partition(|event| changed_at.get(event.id()).map_or(true, |&changed| changed <= generation));

        if outdated.is_empty() == false {
            self.notifier.debug(&format!("Ignoring {} fetched event(s) that changed locally since", outdated.len()));
        }
        kept
    }

    fn fail(&mut self, err: CalendarError) -> CalendarError {
        self.notifier.warn(&err.to_string());
        self.notifier.feedback(Notice::Failed{ message: err.user_message() });
        err
    }

    //
    // View model
    //

    /// The months of the grid, in order. This is empty until the initial range is loaded.
    pub fn months_to_render(&self) -> &[MonthStart] {
        match &self.window {
            None => &[],
            Some(window) => window.months(),
        }
    }

    pub fn events_for_day(&self, day: &DayKey) -> &[Event] {
        self.index.events_on(day)
    }

    pub fn today_month_index(&self) -> Option<usize> {
        self.window.as_ref().map(|window| window.today_index())
    }

    pub fn month_header(&self, month_index: usize) -> Option<MonthHeader> {
        let month = self.window.as_ref()?.get(month_index)?;
        Some(MonthHeader::new(month))
    }

    pub fn month_cells(&self, month_index: usize) -> Option<MonthCells> {
        let month = *self.window.as_ref()?.get(month_index)?;
        Some(MonthCells::build(month, &self.index, self.today, self.selection.selected_day))
    }

    /// The rows of the event list, for the selected day
    pub fn selected_event_rows(&mut self) -> Vec<EventRow> {
        self.selected_events().iter().map(EventRow::from).collect()
    }
}


/// Marks a direction as in flight, until dropped
struct InFlight<'a> {
    pending: &'a mut HashSet<Direction>,
    direction: Direction,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.direction);
    }
}
