//! Scrolls a calendar backed by an in-memory store, and prints what would be displayed

use chrono::{Duration, Local, NaiveDate};

use calendar_pager::config::PagingConfig;
use calendar_pager::controller::ExtensionOutcome;
use calendar_pager::feedback::feedback_channel;
use calendar_pager::utils::{print_index, print_window};
use calendar_pager::{start_of_day, CalendarController, Event, MockEventStore};

fn seed(today: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();
    for week in -30..30i64 {
        let day = today + Duration::weeks(week);
        let start = start_of_day(day) + Duration::minutes(9 * 60 + 30);
        if let Ok(event) = Event::new(format!("Weekly sync #{}", week + 30), start, start + Duration::minutes(45)) {
            events.push(event);
        }
    }
    events
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let today = Local::now().date_naive();
    let store = MockEventStore::with_events(seed(today));
    let (sender, receiver) = feedback_channel();
    let mut controller = CalendarController::new(store, PagingConfig::default()).with_feedback(sender);

    if let Err(err) = controller.load_initial_range().await {
        eprintln!("Unable to load the calendar: {}", err);
        return;
    }
    println!("{}", *receiver.borrow());

    // Scroll all the way to the first month, twice
    for _ in 0..2 {
        match controller.on_scroll_settled(0).await {
            Ok(ExtensionOutcome::Committed{ direction, months_added, viewport_shift }) => {
                println!("Added {} months {} (viewport moves by {})", months_added, direction, viewport_shift);
            },
            Ok(other) => println!("{:?}", other),
            Err(err) => eprintln!("{}", err.user_message()),
        }
    }
    if let Some(window) = controller.window() {
        print_window(window);
    }

    if let Some(index) = controller.today_month_index() {
        if let (Some(header), Some(cells)) = (controller.month_header(index), controller.month_cells(index)) {
            let busy: Vec<_> = cells.days.iter().filter(|d| d.has_events).map(|d| d.key.day()).collect();
            println!("{} {}: events on {:?}", header.month, header.year, busy);
        }
    }

    controller.select_grid_day(controller.today_month_index().unwrap_or_default(), 0, 1);
    let mut form = controller.new_event_form();
    form.title = Some("Demo event".to_string());
    form.end = form.start.map(|start| start + Duration::hours(1));
    match form.validate(None) {
        Err(err) => eprintln!("{}", err),
        Ok(event) => match controller.commit_event_edit(None, event).await {
            Ok(months) => println!("Saved, months to refresh: {:?}", months),
            Err(err) => eprintln!("{}", err.user_message()),
        },
    }
    for row in controller.selected_event_rows() {
        println!("  {} - {}\t{}", row.start, row.end, row.title);
    }

    print_index(controller.index());
}
