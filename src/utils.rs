///! Some utility functions

use crate::event::Event;
use crate::event_index::EventIndex;
use crate::month_window::MonthWindow;

/// A debug utility that pretty-prints the months of a window
pub fn print_window(window: &MonthWindow) {
    println!("WINDOW {} .. {} ({} months)", window.first(), window.last(), window.len());
    for (i, month) in window.months().iter().enumerate() {
        let marker = if i == window.today_index() { "*" } else { " " };
        println!("  {}{:>3} {}", marker, i, month);
    }
}

/// A debug utility that pretty-prints the events of an index, day by day
pub fn print_index(index: &EventIndex) {
    let mut days: Vec<_> = index.days().collect();
    days.sort();
    println!("INDEX {} events on {} days", index.len(), index.day_count());
    for day in days {
        println!("  {}", day);
        for event in index.events_on(day) {
            print_event(event);
        }
    }
}

pub fn print_event(event: &Event) {
    let multi_day = if event.is_multi_day() { "+" } else { " " };
    println!("    {}{} - {} {}\t{}", multi_day, event.start().format("%H:%M"), event.end().format("%H:%M"), event.title(), event.id());
}
