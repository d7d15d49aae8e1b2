//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

use crate::error::{CalendarError, Result};

/// Format of the start and end times in the event list (e.g. `9:00 AM`).
/// Feel free to override it when initing this library.
pub static TIME_FORMAT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("%-I:%M %p".to_string())));

/// Format of an end time that falls on another day than the start (e.g. `9:00 AM (Mar 8)`).
/// Feel free to override it when initing this library.
pub static MULTI_DAY_TIME_FORMAT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("%-I:%M %p (%b %-d)".to_string())));

/// Format of the month name in the header above the grid (e.g. `March`).
pub static MONTH_FORMAT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("%B".to_string())));

/// Format of the year in the header above the grid (e.g. `2024`).
pub static YEAR_FORMAT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("%Y".to_string())));

/// Read one of the format statics above. A poisoned lock still holds a usable value.
pub(crate) fn read_format(format: &Lazy<Arc<Mutex<String>>>) -> String {
    match format.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}


/// How many months are materialized, and how fast the window grows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingConfig {
    radius: usize,
    batch_size: usize,
}

impl PagingConfig {
    /// `radius` months are loaded on each side of the current month at startup, then the
    /// window grows by `batch_size` months whenever the user scrolls close to one of its edges.
    ///
    /// `radius` must be at least 1, and `batch_size` at least 2 (a single month could be scrolled
    /// past before its events have been loaded).
    pub fn new(radius: usize, batch_size: usize) -> Result<Self> {
        if radius < 1 {
            return Err(CalendarError::Precondition(format!("window radius must be at least 1 (got {})", radius)));
        }
        if batch_size < 2 {
            return Err(CalendarError::Precondition(format!("batch size must be greater than 1 (got {})", batch_size)));
        }
        Ok(Self { radius, batch_size })
    }

    pub fn radius(&self) -> usize     { self.radius     }
    pub fn batch_size(&self) -> usize { self.batch_size }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self { radius: 3, batch_size: 3 }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn paging_config_preconditions() {
        assert!(PagingConfig::new(0, 3).is_err());
        assert!(PagingConfig::new(3, 1).is_err());
        assert!(PagingConfig::new(3, 0).is_err());

        let config = PagingConfig::new(1, 2).unwrap();
        assert_eq!((config.radius(), config.batch_size()), (1, 2));
        assert_eq!(PagingConfig::default(), PagingConfig::new(3, 3).unwrap());
    }
}
