//! The months that are currently materialized in the scrolling grid

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::day_key::{DateRange, MonthStart};
use crate::error::{CalendarError, Result};

/// A viewport at this index or before it asks for more months before the window
const LEADING_EDGE: usize = 2;
/// A viewport this close to the end of the window (or closer) asks for more months after it
const TRAILING_EDGE: usize = 3;

/// The side of the window that grows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Before,
    After,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}


/// A contiguous sequence of months, that grows on either side as the user scrolls.
///
/// The window also tracks where the "today" month is. Since months can be prepended, this
/// index changes over time, but it always designates the same month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthWindow {
    months: Vec<MonthStart>,
    today: MonthStart,
    today_index: usize,
}

impl MonthWindow {
    /// Build `2 * radius + 1` months centered on the month of `around`, which becomes the "today" month.
    ///
    /// `radius` must be at least 1.
    pub fn initialize(around: NaiveDate, radius: usize) -> Result<Self> {
        if radius < 1 {
            log::error!("Refusing to build a month window with radius {}", radius);
            return Err(CalendarError::Precondition(format!("window radius must be at least 1 (got {})", radius)));
        }

        let today = MonthStart::of(around);
        let first = shifted(today, -(radius as i32))?;
        let months = (0..(2 * radius + 1))
            .map(|offset| shifted(first, offset as i32))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { months, today, today_index: radius })
    }

    pub fn months(&self) -> &[MonthStart] {
        &self.months
    }

    pub fn get(&self, index: usize) -> Option<&MonthStart> {
        self.months.get(index)
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn first(&self) -> MonthStart {
        self.months[0]
    }

    pub fn last(&self) -> MonthStart {
        self.months[self.months.len() - 1]
    }

    pub fn today_month(&self) -> MonthStart {
        self.today
    }

    pub fn today_index(&self) -> usize {
        self.today_index
    }

    /// Index of a month within the window, if it is materialized
    pub fn index_of(&self, month: &MonthStart) -> Option<usize> {
        let offset = self.first().months_until(month);
        if offset < 0 || offset as usize >= self.months.len() {
            None
        } else {
            Some(offset as usize)
        }
    }

    /// The whole time range covered by the window
    pub fn span(&self) -> DateRange {
        DateRange::months(self.first(), self.last())
    }

    /// Whether every instant of `range` falls within materialized months
    pub fn covers(&self, range: &DateRange) -> bool {
        let span = self.span();
        span.start <= range.start && range.end <= span.end
    }

    /// Decide whether the window should grow, given the index of the month the user is looking at.
    pub fn needs_extension(&self, viewport_index: usize) -> Option<Direction> {
        if viewport_index <= LEADING_EDGE {
            Some(Direction::Before)
        } else if viewport_index + TRAILING_EDGE >= self.months.len() {
            Some(Direction::After)
        } else {
            None
        }
    }

    /// The range of the `batch_size` months that [`extend`](Self::extend) would add.
    ///
    /// This does not change the window, so that callers can fetch the events of these months
    /// first, and only grow the window once they are available.
    pub fn range_to_load(&self, direction: Direction, batch_size: usize) -> Result<DateRange> {
        let batch = batch_size as i32;
        let (first, last) = match direction {
            Direction::Before => (shifted(self.first(), -batch)?, shifted(self.first(), -1)?),
            Direction::After => (shifted(self.last(), 1)?, shifted(self.last(), batch)?),
        };
        Ok(DateRange::months(first, last))
    }

    /// Add `batch_size` contiguous months on one side.
    ///
    /// `batch_size` must be greater than 1. Prepending shifts every index, including [`today_index`](Self::today_index).
    pub fn extend(&mut self, direction: Direction, batch_size: usize) -> Result<()> {
        if batch_size < 2 {
            log::error!("Refusing to extend a month window by {} month(s)", batch_size);
            return Err(CalendarError::Precondition(format!("batch size must be greater than 1 (got {})", batch_size)));
        }

        // Nothing changes in case a month is out of range
        match direction {
            Direction::Before => {
                let first = self.first();
                let added = (1..=batch_size)
                    .rev()
                    .map(|n| shifted(first, -(n as i32)))
                    .collect::<Result<Vec<_>>>()?;
                self.months.splice(0..0, added);
                self.today_index += batch_size;
            },
            Direction::After => {
                let last = self.last();
                let added = (1..=batch_size)
                    .map(|n| shifted(last, n as i32))
                    .collect::<Result<Vec<_>>>()?;
                self.months.extend(added);
            },
        }

        debug_assert_eq!(self.index_of(&self.today), Some(self.today_index));
        log::debug!("Month window extended {} by {} months, now {} .. {}", direction, batch_size, self.first(), self.last());
        Ok(())
    }

    /// Indices of a month and of its neighbours.
    ///
    /// A month cell also shows the trailing and leading days of the adjacent months, so these are
    /// the cells to redraw when the events of a month change.
    pub fn refresh_indices(&self, month: &MonthStart) -> Vec<usize> {
        let index = match self.index_of(month) {
            None => return Vec::new(),
            Some(i) => i,
        };

        let mut indices = Vec::with_capacity(3);
        if index > 0 {
            indices.push(index - 1);
        }
        indices.push(index);
        if index + 1 < self.months.len() {
            indices.push(index + 1);
        }
        indices
    }
}

fn shifted(month: MonthStart, n: i32) -> Result<MonthStart> {
    month.add_months(n).ok_or_else(|| CalendarError::OutOfRange { month: month.to_string(), shift: n })
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::Months;

    fn month(year: i32, month: u32) -> MonthStart {
        MonthStart::from_ym(year, month).unwrap()
    }

    fn window() -> MonthWindow {
        MonthWindow::initialize(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 3).unwrap()
    }

    fn is_contiguous(window: &MonthWindow) -> bool {
        window.months().windows(2).all(|pair| pair[0].succ() == pair[1])
    }

    #[test]
    fn initialize_around_a_date() {
        let window = window();

        assert_eq!(window.len(), 7);
        assert_eq!(window.first(), month(2023, 12));
        assert_eq!(window.last(), month(2024, 6));
        assert_eq!(window.today_index(), 3);
        assert_eq!(window.months()[3], month(2024, 3));
        assert!(is_contiguous(&window));
    }

    #[test]
    fn radius_must_be_positive() {
        let around = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(MonthWindow::initialize(around, 0).is_err());

        let smallest = MonthWindow::initialize(around, 1).unwrap();
        assert_eq!(smallest.months(), &[month(2024, 2), month(2024, 3), month(2024, 4)]);
    }

    #[test]
    fn extension_policy() {
        let window = window();

        assert_eq!(window.needs_extension(0), Some(Direction::Before));
        assert_eq!(window.needs_extension(1), Some(Direction::Before));
        assert_eq!(window.needs_extension(2), Some(Direction::Before));
        assert_eq!(window.needs_extension(3), None);
        assert_eq!(window.needs_extension(4), Some(Direction::After));
        assert_eq!(window.needs_extension(5), Some(Direction::After));
        assert_eq!(window.needs_extension(6), Some(Direction::After));
    }

    #[test]
    fn range_to_load_does_not_mutate() {
        let window = window();
        let before = window.clone();

        let range = window.range_to_load(Direction::Before, 3).unwrap();
        assert_eq!(range, DateRange::months(month(2023, 9), month(2023, 11)));

        let range = window.range_to_load(Direction::After, 3).unwrap();
        assert_eq!(range, DateRange::months(month(2024, 7), month(2024, 9)));

        assert_eq!(window, before);
    }

    #[test]
    fn prepending_shifts_today() {
        let mut window = window();

        window.extend(Direction::Before, 3).unwrap();
        assert_eq!(window.len(), 10);
        assert_eq!(window.first(), month(2023, 9));
        assert_eq!(window.today_index(), 6);
        assert_eq!(window.months()[window.today_index()], month(2024, 3));
        assert!(is_contiguous(&window));

        window.extend(Direction::After, 2).unwrap();
        assert_eq!(window.len(), 12);
        assert_eq!(window.last(), month(2024, 8));
        assert_eq!(window.today_index(), 6);
        assert!(is_contiguous(&window));
    }

    #[test]
    fn extended_range_matches_range_to_load() {
        let mut window = window();
        let range = window.range_to_load(Direction::Before, 4).unwrap();
        window.extend(Direction::Before, 4).unwrap();
        assert_eq!(range.start, window.first().first_instant());
        assert!(window.covers(&range));
    }

    #[test]
    fn batch_size_must_exceed_one() {
        let mut window = window();
        let before = window.clone();
        assert!(window.extend(Direction::After, 1).is_err());
        assert!(window.extend(Direction::Before, 0).is_err());
        assert_eq!(window, before);
    }

    #[test]
    fn neighbours_to_refresh() {
        let window = window();
        assert_eq!(window.refresh_indices(&month(2024, 3)), vec![2, 3, 4]);
        assert_eq!(window.refresh_indices(&month(2023, 12)), vec![0, 1]);
        assert_eq!(window.refresh_indices(&month(2024, 6)), vec![5, 6]);
        assert!(window.refresh_indices(&month(2025, 1)).is_empty());
        assert_eq!(window.index_of(&month(2024, 1)), Some(1));
        assert_eq!(window.index_of(&month(2023, 11)), None);
    }

    #[test]
    fn growing_past_the_last_representable_month() {
        let last_month = NaiveDate::MAX;
        assert!(matches!(MonthWindow::initialize(last_month, 1), Err(CalendarError::OutOfRange{ .. })));

        let one_before = NaiveDate::MAX.checked_sub_months(Months::new(1)).unwrap();
        let mut window = MonthWindow::initialize(one_before, 1).unwrap();
        assert_eq!(window.last(), MonthStart::of(NaiveDate::MAX));

        let before = window.clone();
        assert!(window.range_to_load(Direction::After, 3).is_err());
        assert!(matches!(window.extend(Direction::After, 3), Err(CalendarError::OutOfRange{ .. })));
        assert_eq!(window, before);

        // The other side can still grow
        window.extend(Direction::Before, 3).unwrap();
        assert!(is_contiguous(&window));
    }
}
