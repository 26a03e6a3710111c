use chrono::{NaiveDate, NaiveDateTime};

pub const DATES_OUT_OF_ORDER: &str = "End date must not be set before the start date";
pub const STAGE_BEFORE_START: &str = "Stage's date is before the start date of the competition";
pub const STAGE_AFTER_END: &str = "Stage's date is after the end date of the competition";

/// The inclusive date range a competition runs over.
///
/// Construction rejects an end date that precedes the start date, so any
/// value of this type is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompetitionPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl CompetitionPeriod {
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use storage::models::CompetitionPeriod;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    ///
    /// assert!(CompetitionPeriod::new(start, end).is_ok());
    /// assert!(CompetitionPeriod::new(end, start).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, &'static str> {
        if end < start {
            return Err(DATES_OUT_OF_ORDER);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check that a stage scheduled at `starts_at` happens on one of the
    /// competition's days.
    pub fn check_stage(&self, starts_at: NaiveDateTime) -> Result<(), &'static str> {
        let day = starts_at.date();
        if day < self.start {
            return Err(STAGE_BEFORE_START);
        }
        if day > self.end {
            return Err(STAGE_AFTER_END);
        }
        Ok(())
    }

    pub fn contains(&self, starts_at: NaiveDateTime) -> bool {
        self.check_stage(starts_at).is_ok()
    }
}
