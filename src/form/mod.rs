//! # Form Module
//!
//! The date/time fields the user edits. Fields are free text and are sent
//! verbatim; [`DateTimeForm::warnings`] only produces hints.

use crate::error::{Result, SerialDateError};
use bevy::prelude::*;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::warn;

/// hour, minute, day, month and year as typed
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct DateTimeForm {
    pub hour: String,
    pub minute: String,
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateTimeForm {
    /// Overwrites year, month and day from a `YYYY-MM-DD` string.
    ///
    /// All three are replaced together; the form is untouched on error.
    pub fn select_date(&mut self, selected: &str) -> Result<()> {
        let parts: Vec<&str> = selected.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(SerialDateError::invalid_date(selected));
        };
        self.year = (*year).to_string();
        self.month = (*month).to_string();
        self.day = (*day).to_string();
        Ok(())
    }

    /// Calendar selection: same as [`Self::select_date`] on the ISO text.
    pub fn select_calendar_date(&mut self, date: NaiveDate) {
        let text = date.format("%Y-%m-%d").to_string();
        if let Err(e) = self.select_date(&text) {
            warn!("{e}");
        }
    }

    /// Fill every field from a local timestamp.
    pub fn fill_from(&mut self, now: NaiveDateTime) {
        self.hour = format!("{:02}", now.hour());
        self.minute = format!("{:02}", now.minute());
        self.day = format!("{:02}", now.day());
        self.month = format!("{:02}", now.month());
        self.year = format!("{:04}", now.year());
    }

    /// The form's date, if the fields parse as one.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let year = self.year.trim().parse().ok()?;
        let month = self.month.trim().parse().ok()?;
        let day = self.day.trim().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Out-of-range hints. These never block a send.
    pub fn warnings(&self) -> Vec<String> {
        let mut hints = Vec::new();
        check_range(&mut hints, "hour", &self.hour, 0, 23);
        check_range(&mut hints, "minute", &self.minute, 0, 59);
        check_range(&mut hints, "day", &self.day, 1, 31);
        check_range(&mut hints, "month", &self.month, 1, 12);
        if self.year.len() != 4 || !self.year.bytes().all(|b| b.is_ascii_digit()) {
            hints.push(format!("year '{}' is not four digits", self.year));
        }
        hints
    }
}

fn check_range(hints: &mut Vec<String>, field: &str, value: &str, min: u32, max: u32) {
    match value.trim().parse::<u32>() {
        Ok(n) if (min..=max).contains(&n) => {}
        Ok(n) => hints.push(format!("{field} {n} is outside {min}-{max}")),
        Err(_) => hints.push(format!("{field} '{value}' is not a number")),
    }
}

/// Registers the [`DateTimeForm`] resource.
pub struct FormPlugin;

impl Plugin for FormPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DateTimeForm>();
    }
}
