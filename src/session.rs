//! The interactive loop: collect filters, report, browse, maybe restart.

use std::io::{BufRead, Write};
use std::mem;
use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::{duration_stats, station_stats, time_stats, user_stats};
use crate::browser::{DEFAULT_PAGE_SIZE, RawDataBrowser};
use crate::city::City;
use crate::error::{ExplorerError, Result};
use crate::filters::{self, DayFilter, FilterCriteria, MonthFilter};
use crate::output;
use crate::records::{RecordSet, TripSource};
use crate::terminal::{normalize, prompt};

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const CITY_PROMPT: &str =
    "\nWhich city would you like to explore: Chicago, New York City or Washington?\n> ";
const MONTH_PROMPT: &str =
    "\nWhich month? Enter all, january, february, march, april, may or june.\n> ";
const DAY_PROMPT: &str = "\nWhich day of the week? Enter all, monday, tuesday, ... sunday.\n> ";
const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no.\n> ";

#[derive(Debug, PartialEq)]
pub enum SessionState {
    CollectingFilters,
    Reporting(FilterCriteria),
    Browsing(RecordSet),
    AwaitingRestart,
    Done,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::CollectingFilters => "collecting_filters",
            SessionState::Reporting(_) => "reporting",
            SessionState::Browsing(_) => "browsing",
            SessionState::AwaitingRestart => "awaiting_restart",
            SessionState::Done => "done",
        }
    }
}

/// Drives one user through any number of explore iterations.
///
/// Generic over the trip source and the terminal so tests can script a run.
pub struct Session<S, R, W> {
    source: S,
    input: R,
    output: W,
    page_size: usize,
    state: SessionState,
}

impl<S: TripSource, R: BufRead, W: Write> Session<S, R, W> {
    pub fn new(source: S, input: R, output: W) -> Self {
        Self {
            source,
            input,
            output,
            page_size: DEFAULT_PAGE_SIZE,
            state: SessionState::CollectingFilters,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user declines to restart or input ends.
    ///
    /// # Errors
    ///
    /// Unreadable trip data and terminal I/O failures end the session.
    pub fn run(&mut self) -> Result<()> {
        info!("Session started");
        while self.state != SessionState::Done {
            self.advance()?;
        }
        info!("Session finished");
        Ok(())
    }

    /// Performs one state transition.
    pub fn advance(&mut self) -> Result<()> {
        let next = match mem::replace(&mut self.state, SessionState::Done) {
            SessionState::CollectingFilters => match self.collect_filters()? {
                Some(criteria) => SessionState::Reporting(criteria),
                None => SessionState::Done,
            },
            SessionState::Reporting(criteria) => SessionState::Browsing(self.report(criteria)?),
            SessionState::Browsing(records) => {
                RawDataBrowser::new(&records, self.page_size).run(&mut self.input, &mut self.output)?;
                SessionState::AwaitingRestart
            }
            SessionState::AwaitingRestart => {
                let answer = prompt(&mut self.input, &mut self.output, RESTART_PROMPT)?;
                if answer.as_deref().map(normalize).as_deref() == Some("yes") {
                    SessionState::CollectingFilters
                } else {
                    SessionState::Done
                }
            }
            SessionState::Done => SessionState::Done,
        };
        debug!(state = next.name(), "Session transition");
        self.state = next;
        Ok(())
    }

    fn collect_filters(&mut self) -> Result<Option<FilterCriteria>> {
        writeln!(self.output, "{GREETING}")?;

        let Some(city) = self.ask::<City>(CITY_PROMPT)? else {
            return Ok(None);
        };
        let Some(month) = self.ask::<MonthFilter>(MONTH_PROMPT)? else {
            return Ok(None);
        };
        let Some(day) = self.ask::<DayFilter>(DAY_PROMPT)? else {
            return Ok(None);
        };

        output::write_separator(&mut self.output)?;
        Ok(Some(FilterCriteria { city, month, day }))
    }

    /// Prompts until the answer parses. Selection errors are shown and asked again.
    fn ask<T>(&mut self, message: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = ExplorerError>,
    {
        loop {
            let Some(answer) = prompt(&mut self.input, &mut self.output, message)? else {
                return Ok(None);
            };
            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) if e.is_recoverable() => {
                    debug!(error = %e, "Rejected selection");
                    writeln!(self.output, "Sorry, {e}.")?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(city = %criteria.city, month = %criteria.month, day = %criteria.day)
    )]
    fn report(&mut self, criteria: FilterCriteria) -> Result<RecordSet> {
        let loaded = self.source.load(criteria.city)?;
        let records = filters::apply(&loaded, &criteria.month, &criteria.day);
        info!(loaded = loaded.len(), matched = records.len(), "Trips selected");

        if records.is_empty() {
            writeln!(
                self.output,
                "\nNo trips match {} / month {} / day {}.",
                criteria.city, criteria.month, criteria.day
            )?;
        }

        self.section(
            "Calculating The Most Frequent Times of Travel",
            "time",
            || time_stats(&records),
            output::write_time_report,
        )?;
        self.section(
            "Calculating The Most Popular Stations and Trip",
            "station",
            || station_stats(&records),
            output::write_station_report,
        )?;
        self.section(
            "Calculating Trip Duration",
            "duration",
            || duration_stats(&records),
            output::write_duration_report,
        )?;
        self.section(
            "Calculating User Stats",
            "user",
            || user_stats(&records),
            output::write_user_report,
        )?;

        Ok(records)
    }

    /// Computes one report, timing only the computation, then renders it.
    fn section<T, C, F>(&mut self, title: &str, name: &str, compute: C, render: F) -> Result<()>
    where
        T: Serialize,
        C: FnOnce() -> T,
        F: FnOnce(&mut W, &T) -> std::io::Result<()>,
    {
        output::write_heading(&mut self.output, title)?;

        let started = Instant::now();
        let report = compute();
        let elapsed = started.elapsed();

        render(&mut self.output, &report)?;
        output::log_report(name, &report);
        output::write_elapsed(&mut self.output, elapsed)?;
        Ok(())
    }
}
