//! Paging through the raw rows of a filtered record set.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::output::write_rows;
use crate::records::{RecordSet, TripRecord};
use crate::terminal::{normalize, prompt};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserState {
    Displaying { cursor: usize },
    Stopped,
}

/// Outcome of feeding one answer to the browser.
#[derive(Debug, PartialEq)]
pub enum BrowserStep<'a> {
    /// Rows to display, starting at source-set index `start`. May be empty.
    Show { start: usize, rows: &'a [TripRecord] },
    Stop,
    /// Neither "yes" nor "no"; the state is unchanged.
    Unrecognised,
}

pub struct RawDataBrowser<'a> {
    records: &'a RecordSet,
    page_size: usize,
    state: BrowserState,
}

impl<'a> RawDataBrowser<'a> {
    pub fn new(records: &'a RecordSet, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            state: BrowserState::Displaying { cursor: 0 },
        }
    }

    pub fn state(&self) -> BrowserState {
        self.state
    }

    /// Applies one answer. `None` means the input ended and stops the browser.
    pub fn step(&mut self, answer: Option<&str>) -> BrowserStep<'a> {
        let BrowserState::Displaying { cursor } = self.state else {
            return BrowserStep::Stop;
        };

        let Some(answer) = answer else {
            self.state = BrowserState::Stopped;
            return BrowserStep::Stop;
        };

        match normalize(answer).as_str() {
            "yes" => {
                let rows = self.records.page(cursor, self.page_size);
                self.state = BrowserState::Displaying {
                    cursor: cursor.saturating_add(self.page_size),
                };
                BrowserStep::Show {
                    start: cursor,
                    rows,
                }
            }
            "no" => {
                self.state = BrowserState::Stopped;
                BrowserStep::Stop
            }
            _ => BrowserStep::Unrecognised,
        }
    }

    /// Prompts until the user answers "no" or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        while let BrowserState::Displaying { cursor } = self.state {
            let message = if cursor == 0 {
                format!(
                    "\nWould you like to see {} rows of raw data? Enter yes or no.\n> ",
                    self.page_size
                )
            } else {
                format!(
                    "\nWould you like to see the next {} rows? Enter yes or no.\n> ",
                    self.page_size
                )
            };
            let answer = prompt(input, output, &message)?;

            match self.step(answer.as_deref()) {
                BrowserStep::Show { start, rows } => {
                    debug!(start, shown = rows.len(), "Displaying raw rows");
                    if rows.is_empty() {
                        writeln!(output, "No more rows to display.")?;
                    } else {
                        write_rows(output, rows, self.records.schema())?;
                    }
                }
                BrowserStep::Stop => {}
                BrowserStep::Unrecognised => writeln!(output, "Please answer yes or no.")?,
            }
        }
        Ok(())
    }
}
