/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 05/03/2026
Last Modified: 19/10/2026
License: MIT
*/

use std::fmt;
use tracing::{error, info, warn};

/// Severity of a user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            MessageLevel::Info => "Info",
            MessageLevel::Success => "Success",
            MessageLevel::Warning => "Warning",
            MessageLevel::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

/// Per-feature loops report after every this many features, plus once at
/// the end.
pub const FEATURE_PROGRESS_STEP: usize = 20;

/// Receives progress and messages from a run. Reporting is advisory and
/// never affects results.
pub trait ProgressSink {
    fn report(&mut self, label: &str, current: usize, max: usize);

    fn notify(&mut self, level: MessageLevel, text: &str);

    /// Tears down any progress display. Called once on every exit path.
    fn finish(&mut self) {}
}

/// Prints progress as a percentage, only when the integer percentage
/// changes, and messages as `Level: text` lines.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    verbose: bool,
    label: String,
    old_progress: Option<usize>,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> ConsoleProgress {
        ConsoleProgress {
            verbose,
            ..Default::default()
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, label: &str, current: usize, max: usize) {
        if label != self.label {
            self.label = label.to_string();
            self.old_progress = None;
        }
        let progress = if max == 0 {
            100
        } else {
            (100f64 * current.min(max) as f64 / max as f64) as usize
        };
        if self.old_progress != Some(progress) {
            if self.verbose {
                println!("{}: {}%", label, progress);
            }
            self.old_progress = Some(progress);
        }
    }

    fn notify(&mut self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Error => error!("{}", text),
            MessageLevel::Warning => warn!("{}", text),
            _ => info!("{}", text),
        }
        // errors are always shown, the rest only in verbose mode
        if self.verbose || level == MessageLevel::Error {
            println!("{}: {}", level, text);
        }
    }

    fn finish(&mut self) {
        self.label.clear();
        self.old_progress = None;
    }
}

/// Keeps every report and message in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub reports: Vec<(String, usize, usize)>,
    pub messages: Vec<(MessageLevel, String)>,
    pub finished: usize,
}

impl RecordingProgress {
    pub fn new() -> RecordingProgress {
        RecordingProgress::default()
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&(MessageLevel, String)> {
        self.messages.last()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&mut self, label: &str, current: usize, max: usize) {
        self.reports.push((label.to_string(), current, max));
    }

    fn notify(&mut self, level: MessageLevel, text: &str) {
        self.messages.push((level, text.to_string()));
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}
