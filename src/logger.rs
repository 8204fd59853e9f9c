use crate::Chronometer;
use std::fmt::Display;

/// Writes progress lines suffixed with the time elapsed since the logger was created.
#[derive(Clone, Copy)]
pub struct Logger {
    chronometer: Chronometer,
    quiet: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            chronometer: Chronometer::new(),
            quiet: false,
        }
    }

    /// A logger that only reports errors, for commands whose stdout carries data.
    pub fn quiet() -> Self {
        Self {
            chronometer: Chronometer::new(),
            quiet: true,
        }
    }

    pub fn log(&self, value: impl Display) {
        if !self.quiet {
            println!("{} ({} elapsed)", value, self.chronometer.elapsed());
        }
    }

    pub fn error(&self, value: impl Display) {
        eprintln!("error: {} ({} elapsed)", value, self.chronometer.elapsed());
    }
}

/// Forwards one call out of `interval` to the underlying logger.
#[derive(Clone, Copy)]
pub struct PartialLogger<'a> {
    index: usize,
    interval: usize,
    logger: &'a Logger,
}

impl<'a> PartialLogger<'a> {
    pub fn new(interval: usize, logger: &'a Logger) -> Self {
        Self {
            index: 0,
            interval: interval.max(1),
            logger,
        }
    }

    pub fn log<D: Display>(&mut self, f: impl FnOnce(usize) -> D) {
        if self.index % self.interval == 0 {
            self.logger.log(f(self.index));
        }
        self.index += 1;
    }
}
