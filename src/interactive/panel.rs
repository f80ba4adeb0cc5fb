// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Presentation state of the interactive surface.
//!
//! Owned and mutated only by the presentation loop; the cycle task reaches
//! it through [`UiEvent`]s.

use super::UiEvent;

const READY_LABEL: &str = "Ready to start";
const STOPPING_LINE: &str = "Stopping process...";

/// Progress, log, and control enablement of one interactive window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    current: u32,
    total: u32,
    label: String,
    log: Vec<String>,
    start_enabled: bool,
    stop_enabled: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: 0,
            total: 0,
            label: READY_LABEL.to_string(),
            log: Vec::new(),
            start_enabled: true,
            stop_enabled: false,
        }
    }

    /// A run of `total` iterations was started.
    pub fn begin(&mut self, total: u32) {
        self.current = 0;
        self.total = total;
        self.log.clear();
        self.label = progress_label(0, total);
        self.start_enabled = false;
        self.stop_enabled = true;
    }

    /// The stop control was pressed.
    ///
    /// Returns `false` if there was nothing to stop.
    pub fn request_stop(&mut self) -> bool {
        if !self.stop_enabled {
            return false;
        }
        self.stop_enabled = false;
        self.log.push(STOPPING_LINE.to_string());
        true
    }

    pub fn apply(&mut self, event: &UiEvent) {
        match event {
            UiEvent::Progress {
                current,
                completed,
                total,
            } => {
                self.current = *current;
                self.total = *total;
                self.label = progress_label(*completed, *total);
            }
            UiEvent::Log(line) => self.log.push(line.clone()),
            UiEvent::Finished(_) => {
                self.start_enabled = true;
                self.stop_enabled = false;
            }
        }
    }

    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    #[must_use]
    pub const fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    #[must_use]
    pub const fn stop_enabled(&self) -> bool {
        self.stop_enabled
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        !self.start_enabled
    }
}

fn progress_label(completed: u32, total: u32) -> String {
    format!("{completed}/{total} commits completed")
}
