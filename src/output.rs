// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON-lines output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Results and warnings only
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Instant,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: Instant::now(),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// A step in progress; normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("  → {message}");
        }
    }

    /// A finished step, with the time since the command started.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("  ✓ {message} ({:.1}s)", self.elapsed_secs()),
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit(&Event::new("success", message).timed(self)),
        }
    }

    /// Something the user should see that did not stop the command.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit(&Event::new("warning", message)),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.emit_err(&Event::new("error", message).timed(self)),
        }
    }

    /// One container's state, as reported by `status`.
    pub fn container_state(&self, name: &str, state: &str, id: Option<&str>) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => match id {
                Some(id) => println!("{name:<24} {state:<8} {id}"),
                None => println!("{name:<24} {state}"),
            },
            OutputMode::Json => {
                let line = StateLine {
                    event: "state",
                    name,
                    state,
                    id,
                };
                if let Ok(json) = serde_json::to_string(&line) {
                    println!("{json}");
                }
            }
        }
    }

    fn emit(&self, event: &Event<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }

    fn emit_err(&self, event: &Event<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            eprintln!("{json}");
        }
    }
}

#[derive(Serialize)]
struct Event<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> Event<'a> {
    fn new(event: &'a str, message: &'a str) -> Self {
        Self {
            event,
            message,
            duration_secs: None,
        }
    }

    fn timed(mut self, output: &Output) -> Self {
        self.duration_secs = Some(output.elapsed_secs());
        self
    }
}

#[derive(Serialize)]
struct StateLine<'a> {
    event: &'a str,
    name: &'a str,
    state: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}
