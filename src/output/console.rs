use std::fmt;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::probe::{HitDetail, ProbeObserver, ProbeResult, ScanSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Warn,
    Bad,
    Heading,
    Dim,
}

impl Tone {
    pub fn color_code(&self) -> &'static str {
        match self {
            Tone::Good => "\x1b[92m",    // Green
            Tone::Warn => "\x1b[93m",    // Yellow
            Tone::Bad => "\x1b[91m",     // Red
            Tone::Heading => "\x1b[94m", // Blue
            Tone::Dim => "\x1b[2m",
        }
    }

    pub fn reset_color() -> &'static str {
        "\x1b[0m"
    }
}

/// Console formatting. Colour is decided once and passed around.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.color {
            format!("{}{}{}", tone.color_code(), text, Tone::reset_color())
        } else {
            text.to_string()
        }
    }

    pub fn section(&self, title: &str) {
        println!("\n{}", self.paint(Tone::Heading, &format!("[{}]", title)));
        println!("{}", "─".repeat(40));
    }

    pub fn fields(&self, fields: &[(&'static str, String)]) {
        for (label, value) in fields {
            println!("{} {}", self.paint(Tone::Good, &format!("{}:", label)), value);
        }
    }

    pub fn notice(&self, text: &str) {
        println!("{}", self.paint(Tone::Warn, text));
    }

    pub fn error(&self, err: &dyn fmt::Display) {
        println!("{}", self.paint(Tone::Bad, &format!("[-] Error: {}", err)));
    }

    /// Closing lines of a probe session: hit count or the "nothing found"
    /// notice, then the probe statistics.
    pub fn summary_lines<C, D>(&self, session: &ScanSession<C, D>, noun: &str) -> (String, String) {
        let headline = if session.is_empty() {
            self.paint(Tone::Warn, &format!("No {} found", noun))
        } else {
            self.paint(Tone::Good, &format!("Found {} {}", session.hits.len(), noun))
        };
        let stats = self.paint(
            Tone::Dim,
            &format!(
                "probed {} ({} negative, {} errors) in {}",
                session.probed,
                session.misses,
                session.errors,
                format_elapsed(session.elapsed)
            ),
        );
        (headline, stats)
    }

    pub fn summary<C, D>(&self, session: &ScanSession<C, D>, noun: &str) {
        let (headline, stats) = self.summary_lines(session, noun);
        if session.is_empty() {
            println!("{}", headline);
        } else {
            println!("\n{}", headline);
        }
        println!("{}", stats);
    }

    pub fn reporter(&self, show_misses: bool) -> ConsoleReporter {
        ConsoleReporter::new(*self, show_misses)
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.as_secs() > 0 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

/// Prints hits as they complete while a progress bar tracks the session.
pub struct ConsoleReporter {
    console: Console,
    show_misses: bool,
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new(console: Console, show_misses: bool) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { console, show_misses, bar }
    }

    fn line(&self, text: String) {
        // suspend also works when the bar is hidden, unlike println
        self.bar.suspend(|| println!("{}", text));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl<C, D> ProbeObserver<C, D> for ConsoleReporter
where
    C: fmt::Display,
    D: HitDetail,
{
    fn on_start(&self, target: &str, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(target.to_string());
        self.line(self.console.paint(Tone::Warn, &format!("Scanning {}...", target)));
    }

    fn on_event(&self, result: &ProbeResult<C, D>) {
        self.bar.inc(1);
        match result {
            ProbeResult::Hit { detail, .. } => {
                let tone = if detail.label() == "FORBIDDEN" { Tone::Warn } else { Tone::Good };
                let tag = self.console.paint(tone, &format!("[{}]", detail.label()));
                self.line(format!("{} {}", tag, detail));
            }
            ProbeResult::Miss { candidate } if self.show_misses => {
                self.line(self.console.paint(Tone::Dim, &format!("[MISS] {}", candidate)));
            }
            ProbeResult::Errored { candidate, cause } if self.show_misses => {
                self.line(self.console.paint(Tone::Dim, &format!("[ERROR] {}: {}", candidate, cause)));
            }
            _ => {}
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
