use std::{
    future::Future,
    io::{self, BufRead, Write},
    thread,
};

use tokio::sync::mpsc;
use weather_core::{WeatherRepository, WeatherService};

const PROMPT: &str = "Enter a city (or 'exit'): ";

/// Lines read from the terminal, or the read error that ended them.
pub type Lines = mpsc::Receiver<io::Result<String>>;

/// Read stdin on a dedicated thread and forward each line.
///
/// The thread is detached: a read blocked in the kernel can't be cancelled,
/// so on interrupt the process exits without waiting for it.
pub fn stdin_lines() -> Lines {
    let (tx, rx) = mpsc::channel(1);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Line-oriented front-end: one city per line, one summary per answer.
pub struct ConsoleUi<'a, R> {
    service: &'a WeatherService<R>,
}

impl<'a, R: WeatherRepository> ConsoleUi<'a, R> {
    pub fn new(service: &'a WeatherService<R>) -> Self {
        Self { service }
    }

    /// Run until `exit`/`quit`, an empty line, end of input, or `shutdown` resolving.
    ///
    /// Lookup failures are printed and the loop continues; only I/O errors on
    /// `lines`/`out` end it with an error.
    pub async fn run<W, S>(&self, mut lines: Lines, out: &mut W, shutdown: S) -> io::Result<()>
    where
        W: Write,
        S: Future,
    {
        writeln!(out, "=== Weather App ===")?;

        tokio::pin!(shutdown);

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let line = tokio::select! {
                biased;
                _ = &mut shutdown => return interrupted(out),
                line = lines.recv() => line.transpose()?,
            };

            let city = line.as_deref().map(str::trim).unwrap_or_default();
            if is_exit(city) {
                writeln!(out, "Bye.")?;
                return Ok(());
            }

            let result = tokio::select! {
                biased;
                _ = &mut shutdown => return interrupted(out),
                result = self.service.get_weather_summary(city) => result,
            };

            match result {
                Ok(summary) => writeln!(out, "{summary}")?,
                Err(e) => {
                    tracing::warn!(city, error = %e, "weather lookup failed");
                    writeln!(out, "Failed to get weather: {e}")?;
                }
            }
        }
    }
}

fn is_exit(input: &str) -> bool {
    input.is_empty() || input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn interrupted<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Interrupted by user.")
}
