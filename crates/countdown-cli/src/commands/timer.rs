use std::io::IsTerminal;

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;

use countdown_core::timer::{CountdownEngine, DurationSelection, IntervalTicks};
use countdown_core::{as_time_string, completion_time_string, Config, ValidationError};

use crate::render::Renderer;
use crate::session::Session;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the terminal
    ///
    /// While running, type a command and press enter: (p)ause, (r)esume,
    /// (c)ancel, (s)tart, `h N` / `m N` / `sec N` to edit the selection
    /// while idle, (q)uit.
    Run {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Stay open after the countdown ends, to edit and start again
        #[arg(long)]
        stay: bool,
        /// One frame per line instead of redrawing in place
        #[arg(long)]
        plain: bool,
    },
    /// Show the duration and projected completion time without starting
    Preview {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Format a number of seconds as HH:MM:SS
    Format {
        seconds: u64,
    },
}

/// Picker values. Anything not given comes from `--duration`, then the config.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Hours (0-23)
    #[arg(long)]
    hours: Option<u8>,
    /// Minutes (0-59)
    #[arg(long)]
    minutes: Option<u8>,
    /// Seconds (0-59)
    #[arg(long)]
    seconds: Option<u8>,
    /// Whole duration, e.g. 00:25:00, 5:00, 1h30m
    #[arg(long)]
    duration: Option<DurationSelection>,
}

impl SelectionArgs {
    pub fn resolve(&self, config: &Config) -> Result<DurationSelection, ValidationError> {
        let base = self.duration.unwrap_or_else(|| config.selection());
        DurationSelection::new(
            self.hours.unwrap_or(base.hours),
            self.minutes.unwrap_or(base.minutes),
            self.seconds.unwrap_or(base.seconds),
        )
    }
}

#[derive(Serialize)]
struct Preview {
    selection: DurationSelection,
    duration_secs: u64,
    duration: String,
    completes_at: DateTime<Utc>,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            selection,
            stay,
            plain,
        } => {
            let config = Config::load_or_default();
            let selection = selection.resolve(&config)?;
            let plain = plain || !std::io::stdout().is_terminal();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(async {
                let mut engine = CountdownEngine::new(IntervalTicks::new());
                engine.set_selection(selection);
                let session = Session::new(engine, Renderer::new(&config.ui, plain), &config)
                    .stay_open(stay);
                session.run().await
            });
            // A pending stdin read would otherwise hold the runtime open.
            runtime.shutdown_background();
            result?;
        }
        TimerAction::Preview { selection, json } => {
            let config = Config::load_or_default();
            let selection = selection.resolve(&config)?;
            let secs = selection.total_secs();
            let preview = Preview {
                selection,
                duration_secs: secs,
                duration: as_time_string(secs),
                completes_at: Utc::now() + Duration::seconds(secs as i64),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                println!("duration  {}", preview.duration);
                println!("completes {}", completion_time_string(preview.completes_at));
            }
        }
        TimerAction::Format { seconds } => {
            println!("{}", as_time_string(seconds));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_components_override_config() {
        let mut config = Config::default();
        config.timer.default_minutes = 5;
        let args = SelectionArgs {
            seconds: Some(30),
            ..Default::default()
        };
        assert_eq!(
            args.resolve(&config).unwrap(),
            DurationSelection::new(0, 5, 30).unwrap()
        );
    }

    #[test]
    fn duration_replaces_config_base() {
        let args = SelectionArgs {
            duration: Some("1h".parse().unwrap()),
            minutes: Some(15),
            ..Default::default()
        };
        assert_eq!(
            args.resolve(&Config::default()).unwrap().total_secs(),
            3600 + 15 * 60
        );
    }

    #[test]
    fn out_of_range_component_is_rejected() {
        let args = SelectionArgs {
            minutes: Some(61),
            ..Default::default()
        };
        assert!(args.resolve(&Config::default()).is_err());
    }
}
