//! Interactive countdown session.
//!
//! Everything runs on one task: tick firings, stdin lines and Ctrl-C are
//! selected in a single loop, so a pause or cancel has taken effect before
//! the next firing can be observed.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use countdown_core::error::Result;
use countdown_core::timer::{CountdownEngine, IntervalTicks, TimerCommand, TimerState};
use countdown_core::{Config, Event, ValidationError};

use crate::render::Renderer;

enum Input {
    Command(TimerCommand),
    Quit,
}

/// A blank line triggers the primary control for the current state.
fn parse_input(line: &str, state: TimerState) -> Result<Input, ValidationError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Ok(Input::Command(state.primary_action().command())),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        other => other.parse().map(Input::Command),
    }
}

pub struct Session {
    engine: CountdownEngine<IntervalTicks>,
    renderer: Renderer,
    bell: bool,
    stay: bool,
    notice: Option<String>,
}

impl Session {
    pub fn new(mut engine: CountdownEngine<IntervalTicks>, renderer: Renderer, config: &Config) -> Self {
        engine.subscribe(|event| debug!(?event, "engine event"));
        Self {
            engine,
            renderer,
            bell: config.notifications.bell,
            stay: false,
            notice: None,
        }
    }

    /// Keep the session open after a countdown ends.
    pub fn stay_open(mut self, stay: bool) -> Self {
        self.stay = stay;
        self
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let mut dirty = true;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        if let Some(event) = self.engine.start() {
            self.on_event(&event);
        }

        loop {
            if dirty {
                self.draw()?;
            }
            dirty = true;
            match self.engine.state() {
                TimerState::Idle if !self.stay || !stdin_open => break,
                // Nothing can resume a paused countdown once input is gone.
                TimerState::Paused if !stdin_open => {
                    info!("input closed while paused, cancelling");
                    if let Some(event) = self.engine.cancel() {
                        self.on_event(&event);
                    }
                    continue;
                }
                _ => {}
            }

            tokio::select! {
                _ = self.engine.ticks_mut().fired() => {
                    if let Some(event) = self.engine.tick() {
                        self.on_event(&event);
                    }
                }
                line = lines.next_line(), if stdin_open => match line? {
                    Some(line) => {
                        if !self.handle_line(&line) {
                            break;
                        }
                    }
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                        dirty = false;
                    }
                },
                _ = &mut ctrl_c => {
                    info!("interrupted");
                    self.engine.cancel();
                    break;
                }
            }
        }

        if !self.renderer.is_plain() {
            println!();
        }
        Ok(())
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_input(line, self.engine.state()) {
            Ok(Input::Quit) => {
                self.engine.cancel();
                return false;
            }
            Ok(Input::Command(cmd)) => match self.engine.apply(cmd) {
                Some(event) => self.on_event(&event),
                None => {
                    self.notice = Some(format!("not available while {}", self.engine.state()));
                }
            },
            Err(e) => self.notice = Some(e.to_string()),
        }
        true
    }

    fn on_event(&mut self, event: &Event) {
        match event {
            Event::TimerCompleted { .. } => {
                self.notice = Some("done".into());
                if self.bell {
                    print!("\x07");
                }
            }
            Event::TimerCancelled { .. } => self.notice = Some("cancelled".into()),
            _ => {}
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let mut frame = self.renderer.frame(&self.engine);
        if let Some(notice) = self.notice.take() {
            frame.push_str(&format!("  {notice}"));
        }
        let mut out = io::stdout().lock();
        if self.renderer.is_plain() {
            writeln!(out, "{frame}")?;
        } else {
            write!(out, "\r\x1b[2K{frame}")?;
        }
        out.flush()
    }
}
