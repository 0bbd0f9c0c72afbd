//! Terminal frames for the countdown.
//!
//! Idle shows the picker. Running and paused show the progress ring as a bar,
//! the remaining time and the bell time, followed by the available controls.

use countdown_core::storage::UiConfig;
use countdown_core::timer::{CountdownEngine, TickSource, TimerState};
use countdown_core::{as_time_string, completion_time_string};

const FILLED: char = '█';
const EMPTY: char = '░';

#[derive(Debug, Clone)]
pub struct Renderer {
    bar_width: usize,
    show_completion_time: bool,
    plain: bool,
}

impl Renderer {
    pub fn new(ui: &UiConfig, plain: bool) -> Self {
        Self {
            bar_width: ui.bar_width.max(1) as usize,
            show_completion_time: ui.show_completion_time,
            plain,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.plain
    }

    pub fn frame<T: TickSource>(&self, engine: &CountdownEngine<T>) -> String {
        let state = engine.state();
        let mut line = match state {
            TimerState::Idle => format!("{}", engine.selection()),
            TimerState::Running | TimerState::Paused => {
                let mut active = format!(
                    "{} {}",
                    self.bar(engine.display_progress()),
                    as_time_string(engine.remaining_secs())
                );
                if self.show_completion_time {
                    if let Some(at) = engine.completes_at() {
                        active.push_str(&format!("  bell {}", completion_time_string(at)));
                    }
                }
                if state == TimerState::Paused {
                    active.push_str("  (paused)");
                }
                active
            }
        };
        line.push_str(&controls(state));
        line
    }

    /// Progress ring as a bar. Values above 1.0 draw as full.
    pub fn bar(&self, progress: f64) -> String {
        let filled = (progress.clamp(0.0, 1.0) * self.bar_width as f64).round() as usize;
        let mut bar = String::with_capacity(self.bar_width + 2);
        bar.push('[');
        bar.extend(std::iter::repeat(FILLED).take(filled));
        bar.extend(std::iter::repeat(EMPTY).take(self.bar_width - filled));
        bar.push(']');
        bar
    }
}

fn controls(state: TimerState) -> String {
    let primary = state.primary_action().label();
    if state.can_cancel() {
        format!("  [{primary}] [Cancel]")
    } else {
        format!("  [{primary}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countdown_core::timer::{DurationSelection, ManualTicks};

    fn renderer(width: u32) -> Renderer {
        let ui = UiConfig {
            bar_width: width,
            show_completion_time: false,
        };
        Renderer::new(&ui, true)
    }

    #[test]
    fn bar_fills_proportionally_and_clamps() {
        let r = renderer(10);
        assert_eq!(r.bar(0.0), "[░░░░░░░░░░]");
        assert_eq!(r.bar(0.5), "[█████░░░░░]");
        assert_eq!(r.bar(1.0), "[██████████]");
        assert_eq!(r.bar(1.7), r.bar(1.0));
    }

    #[test]
    fn idle_frame_shows_picker_and_start() {
        let engine = CountdownEngine::new(ManualTicks::new());
        assert_eq!(renderer(4).frame(&engine), "00h 00m 10s  [Start]");
    }

    #[test]
    fn active_frames_show_time_and_controls() {
        let mut engine = CountdownEngine::new(ManualTicks::new());
        engine.set_selection(DurationSelection::new(0, 0, 4).unwrap());
        engine.start();
        engine.tick();
        let r = renderer(4);
        assert_eq!(r.frame(&engine), "[███░] 00:00:03  [Pause] [Cancel]");

        engine.pause();
        assert_eq!(
            r.frame(&engine),
            "[███░] 00:00:03  (paused)  [Resume] [Cancel]"
        );
    }
}
