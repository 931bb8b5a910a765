//! Pomodoro-style focus timer.
//!
//! A 25-minute countdown driven by a finite 1s periodic task. The
//! remaining value is (re)initialized only at construction and on an
//! explicit reset: starting a timer that completed naturally is a
//! no-op until the user resets it.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::scheduler::TickOutcome;
use crate::session::ToolKind;
use crate::tools::{Effects, Services, TaskRequest, Tool, ToolAction, ToolView};

/// Full countdown, in 1-second ticks.
pub const TOTAL_TICKS: u32 = 25 * 60;

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const DONE_DISPLAY: &str = "DONE!";

pub struct TimerTool {
    remaining: u32,
    running: bool,
}

impl TimerTool {
    pub fn new() -> Self {
        Self {
            remaining: TOTAL_TICKS,
            running: false,
        }
    }

    fn start(&mut self) -> Effects {
        // Already running, or completed without a reset: nothing to do.
        if self.running || self.remaining == 0 {
            return Effects::none();
        }
        self.running = true;
        Effects::schedule(TaskRequest {
            interval: TICK_INTERVAL,
            budget: Some(self.remaining),
        })
    }

    fn reset(&mut self) -> Effects {
        self.running = false;
        self.remaining = TOTAL_TICKS;
        Effects::cancel_task()
    }
}

impl Default for TimerTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for TimerTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Timer
    }

    fn on_open(&mut self, _services: &mut Services) -> Result<Effects> {
        Ok(Effects::none())
    }

    fn on_action(&mut self, action: &ToolAction, _services: &mut Services) -> Result<Effects> {
        let effects = match action {
            ToolAction::Start => self.start(),
            ToolAction::Reset => self.reset(),
            _ => Effects::none(),
        };
        Ok(effects)
    }

    fn on_close(&mut self, _services: &mut Services) -> Result<()> {
        Ok(())
    }

    fn on_tick(&mut self, _now: Instant) -> Result<TickOutcome> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return Ok(TickOutcome::Finished);
        }
        Ok(TickOutcome::Continue)
    }

    fn view(&self) -> ToolView {
        let done = self.remaining == 0;
        let display = if done {
            DONE_DISPLAY.to_string()
        } else {
            format_mmss(self.remaining)
        };
        ToolView::Timer {
            display,
            running: self.running,
            done,
        }
    }
}

fn format_mmss(ticks: u32) -> String {
    format!("{:02}:{:02}", ticks / 60, ticks % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Services {
        use std::rc::Rc;

        use crate::clipboard::ClipboardBridge;
        use crate::store::PersistenceStore;
        use crate::tools::monitor::testing::FakeStats;

        Services {
            clipboard: ClipboardBridge::in_memory(),
            store: PersistenceStore::at(std::env::temp_dir()),
            stats: Rc::new(FakeStats::unavailable()),
            monitor_interval: Duration::from_millis(1500),
        }
    }

    fn view_display(tool: &TimerTool) -> (String, bool, bool) {
        match tool.view() {
            ToolView::Timer {
                display,
                running,
                done,
            } => (display, running, done),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn format_is_zero_padded() {
        assert_eq!(format_mmss(TOTAL_TICKS), "25:00");
        assert_eq!(format_mmss(TOTAL_TICKS - 1), "24:59");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(9), "00:09");
    }

    #[test]
    fn start_schedules_a_budgeted_one_second_task() {
        let mut tool = TimerTool::new();
        let mut services = services();

        let effects = tool.on_action(&ToolAction::Start, &mut services).unwrap();
        let request = effects.schedule.expect("start should schedule a task");
        assert_eq!(request.interval, Duration::from_secs(1));
        assert_eq!(request.budget, Some(TOTAL_TICKS));
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut tool = TimerTool::new();
        let mut services = services();

        tool.on_action(&ToolAction::Start, &mut services).unwrap();
        let effects = tool.on_action(&ToolAction::Start, &mut services).unwrap();
        assert!(effects.schedule.is_none());
        assert!(!effects.cancel_task);
    }

    #[test]
    fn counts_down_to_done_and_stays_there() {
        let mut tool = TimerTool::new();
        let mut services = services();
        tool.on_action(&ToolAction::Start, &mut services).unwrap();

        let now = Instant::now();
        for tick in 1..TOTAL_TICKS {
            assert_eq!(tool.on_tick(now).unwrap(), TickOutcome::Continue);
            assert_eq!(tool.remaining, TOTAL_TICKS - tick);
        }
        assert_eq!(view_display(&tool).0, "00:01");

        assert_eq!(tool.on_tick(now).unwrap(), TickOutcome::Finished);
        let (display, running, done) = view_display(&tool);
        assert_eq!(display, "DONE!");
        assert!(!running);
        assert!(done);
    }

    #[test]
    fn start_after_natural_completion_requires_reset() {
        let mut tool = TimerTool::new();
        let mut services = services();
        tool.on_action(&ToolAction::Start, &mut services).unwrap();

        let now = Instant::now();
        for _ in 0..TOTAL_TICKS {
            tool.on_tick(now).unwrap();
        }
        assert!(view_display(&tool).2);

        // Start at zero remaining does nothing.
        let effects = tool.on_action(&ToolAction::Start, &mut services).unwrap();
        assert!(effects.schedule.is_none());
        assert!(view_display(&tool).2);

        // Reset re-arms; a new start resumes from the full total.
        tool.on_action(&ToolAction::Reset, &mut services).unwrap();
        let effects = tool.on_action(&ToolAction::Start, &mut services).unwrap();
        assert_eq!(effects.schedule.unwrap().budget, Some(TOTAL_TICKS));
    }

    #[test]
    fn reset_always_restores_full_total_and_cancels() {
        let mut tool = TimerTool::new();
        let mut services = services();
        tool.on_action(&ToolAction::Start, &mut services).unwrap();

        let now = Instant::now();
        for _ in 0..100 {
            tool.on_tick(now).unwrap();
        }

        let effects = tool.on_action(&ToolAction::Reset, &mut services).unwrap();
        assert!(effects.cancel_task);

        let (display, running, done) = view_display(&tool);
        assert_eq!(display, "25:00");
        assert!(!running);
        assert!(!done);

        // Reset on a non-running timer yields the same state.
        let effects = tool.on_action(&ToolAction::Reset, &mut services).unwrap();
        assert!(effects.cancel_task);
        assert_eq!(view_display(&tool).0, "25:00");
    }

    #[test]
    fn resumed_start_budgets_current_remaining() {
        let mut tool = TimerTool::new();
        let mut services = services();
        tool.on_action(&ToolAction::Start, &mut services).unwrap();

        let now = Instant::now();
        for _ in 0..500 {
            tool.on_tick(now).unwrap();
        }

        // Simulate the task ending early (e.g. scheduler cancel), then
        // a restart: the budget is the current remaining, not the total.
        tool.running = false;
        let effects = tool.on_action(&ToolAction::Start, &mut services).unwrap();
        assert_eq!(effects.schedule.unwrap().budget, Some(TOTAL_TICKS - 500));
    }
}
