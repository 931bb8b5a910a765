//! System resource monitor.
//!
//! Polls CPU and RAM percentages on an unbounded periodic task. The
//! stat source is checked for availability once, at session open; a
//! source that is absent yields a permanent unavailable display and no
//! task at all. A transiently failing sample keeps the previous
//! reading on screen and the task alive.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;

use crate::scheduler::TickOutcome;
use crate::session::ToolKind;
use crate::tools::{Effects, Services, TaskRequest, Tool, ToolAction, ToolView};

/// One instantaneous reading.
#[derive(Debug, Clone, Copy)]
pub struct StatSample {
    pub cpu_percent: f32,
    pub ram_percent: f32,
}

/// External collaborator providing instantaneous CPU/RAM percentages.
pub trait StatSource {
    /// Whether the source can be sampled at all on this host.
    fn available(&self) -> bool;

    /// Take one reading. Failure is transient; callers keep their
    /// previous reading.
    fn sample(&self) -> Result<StatSample>;
}

/// Production stat source backed by sysinfo.
pub struct SysinfoStats {
    system: RefCell<sysinfo::System>,
}

impl SysinfoStats {
    pub fn new() -> Self {
        Self {
            system: RefCell::new(sysinfo::System::new()),
        }
    }
}

impl Default for SysinfoStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatSource for SysinfoStats {
    fn available(&self) -> bool {
        true
    }

    fn sample(&self) -> Result<StatSample> {
        let mut system = self.system.borrow_mut();
        system.refresh_cpu_usage();
        system.refresh_memory();

        let total = system.total_memory();
        let ram_percent = if total == 0 {
            0.0
        } else {
            (system.used_memory() as f32 / total as f32) * 100.0
        };

        Ok(StatSample {
            cpu_percent: system.global_cpu_usage(),
            ram_percent,
        })
    }
}

pub struct MonitorTool {
    stats: Rc<dyn StatSource>,
    interval: Duration,
    available: bool,
    cpu_percent: f32,
    ram_percent: f32,
    sampled_at: Option<String>,
}

impl MonitorTool {
    pub fn new(stats: Rc<dyn StatSource>, interval: Duration) -> Self {
        Self {
            stats,
            interval,
            available: false,
            cpu_percent: 0.0,
            ram_percent: 0.0,
            sampled_at: None,
        }
    }
}

impl Tool for MonitorTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Monitor
    }

    fn on_open(&mut self, _services: &mut Services) -> Result<Effects> {
        // Availability is decided once, here; never re-checked per tick.
        self.available = self.stats.available();
        if !self.available {
            return Ok(Effects::none());
        }
        Ok(Effects::schedule(TaskRequest {
            interval: self.interval,
            budget: None,
        }))
    }

    fn on_action(&mut self, _action: &ToolAction, _services: &mut Services) -> Result<Effects> {
        Ok(Effects::none())
    }

    fn on_close(&mut self, _services: &mut Services) -> Result<()> {
        Ok(())
    }

    fn on_tick(&mut self, _now: Instant) -> Result<TickOutcome> {
        // A failed sample keeps the previous reading; the task lives on.
        if let Ok(sample) = self.stats.sample() {
            self.cpu_percent = sample.cpu_percent;
            self.ram_percent = sample.ram_percent;
            self.sampled_at = Some(Local::now().format("%H:%M:%S").to_string());
        }
        Ok(TickOutcome::Continue)
    }

    fn view(&self) -> ToolView {
        ToolView::Monitor {
            available: self.available,
            cpu_percent: self.cpu_percent,
            ram_percent: self.ram_percent,
            sampled_at: self.sampled_at.clone(),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::Cell;

    /// Scriptable stat source for tests.
    pub struct FakeStats {
        available: bool,
        /// Samples served in order; `None` entries fail the call.
        samples: RefCell<Vec<Option<StatSample>>>,
        pub sample_calls: Cell<u32>,
    }

    impl FakeStats {
        pub fn unavailable() -> Self {
            Self {
                available: false,
                samples: RefCell::new(Vec::new()),
                sample_calls: Cell::new(0),
            }
        }

        pub fn with_samples(samples: Vec<Option<StatSample>>) -> Self {
            Self {
                available: true,
                samples: RefCell::new(samples),
                sample_calls: Cell::new(0),
            }
        }
    }

    impl StatSource for FakeStats {
        fn available(&self) -> bool {
            self.available
        }

        fn sample(&self) -> Result<StatSample> {
            self.sample_calls.set(self.sample_calls.get() + 1);
            let mut samples = self.samples.borrow_mut();
            if samples.is_empty() {
                anyhow::bail!("no samples scripted");
            }
            match samples.remove(0) {
                Some(sample) => Ok(sample),
                None => anyhow::bail!("sample failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeStats;
    use super::*;
    use crate::clipboard::ClipboardBridge;
    use crate::store::PersistenceStore;

    fn services_with(stats: Rc<dyn StatSource>) -> Services {
        Services {
            clipboard: ClipboardBridge::in_memory(),
            store: PersistenceStore::at(std::env::temp_dir()),
            stats,
            monitor_interval: Duration::from_millis(1500),
        }
    }

    fn sample(cpu: f32, ram: f32) -> Option<StatSample> {
        Some(StatSample {
            cpu_percent: cpu,
            ram_percent: ram,
        })
    }

    #[test]
    fn unavailable_source_schedules_nothing() {
        let stats: Rc<dyn StatSource> = Rc::new(FakeStats::unavailable());
        let mut services = services_with(Rc::clone(&stats));
        let mut tool = MonitorTool::new(stats, Duration::from_millis(1500));

        let effects = tool.on_open(&mut services).unwrap();
        assert!(effects.schedule.is_none());

        match tool.view() {
            ToolView::Monitor { available, .. } => assert!(!available),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn available_source_schedules_unbounded_task_at_cadence() {
        let stats: Rc<dyn StatSource> = Rc::new(FakeStats::with_samples(vec![]));
        let mut services = services_with(Rc::clone(&stats));
        let mut tool = MonitorTool::new(stats, Duration::from_millis(1500));

        let request = tool.on_open(&mut services).unwrap().schedule.unwrap();
        assert_eq!(request.interval, Duration::from_millis(1500));
        assert_eq!(request.budget, None);
    }

    #[test]
    fn failed_sample_keeps_previous_reading_and_task_alive() {
        let stats: Rc<dyn StatSource> = Rc::new(FakeStats::with_samples(vec![
            sample(40.0, 60.0),
            None, // transient failure
            sample(10.0, 20.0),
        ]));
        let mut services = services_with(Rc::clone(&stats));
        let mut tool = MonitorTool::new(stats, Duration::from_millis(1500));
        tool.on_open(&mut services).unwrap();

        let now = Instant::now();
        assert_eq!(tool.on_tick(now).unwrap(), TickOutcome::Continue);
        match tool.view() {
            ToolView::Monitor {
                cpu_percent,
                ram_percent,
                ..
            } => {
                assert_eq!(cpu_percent, 40.0);
                assert_eq!(ram_percent, 60.0);
            }
            other => panic!("unexpected view: {other:?}"),
        }

        // The failing poll neither crashes nor clears the display.
        assert_eq!(tool.on_tick(now).unwrap(), TickOutcome::Continue);
        match tool.view() {
            ToolView::Monitor { cpu_percent, .. } => assert_eq!(cpu_percent, 40.0),
            other => panic!("unexpected view: {other:?}"),
        }

        assert_eq!(tool.on_tick(now).unwrap(), TickOutcome::Continue);
        match tool.view() {
            ToolView::Monitor { cpu_percent, .. } => assert_eq!(cpu_percent, 10.0),
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
