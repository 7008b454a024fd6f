use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::edge::EdgeDetector;
use crate::error::Result;
use crate::input::DigitalInputSource;

/// Poll cadence and cooldown for the button loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Delay between input samples. Default: 100 ms.
    pub poll_interval: Duration,
    /// Forced sleep after each trigger. Default: 1 s.
    pub debounce: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            debounce: Duration::from_secs(1),
        }
    }
}

/// Something that runs once per button press.
pub trait Trigger {
    fn fire(&mut self);
}

impl<F: FnMut()> Trigger for F {
    fn fire(&mut self) {
        self()
    }
}

/// Result of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub pressed: bool,
    pub fired: bool,
}

/// Samples a button and fires a trigger on every press.
pub struct ButtonMonitor<D, T> {
    input: D,
    trigger: T,
    edge: EdgeDetector,
    config: MonitorConfig,
    presses: u64,
}

impl<D: DigitalInputSource, T: Trigger> ButtonMonitor<D, T> {
    pub fn new(input: D, trigger: T, config: MonitorConfig) -> Self {
        Self {
            input,
            trigger,
            edge: EdgeDetector::new(),
            config,
            presses: 0,
        }
    }

    /// Configure the input line. Failure here is fatal for the caller.
    pub fn start(&mut self) -> Result<()> {
        self.input.initialize()
    }

    /// Take one sample and fire on a rising edge.
    ///
    /// After firing, sleeps for the debounce period before returning.
    pub fn poll_once(&mut self) -> Result<PollOutcome> {
        let pressed = self.input.read()?;
        let fired = self.edge.update(pressed);

        if fired {
            self.presses += 1;
            info!(line = %self.input.line(), presses = self.presses, "button pressed");
            self.trigger.fire();
            if !self.config.debounce.is_zero() {
                std::thread::sleep(self.config.debounce);
            }
        }

        Ok(PollOutcome { pressed, fired })
    }

    /// Initialize the input and poll until `running` is cleared.
    ///
    /// Returns the number of presses handled. An input error ends the loop.
    pub fn run(&mut self, running: &AtomicBool) -> Result<u64> {
        self.start()?;
        info!(line = %self.input.line(), "waiting for button presses");

        while running.load(Ordering::SeqCst) {
            self.poll_once()?;
            if !self.config.poll_interval.is_zero() {
                std::thread::sleep(self.config.poll_interval);
            }
        }

        debug!(presses = self.presses, "button monitor stopped");
        Ok(self.presses)
    }

    pub fn presses(&self) -> u64 {
        self.presses
    }

    pub fn input(&self) -> &D {
        &self.input
    }

    pub fn trigger(&self) -> &T {
        &self.trigger
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use super::*;
    use crate::error::KioskError;
    use crate::input::ScriptedInput;

    fn quick() -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::ZERO,
            debounce: Duration::ZERO,
        }
    }

    #[derive(Default)]
    struct CountingTrigger {
        fires: usize,
    }

    impl Trigger for CountingTrigger {
        fn fire(&mut self) {
            self.fires += 1;
        }
    }

    #[test]
    fn fires_once_per_pressed_run() {
        let samples = [false, true, true, false, false, true, false, true, true, true];
        let mut monitor =
            ButtonMonitor::new(ScriptedInput::new(samples), CountingTrigger::default(), quick());

        let fired: Vec<bool> = samples
            .iter()
            .map(|_| monitor.poll_once().unwrap().fired)
            .collect();

        assert_eq!(monitor.trigger().fires, 3);
        assert_eq!(monitor.presses(), 3);
        assert_eq!(
            fired,
            [false, true, false, false, false, true, false, true, false, false]
        );
    }

    #[test]
    fn run_initializes_input_and_stops_on_input_error() {
        let running = AtomicBool::new(true);
        let mut monitor = ButtonMonitor::new(
            ScriptedInput::new([true, false, true]),
            CountingTrigger::default(),
            quick(),
        );

        let err = monitor.run(&running).unwrap_err();
        assert!(matches!(err, KioskError::Input { .. }));
        assert!(monitor.input().is_initialized());
        assert_eq!(monitor.trigger().fires, 2);
    }

    #[test]
    fn run_returns_when_flag_cleared() {
        let running = AtomicBool::new(false);
        let mut monitor =
            ButtonMonitor::new(ScriptedInput::new([true]), CountingTrigger::default(), quick());

        assert_eq!(monitor.run(&running).unwrap(), 0);
        assert_eq!(monitor.input().reads(), 0);
    }

    #[test]
    fn held_button_does_not_refire_during_debounce() {
        let debounce = Duration::from_millis(40);
        let fire_times = Rc::new(RefCell::new(Vec::new()));
        let times = fire_times.clone();
        let mut monitor = ButtonMonitor::new(
            ScriptedInput::new([false, true, true, true, true, false, true]),
            move || times.borrow_mut().push(Instant::now()),
            MonitorConfig {
                poll_interval: Duration::ZERO,
                debounce,
            },
        );

        let started = Instant::now();
        for _ in 0..7 {
            monitor.poll_once().unwrap();
        }

        let fire_times = fire_times.borrow();
        assert_eq!(fire_times.len(), 2);
        assert!(fire_times[1].duration_since(fire_times[0]) >= debounce);
        assert!(started.elapsed() >= debounce * 2);
    }

    #[test]
    fn closure_triggers_are_supported() {
        let mut count = 0;
        {
            let mut monitor =
                ButtonMonitor::new(ScriptedInput::new([true]), || count += 1, quick());
            assert!(monitor.poll_once().unwrap().fired);
        }
        assert_eq!(count, 1);
    }
}
