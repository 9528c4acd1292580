use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_millis(&self) -> f64;
}

/// Wall clock measured from construction
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for deterministic tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward; negative steps are ignored to stay monotonic
    pub fn advance(&self, millis: f64) {
        if millis > 0.0 {
            self.now.set(self.now.get() + millis);
        }
    }

    pub fn set(&self, millis: f64) {
        if millis > self.now.get() {
            self.now.set(millis);
        }
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> f64 {
        (**self).now_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let clock = ManualClock::new(10.0);
        clock.advance(5.0);
        assert_eq!(clock.now_millis(), 15.0);
        clock.advance(-100.0);
        clock.set(3.0);
        assert_eq!(clock.now_millis(), 15.0);
        clock.set(40.0);
        assert_eq!(clock.now_millis(), 40.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let first = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(clock.now_millis() > first);
    }
}
