use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic clock the trial engine runs against.
///
/// Phase waits are blocking `sleep` calls on the engine's single control
/// thread; swapping in a [`VirtualTimer`] makes the whole engine
/// deterministic under test.
pub trait Timer: Clone + Send + Sync {
    type Timestamp: Copy + Clone + Send + Sync;

    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
    fn sleep(&self, d: Duration);
}

/// Wall-clock timer backed by `Instant`, with platform-specific sleeps.
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    start: Instant,
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn precise_sleep(&self, duration: Duration) {
        #[cfg(target_os = "linux")]
        Self::linux_sleep(duration);
        #[cfg(target_os = "macos")]
        Self::macos_sleep(duration);
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }

    #[cfg(target_os = "macos")]
    fn macos_sleep(duration: Duration) {
        use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};

        // Spin only for sub-100us waits; anything longer goes to the kernel.
        if duration.as_nanos() < 100_000 {
            unsafe {
                let start = mach_absolute_time();
                let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
                mach_timebase_info(&mut timebase);

                let target_ticks =
                    duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;

                while mach_absolute_time() - start < target_ticks {
                    std::hint::spin_loop();
                }
            }
        } else {
            std::thread::sleep(duration);
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    fn sleep(&self, d: Duration) {
        self.precise_sleep(d);
    }
}

/// Deterministic timer for tests and simulations: `sleep` advances a shared
/// virtual clock instead of blocking, so clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualTimer {
    now_ns: Arc<Mutex<u64>>,
}

impl VirtualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        let mut now = self.now_ns.lock().unwrap();
        *now = now.saturating_add(d.as_nanos() as u64);
    }
}

impl Timer for VirtualTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        *self.now_ns.lock().unwrap()
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_sleep_advances_shared_clock() {
        let timer = VirtualTimer::new();
        let clone = timer.clone();
        let start = timer.now();

        timer.sleep(Duration::from_secs(4));
        assert_eq!(clone.elapsed(start), Duration::from_secs(4));

        clone.sleep(Duration::from_millis(500));
        assert_eq!(timer.elapsed(start), Duration::from_millis(4500));
    }

    #[test]
    fn wall_clock_sleep_waits_at_least_requested() {
        let timer = HighPrecisionTimer::new();
        let start = timer.now();
        timer.sleep(Duration::from_millis(2));
        assert!(timer.elapsed(start) >= Duration::from_millis(2));
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let timer = HighPrecisionTimer::new();
        let a = timer.now();
        let b = timer.now();
        assert!(b >= a);
    }
}
