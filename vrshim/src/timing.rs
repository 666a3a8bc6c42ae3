//! High-resolution sleeping and frame pacing. Windows gets a per-thread
//! waitable timer; everywhere else `thread::sleep` is already good enough.

use std::{
    sync::Once,
    time::{
        Duration,
        Instant,
    },
};

/// Sleeps for `t` 100 ns units. Zero and negative durations return promptly
/// with success; `false` means the OS timer path failed without sleeping.
pub fn sleep_100ns(t: i64) -> bool {
    if t <= 0 {
        return true;
    }
    os::sleep_100ns(t)
}

pub fn sleep(d: Duration) -> bool {
    sleep_100ns(duration_to_100ns(d))
}

fn duration_to_100ns(d: Duration) -> i64 {
    let units = d.as_nanos() / 100;
    if units > i64::MAX as u128 {
        i64::MAX
    } else {
        units as i64
    }
}

static RAISE_RESOLUTION: Once = Once::new();

/// Asks the OS to keep honoring high-resolution timer requests while the
/// process runs unfocused. Process-wide, best-effort, idempotent.
pub fn raise_timer_resolution() {
    RAISE_RESOLUTION.call_once(|| {
        os::raise_timer_resolution();
    });
}

/// Keeps a polling loop on a fixed cadence. A frame that ran long just gets
/// no sleep; the overshoot is not carried into later frames.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    interval: Duration,
    time: Instant,
}

impl FramePacer {
    pub fn new(interval: Duration) -> FramePacer {
        FramePacer {
            interval: interval,
            time: Instant::now(),
        }
    }

    /// Pacer for a refresh rate in frames per second.
    pub fn with_rate(frames_per_second: u32) -> FramePacer {
        FramePacer::new(Duration::from_secs(1) / frames_per_second.max(1))
    }

    #[inline(always)]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps out the rest of the current frame slice and starts the next.
    pub fn wait(&mut self) -> bool {
        let ok = sleep(self.interval.saturating_sub(self.time.elapsed()));
        self.time = Instant::now();
        ok
    }
}

#[cfg(windows)]
mod os {
    use std::{
        cell::Cell,
        mem,
        ptr,
    };
    use windows_sys::Win32::{
        Foundation::{
            CloseHandle,
            HANDLE,
            WAIT_OBJECT_0,
        },
        System::Threading::{
            CreateWaitableTimerExA,
            GetCurrentProcess,
            ProcessPowerThrottling,
            SetProcessInformation,
            SetWaitableTimer,
            WaitForSingleObject,
            CREATE_WAITABLE_TIMER_HIGH_RESOLUTION,
            INFINITE,
            PROCESS_POWER_THROTTLING_CURRENT_VERSION,
            PROCESS_POWER_THROTTLING_IGNORE_TIMER_RESOLUTION,
            PROCESS_POWER_THROTTLING_STATE,
            TIMER_ALL_ACCESS,
        },
    };

    struct ThreadTimer(Cell<HANDLE>);

    impl Drop for ThreadTimer {
        fn drop(&mut self) {
            let handle = self.0.get();
            if !handle.is_null() {
                unsafe { CloseHandle(handle) };
            }
        }
    }

    thread_local! {
        // One timer per calling thread, created on first use and reused. A
        // failed creation leaves null behind, so the next call tries again.
        static TIMER: ThreadTimer = ThreadTimer(Cell::new(ptr::null_mut()));
    }

    fn timer() -> HANDLE {
        TIMER.with(|timer| {
            let handle = timer.0.get();
            if !handle.is_null() {
                return handle;
            }
            let handle = unsafe {
                CreateWaitableTimerExA(
                    ptr::null(),
                    ptr::null(),
                    CREATE_WAITABLE_TIMER_HIGH_RESOLUTION,
                    TIMER_ALL_ACCESS,
                )
            };
            if handle.is_null() {
                warn!("CreateWaitableTimerExA failed");
            } else {
                timer.0.set(handle);
            }
            handle
        })
    }

    pub fn sleep_100ns(t: i64) -> bool {
        let timer = timer();
        if timer.is_null() {
            return false;
        }
        // Negative due time means relative to now.
        let due = -t;
        if unsafe { SetWaitableTimer(timer, &due, 0, None, ptr::null(), 0) } == 0 {
            return false;
        }
        unsafe { WaitForSingleObject(timer, INFINITE) == WAIT_OBJECT_0 }
    }

    pub fn raise_timer_resolution() {
        let state = PROCESS_POWER_THROTTLING_STATE {
            Version: PROCESS_POWER_THROTTLING_CURRENT_VERSION,
            ControlMask: PROCESS_POWER_THROTTLING_IGNORE_TIMER_RESOLUTION,
            // Cleared bit under the control mask: timer resolution requests
            // are always honored, focused or not.
            StateMask: 0,
        };
        let ok = unsafe {
            SetProcessInformation(
                GetCurrentProcess(),
                ProcessPowerThrottling,
                &state as *const _ as *const _,
                mem::size_of::<PROCESS_POWER_THROTTLING_STATE>() as u32,
            )
        };
        if ok == 0 {
            debug!("SetProcessInformation(ProcessPowerThrottling) was not honored");
        }
    }
}

#[cfg(not(windows))]
mod os {
    use std::{
        thread,
        time::Duration,
    };

    pub fn sleep_100ns(t: i64) -> bool {
        // The caller has already filtered t <= 0.
        let nanos = (t as u64).saturating_mul(100);
        thread::sleep(Duration::from_nanos(nanos));
        true
    }

    pub fn raise_timer_resolution() {}
}
