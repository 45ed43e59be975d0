#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Wall-clock stopwatch for per-phase tick timings.
#[derive(Clone, Copy)]
pub(crate) struct PerfTimer {
    start_ms: f64,
}

impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer { start_ms: now_ms() }
    }

    /// Only runs a timer when metrics are on.
    pub(crate) fn start_if(enabled: bool) -> Option<Self> {
        enabled.then(Self::start)
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        now_ms() - self.start_ms
    }

    /// Milliseconds since the last lap, restarting the timer.
    pub(crate) fn lap_ms(&mut self) -> f64 {
        let now = now_ms();
        let elapsed = now - self.start_ms;
        self.start_ms = now;
        elapsed
    }
}
