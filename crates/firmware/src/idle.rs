//! Inactivity watchdog.

use embassy_time::{Duration, Instant};
use platform::Clock;
use platform::info;

/// Receiver of idle timeouts. Defaults to a no-op.
pub trait IdleHandler {
    /// The inactivity window expired.
    fn on_idle(&mut self) {}
}

impl IdleHandler for () {}

impl<H: IdleHandler + ?Sized> IdleHandler for &mut H {
    fn on_idle(&mut self) {
        (**self).on_idle();
    }
}

/// Fires once whenever no activity has been reported for longer than the
/// configured timeout, then re-arms from the moment it fired.
pub struct IdleMonitor<C, H = ()> {
    clock: C,
    handler: H,
    timeout: Duration,
    last_activity: Instant,
}

impl<C: Clock> IdleMonitor<C> {
    /// Create a disabled monitor with no handler attached.
    pub fn new(clock: C) -> Self {
        let last_activity = clock.now();
        Self {
            clock,
            handler: (),
            timeout: Duration::from_ticks(0),
            last_activity,
        }
    }
}

impl<C, H> IdleMonitor<C, H> {
    /// Attach an idle handler, replacing the current one.
    pub fn with_handler<H2: IdleHandler>(self, handler: H2) -> IdleMonitor<C, H2> {
        IdleMonitor {
            clock: self.clock,
            handler,
            timeout: self.timeout,
            last_activity: self.last_activity,
        }
    }

    /// The attached handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the attached handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

impl<C: Clock, H: IdleHandler> IdleMonitor<C, H> {

    /// Arm with `timeout_ms`, counting from now. Zero disables the monitor.
    pub fn begin(&mut self, timeout_ms: u64) {
        self.timeout = Duration::from_millis(timeout_ms);
        self.last_activity = self.clock.now();
    }

    /// Whether a non-zero timeout is set.
    pub fn is_enabled(&self) -> bool {
        self.timeout.as_ticks() > 0
    }

    /// Restart the inactivity window.
    pub fn set_activity(&mut self) {
        self.last_activity = self.clock.now();
    }

    /// Returns `true` once per expired window.
    pub fn tick(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        if self.clock.elapsed_since(self.last_activity) <= self.timeout {
            return false;
        }
        info!("[IDLE]: Triggered!");
        self.last_activity = self.clock.now();
        self.handler.on_idle();
        true
    }
}
