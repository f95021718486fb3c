// src/toggle.rs
//! Touch-driven unit toggle

use crate::error::Result;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::time::sleep;

/// Source of the raw "pressed" signal
pub trait TouchSensor {
    fn is_pressed(&mut self) -> Result<bool>;
}

/// Single pending-toggle flag shared between the touch task and the
/// decision loop. A second touch before the flag is consumed is coalesced.
#[derive(Debug, Clone, Default)]
pub struct ToggleState {
    pending: Arc<AtomicBool>,
}

impl ToggleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_toggle(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Read without clearing
    pub fn get_toggle_status(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Clear after the toggle has been handled
    pub fn reset_toggle_status(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

/// Accepts a press only when it is more than the debounce window after the
/// previously accepted one.
#[derive(Debug, Clone)]
pub struct TouchDebouncer {
    debounce: Duration,
    last_accepted: Option<Instant>,
}

impl TouchDebouncer {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_accepted: None,
        }
    }

    /// Feed one sample; returns true if it counts as a new touch
    pub fn sample(&mut self, pressed: bool, now: Instant) -> bool {
        if !pressed {
            return false;
        }

        let accept = match self.last_accepted {
            Some(last) => now.saturating_duration_since(last) > self.debounce,
            None => true,
        };

        if accept {
            self.last_accepted = Some(now);
        }
        accept
    }
}

/// Sample the sensor once and raise the toggle flag on an accepted touch.
/// Sensor errors are treated as "not pressed".
pub fn poll_touch<S: TouchSensor + ?Sized>(
    sensor: &mut S,
    debouncer: &mut TouchDebouncer,
    toggle: &ToggleState,
    now: Instant,
) -> bool {
    let pressed = match sensor.is_pressed() {
        Ok(pressed) => pressed,
        Err(e) => {
            log::warn!("Touch read failed: {}", e);
            false
        }
    };

    let accepted = debouncer.sample(pressed, now);
    if accepted {
        log::debug!("Touch detected");
        toggle.request_toggle();
    }
    accepted
}

/// Touch monitoring task: polls every `poll_interval` until `running` clears
pub async fn run_touch_monitor<S: TouchSensor>(
    mut sensor: S,
    mut debouncer: TouchDebouncer,
    toggle: ToggleState,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    log::info!("Starting touch monitoring task...");

    while running.load(Ordering::Relaxed) {
        poll_touch(&mut sensor, &mut debouncer, &toggle, Instant::now());
        sleep(poll_interval).await;
    }
}
