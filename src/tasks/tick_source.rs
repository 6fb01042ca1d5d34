//! Wake-up signal sources
//!
//! A tick source only tells the engine "look at the clock now". It carries
//! no time information, so missed or late ticks cannot skew the countdown.
//!
//! Two variants share the [`TickSource`] contract:
//! - [`IsolatedTickSource`] runs on its own OS thread, independent of how
//!   busy or throttled the async runtime is.
//! - [`IntervalTickSource`] is a runtime interval task, used when the
//!   thread cannot be created.

use std::{
    sync::mpsc as std_mpsc,
    thread,
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::messages::{EngineMessage, EngineSender};

/// Nominal wake-up period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic wake-up generator with arm/disarm control
///
/// `arm` while armed restarts the period without emitting twice.
/// `disarm` is safe to call at any time.
pub trait TickSource: Send {
    fn arm(&mut self);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
    fn kind(&self) -> &'static str;
}

enum TickControl {
    Arm,
    Disarm,
    Shutdown,
}

/// Tick source driven by a dedicated thread
pub struct IsolatedTickSource {
    control: std_mpsc::Sender<TickControl>,
    armed: bool,
}

impl IsolatedTickSource {
    /// Spawn the ticking thread, idle until armed
    pub fn spawn(wake_tx: EngineSender, period: Duration) -> std::io::Result<Self> {
        let (control, control_rx) = std_mpsc::channel();
        thread::Builder::new()
            .name("tick-source".to_string())
            .spawn(move || run_tick_thread(control_rx, wake_tx, period))?;

        debug!("Isolated tick thread started");
        Ok(Self {
            control,
            armed: false,
        })
    }

    fn send(&self, message: TickControl) {
        if self.control.send(message).is_err() {
            warn!("Tick thread is gone, wake-up signals are no longer delivered");
        }
    }
}

fn run_tick_thread(control: std_mpsc::Receiver<TickControl>, wake_tx: EngineSender, period: Duration) {
    let mut armed = false;

    loop {
        // Any control message restarts the wait, so re-arming restarts the period.
        let message = if armed {
            match control.recv_timeout(period) {
                Ok(message) => Some(message),
                Err(std_mpsc::RecvTimeoutError::Timeout) => None,
                Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match control.recv() {
                Ok(message) => Some(message),
                Err(_) => break,
            }
        };

        match message {
            Some(TickControl::Arm) => armed = true,
            Some(TickControl::Disarm) => armed = false,
            Some(TickControl::Shutdown) => break,
            None => {
                if wake_tx.send(EngineMessage::WakeUp).is_err() {
                    debug!("Engine queue closed, stopping tick thread");
                    break;
                }
            }
        }
    }

    debug!("Tick thread exited");
}

impl TickSource for IsolatedTickSource {
    fn arm(&mut self) {
        self.send(TickControl::Arm);
        self.armed = true;
    }

    fn disarm(&mut self) {
        if self.armed {
            self.send(TickControl::Disarm);
            self.armed = false;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn kind(&self) -> &'static str {
        "isolated"
    }
}

impl Drop for IsolatedTickSource {
    fn drop(&mut self) {
        let _ = self.control.send(TickControl::Shutdown);
    }
}

/// Tick source driven by an interval task on the async runtime
pub struct IntervalTickSource {
    wake_tx: EngineSender,
    runtime: Handle,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl IntervalTickSource {
    pub fn new(wake_tx: EngineSender, runtime: Handle, period: Duration) -> Self {
        Self {
            wake_tx,
            runtime,
            period,
            task: None,
        }
    }
}

impl TickSource for IntervalTickSource {
    fn arm(&mut self) {
        self.disarm();

        let wake_tx = self.wake_tx.clone();
        let period = self.period;
        self.task = Some(self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if wake_tx.send(EngineMessage::WakeUp).is_err() {
                    break;
                }
            }
        }));
    }

    fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    fn kind(&self) -> &'static str {
        "interval"
    }
}

impl Drop for IntervalTickSource {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Build the engine's tick source, preferring the isolated thread
///
/// Thread creation failure is not an error: it is logged and the runtime
/// interval takes over with the same arm/disarm behavior.
pub fn build_tick_source(wake_tx: EngineSender, runtime: Handle, prefer_isolated: bool) -> Box<dyn TickSource> {
    if prefer_isolated {
        match IsolatedTickSource::spawn(wake_tx.clone(), TICK_PERIOD) {
            Ok(source) => {
                info!("Using isolated tick thread");
                return Box::new(source);
            }
            Err(e) => {
                warn!("Failed to start tick thread, falling back to runtime interval: {}", e);
            }
        }
    }

    info!("Using runtime interval tick source");
    Box::new(IntervalTickSource::new(wake_tx, runtime, TICK_PERIOD))
}
