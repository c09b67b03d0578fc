//! Time-driven progress indicator, decoupled from the request it decorates.
//!
//! # Design
//! The animator never reads a clock and never schedules anything itself.
//! Every entry point takes the host's `now`, and the host asks
//! `next_wakeup()` what to wait for. A frame is represented by a
//! `FrameHandle`; only the most recently issued handle is live, so cancelling
//! a chain is just forgetting its handle and a stale tick is a no-op. Hosts
//! may drive ticks from a render loop or from a fixed-interval timer.
//!
//! The bar sweeps 0% -> 100% over `AnimatorConfig::duration`. Reaching 100%
//! before data has arrived parks the bar at 100% with the "please wait" text
//! until the controller calls `stop()`.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::AnimatorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    Idle,
    /// Frames are being scheduled and the fill is below 100%.
    Animating,
    /// The fill reached 100% before data arrived; no frames are scheduled.
    AwaitingData,
    /// Fill forced to 100%, waiting for the settle deadline to hide.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingState {
    pub phase: LoadingPhase,
    pub elapsed: Duration,
    pub data_arrived: bool,
}

impl LoadingState {
    const IDLE: LoadingState = LoadingState {
        phase: LoadingPhase::Idle,
        elapsed: Duration::ZERO,
        data_arrived: false,
    };
}

/// Cancellable reference to one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorText {
    Loading,
    PleaseWait,
}

impl fmt::Display for IndicatorText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorText::Loading => write!(f, "よみこみチュ…"),
            IndicatorText::PleaseWait => write!(f, "もうちょっとまってほしい！"),
        }
    }
}

/// What a host draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub visible: bool,
    pub fill_percent: f64,
    pub text: IndicatorText,
}

impl Indicator {
    const HIDDEN: Indicator = Indicator {
        visible: false,
        fill_percent: 0.0,
        text: IndicatorText::Loading,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// Call `tick` with this handle on the next frame.
    Frame(FrameHandle),
    /// Call `settle` at or after this instant.
    Settle(Instant),
}

#[derive(Debug)]
pub struct LoadingAnimator {
    config: AnimatorConfig,
    state: LoadingState,
    indicator: Indicator,
    started_at: Option<Instant>,
    generation: u64,
    scheduled: Option<FrameHandle>,
    settle_deadline: Option<Instant>,
}

impl LoadingAnimator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            state: LoadingState::IDLE,
            indicator: Indicator::HIDDEN,
            started_at: None,
            generation: 0,
            scheduled: None,
            settle_deadline: None,
        }
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn next_wakeup(&self) -> Option<Wakeup> {
        match self.scheduled {
            Some(handle) => Some(Wakeup::Frame(handle)),
            None => self.settle_deadline.map(Wakeup::Settle),
        }
    }

    /// Show the bar at 0% and request the first frame. Any previous frame
    /// chain and any pending settle are dropped.
    pub fn start(&mut self, now: Instant) -> FrameHandle {
        if let Some(previous) = self.scheduled {
            debug!(?previous, "restarting: previous frame chain cancelled");
        }
        self.settle_deadline = None;
        self.started_at = Some(now);
        self.state = LoadingState {
            phase: LoadingPhase::Animating,
            elapsed: Duration::ZERO,
            data_arrived: false,
        };
        self.indicator = Indicator {
            visible: true,
            fill_percent: 0.0,
            text: IndicatorText::Loading,
        };
        self.request_frame()
    }

    /// Run one frame. Returns the handle of the next frame when one was
    /// scheduled. Ticks for anything but the live handle are ignored.
    pub fn tick(&mut self, handle: FrameHandle, now: Instant) -> Option<FrameHandle> {
        if self.scheduled != Some(handle) {
            trace!(?handle, "ignoring stale frame");
            return None;
        }
        self.scheduled = None;
        let started_at = self.started_at?;

        let elapsed = now.saturating_duration_since(started_at);
        let percent = self.progress(elapsed);
        self.state.elapsed = elapsed;
        self.indicator.fill_percent = percent;

        if percent < 100.0 {
            return Some(self.request_frame());
        }
        if self.state.data_arrived {
            self.stop(now);
        } else {
            debug!(?elapsed, "animation finished before data; waiting");
            self.state.phase = LoadingPhase::AwaitingData;
            self.indicator.text = IndicatorText::PleaseWait;
        }
        None
    }

    /// Mark the response as arrived. The next completed tick stops the bar;
    /// the controller also calls `stop` itself.
    pub fn signal_data_arrived(&mut self) {
        self.state.data_arrived = true;
    }

    /// Cancel frames, force the fill to 100% and arm the settle deadline.
    /// Safe to call repeatedly: a bar already settling keeps its first
    /// deadline and an idle bar is left alone.
    pub fn stop(&mut self, now: Instant) {
        self.scheduled = None;
        match self.state.phase {
            LoadingPhase::Idle | LoadingPhase::Settling => return,
            LoadingPhase::Animating | LoadingPhase::AwaitingData => {}
        }
        self.indicator.fill_percent = 100.0;
        self.state.phase = LoadingPhase::Settling;
        self.settle_deadline = Some(now + self.config.settle_delay);
        debug!(settle_delay = ?self.config.settle_delay, "indicator stopping");
    }

    /// Hide and reset once the settle deadline has passed. Returns whether
    /// the indicator was reset.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.settle_deadline {
            Some(deadline) if now >= deadline => {
                self.state = LoadingState::IDLE;
                self.indicator = Indicator::HIDDEN;
                self.started_at = None;
                self.settle_deadline = None;
                trace!("indicator hidden");
                true
            }
            _ => false,
        }
    }

    /// Service whatever is due at `now`: the live frame and the settle
    /// deadline.
    pub fn advance(&mut self, now: Instant) {
        if let Some(handle) = self.scheduled {
            self.tick(handle, now);
        }
        self.settle(now);
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.generation += 1;
        let handle = FrameHandle(self.generation);
        self.scheduled = Some(handle);
        handle
    }

    fn progress(&self, elapsed: Duration) -> f64 {
        if self.config.duration.is_zero() {
            return 100.0;
        }
        (elapsed.as_secs_f64() / self.config.duration.as_secs_f64() * 100.0).min(100.0)
    }
}

impl Default for LoadingAnimator {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}
