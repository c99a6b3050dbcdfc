use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use foundation::side::Side;
use foundation::time::{Millis, SharedClock};
use runtime::debounce::DebounceTimer;
use runtime::subscribers::{SubscriptionId, Subscribers};
use tracing::{debug, trace, warn};

use crate::config::SyncConfig;
use crate::orientation::{CameraOrientation, SyncState};

/// One coordinator per comparison session, shared by both views.
pub type SharedCoordinator = Rc<RefCell<CameraSyncCoordinator>>;

#[derive(Debug, Copy, Clone)]
struct PendingReport {
    orientation: CameraOrientation,
    seq: u64,
}

/// Mediates camera sync between the left and right views.
///
/// Reports are debounced per side and committed from [`tick`](Self::tick),
/// which the owning event loop calls every frame. Subscribers are notified
/// after each commit, toggle, and reset.
///
/// Callers must [`reset`](Self::reset) (or drop) the coordinator before the
/// cameras it feeds are torn down.
pub struct CameraSyncCoordinator {
    clock: SharedClock,
    state: SyncState,
    timers: [DebounceTimer; 2],
    pending: [Option<PendingReport>; 2],
    next_seq: u64,
    subscribers: Subscribers<SyncState>,
}

impl CameraSyncCoordinator {
    pub fn new(config: SyncConfig, clock: SharedClock) -> Self {
        let timer = DebounceTimer::new(config.debounce());
        Self {
            clock,
            state: SyncState::default(),
            timers: [timer, timer],
            pending: [None, None],
            next_seq: 0,
            subscribers: Subscribers::new(),
        }
    }

    pub fn shared(config: SyncConfig, clock: SharedClock) -> SharedCoordinator {
        Rc::new(RefCell::new(Self::new(config, clock)))
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn debounce(&self) -> Duration {
        self.timers[0].delay()
    }

    /// Records a camera change from `side`.
    ///
    /// Dropped while sync is disabled. Otherwise it replaces any report from
    /// the same side that has not settled yet and restarts that side's window.
    /// Returns whether the report was accepted.
    pub fn update_from_side(&mut self, side: Side, orientation: CameraOrientation) -> bool {
        if !self.state.enabled {
            trace!(%side, "sync disabled, report dropped");
            return false;
        }
        if !orientation.is_finite() {
            warn!(%side, ?orientation, "non-finite camera report dropped");
            return false;
        }
        let i = side.index();
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending[i] = Some(PendingReport { orientation, seq });
        let deadline = self.timers[i].arm(self.clock.now());
        trace!(%side, %deadline, "camera report pending");
        true
    }

    /// Commits every report whose window has elapsed.
    ///
    /// When both sides settle in the same tick they commit in deadline order,
    /// so `last_update` names the side that settled last. Returns the number
    /// of commits.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut due: Vec<(Millis, u64, Side, CameraOrientation)> = Vec::with_capacity(2);
        for side in Side::BOTH {
            let i = side.index();
            let Some(deadline) = self.timers[i].deadline() else {
                continue;
            };
            if !self.timers[i].fire_if_due(now) {
                continue;
            }
            if let Some(report) = self.pending[i].take() {
                due.push((deadline, report.seq, side, report.orientation));
            }
        }
        due.sort_by_key(|(deadline, seq, _, _)| (*deadline, *seq));

        for (deadline, _, side, orientation) in &due {
            self.state.commit(*side, *orientation);
            debug!(%side, %deadline, %now, "camera orientation committed");
            self.subscribers.notify(&self.state);
        }
        due.len()
    }

    /// Orientation `side` should apply to its own camera, if any.
    ///
    /// Never returns the side's own most recent write; see [`SyncState::for_side`].
    pub fn get_state_for_side(&self, side: Side) -> Option<CameraOrientation> {
        self.state.for_side(side)
    }

    /// Enables or disables propagation.
    ///
    /// Recorded orientations survive, so the first read after re-enabling may
    /// return a stale orientation. Reports that have not settled are
    /// discarded when disabling.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.state.enabled == enabled {
            return;
        }
        if !enabled {
            self.cancel_pending();
        }
        self.state.enabled = enabled;
        debug!(enabled, "camera sync toggled");
        self.subscribers.notify(&self.state);
    }

    /// Flips the enabled flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        let enabled = !self.state.enabled;
        self.set_enabled(enabled);
        enabled
    }

    /// Cancels pending reports and restores the initial state.
    ///
    /// Subscriptions are kept.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.state = SyncState::default();
        debug!("camera sync reset");
        self.subscribers.notify(&self.state);
    }

    /// Registers a change callback.
    ///
    /// The callback runs while the coordinator is mutably borrowed; it must
    /// read from the state it is given rather than through a
    /// [`SharedCoordinator`].
    pub fn subscribe(&mut self, callback: impl FnMut(&SyncState) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn has_pending(&self) -> bool {
        self.timers.iter().any(DebounceTimer::is_pending)
    }

    /// Earliest moment a pending report settles.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.iter().filter_map(DebounceTimer::deadline).min()
    }

    fn cancel_pending(&mut self) {
        for timer in &mut self.timers {
            timer.disarm();
        }
        self.pending = [None, None];
    }
}

impl std::fmt::Debug for CameraSyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSyncCoordinator")
            .field("state", &self.state)
            .field("timers", &self.timers)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}
