use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use camera_sync::{CameraSyncCoordinator, SharedCoordinator, ViewHandle};
use compare::ComparisonUrlState;
use foundation::side::Side;
use foundation::time::{Millis, SharedClock};
use params::{MapType, ParameterSet};
use runtime::debounce::Debouncer;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::history::History;

/// URL waiting to be written, plus the last one that was.
struct UrlOutbox<H> {
    history: H,
    pending: Option<String>,
    last_written: Option<String>,
}

impl<H: History> UrlOutbox<H> {
    fn flush(&mut self) -> bool {
        let Some(url) = self.pending.take() else {
            return false;
        };
        if self.last_written.as_deref() == Some(url.as_str()) {
            return false;
        }
        debug!(%url, "comparison url replaced");
        self.history.replace_url(&url);
        self.last_written = Some(url);
        true
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub camera_commits: usize,
    pub url_written: bool,
}

/// One comparison page: both parameter sets, the camera coordinator, and
/// debounced address-bar sync.
///
/// Closing (or dropping) the session cancels every pending timer, so nothing
/// fires into a torn-down page.
pub struct ComparisonSession<H: History + 'static> {
    map_type: MapType,
    base_path: String,
    state: ComparisonUrlState,
    coordinator: SharedCoordinator,
    url_sync: Debouncer<Box<dyn FnMut()>>,
    outbox: Rc<RefCell<UrlOutbox<H>>>,
    url_flushed: Rc<Cell<bool>>,
}

impl<H: History + 'static> ComparisonSession<H> {
    /// Opens a session from the page URL, falling back to defaults for
    /// `map_type` when the URL is not a valid comparison.
    ///
    /// A fallback or normalized (clamped) state schedules a rewrite of the URL.
    pub fn open(
        url: &str,
        map_type: MapType,
        base_path: impl Into<String>,
        config: SessionConfig,
        clock: SharedClock,
        history: H,
    ) -> Self {
        let state = match compare::try_decode(url, map_type) {
            Ok(state) => state,
            Err(reason) => {
                info!(%map_type, %reason, "comparison url unusable, using defaults");
                ComparisonUrlState::defaults(map_type)
            }
        };

        let outbox = Rc::new(RefCell::new(UrlOutbox {
            history,
            pending: None,
            last_written: Some(url.to_string()),
        }));
        let url_flushed = Rc::new(Cell::new(false));
        let action: Box<dyn FnMut()> = {
            let outbox = outbox.clone();
            let flushed = url_flushed.clone();
            Box::new(move || {
                let wrote = outbox.borrow_mut().flush();
                flushed.set(wrote);
            })
        };

        let mut session = Self {
            map_type,
            base_path: base_path.into(),
            state,
            coordinator: CameraSyncCoordinator::shared(config.sync, clock.clone()),
            url_sync: Debouncer::new(action, config.url_debounce(), clock),
            outbox,
            url_flushed,
        };
        if session.current_url() != url {
            session.schedule_url_sync();
        }
        session
    }

    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    pub fn state(&self) -> &ComparisonUrlState {
        &self.state
    }

    pub fn parameters(&self, side: Side) -> &ParameterSet {
        self.state.side(side)
    }

    pub fn left(&self) -> &ParameterSet {
        &self.state.left
    }

    pub fn right(&self) -> &ParameterSet {
        &self.state.right
    }

    /// Canonical URL for the current parameters.
    pub fn current_url(&self) -> String {
        compare::comparison_url(&self.base_path, &self.state)
    }

    /// Replaces one side's parameters and schedules a URL sync.
    ///
    /// Values are clamped; a set for another system is rejected.
    pub fn set_parameters(&mut self, side: Side, params: ParameterSet) -> Result<(), SessionError> {
        let found = params.map_type();
        if found != self.map_type {
            return Err(SessionError::MapTypeMismatch {
                side,
                expected: self.map_type,
                found,
            });
        }
        let params = params.validated()?;
        if *self.state.side(side) == params {
            return Ok(());
        }
        self.state = self.state.with_side(side, params);
        self.schedule_url_sync();
        Ok(())
    }

    /// Copies `from`'s parameters onto the other side.
    pub fn copy_parameters(&mut self, from: Side) -> Result<(), SessionError> {
        let params = *self.state.side(from);
        self.set_parameters(from.other(), params)
    }

    pub fn coordinator(&self) -> &SharedCoordinator {
        &self.coordinator
    }

    /// Handle for the view rendering `side`.
    pub fn view(&self, side: Side) -> ViewHandle {
        ViewHandle::new(side, self.coordinator.clone())
    }

    pub fn set_sync_enabled(&self, enabled: bool) {
        self.coordinator.borrow_mut().set_enabled(enabled);
    }

    pub fn toggle_sync(&self) -> bool {
        self.coordinator.borrow_mut().toggle()
    }

    pub fn is_sync_enabled(&self) -> bool {
        self.coordinator.borrow().is_enabled()
    }

    /// Drives camera commits and URL sync. Call once per frame.
    pub fn tick(&mut self) -> TickSummary {
        let camera_commits = self.coordinator.borrow_mut().tick();
        let url_written = self.url_sync.poll() && self.url_flushed.get();
        TickSummary {
            camera_commits,
            url_written,
        }
    }

    /// Earliest moment either timer needs a tick.
    pub fn next_deadline(&self) -> Option<Millis> {
        let camera = self.coordinator.borrow().next_deadline();
        match (camera, self.url_sync.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.url_sync.is_pending() || self.coordinator.borrow().has_pending()
    }

    /// Restarts comparison mode: camera history is discarded and the URL
    /// debounce starts over. Parameters are kept, so a URL that does not show
    /// them yet is scheduled again.
    pub fn reset(&mut self) {
        self.coordinator.borrow_mut().reset();
        self.cancel_url_sync();
        let current = self.current_url();
        if self.outbox.borrow().last_written.as_deref() != Some(current.as_str()) {
            self.schedule_url_sync();
        }
    }

    /// Cancels every pending timer. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        self.cancel_url_sync();
        self.coordinator.borrow_mut().reset();
    }

    pub fn history(&self) -> Ref<'_, H> {
        Ref::map(self.outbox.borrow(), |o| &o.history)
    }

    fn schedule_url_sync(&mut self) {
        self.outbox.borrow_mut().pending = Some(self.current_url());
        self.url_sync.trigger();
    }

    fn cancel_url_sync(&mut self) {
        self.url_sync.cleanup();
        self.outbox.borrow_mut().pending = None;
    }
}

impl<H: History + 'static> Drop for ComparisonSession<H> {
    fn drop(&mut self) {
        // A view may still hold a handle that outlives the session.
        if let Ok(mut coordinator) = self.coordinator.try_borrow_mut() {
            coordinator.reset();
        }
        self.cancel_url_sync();
    }
}

impl<H: History + 'static> std::fmt::Debug for ComparisonSession<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonSession")
            .field("map_type", &self.map_type)
            .field("base_path", &self.base_path)
            .field("state", &self.state)
            .field("url_sync", &self.url_sync)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use camera_sync::CameraOrientation;
    use foundation::math::Vec3;
    use foundation::time::ManualClock;
    use params::LogisticParams;
    use pretty_assertions::assert_eq;

    fn logistic(r: f64) -> ParameterSet {
        ParameterSet::Logistic(LogisticParams {
            r,
            x0: 0.5,
            iterations: 100.0,
        })
    }

    fn open(clock: &ManualClock, url: &str) -> ComparisonSession<MemoryHistory> {
        ComparisonSession::open(
            url,
            MapType::Logistic,
            "/logistic",
            SessionConfig::default(),
            clock.shared(),
            MemoryHistory::new(),
        )
    }

    fn canonical(left: f64, right: f64) -> String {
        compare::comparison_url(
            "/logistic",
            &ComparisonUrlState::new(logistic(left), logistic(right)),
        )
    }

    #[test]
    fn opens_from_a_canonical_url_without_rewriting() {
        let clock = ManualClock::new();
        let url = canonical(3.9, 3.57);
        let mut s = open(&clock, &url);
        assert_eq!(*s.left(), logistic(3.9));
        assert_eq!(*s.right(), logistic(3.57));
        assert!(!s.has_pending());

        clock.advance(1_000);
        assert_eq!(s.tick(), TickSummary::default());
        assert!(s.history().entries().is_empty());
    }

    #[test]
    fn invalid_url_falls_back_and_rewrites_once() {
        let clock = ManualClock::new();
        let mut s = open(&clock, "/logistic/compare?compare=true");
        assert_eq!(*s.state(), ComparisonUrlState::defaults(MapType::Logistic));
        assert!(s.has_pending());

        clock.advance(300);
        assert!(s.tick().url_written);
        assert_eq!(s.history().current(), Some(s.current_url().as_str()));
    }

    #[test]
    fn parameter_edits_are_debounced_into_one_write() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));

        for r in [3.6, 3.7, 3.8] {
            s.set_parameters(Side::Right, logistic(r)).unwrap();
            clock.advance(100);
            assert!(!s.tick().url_written);
        }
        clock.advance(200);
        assert!(s.tick().url_written);
        assert_eq!(s.history().entries(), &[canonical(3.9, 3.8)]);
    }

    #[test]
    fn reverting_to_the_written_url_skips_the_write() {
        let clock = ManualClock::new();
        let start = canonical(3.9, 3.9);
        let mut s = open(&clock, &start);

        s.set_parameters(Side::Left, logistic(3.5)).unwrap();
        s.set_parameters(Side::Left, logistic(3.9)).unwrap();
        clock.advance(300);
        let summary = s.tick();
        assert!(!summary.url_written);
        assert!(s.history().entries().is_empty());
    }

    #[test]
    fn rejects_parameters_of_another_system() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));
        let err = s
            .set_parameters(Side::Left, ParameterSet::default_for(MapType::Henon))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::MapTypeMismatch {
                side: Side::Left,
                expected: MapType::Logistic,
                found: MapType::Henon,
            }
        );
        assert!(!s.has_pending());
    }

    #[test]
    fn copy_parameters_seeds_the_other_side() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.57));
        s.copy_parameters(Side::Left).unwrap();
        assert_eq!(*s.right(), logistic(3.9));
        assert_eq!(s.current_url(), canonical(3.9, 3.9));
    }

    #[test]
    fn camera_reports_flow_through_the_session() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));
        let left = s.view(Side::Left);
        let right = s.view(Side::Right);
        let pose = CameraOrientation::new(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO);

        left.report(pose);
        clock.advance(120);
        assert_eq!(s.tick().camera_commits, 1);
        assert_eq!(right.pull(), Some(pose));
        assert_eq!(left.pull(), None);

        assert!(!s.toggle_sync());
        assert!(!s.is_sync_enabled());
        s.set_sync_enabled(true);
        assert!(s.is_sync_enabled());
    }

    #[test]
    fn next_deadline_is_the_earliest_timer() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));
        assert_eq!(s.next_deadline(), None);

        s.set_parameters(Side::Left, logistic(3.6)).unwrap();
        s.view(Side::Right)
            .report(CameraOrientation::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO));
        assert_eq!(s.next_deadline(), Some(Millis(120)));
    }

    #[test]
    fn reset_keeps_unwritten_parameters_on_their_way_to_the_url() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));
        s.set_parameters(Side::Left, logistic(3.6)).unwrap();
        s.view(Side::Left)
            .report(CameraOrientation::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO));

        clock.advance(100);
        s.reset();
        assert!(!s.coordinator().borrow().has_pending());
        assert_eq!(*s.left(), logistic(3.6));
        assert_eq!(s.next_deadline(), Some(Millis(400)));

        for _ in 0..50 {
            clock.advance(100);
            s.tick();
        }
        assert_eq!(s.history().current(), Some(canonical(3.6, 3.9).as_str()));
        assert_eq!(s.history().entries().len(), 1);
    }

    #[test]
    fn reset_with_the_url_in_sync_schedules_nothing() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));
        s.reset();
        assert!(!s.has_pending());
    }

    #[test]
    fn close_cancels_everything() {
        let clock = ManualClock::new();
        let mut s = open(&clock, &canonical(3.9, 3.9));
        s.set_parameters(Side::Left, logistic(3.6)).unwrap();
        s.view(Side::Left)
            .report(CameraOrientation::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO));

        s.close();
        s.close();
        assert!(!s.has_pending());
        clock.advance(1_000);
        assert_eq!(s.tick(), TickSummary::default());
        assert!(s.history().entries().is_empty());
    }

    #[test]
    fn dropping_the_session_resets_shared_coordinator() {
        let clock = ManualClock::new();
        let s = open(&clock, &canonical(3.9, 3.9));
        let handle = s.view(Side::Left);
        handle.report(CameraOrientation::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO));
        drop(s);
        assert!(!handle.coordinator().borrow().has_pending());
    }
}
