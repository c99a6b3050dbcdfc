use std::cell::Cell;

use foundation::side::Side;
use tracing::trace;

use crate::adapter::{CameraAdapter, ControlsAdapter, apply_camera_state, create_camera_state};
use crate::coordinator::SharedCoordinator;
use crate::orientation::{CameraOrientation, SyncState};

/// Two snapshots closer than this are treated as the same camera pose.
pub const ECHO_EPSILON: f64 = 1e-6;

/// A view's connection to the session coordinator.
///
/// Applying a pulled orientation makes the view's camera emit a change event,
/// which would be reported straight back. The handle remembers the last pose
/// it exchanged with the coordinator and suppresses that echo, so mirrored
/// views settle after one round instead of re-committing identical poses.
pub struct ViewHandle {
    side: Side,
    coordinator: SharedCoordinator,
    last_exchanged: Cell<Option<CameraOrientation>>,
}

impl ViewHandle {
    pub fn new(side: Side, coordinator: SharedCoordinator) -> Self {
        Self {
            side,
            coordinator,
            last_exchanged: Cell::new(None),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn coordinator(&self) -> &SharedCoordinator {
        &self.coordinator
    }

    fn is_echo(&self, orientation: &CameraOrientation) -> bool {
        self.last_exchanged
            .get()
            .is_some_and(|last| last.approx_eq(orientation, ECHO_EPSILON))
    }

    /// Reports a local camera change. Returns `false` for an echo or when
    /// the coordinator drops the report.
    ///
    /// Only accepted reports are remembered, so a pose reported while sync
    /// was off is not mistaken for an echo once it is back on.
    pub fn report(&self, orientation: CameraOrientation) -> bool {
        if self.is_echo(&orientation) {
            trace!(side = %self.side, "echoed camera report suppressed");
            return false;
        }
        let accepted = self
            .coordinator
            .borrow_mut()
            .update_from_side(self.side, orientation);
        if accepted {
            self.last_exchanged.set(Some(orientation));
        }
        accepted
    }

    /// Snapshots and reports the live camera.
    pub fn report_camera(
        &self,
        camera: &impl CameraAdapter,
        controls: &impl ControlsAdapter,
    ) -> bool {
        self.report(create_camera_state(camera, controls))
    }

    /// The other side's orientation, if it is new to this view.
    pub fn pull(&self) -> Option<CameraOrientation> {
        let state = *self.coordinator.borrow().state();
        self.pull_from(&state)
    }

    /// Same as [`pull`](Self::pull) but reads a state handed to a subscriber,
    /// without borrowing the coordinator.
    pub fn pull_from(&self, state: &SyncState) -> Option<CameraOrientation> {
        let orientation = state.for_side(self.side)?;
        if self.is_echo(&orientation) {
            return None;
        }
        self.last_exchanged.set(Some(orientation));
        Some(orientation)
    }

    /// Pulls and applies the other side's orientation. Returns whether the
    /// camera moved.
    pub fn sync_camera<C: CameraAdapter>(
        &self,
        camera: &mut C,
        controls: &mut impl ControlsAdapter,
    ) -> bool {
        let Some(orientation) = self.pull() else {
            return false;
        };
        apply_camera_state(&orientation, camera, controls);
        true
    }
}

impl std::fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHandle")
            .field("side", &self.side)
            .field("last_exchanged", &self.last_exchanged.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use crate::coordinator::CameraSyncCoordinator;
    use crate::orbit::{OrbitCamera, OrbitControls};
    use foundation::math::Vec3;
    use foundation::time::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct View {
        handle: ViewHandle,
        camera: OrbitCamera,
        controls: OrbitControls,
    }

    impl View {
        fn new(side: Side, coordinator: &SharedCoordinator) -> Self {
            let controls = OrbitControls::default();
            Self {
                handle: ViewHandle::new(side, coordinator.clone()),
                camera: OrbitCamera::new(controls.eye()),
                controls,
            }
        }

        fn drag(&mut self, dx: f64) {
            self.controls.orbit(&mut self.camera, dx, 0.0);
            self.handle.report_camera(&self.camera, &self.controls);
        }

        /// Mirrors a renderer: applying a pose fires a change event.
        fn frame(&mut self) {
            if self.handle.sync_camera(&mut self.camera, &mut self.controls) {
                self.handle.report_camera(&self.camera, &self.controls);
            }
        }
    }

    #[test]
    fn mirrored_views_settle_without_ping_pong() {
        let clock = ManualClock::new();
        let coordinator = CameraSyncCoordinator::shared(SyncConfig::default(), clock.shared());
        let commits = Rc::new(RefCell::new(0));
        let c = commits.clone();
        coordinator
            .borrow_mut()
            .subscribe(move |_: &SyncState| *c.borrow_mut() += 1);

        let mut left = View::new(Side::Left, &coordinator);
        let mut right = View::new(Side::Right, &coordinator);

        left.drag(40.0);
        for _ in 0..100 {
            clock.advance(16);
            coordinator.borrow_mut().tick();
            left.frame();
            right.frame();
        }

        assert_eq!(*commits.borrow(), 1);
        assert!(right.camera.position.distance(left.camera.position) < 1e-9);
        assert!(!coordinator.borrow().has_pending());
    }

    #[test]
    fn subscriber_can_pull_from_the_given_state() {
        let clock = ManualClock::new();
        let coordinator = CameraSyncCoordinator::shared(SyncConfig::default(), clock.shared());
        let right = Rc::new(ViewHandle::new(Side::Right, coordinator.clone()));
        let received = Rc::new(Cell::new(None));

        let (r, out) = (right.clone(), received.clone());
        coordinator
            .borrow_mut()
            .subscribe(move |s: &SyncState| out.set(r.pull_from(s)));

        let left = ViewHandle::new(Side::Left, coordinator.clone());
        let pose = CameraOrientation::new(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO);
        assert!(left.report(pose));
        assert!(!left.report(pose));

        clock.advance(120);
        coordinator.borrow_mut().tick();
        assert_eq!(received.get(), Some(pose));
        assert_eq!(right.pull(), None);
    }

    #[test]
    fn pose_reported_while_disabled_is_sent_after_reenabling() {
        let clock = ManualClock::new();
        let coordinator = CameraSyncCoordinator::shared(SyncConfig::default(), clock.shared());
        let left = ViewHandle::new(Side::Left, coordinator.clone());
        let right = ViewHandle::new(Side::Right, coordinator.clone());
        let p = CameraOrientation::new(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO);
        let q = CameraOrientation::new(Vec3::new(9.0, 0.0, 0.0), Vec3::ZERO);

        assert!(left.report(p));
        clock.advance(120);
        coordinator.borrow_mut().tick();
        assert_eq!(right.pull(), Some(p));

        coordinator.borrow_mut().set_enabled(false);
        assert!(!left.report(q));
        coordinator.borrow_mut().set_enabled(true);

        assert!(left.report(q));
        clock.advance(120);
        assert_eq!(coordinator.borrow_mut().tick(), 1);
        assert_eq!(right.pull(), Some(q));
    }
}
