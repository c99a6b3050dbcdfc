//! Boundary between the coordinator and whatever renders the views.

use foundation::math::Vec3;

use crate::orientation::CameraOrientation;

/// A live camera with a settable eye position.
pub trait CameraAdapter {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
}

/// Interactive controls owning the look target.
pub trait ControlsAdapter {
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    /// Recomputes derived state after the camera or target moved.
    fn update(&mut self, camera: &mut dyn CameraAdapter);
}

pub fn create_camera_state(
    camera: &impl CameraAdapter,
    controls: &impl ControlsAdapter,
) -> CameraOrientation {
    CameraOrientation::new(camera.position(), controls.target())
}

/// Pushes `orientation` onto the live objects and runs the controls' update.
///
/// The camera and controls must still be alive; applying a stale snapshot
/// after teardown is the caller's bug.
pub fn apply_camera_state<C: CameraAdapter>(
    orientation: &CameraOrientation,
    camera: &mut C,
    controls: &mut impl ControlsAdapter,
) {
    camera.set_position(orientation.position);
    controls.set_target(orientation.target);
    controls.update(camera);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Cam {
        position: Vec3,
    }

    impl CameraAdapter for Cam {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }
    }

    #[derive(Default)]
    struct Controls {
        target: Vec3,
        updates: u32,
    }

    impl ControlsAdapter for Controls {
        fn target(&self) -> Vec3 {
            self.target
        }

        fn set_target(&mut self, target: Vec3) {
            self.target = target;
        }

        fn update(&mut self, _camera: &mut dyn CameraAdapter) {
            self.updates += 1;
        }
    }

    #[test]
    fn snapshot_and_apply_are_inverse() {
        let mut cam = Cam::default();
        let mut controls = Controls::default();
        let o = CameraOrientation::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0));

        apply_camera_state(&o, &mut cam, &mut controls);
        assert_eq!(controls.updates, 1);
        assert_eq!(create_camera_state(&cam, &controls), o);
    }
}
