use foundation::math::Vec3;
use foundation::side::Side;

/// Snapshot of a camera: where it sits and what it looks at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraOrientation {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraOrientation {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite()
    }

    /// Both points within `eps` of the other snapshot's.
    pub fn approx_eq(&self, other: &CameraOrientation, eps: f64) -> bool {
        self.position.distance(other.position) <= eps && self.target.distance(other.target) <= eps
    }
}

/// What the coordinator knows about both views.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SyncState {
    pub enabled: bool,
    pub left: Option<CameraOrientation>,
    pub right: Option<CameraOrientation>,
    /// Writer of the most recent commit.
    pub last_update: Option<Side>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            enabled: true,
            left: None,
            right: None,
            last_update: None,
        }
    }
}

impl SyncState {
    pub fn recorded(&self, side: Side) -> Option<CameraOrientation> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Orientation `side` should apply, if any.
    ///
    /// `None` while disabled, when `side` wrote last, or when the other side
    /// has not reported yet.
    pub fn for_side(&self, side: Side) -> Option<CameraOrientation> {
        if !self.enabled || self.last_update == Some(side) {
            return None;
        }
        self.recorded(side.other())
    }

    pub(crate) fn commit(&mut self, side: Side, orientation: CameraOrientation) {
        match side {
            Side::Left => self.left = Some(orientation),
            Side::Right => self.right = Some(orientation),
        }
        self.last_update = Some(side);
    }
}
