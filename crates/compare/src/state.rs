use foundation::side::Side;
use params::{MapType, ParameterSet};

/// Both sides of a comparison page as carried in its URL.
///
/// Constructed fresh on every decode; edits produce a new value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComparisonUrlState {
    pub compare: bool,
    pub left: ParameterSet,
    pub right: ParameterSet,
}

impl ComparisonUrlState {
    pub fn new(left: ParameterSet, right: ParameterSet) -> Self {
        Self {
            compare: true,
            left,
            right,
        }
    }

    /// Both sides seeded with the same parameters.
    pub fn mirrored(params: ParameterSet) -> Self {
        Self::new(params, params)
    }

    pub fn defaults(map_type: MapType) -> Self {
        Self::mirrored(ParameterSet::default_for(map_type))
    }

    pub fn side(&self, side: Side) -> &ParameterSet {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn with_side(self, side: Side, params: ParameterSet) -> Self {
        match side {
            Side::Left => Self { left: params, ..self },
            Side::Right => Self {
                right: params,
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ComparisonUrlState;
    use foundation::side::Side;
    use params::{MapType, ParameterSet};

    #[test]
    fn with_side_leaves_the_original_untouched() {
        let base = ComparisonUrlState::defaults(MapType::Lorenz);
        let edited = ParameterSet::default_for(MapType::Lorenz)
            .with("rho", 99.0)
            .unwrap();
        let next = base.with_side(Side::Right, edited);

        assert_eq!(next.left, base.left);
        assert_eq!(*next.side(Side::Right), edited);
        assert_eq!(base.right, ParameterSet::default_for(MapType::Lorenz));
        assert!(next.compare);
    }
}
