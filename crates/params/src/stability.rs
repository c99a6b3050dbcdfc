//! Advisory classification of parameter regimes.
//!
//! Values are never rejected here; the warnings exist so a UI can explain why
//! an in-range parameter set renders a fixed point or an escaping orbit
//! instead of an attractor.

use crate::parameter_set::{
    HenonParams, LogisticParams, LorenzParams, LoziParams, ParameterSet, RosslerParams,
    StandardParams,
};

/// Onset of chaos for the logistic map (Feigenbaum point).
const LOGISTIC_CHAOS_ONSET: f64 = 3.569_945_672;

/// Critical Chirikov parameter for global chaos.
const STANDARD_MAP_CRITICAL_K: f64 = 0.971_635;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Regime {
    /// Orbits settle onto a fixed point.
    Converges,
    /// Orbits settle onto a periodic cycle.
    Periodic,
    /// Orbits can escape to infinity.
    MayDiverge,
    /// Chaos is confined between invariant curves.
    LocalChaosOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityWarning {
    pub field: &'static str,
    pub regime: Regime,
    pub message: String,
}

impl StabilityWarning {
    fn new(field: &'static str, regime: Regime, message: impl Into<String>) -> Self {
        Self {
            field,
            regime,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn stability_warnings(params: &ParameterSet) -> Vec<StabilityWarning> {
    match params {
        ParameterSet::Lorenz(p) => lorenz(p),
        ParameterSet::Rossler(p) => rossler(p),
        ParameterSet::Henon(p) => henon(p),
        ParameterSet::Lozi(p) => lozi(p),
        ParameterSet::Logistic(p) => logistic(p),
        ParameterSet::Standard(p) => standard(p),
    }
}

fn lorenz(p: &LorenzParams) -> Vec<StabilityWarning> {
    if p.rho < 1.0 {
        return vec![StabilityWarning::new(
            "rho",
            Regime::Converges,
            "rho < 1: every trajectory converges to the origin",
        )];
    }
    // Subcritical Hopf bifurcation of the two non-trivial fixed points.
    let denom = p.sigma - p.beta - 1.0;
    if denom <= 0.0 {
        return vec![StabilityWarning::new(
            "sigma",
            Regime::Converges,
            "sigma <= beta + 1: the non-trivial fixed points never lose stability",
        )];
    }
    let rho_hopf = p.sigma * (p.sigma + p.beta + 3.0) / denom;
    if p.rho < rho_hopf {
        return vec![StabilityWarning::new(
            "rho",
            Regime::Converges,
            format!("rho below the Hopf threshold {rho_hopf:.2}: trajectories settle onto a fixed point"),
        )];
    }
    Vec::new()
}

fn rossler(p: &RosslerParams) -> Vec<StabilityWarning> {
    if p.c < 4.2 {
        return vec![StabilityWarning::new(
            "c",
            Regime::Periodic,
            "c < 4.2: the flow is in the period-doubling cascade, not yet chaotic",
        )];
    }
    Vec::new()
}

fn henon(p: &HenonParams) -> Vec<StabilityWarning> {
    let mut warnings = Vec::new();
    if p.a > 1.42 {
        warnings.push(StabilityWarning::new(
            "a",
            Regime::MayDiverge,
            "a > 1.42: most orbits escape to infinity",
        ));
    } else if p.a < 1.06 {
        warnings.push(StabilityWarning::new(
            "a",
            Regime::Periodic,
            "a < 1.06: orbits settle onto a periodic cycle",
        ));
    }
    if p.b.abs() > 0.5 {
        warnings.push(StabilityWarning::new(
            "b",
            Regime::MayDiverge,
            "|b| > 0.5: the map is strongly area-expanding and orbits may escape",
        ));
    }
    warnings
}

fn lozi(p: &LoziParams) -> Vec<StabilityWarning> {
    let mut warnings = Vec::new();
    if p.a <= p.b + 1.0 {
        warnings.push(StabilityWarning::new(
            "a",
            Regime::Converges,
            "a <= b + 1: no strange attractor exists",
        ));
    }
    if 2.0 * p.a + p.b >= 4.0 {
        warnings.push(StabilityWarning::new(
            "a",
            Regime::MayDiverge,
            "2a + b >= 4: orbits escape to infinity",
        ));
    }
    warnings
}

fn logistic(p: &LogisticParams) -> Vec<StabilityWarning> {
    let mut warnings = Vec::new();
    if p.r < 3.0 {
        warnings.push(StabilityWarning::new(
            "r",
            Regime::Converges,
            "r < 3: the orbit converges to a single fixed point",
        ));
    } else if p.r < LOGISTIC_CHAOS_ONSET {
        warnings.push(StabilityWarning::new(
            "r",
            Regime::Periodic,
            "r below the Feigenbaum point: the orbit is periodic",
        ));
    }
    if p.x0 == 0.0 || p.x0 == 1.0 {
        warnings.push(StabilityWarning::new(
            "x0",
            Regime::Converges,
            "x0 at 0 or 1 maps straight onto the fixed point 0",
        ));
    }
    warnings
}

fn standard(p: &StandardParams) -> Vec<StabilityWarning> {
    if p.k < STANDARD_MAP_CRITICAL_K {
        return vec![StabilityWarning::new(
            "k",
            Regime::LocalChaosOnly,
            "k below the critical value: KAM tori confine chaotic regions",
        )];
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_type::MapType;

    #[test]
    fn classic_defaults_are_chaotic() {
        for m in [MapType::Lorenz, MapType::Rossler, MapType::Henon, MapType::Lozi] {
            let p = ParameterSet::default_for(m);
            assert!(stability_warnings(&p).is_empty(), "{m}");
        }
        let logistic = ParameterSet::default_for(MapType::Logistic);
        assert!(stability_warnings(&logistic).is_empty());
    }

    #[test]
    fn lorenz_below_hopf_threshold_converges() {
        let p = ParameterSet::Lorenz(LorenzParams {
            rho: 20.0,
            ..LorenzParams::default()
        });
        let w = stability_warnings(&p);
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].field, "rho");
        assert_eq!(w[0].regime, Regime::Converges);

        let p = ParameterSet::Lorenz(LorenzParams {
            rho: 0.5,
            ..LorenzParams::default()
        });
        assert_eq!(stability_warnings(&p)[0].regime, Regime::Converges);
    }

    #[test]
    fn logistic_regimes() {
        let periodic = ParameterSet::Logistic(LogisticParams {
            r: 3.5,
            ..LogisticParams::default()
        });
        assert_eq!(stability_warnings(&periodic)[0].regime, Regime::Periodic);

        let stuck = ParameterSet::Logistic(LogisticParams {
            r: 3.9,
            x0: 0.0,
            iterations: 100.0,
        });
        let w = stability_warnings(&stuck);
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].field, "x0");
    }

    #[test]
    fn henon_escape_is_flagged() {
        let p = ParameterSet::Henon(HenonParams {
            a: 1.5,
            ..HenonParams::default()
        });
        assert_eq!(stability_warnings(&p)[0].regime, Regime::MayDiverge);
    }

    #[test]
    fn standard_map_below_critical_k() {
        let p = ParameterSet::Standard(StandardParams {
            k: 0.5,
            iterations: 1_000.0,
        });
        assert_eq!(stability_warnings(&p)[0].regime, Regime::LocalChaosOnly);
        assert!(stability_warnings(&ParameterSet::default_for(MapType::Standard)).is_empty());
    }
}
