use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Identifier of a supported chaotic system.
///
/// The lowercase id doubles as the `type` discriminator in serialized
/// parameter sets and as the route segment of single-view pages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Lorenz,
    Rossler,
    Henon,
    Lozi,
    Logistic,
    Standard,
}

/// Accepted range of a single parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    /// Iteration counts are carried as `f64` but snapped to whole numbers.
    pub integer: bool,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            integer: false,
        }
    }

    pub const fn count(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            integer: true,
        }
    }

    /// Clamps a finite value into range. NaN passes through untouched.
    pub fn clamp(&self, value: f64) -> f64 {
        let v = value.clamp(self.min, self.max);
        if self.integer { v.round() } else { v }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max && (!self.integer || value.fract() == 0.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub range: ParamRange,
}

const fn field(name: &'static str, range: ParamRange) -> FieldSpec {
    FieldSpec { name, range }
}

const ITERATIONS: ParamRange = ParamRange::count(100.0, 100_000.0);

const LORENZ: &[FieldSpec] = &[
    field("sigma", ParamRange::new(0.1, 50.0)),
    field("rho", ParamRange::new(0.1, 100.0)),
    field("beta", ParamRange::new(0.1, 10.0)),
];

const ROSSLER: &[FieldSpec] = &[
    field("a", ParamRange::new(0.01, 1.0)),
    field("b", ParamRange::new(0.01, 2.0)),
    field("c", ParamRange::new(1.0, 20.0)),
];

const HENON: &[FieldSpec] = &[
    field("a", ParamRange::new(0.0, 1.5)),
    field("b", ParamRange::new(-1.0, 1.0)),
    field("iterations", ITERATIONS),
];

const LOZI: &[FieldSpec] = &[
    field("a", ParamRange::new(0.0, 2.0)),
    field("b", ParamRange::new(-1.0, 1.0)),
    field("iterations", ITERATIONS),
];

const LOGISTIC: &[FieldSpec] = &[
    field("r", ParamRange::new(0.0, 4.0)),
    field("x0", ParamRange::new(0.0, 1.0)),
    field("iterations", ParamRange::count(1.0, 10_000.0)),
];

const STANDARD: &[FieldSpec] = &[
    field("k", ParamRange::new(0.0, 10.0)),
    field("iterations", ITERATIONS),
];

impl MapType {
    pub const ALL: [MapType; 6] = [
        MapType::Lorenz,
        MapType::Rossler,
        MapType::Henon,
        MapType::Lozi,
        MapType::Logistic,
        MapType::Standard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MapType::Lorenz => "lorenz",
            MapType::Rossler => "rossler",
            MapType::Henon => "henon",
            MapType::Lozi => "lozi",
            MapType::Logistic => "logistic",
            MapType::Standard => "standard",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MapType::Lorenz => "Lorenz attractor",
            MapType::Rossler => "Rössler attractor",
            MapType::Henon => "Hénon map",
            MapType::Lozi => "Lozi map",
            MapType::Logistic => "Logistic map",
            MapType::Standard => "Chirikov standard map",
        }
    }

    /// Parameters in serialization order, with their stable ranges.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            MapType::Lorenz => LORENZ,
            MapType::Rossler => ROSSLER,
            MapType::Henon => HENON,
            MapType::Lozi => LOZI,
            MapType::Logistic => LOGISTIC,
            MapType::Standard => STANDARD,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for MapType {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        MapType::ALL
            .into_iter()
            .find(|m| m.id() == id)
            .ok_or_else(|| ParamError::UnknownMapType(s.to_string()))
    }
}
