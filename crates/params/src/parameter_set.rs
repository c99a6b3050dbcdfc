use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::map_type::MapType;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosslerParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for RosslerParams {
    fn default() -> Self {
        Self {
            a: 0.2,
            b: 0.2,
            c: 5.7,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HenonParams {
    pub a: f64,
    pub b: f64,
    pub iterations: f64,
}

impl Default for HenonParams {
    fn default() -> Self {
        Self {
            a: 1.4,
            b: 0.3,
            iterations: 10_000.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoziParams {
    pub a: f64,
    pub b: f64,
    pub iterations: f64,
}

impl Default for LoziParams {
    fn default() -> Self {
        Self {
            a: 1.7,
            b: 0.5,
            iterations: 10_000.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub r: f64,
    pub x0: f64,
    pub iterations: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            r: 3.9,
            x0: 0.5,
            iterations: 100.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardParams {
    pub k: f64,
    pub iterations: f64,
}

impl Default for StandardParams {
    fn default() -> Self {
        Self {
            // Critical value where the last KAM torus breaks up.
            k: 0.971635,
            iterations: 10_000.0,
        }
    }
}

/// Parameters of one chaotic system, tagged by its [`MapType`].
///
/// Serialized as a flat JSON object with a `type` discriminator, e.g.
/// `{"type":"lorenz","sigma":10.0,"rho":28.0,"beta":2.6666666666666665}`.
/// Unknown extra keys are ignored on deserialization.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterSet {
    Lorenz(LorenzParams),
    Rossler(RosslerParams),
    Henon(HenonParams),
    Lozi(LoziParams),
    Logistic(LogisticParams),
    Standard(StandardParams),
}

impl ParameterSet {
    /// Canonical defaults for `map_type`.
    pub fn default_for(map_type: MapType) -> Self {
        match map_type {
            MapType::Lorenz => ParameterSet::Lorenz(LorenzParams::default()),
            MapType::Rossler => ParameterSet::Rossler(RosslerParams::default()),
            MapType::Henon => ParameterSet::Henon(HenonParams::default()),
            MapType::Lozi => ParameterSet::Lozi(LoziParams::default()),
            MapType::Logistic => ParameterSet::Logistic(LogisticParams::default()),
            MapType::Standard => ParameterSet::Standard(StandardParams::default()),
        }
    }

    pub fn map_type(&self) -> MapType {
        match self {
            ParameterSet::Lorenz(_) => MapType::Lorenz,
            ParameterSet::Rossler(_) => MapType::Rossler,
            ParameterSet::Henon(_) => MapType::Henon,
            ParameterSet::Lozi(_) => MapType::Lozi,
            ParameterSet::Logistic(_) => MapType::Logistic,
            ParameterSet::Standard(_) => MapType::Standard,
        }
    }

    /// Values in the order of [`MapType::fields`].
    pub fn values(&self) -> Vec<f64> {
        match *self {
            ParameterSet::Lorenz(LorenzParams { sigma, rho, beta }) => vec![sigma, rho, beta],
            ParameterSet::Rossler(RosslerParams { a, b, c }) => vec![a, b, c],
            ParameterSet::Henon(HenonParams { a, b, iterations }) => vec![a, b, iterations],
            ParameterSet::Lozi(LoziParams { a, b, iterations }) => vec![a, b, iterations],
            ParameterSet::Logistic(LogisticParams { r, x0, iterations }) => {
                vec![r, x0, iterations]
            }
            ParameterSet::Standard(StandardParams { k, iterations }) => vec![k, iterations],
        }
    }

    /// Inverse of [`values`](Self::values). `None` when the arity is wrong.
    pub fn from_values(map_type: MapType, values: &[f64]) -> Option<Self> {
        let set = match (map_type, values) {
            (MapType::Lorenz, &[sigma, rho, beta]) => {
                ParameterSet::Lorenz(LorenzParams { sigma, rho, beta })
            }
            (MapType::Rossler, &[a, b, c]) => ParameterSet::Rossler(RosslerParams { a, b, c }),
            (MapType::Henon, &[a, b, iterations]) => {
                ParameterSet::Henon(HenonParams { a, b, iterations })
            }
            (MapType::Lozi, &[a, b, iterations]) => {
                ParameterSet::Lozi(LoziParams { a, b, iterations })
            }
            (MapType::Logistic, &[r, x0, iterations]) => {
                ParameterSet::Logistic(LogisticParams { r, x0, iterations })
            }
            (MapType::Standard, &[k, iterations]) => {
                ParameterSet::Standard(StandardParams { k, iterations })
            }
            _ => return None,
        };
        Some(set)
    }

    /// `(name, value)` pairs in serialization order.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        self.map_type()
            .fields()
            .iter()
            .map(|f| f.name)
            .zip(self.values())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.named_values()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Returns a copy with `name` replaced (and clamped).
    pub fn with(&self, name: &str, value: f64) -> Result<Self, ParamError> {
        let map_type = self.map_type();
        let unknown = || ParamError::UnknownField {
            map_type,
            field: name.to_string(),
        };
        let idx = map_type
            .fields()
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(unknown)?;
        let mut values = self.values();
        values[idx] = value;
        Self::from_values(map_type, &values)
            .ok_or_else(unknown)?
            .validated()
    }

    /// Every value clamped into its system-specific stable range.
    pub fn clamped(&self) -> Self {
        let map_type = self.map_type();
        let values: Vec<f64> = map_type
            .fields()
            .iter()
            .zip(self.values())
            .map(|(f, v)| f.range.clamp(v))
            .collect();
        Self::from_values(map_type, &values).unwrap_or(*self)
    }

    /// Rejects non-finite values, then clamps.
    pub fn validated(&self) -> Result<Self, ParamError> {
        for (field, value) in self.named_values() {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { field, value });
            }
        }
        Ok(self.clamped())
    }

    pub fn is_in_range(&self) -> bool {
        self.map_type()
            .fields()
            .iter()
            .zip(self.values())
            .all(|(f, v)| f.range.contains(v))
    }
}
