use foundation::side::Side;
use params::{MapType, ParameterSet};
use tracing::{debug, warn};

use crate::error::DecodeError;
use crate::query::QueryParameters;
use crate::state::ComparisonUrlState;

pub const COMPARE_KEY: &str = "compare";
pub const LEFT_KEY: &str = "left";
pub const RIGHT_KEY: &str = "right";

/// Route segment appended to a single-view page path.
pub const COMPARE_ROUTE: &str = "compare";

fn side_key(side: Side) -> &'static str {
    match side {
        Side::Left => LEFT_KEY,
        Side::Right => RIGHT_KEY,
    }
}

/// Serializes `state` into ordered query pairs.
///
/// `compare=true` is emitted only when the flag is set; a state without it
/// does not describe a comparison page and decodes to `None`.
pub fn encode(state: &ComparisonUrlState) -> QueryParameters {
    let mut query = QueryParameters::new();
    if state.compare {
        query.push(COMPARE_KEY, "true");
    }
    for side in Side::BOTH {
        query.push(side_key(side), side_json(state.side(side)));
    }
    query
}

fn side_json(params: &ParameterSet) -> String {
    // Derived serializers over plain f64 fields do not fail; an empty value
    // would only make the URL decode to defaults.
    serde_json::to_string(params).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialize parameter set");
        String::new()
    })
}

/// Decodes a comparison URL, returning `None` on any validation failure.
///
/// Out-of-range values are clamped, never rejected.
pub fn decode(url: &str, expected: MapType) -> Option<ComparisonUrlState> {
    match try_decode(url, expected) {
        Ok(state) => Some(state),
        Err(err) => {
            debug!(%expected, reason = %err, "comparison url rejected");
            None
        }
    }
}

/// Like [`decode`] but reports why the URL was rejected.
pub fn try_decode(url: &str, expected: MapType) -> Result<ComparisonUrlState, DecodeError> {
    let query = QueryParameters::from_url(url);
    if query.get(COMPARE_KEY) != Some("true") {
        return Err(DecodeError::NotComparison);
    }
    let left = decode_side(&query, Side::Left, expected)?;
    let right = decode_side(&query, Side::Right, expected)?;
    Ok(ComparisonUrlState::new(left, right))
}

fn decode_side(
    query: &QueryParameters,
    side: Side,
    expected: MapType,
) -> Result<ParameterSet, DecodeError> {
    let raw = query
        .get(side_key(side))
        .ok_or(DecodeError::MissingSide(side))?;
    let parsed: ParameterSet =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed {
            side,
            message: e.to_string(),
        })?;
    let found = parsed.map_type();
    if found != expected {
        return Err(DecodeError::MapTypeMismatch {
            side,
            expected,
            found,
        });
    }
    parsed
        .validated()
        .map_err(|source| DecodeError::InvalidParameter { side, source })
}

/// Decodes `url`, falling back to mirrored defaults for `map_type`.
pub fn decode_or_default(url: &str, map_type: MapType) -> ComparisonUrlState {
    decode(url, map_type).unwrap_or_else(|| ComparisonUrlState::defaults(map_type))
}

pub fn get_default_parameters(map_type: MapType) -> ParameterSet {
    ParameterSet::default_for(map_type)
}

/// `<base_path>/compare?<query>` for `state`.
pub fn comparison_url(base_path: &str, state: &ComparisonUrlState) -> String {
    let base = base_path.trim_end_matches('/');
    format!("{base}/{COMPARE_ROUTE}?{}", encode(state).to_query_string())
}

/// URL that opens a comparison session with both sides seeded from `params`.
///
/// Parameters for a different system than `map_type` are replaced by the
/// defaults for `map_type`.
pub fn build_comparison_url(base_path: &str, map_type: MapType, params: &ParameterSet) -> String {
    let seed = if params.map_type() == map_type {
        params.clamped()
    } else {
        debug!(
            %map_type,
            found = %params.map_type(),
            "seeding comparison from defaults"
        );
        get_default_parameters(map_type)
    };
    comparison_url(base_path, &ComparisonUrlState::mirrored(seed))
}
