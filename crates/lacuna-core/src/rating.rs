use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Self-assessment a learner gives when revealing a hole.
///
/// The set is closed: anything else is rejected when the value is parsed,
/// so scoring logic never sees an unknown rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Oui,
    PlutotOui,
    Neutre,
    PlutotNon,
    Non,
}

/// Rejected rating value, carrying the offending string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized rating: {0:?}")]
pub struct ParseRatingError(pub String);

impl Rating {
    /// Apply this rating to an accumulated point value.
    ///
    /// Positive ratings add; neutral and negative ratings reset to exactly 0
    /// rather than subtracting, so points never go negative.
    pub fn apply(self, points: f64) -> f64 {
        match self {
            Rating::Oui => points + 1.0,
            Rating::PlutotOui => points + 0.5,
            Rating::Neutre | Rating::PlutotNon | Rating::Non => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Oui => "oui",
            Rating::PlutotOui => "plutot_oui",
            Rating::Neutre => "neutre",
            Rating::PlutotNon => "plutot_non",
            Rating::Non => "non",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ParseRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oui" => Ok(Rating::Oui),
            "plutot_oui" => Ok(Rating::PlutotOui),
            "neutre" => Ok(Rating::Neutre),
            "plutot_non" => Ok(Rating::PlutotNon),
            "non" => Ok(Rating::Non),
            other => Err(ParseRatingError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_ratings_add() {
        assert_eq!(Rating::Oui.apply(0.0), 1.0);
        assert_eq!(Rating::Oui.apply(2.5), 3.5);
        assert_eq!(Rating::PlutotOui.apply(0.0), 0.5);
        assert_eq!(Rating::PlutotOui.apply(3.0), 3.5);
    }

    #[test]
    fn test_reset_ratings_set_exactly_zero() {
        for rating in [Rating::Neutre, Rating::PlutotNon, Rating::Non] {
            assert_eq!(rating.apply(0.0), 0.0);
            assert_eq!(rating.apply(0.5), 0.0);
            assert_eq!(rating.apply(42.0), 0.0);
        }
    }

    #[test]
    fn test_points_never_negative_after_one_review() {
        for rating in [
            Rating::Oui,
            Rating::PlutotOui,
            Rating::Neutre,
            Rating::PlutotNon,
            Rating::Non,
        ] {
            assert!(rating.apply(0.0) >= 0.0);
        }
    }

    #[test]
    fn test_from_str_round_trips_display() {
        for rating in [
            Rating::Oui,
            Rating::PlutotOui,
            Rating::Neutre,
            Rating::PlutotNon,
            Rating::Non,
        ] {
            assert_eq!(rating.to_string().parse::<Rating>(), Ok(rating));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_values() {
        assert!("maybe".parse::<Rating>().is_err());
        assert!("OUI".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        let rating: Rating = serde_json::from_str("\"plutot_non\"").unwrap();
        assert_eq!(rating, Rating::PlutotNon);
        assert_eq!(serde_json::to_string(&Rating::PlutotOui).unwrap(), "\"plutot_oui\"");
        assert!(serde_json::from_str::<Rating>("\"bof\"").is_err());
    }
}
