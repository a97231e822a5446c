//! Serde form for phases.
//!
//! JSON has no literal for infinities or NaN, so those phases are written as
//! the strings `"inf"`, `"-inf"` and `"NaN"`, the same text `{:?}` prints.
//! Finite phases stay plain numbers. Use with `#[serde(with = "crate::ir::phase")]`.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Text for a non-finite phase, `None` when the phase is finite.
fn non_finite_label(phase: f64) -> Option<&'static str> {
    if phase.is_nan() {
        Some("NaN")
    } else if phase == f64::INFINITY {
        Some("inf")
    } else if phase == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

pub fn serialize<S: Serializer>(phase: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match non_finite_label(*phase) {
        Some(label) => serializer.serialize_str(label),
        None => serializer.serialize_f64(*phase),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(PhaseVisitor)
}

struct PhaseVisitor;

impl<'de> Visitor<'de> for PhaseVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or one of \"inf\", \"-inf\", \"NaN\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

/// A phase as a standalone serde value, for arrays of phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phase(#[serde(with = "crate::ir::phase")] pub f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finite_phase_is_a_number() {
        assert_eq!(serde_json::to_value(Phase(0.25)).unwrap(), json!(0.25));
    }

    #[test]
    fn test_non_finite_phases_are_labels() {
        assert_eq!(serde_json::to_value(Phase(f64::INFINITY)).unwrap(), json!("inf"));
        assert_eq!(serde_json::to_value(Phase(f64::NEG_INFINITY)).unwrap(), json!("-inf"));
        assert_eq!(serde_json::to_value(Phase(f64::NAN)).unwrap(), json!("NaN"));
    }

    #[test]
    fn test_labels_read_back() {
        let inf: Phase = serde_json::from_value(json!("inf")).unwrap();
        let neg: Phase = serde_json::from_value(json!("-inf")).unwrap();
        let nan: Phase = serde_json::from_value(json!("NaN")).unwrap();
        assert_eq!(inf.0, f64::INFINITY);
        assert_eq!(neg.0, f64::NEG_INFINITY);
        assert!(nan.0.is_nan());
    }

    #[test]
    fn test_integer_phase_reads_back() {
        let phase: Phase = serde_json::from_value(json!(1)).unwrap();
        assert_eq!(phase.0, 1.0);
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(serde_json::from_value::<Phase>(json!("infinity")).is_err());
        assert!(serde_json::from_value::<Phase>(json!(null)).is_err());
    }
}
