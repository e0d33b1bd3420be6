//! Juror weight maps
//!
//! A weight is the number of an entry's vote slots a juror holds. For a
//! reconciliation to be valid the weights must add up to the quorum.

use crate::core::error::AllocationError;
use crate::core::ids::JurorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from juror to weight
///
/// Iteration order is by juror id, which keeps slot binding deterministic.
///
/// # Example
///
/// ```
/// use montage_domain::allocation::JurorWeightMap;
///
/// let weights = JurorWeightMap::from_pairs([("Alice", 1), ("Bob", 2)]).unwrap();
/// assert_eq!(weights.total(), 3);
/// assert!(weights.ensure_quorum(3).is_ok());
/// assert!(weights.ensure_quorum(4).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<JurorId, u32>", into = "BTreeMap<JurorId, u32>")]
pub struct JurorWeightMap(BTreeMap<JurorId, u32>);

impl JurorWeightMap {
    /// Build a map, rejecting zero weights
    pub fn new(weights: BTreeMap<JurorId, u32>) -> Result<Self, AllocationError> {
        if let Some((juror, _)) = weights.iter().find(|(_, w)| **w == 0) {
            return Err(AllocationError::Configuration(format!(
                "juror {} has weight 0; omit jurors without slots",
                juror
            )));
        }
        Ok(Self(weights))
    }

    pub fn from_pairs<J, I>(pairs: I) -> Result<Self, AllocationError>
    where
        J: Into<JurorId>,
        I: IntoIterator<Item = (J, u32)>,
    {
        let mut weights = BTreeMap::new();
        for (juror, weight) in pairs {
            let juror = juror.into();
            if weights.insert(juror.clone(), weight).is_some() {
                return Err(AllocationError::Configuration(format!(
                    "juror {} listed twice in weight map",
                    juror
                )));
            }
        }
        Self::new(weights)
    }

    /// Sum of all weights
    ///
    /// Summed as `u64`: the weights of several jurors may exceed `u32::MAX`.
    pub fn total(&self) -> u64 {
        self.0.values().map(|w| u64::from(*w)).sum()
    }

    /// Fail unless the weights add up to `quorum`
    pub fn ensure_quorum(&self, quorum: u32) -> Result<(), AllocationError> {
        let total = self.total();
        if total == u64::from(quorum) {
            Ok(())
        } else {
            Err(AllocationError::Configuration(format!(
                "expected sum of jury weights to be equal to quorum ({}): not {}",
                quorum, total
            )))
        }
    }

    pub fn weight(&self, juror: &JurorId) -> u32 {
        self.0.get(juror).copied().unwrap_or(0)
    }

    pub fn contains(&self, juror: &JurorId) -> bool {
        self.0.contains_key(juror)
    }

    pub fn juror_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JurorId, u32)> {
        self.0.iter().map(|(j, w)| (j, *w))
    }

    pub fn jurors(&self) -> impl Iterator<Item = &JurorId> {
        self.0.keys()
    }
}

impl TryFrom<BTreeMap<JurorId, u32>> for JurorWeightMap {
    type Error = AllocationError;

    fn try_from(weights: BTreeMap<JurorId, u32>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<JurorWeightMap> for BTreeMap<JurorId, u32> {
    fn from(map: JurorWeightMap) -> Self {
        map.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_mismatch_is_configuration_error() {
        let weights = JurorWeightMap::from_pairs([("J1", 2), ("J2", 2)]).unwrap();
        let err = weights.ensure_quorum(5).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("not 4"));
    }

    #[test]
    fn test_oversized_weights_do_not_wrap() {
        let weights = JurorWeightMap::from_pairs([("a", u32::MAX), ("b", 2)]).unwrap();
        assert_eq!(weights.total(), u64::from(u32::MAX) + 2);

        let err = weights.ensure_quorum(1).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("not 4294967297"));
    }

    #[test]
    fn test_zero_weight_rejected() {
        assert!(JurorWeightMap::from_pairs([("J1", 0)]).is_err());
    }

    #[test]
    fn test_duplicate_juror_rejected() {
        assert!(JurorWeightMap::from_pairs([("J1", 1), ("J1", 2)]).is_err());
    }

    #[test]
    fn test_lookup() {
        let weights = JurorWeightMap::from_pairs([("J1", 1), ("J2", 2)]).unwrap();
        assert_eq!(weights.weight(&JurorId::new("J2")), 2);
        assert_eq!(weights.weight(&JurorId::new("J9")), 0);
        assert_eq!(weights.juror_count(), 2);
        let order: Vec<_> = weights.jurors().map(|j| j.as_str()).collect();
        assert_eq!(order, vec!["J1", "J2"]);
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let weights: JurorWeightMap = serde_json::from_str(r#"{"a": 1, "b": 1}"#).unwrap();
        assert_eq!(weights.total(), 2);
        assert!(serde_json::from_str::<JurorWeightMap>(r#"{"a": 0}"#).is_err());
    }
}
