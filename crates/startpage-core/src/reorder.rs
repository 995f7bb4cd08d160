//! Validation of a proposed card ordering against the store's membership.

use crate::card::CardId;
use std::collections::BTreeSet;
use std::fmt::Display;
use thiserror::Error;

/// Why a proposed ordering was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderRejection {
    #[error("card list is empty")]
    Empty,
    #[error("card {0} appears more than once")]
    Duplicate(CardId),
    #[error("expected {expected} cards, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("not a permutation of the current cards (unknown: {}, missing: {})", IdList(.unknown), IdList(.missing))]
    NotPermutation {
        unknown: Vec<CardId>,
        missing: Vec<CardId>,
    },
}

/// Checks that `proposed` is a permutation of exactly `current`.
///
/// Callers must take `current` from the same transaction that will write the
/// new sort keys, otherwise a concurrent create or delete can slip in between.
pub fn validate_reorder(
    current: &BTreeSet<CardId>,
    proposed: &[CardId],
) -> Result<(), ReorderRejection> {
    if proposed.is_empty() {
        return Err(ReorderRejection::Empty);
    }

    let mut seen = BTreeSet::new();
    for id in proposed {
        if !seen.insert(*id) {
            return Err(ReorderRejection::Duplicate(*id));
        }
    }

    if proposed.len() != current.len() {
        return Err(ReorderRejection::LengthMismatch {
            expected: current.len(),
            actual: proposed.len(),
        });
    }

    if seen != *current {
        return Err(ReorderRejection::NotPermutation {
            unknown: seen.difference(current).copied().collect(),
            missing: current.difference(&seen).copied().collect(),
        });
    }

    Ok(())
}

struct IdList<'a>(&'a [CardId]);

impl Display for IdList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(values: &[i64]) -> Vec<CardId> {
        values.iter().copied().map(CardId::new).collect()
    }

    fn set(values: &[i64]) -> BTreeSet<CardId> {
        ids(values).into_iter().collect()
    }

    #[test]
    fn accepts_permutation() {
        assert_eq!(validate_reorder(&set(&[1, 2, 3]), &ids(&[3, 1, 2])), Ok(()));
    }

    #[test]
    fn rejects_empty_even_for_empty_store() {
        assert_eq!(
            validate_reorder(&set(&[]), &[]),
            Err(ReorderRejection::Empty)
        );
    }

    #[test]
    fn rejects_duplicates_before_length() {
        assert_eq!(
            validate_reorder(&set(&[1, 2, 3]), &ids(&[1, 2, 2])),
            Err(ReorderRejection::Duplicate(CardId::new(2)))
        );
    }

    #[test]
    fn rejects_partial_submission() {
        assert_eq!(
            validate_reorder(&set(&[1, 2, 3]), &ids(&[1, 2])),
            Err(ReorderRejection::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn rejects_foreign_ids() {
        let err = validate_reorder(&set(&[1, 2, 3]), &ids(&[1, 2, 9])).unwrap_err();
        assert_eq!(
            err,
            ReorderRejection::NotPermutation {
                unknown: ids(&[9]),
                missing: ids(&[3]),
            }
        );
        assert_eq!(
            err.to_string(),
            "not a permutation of the current cards (unknown: [9], missing: [3])"
        );
    }

    proptest! {
        #[test]
        fn accepts_iff_permutation(
            current in prop::collection::btree_set(0i64..40, 0..12),
            proposed in prop::collection::vec(0i64..40, 0..14),
        ) {
            let current: BTreeSet<CardId> = current.into_iter().map(CardId::new).collect();
            let proposed = ids(&proposed);

            let mut sorted = proposed.clone();
            sorted.sort();
            let is_permutation = !proposed.is_empty()
                && sorted == current.iter().copied().collect::<Vec<_>>();

            prop_assert_eq!(validate_reorder(&current, &proposed).is_ok(), is_permutation);
        }

        #[test]
        fn every_shuffle_is_accepted(
            current in prop::collection::btree_set(0i64..1000, 1..20),
            seed in any::<u64>(),
        ) {
            let mut proposed: Vec<CardId> = current.iter().copied().map(CardId::new).collect();
            let len = proposed.len();
            // Fisher-Yates driven by a xorshift sequence
            let mut state = seed | 1;
            for i in (1..len).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                proposed.swap(i, (state % (i as u64 + 1)) as usize);
            }

            let current: BTreeSet<CardId> = current.into_iter().map(CardId::new).collect();
            prop_assert!(validate_reorder(&current, &proposed).is_ok());
        }
    }
}
