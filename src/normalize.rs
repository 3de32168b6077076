//! Normalizer - rescale a raw score vector onto the simplex

use archetype_types::ScoreVector;

/// Divide every score by the vector's sum so non-zero vectors sum to 1.
///
/// An all-zero vector is returned unchanged: "no information" stays distinct
/// from a uniform distribution.
pub fn normalize(vector: &ScoreVector) -> ScoreVector {
    let total = vector.sum();
    if total.is_finite() {
        if total <= 0.0 {
            return *vector;
        }
        return vector.map(|score| score / total);
    }

    // Sum overflowed; scores are finite, so rescale by the peak first
    let peak = vector.values().iter().copied().fold(0.0, f64::max);
    let scaled = vector.map(|score| score / peak);
    let total = scaled.sum();
    scaled.map(|score| score / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archetype_types::ArchetypeClass;

    #[test]
    fn test_normalize_sums_to_one() {
        let v = ScoreVector::from_pairs([
            (ArchetypeClass::Explorer, 3.0),
            (ArchetypeClass::Sage, 2.0),
            (ArchetypeClass::Magician, 1.0),
        ]);
        let n = normalize(&v);
        assert!((n.sum() - 1.0).abs() < 1e-12);
        assert!((n.get(ArchetypeClass::Explorer) - 0.5).abs() < 1e-12);
        assert_eq!(n.get(ArchetypeClass::Hero), 0.0);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        let v = ScoreVector::zero();
        assert_eq!(normalize(&v), v);
    }

    #[test]
    fn test_normalize_survives_overflowing_sum() {
        let v = ScoreVector::from_pairs([
            (ArchetypeClass::Explorer, 1e308),
            (ArchetypeClass::Sage, 1e308),
            (ArchetypeClass::Hero, 5e307),
        ]);
        assert!(v.sum().is_infinite());
        let n = normalize(&v);
        assert!((n.sum() - 1.0).abs() < 1e-12);
        assert!((n.get(ArchetypeClass::Explorer) - 0.4).abs() < 1e-12);
        assert!((n.get(ArchetypeClass::Hero) - 0.2).abs() < 1e-12);
        assert_eq!(n.ranked(), v.ranked());
    }

    #[test]
    fn test_normalize_preserves_ranking() {
        let v = ScoreVector::from_pairs([
            (ArchetypeClass::Lover, 1.5),
            (ArchetypeClass::Caregiver, 0.6),
        ]);
        assert_eq!(normalize(&v).ranked(), v.ranked());
    }
}
