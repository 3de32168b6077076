//! Property tests for the scoring pipeline invariants.

use proptest::prelude::*;

use dream_archetype::{
    classify, normalize, AnswerSet, ArchetypeClass, ArchetypeEngine, ClassifierPolicy,
    ConfidenceBand, ConfidenceThresholds, QuizVariant, ResultPayload, ScoreVector,
};

fn vector(values: [f64; 12]) -> ScoreVector {
    ScoreVector::from_pairs(ArchetypeClass::ALL.into_iter().zip(values))
}

fn score_values() -> impl Strategy<Value = [f64; 12]> {
    // Mostly zeros so secondary/degenerate paths are exercised too; the huge
    // arm makes the plain sum overflow
    prop::array::uniform12(prop_oneof![
        6 => Just(0.0),
        4 => 0.0f64..20.0,
        2 => (0u32..6).prop_map(f64::from),
        1 => 1e300f64..f64::MAX,
    ])
}

fn answer_set(variant: QuizVariant) -> impl Strategy<Value = AnswerSet> {
    let (prefix, count) = match variant {
        QuizVariant::Full => ("q", 15),
        QuizVariant::Quick => ("quick_q", 7),
    };
    prop::collection::vec((1usize..=count + 2, 0usize..6), 0..12).prop_map(move |pairs| {
        pairs
            .into_iter()
            .map(|(n, index)| (format!("{}{}", prefix, n), index))
            .collect()
    })
}

proptest! {
    #[test]
    fn normalized_vector_sums_to_one(values in score_values()) {
        let raw = vector(values);
        let normalized = normalize(&raw);
        if raw.is_zero() {
            prop_assert_eq!(normalized, raw);
        } else {
            prop_assert!((normalized.sum() - 1.0).abs() < 1e-9);
            prop_assert!(normalized.iter().all(|(_, v)| (0.0..=1.0 + 1e-12).contains(&v)));
        }
    }

    #[test]
    fn normalize_preserves_order(values in score_values()) {
        let raw = vector(values);
        let normalized = normalize(&raw);
        for a in ArchetypeClass::ALL {
            for b in ArchetypeClass::ALL {
                if raw.get(a) >= raw.get(b) {
                    prop_assert!(normalized.get(a) >= normalized.get(b));
                }
            }
        }
    }

    #[test]
    fn classification_is_deterministic(values in score_values()) {
        let normalized = normalize(&vector(values));
        let policy = ClassifierPolicy::default();
        prop_assert_eq!(classify(&normalized, &policy), classify(&normalized, &policy));
    }

    #[test]
    fn primary_has_highest_score(values in score_values()) {
        let normalized = normalize(&vector(values));
        let result = classify(&normalized, &ClassifierPolicy::default());
        let top = normalized.iter().map(|(_, v)| v).fold(0.0, f64::max);
        prop_assert_eq!(result.score_of(result.primary), top);

        // Ties resolve to the earliest declared class
        let first_top = ArchetypeClass::ALL
            .into_iter()
            .find(|c| normalized.get(*c) == top)
            .unwrap();
        prop_assert_eq!(result.primary, first_top);

        match result.secondary {
            Some(secondary) => {
                prop_assert_ne!(secondary, result.primary);
                prop_assert!(normalized.get(secondary) > 0.0);
                prop_assert!(normalized.get(secondary) <= top);
            }
            None => prop_assert!(normalized.nonzero_count() <= 1),
        }
    }

    #[test]
    fn confidence_is_monotonic_in_gap(a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let thresholds = ConfidenceThresholds::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(thresholds.band(low) <= thresholds.band(high));
    }

    #[test]
    fn engine_never_fails_on_arbitrary_answers(
        full in answer_set(QuizVariant::Full),
        quick in answer_set(QuizVariant::Quick),
        text in "[a-zA-Z ]{0,40}",
    ) {
        let engine = ArchetypeEngine::shared().unwrap();

        let result = engine.full_quiz(&full);
        prop_assert!(ArchetypeClass::ALL.contains(&result.primary));
        prop_assert!(result.scores.is_zero() || (result.scores.sum() - 1.0).abs() < 1e-9);

        let result = engine.quick_quiz(&quick, Some(&text));
        prop_assert!(ArchetypeClass::ALL.contains(&result.primary));
        if result.scores.is_zero() {
            prop_assert_eq!(result.primary, ArchetypeClass::Explorer);
            prop_assert_eq!(result.confidence, ConfidenceBand::Low);
        }
    }

    #[test]
    fn payload_round_trips_through_json(
        quick in answer_set(QuizVariant::Quick),
        text in "(kiss|battle|book|crown|magic| )*",
    ) {
        let engine = ArchetypeEngine::shared().unwrap();
        for variant in [QuizVariant::Full, QuizVariant::Quick] {
            let result = engine.evaluate(variant, &quick, Some(&text));
            let json = engine.payload(variant, &result).to_json().unwrap();
            let restored = engine.restore(ResultPayload::from_json(&json).unwrap());
            prop_assert_eq!(restored, result);
        }
    }
}
