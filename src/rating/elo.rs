//! Pairwise Elo update
//!
//! Thin layer over the classic logistic Elo implementation from the
//! skillratings crate. Every event is decomposed into independent
//! two-competitor comparisons, each of which goes through [`update`].

use skillratings::elo::{elo, EloConfig, EloRating};
use skillratings::Outcomes;

/// Expected score of A against B on the base-400 logistic curve
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// New ratings for A and B after a single comparison.
///
/// `outcome` is A's result. Ratings are neither clamped nor rounded.
pub fn update(rating_a: f64, rating_b: f64, k: f64, outcome: Outcomes) -> (f64, f64) {
    let (new_a, new_b) = elo(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
        &outcome,
        &EloConfig { k },
    );
    (new_a.rating, new_b.rating)
}

/// Rating changes for A and B after a single comparison
pub fn rating_deltas(rating_a: f64, rating_b: f64, k: f64, outcome: Outcomes) -> (f64, f64) {
    let (new_a, new_b) = update(rating_a, rating_b, k, outcome);
    (new_a - rating_a, new_b - rating_b)
}

/// Outcome for A given both finishing positions (lower is better)
pub fn outcome_from_positions(position_a: u32, position_b: u32) -> Outcomes {
    match position_a.cmp(&position_b) {
        std::cmp::Ordering::Less => Outcomes::WIN,
        std::cmp::Ordering::Greater => Outcomes::LOSS,
        std::cmp::Ordering::Equal => Outcomes::DRAW,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_ratings_win() {
        let (a, b) = update(1000.0, 1000.0, 32.0, Outcomes::WIN);
        assert_eq!(a, 1016.0);
        assert_eq!(b, 984.0);
    }

    #[test]
    fn test_equal_ratings_draw_is_noop() {
        let (a, b) = update(1234.5, 1234.5, 32.0, Outcomes::DRAW);
        assert_eq!(a, 1234.5);
        assert_eq!(b, 1234.5);
    }

    #[test]
    fn test_expected_score_reference_values() {
        assert_eq!(expected_score(1000.0, 1000.0), 0.5);
        // 400 points apart gives 10:1 odds
        assert!((expected_score(1400.0, 1000.0) - 10.0 / 11.0).abs() < 1e-12);
        assert!((expected_score(1000.0, 1400.0) - 1.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let (favourite_win, _) = rating_deltas(1200.0, 1000.0, 32.0, Outcomes::WIN);
        let (favourite_loss, _) = rating_deltas(1200.0, 1000.0, 32.0, Outcomes::LOSS);
        assert!(favourite_win > 0.0);
        assert!(favourite_loss < 0.0);
        assert!(favourite_loss.abs() > favourite_win.abs());
    }

    #[test]
    fn test_outcome_from_positions() {
        assert_eq!(outcome_from_positions(1, 2), Outcomes::WIN);
        assert_eq!(outcome_from_positions(7, 3), Outcomes::LOSS);
        assert_eq!(outcome_from_positions(4, 4), Outcomes::DRAW);
    }

    fn any_outcome() -> impl Strategy<Value = Outcomes> {
        prop_oneof![
            Just(Outcomes::WIN),
            Just(Outcomes::DRAW),
            Just(Outcomes::LOSS)
        ]
    }

    proptest! {
        #[test]
        fn prop_update_is_zero_sum(
            a in 0.0f64..3000.0,
            b in 0.0f64..3000.0,
            k in 1.0f64..64.0,
            outcome in any_outcome(),
        ) {
            let (delta_a, delta_b) = rating_deltas(a, b, k, outcome);
            prop_assert!((delta_a + delta_b).abs() < 1e-9);
        }

        #[test]
        fn prop_draw_pulls_ratings_together(
            a in 0.0f64..3000.0,
            gap in 1.0f64..800.0,
            k in 1.0f64..64.0,
        ) {
            let b = a + gap;
            let (new_a, new_b) = update(a, b, k, Outcomes::DRAW);
            prop_assert!(new_a > a);
            prop_assert!(new_b < b);
        }

        #[test]
        fn prop_expected_scores_are_complementary(
            a in 0.0f64..3000.0,
            b in 0.0f64..3000.0,
        ) {
            let sum = expected_score(a, b) + expected_score(b, a);
            prop_assert!((sum - 1.0).abs() < 1e-12);
        }
    }
}
