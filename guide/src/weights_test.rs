use super::*;

fn weights(num: u32, total: u32) -> PromptWeights {
    PromptWeights::from_count(PieceCount::new(num, total).unwrap())
}

// =============================================================
// PieceCount
// =============================================================

#[test]
fn piece_count_rejects_zero_total() {
    assert!(matches!(PieceCount::new(0, 0), Err(GuideError::ZeroTotalPieces)));
}

#[test]
fn piece_count_rejects_too_many() {
    let err = PieceCount::new(13, 12).unwrap_err();
    assert!(matches!(err, GuideError::TooManyPieces { num_pieces: 13, total_num_pieces: 12 }));
    assert!(err.to_string().contains("13"));
}

#[test]
fn piece_count_rejects_oversized_total() {
    let err = PieceCount::new(0, MAX_TOTAL_PIECES + 1).unwrap_err();
    assert!(matches!(err, GuideError::TotalPiecesTooLarge { max: MAX_TOTAL_PIECES, .. }));
    assert!(matches!(crate::compute_emptiness(1, u32::MAX), Err(GuideError::TotalPiecesTooLarge { .. })));
}

#[test]
fn piece_count_accepts_bounds() {
    assert!(PieceCount::new(0, 12).is_ok());
    assert!(PieceCount::new(12, 12).is_ok());
    assert!(PieceCount::new(1, 1).is_ok());
    assert!(PieceCount::new(MAX_TOTAL_PIECES, MAX_TOTAL_PIECES).is_ok());
}

#[test]
fn wedge_span_divides_full_turn() {
    assert!((PieceCount::new(1, 12).unwrap().wedge_span_deg() - 30.0).abs() < 1e-12);
    assert!((PieceCount::new(0, 8).unwrap().wedge_span_deg() - 45.0).abs() < 1e-12);
}

// =============================================================
// Emptiness
// =============================================================

#[test]
fn emptiness_reference_values() {
    assert!((crate::compute_emptiness(0, 12).unwrap() - 1.0).abs() < 1e-12);
    assert!(crate::compute_emptiness(12, 12).unwrap().abs() < 1e-12);
    assert!((crate::compute_emptiness(6, 12).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn emptiness_rejects_zero_total() {
    assert!(matches!(crate::compute_emptiness(0, 0), Err(GuideError::ZeroTotalPieces)));
}

#[test]
fn emptiness_always_in_unit_range() {
    for total in 1..=24 {
        for num in 0..=total {
            let e = crate::compute_emptiness(num, total).unwrap();
            assert!((0.0..=1.0).contains(&e), "{num}/{total} -> {e}");
        }
    }
}

// =============================================================
// PromptWeights
// =============================================================

#[test]
fn empty_plate_weight_scales_emptiness() {
    assert_eq!(weights(0, 12).empty_plate_weight_label(), "1.10");
    assert_eq!(weights(12, 12).empty_plate_weight_label(), "0.00");
    assert_eq!(weights(6, 12).empty_plate_weight_label(), "0.55");
    assert_eq!(weights(1, 12).empty_plate_weight_label(), "1.01");
}

#[test]
fn half_eaten_is_strict() {
    assert!(!weights(6, 12).half_eaten());
    assert!(weights(5, 12).half_eaten());
    assert!(!weights(7, 12).half_eaten());
    assert!(weights(0, 12).half_eaten());
    assert!(!weights(12, 12).half_eaten());
}
