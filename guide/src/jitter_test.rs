use super::*;

#[test]
fn rng_jitter_stays_in_range() {
    let mut jitter = RngJitter::seeded(7);
    for _ in 0..1000 {
        assert!(jitter.jitter_deg() <= MAX_WEDGE_JITTER_DEG);
    }
}

#[test]
fn rng_jitter_covers_both_bounds() {
    let mut jitter = RngJitter::seeded(11);
    let draws: Vec<u32> = (0..1000).map(|_| jitter.jitter_deg()).collect();
    assert!(draws.contains(&0));
    assert!(draws.contains(&MAX_WEDGE_JITTER_DEG));
}

#[test]
fn seeded_jitter_is_reproducible() {
    let mut a = RngJitter::seeded(42);
    let mut b = RngJitter::seeded(42);
    let a: Vec<u32> = (0..32).map(|_| a.jitter_deg()).collect();
    let b: Vec<u32> = (0..32).map(|_| b.jitter_deg()).collect();
    assert_eq!(a, b);
}

#[test]
fn fixed_jitter_clamps() {
    assert_eq!(FixedJitter(3).jitter_deg(), 3);
    assert_eq!(FixedJitter(40).jitter_deg(), MAX_WEDGE_JITTER_DEG);
    assert_eq!(FixedJitter::default().jitter_deg(), 0);
}

#[test]
fn mutable_reference_delegates() {
    fn draw(mut source: impl JitterSource) -> u32 {
        source.jitter_deg()
    }

    let mut inner = FixedJitter(2);
    assert_eq!(draw(&mut inner), 2);
}
