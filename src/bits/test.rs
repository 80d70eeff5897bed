use super::*;
use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;

fn bit(row: u32, col: u32) -> u64 {
    1u64 << (row * 8 + col)
}

#[test]
fn test_popcnt() {
    assert_eq!(popcnt(0), 0);
    assert_eq!(popcnt(u64::MAX), 64);
    assert_eq!(popcnt(0x0000_0018_1800_0000), 4);
}

#[test]
fn test_flip_single_bits() {
    for row in 0..8 {
        for col in 0..8 {
            let x = bit(row, col);
            assert_eq!(flip_vertical(x), bit(7 - row, col));
            assert_eq!(flip_horizontal(x), bit(row, 7 - col));
            assert_eq!(flip_diag(x), bit(col, row));
            assert_eq!(rot90(x), bit(7 - col, row));
        }
    }
}

#[test]
fn test_involutions() {
    let mut rng = SmallRng::seed_from_u64(0xDEADBEAF);
    for _ in 0..256 {
        let x = rng.random::<u64>();
        assert_eq!(flip_vertical(flip_vertical(x)), x);
        assert_eq!(flip_horizontal(flip_horizontal(x)), x);
        assert_eq!(flip_diag(flip_diag(x)), x);
        assert_eq!(rot90(rot90(rot90(rot90(x)))), x);
        assert_eq!(popcnt(rot90(x)), popcnt(x));
    }
}
