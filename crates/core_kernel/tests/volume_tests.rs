//! Tests for volume and load arithmetic

use core_kernel::{Milliliters, VolumeLoad};

#[test]
fn test_milliliters_ordering() {
    assert!(Milliliters::new(500) < Milliliters::new(750));
}

#[test]
fn test_scaled_load_of_large_quantity() {
    // 5 million litre-bottles would overflow u32 millilitres
    let load = Milliliters::new(1000).scaled(5_000_000);
    assert_eq!(load.get(), 5_000_000_000u64);
}

#[test]
fn test_load_accumulation() {
    let mut total = VolumeLoad::ZERO;
    total += Milliliters::new(750).scaled(4);
    total += Milliliters::STANDARD_BOTTLE.into();
    assert_eq!(total, VolumeLoad::new(3750));
}

#[test]
fn test_zero_volume() {
    assert!(Milliliters::new(0).is_zero());
    assert!(Milliliters::new(0).scaled(100).is_zero());
    assert!(!Milliliters::STANDARD_BOTTLE.is_zero());
}
