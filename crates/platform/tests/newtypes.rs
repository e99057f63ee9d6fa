//! Type system enforcement tests for platform newtypes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

// ── PlayerVolume ─────────────────────────────────────────────────────────────

#[test]
fn player_volume_new_clamps_over_max() {
    use platform::PlayerVolume;
    let v = PlayerVolume::new(12);
    assert_eq!(v.get(), 7, "PlayerVolume::new(12) should clamp to 7");
}

#[test]
fn player_volume_new_allows_0() {
    use platform::PlayerVolume;
    assert_eq!(PlayerVolume::new(0).get(), 0);
}

#[test]
fn player_volume_default_is_5() {
    use platform::PlayerVolume;
    assert_eq!(PlayerVolume::default().get(), 5);
}

#[test]
fn player_volume_try_new_rejects_over_max() {
    use platform::PlayerVolume;
    let err = PlayerVolume::try_new(8).unwrap_err();
    assert_eq!(err.value, 8);
    assert_eq!(err.max, 7);
    assert!(PlayerVolume::try_new(255).is_err());
}

#[test]
fn player_volume_try_new_accepts_valid_range() {
    use platform::PlayerVolume;
    for v in 0..=7 {
        assert_eq!(PlayerVolume::try_new(v).unwrap().get(), v);
    }
}

#[test]
fn player_volume_is_one_byte() {
    use platform::PlayerVolume;
    assert_eq!(core::mem::size_of::<PlayerVolume>(), 1);
}

#[test]
fn out_of_range_error_displays_bounds() {
    use platform::PlayerVolume;
    let err = PlayerVolume::try_new(9).unwrap_err();
    assert_eq!(err.to_string(), "value 9 outside 0..=7");
}

proptest::proptest! {
    /// PlayerVolume::new never panics and always lands in 0..=7.
    #[test]
    fn player_volume_new_never_exceeds_max(v in 0u8..=255u8) {
        assert!(platform::PlayerVolume::new(v).get() <= platform::PlayerVolume::MAX);
    }
}
