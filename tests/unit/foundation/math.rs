use super::*;

#[test]
fn mul_div255_identity_and_zero() {
    for x in [0u16, 1, 127, 128, 254, 255] {
        assert_eq!(mul_div255_u8(x, 255), x as u8);
        assert_eq!(mul_div255_u8(x, 0), 0);
    }
}

#[test]
fn scale_u8_clamps_factor() {
    assert_eq!(scale_u8(200, 0.0), 0);
    assert_eq!(scale_u8(200, 1.0), 200);
    assert_eq!(scale_u8(200, 2.0), 200);
    assert_eq!(scale_u8(255, 0.3), 77);
}

#[test]
fn stable_hash_is_reproducible() {
    assert_eq!(stable_hash64(b"user_42"), stable_hash64(b"user_42"));
    assert_ne!(stable_hash64(b"user_42"), stable_hash64(b"user_43"));
}
