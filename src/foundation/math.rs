pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Scale an 8-bit alpha by a unit factor, rounding to nearest.
pub(crate) fn scale_u8(v: u8, factor: f32) -> u8 {
    let f = factor.clamp(0.0, 1.0);
    ((f32::from(v) * f).round() as i32).clamp(0, 255) as u8
}

/// Process-independent 64-bit hash used wherever a value must be derived reproducibly from an id.
pub(crate) fn stable_hash64(bytes: &[u8]) -> u64 {
    xxhash_rust::xxh3::xxh3_64(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
