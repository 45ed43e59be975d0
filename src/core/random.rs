/// Fast xorshift RNG. The state lives in the room so a seeded room replays identically.
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform float in `[low, high]`.
pub fn random_range(state: &mut u32, low: f32, high: f32) -> f32 {
    let unit = xorshift32(state) as f32 / u32::MAX as f32;
    low + (high - low) * unit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_in_bounds() {
        let mut state = 0x9E37_79B9;
        for _ in 0..1000 {
            let v = random_range(&mut state, -8.0, 8.0);
            assert!((-8.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = 12345;
        let mut b = 12345;
        for _ in 0..16 {
            assert_eq!(xorshift32(&mut a), xorshift32(&mut b));
        }
    }
}
