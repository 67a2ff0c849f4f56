//! Volume curve
//!
//! Maps the 101 user-facing volume steps onto wiper positions (10-bit
//! ADC scale) so that equal steps sound like equal loudness changes on
//! the logarithmic potentiometer.

/// Number of volume steps (0..=100)
pub const VOLUME_STEPS: usize = 101;

/// Wiper position for each volume step, nondecreasing
pub const VOLUME_CURVE: [u16; VOLUME_STEPS] = [
    10, 10, 11, 11, 11, 11, 12, 13, 13, 14, 15, 16, 17, 19, 21, 22, 24, 25, 25, 26, 28, 29, 30, 31,
    37, 42, 48, 53, 59, 64, 69, 74, 79, 84, 90, 96, 102, 108, 114, 119, 125, 131, 136, 142, 147,
    152, 156, 161, 166, 171, 176, 180, 185, 191, 196, 201, 207, 213, 220, 226, 232, 237, 242, 248,
    256, 267, 279, 292, 308, 325, 341, 361, 383, 407, 438, 469, 500, 531, 561, 592, 622, 653, 683,
    713, 743, 773, 803, 832, 861, 890, 919, 947, 974, 996, 1009, 1016, 1020, 1022, 1023, 1023,
    1023,
];

/// Target position for a volume step, `None` outside 0..=100
pub fn target_for_step(step: i32) -> Option<u16> {
    usize::try_from(step)
        .ok()
        .and_then(|i| VOLUME_CURVE.get(i))
        .copied()
}
