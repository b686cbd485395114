use az::SaturatingAs;

#[derive(
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
    Default,
)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Add,
    Difference,
}

/// Full layer opacity.
pub const OPAQUE: u8 = 255;

/// Scale an 8-bit opacity into `[0, 1]`, as the compositor consumes it.
#[must_use]
pub fn opacity_to_f32(opacity: u8) -> f32 {
    f32::from(opacity) / 255.0
}
/// Quantize a normalized opacity into 8 bits, clamping out-of-range and NaN values.
#[must_use]
pub fn opacity_to_u8(opacity: f32) -> u8 {
    if opacity.is_nan() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round().saturating_as::<u8>()
}
