//! Dead-zone correction for analog inputs.
//!
//! Both functions suppress small readings to zero and rescale the remaining
//! travel so full deflection still reaches the full output range:
//!
//! - triggers use a 1-D threshold: `(radius, 255]` maps onto `[0, 255]`
//! - thumbsticks use a radial dead zone on the vector magnitude, keeping the
//!   input direction: `(radius, 32767]` maps onto `[0, 32767]`
//!
//! Results are truncated towards zero when converted back to integers.

/// Full-scale stick magnitude.
const STICK_MAX: f32 = i16::MAX as f32;

/// Full-scale trigger value.
const TRIGGER_MAX: f32 = u8::MAX as f32;

/// Apply a trigger threshold to a raw `0..=255` position.
///
/// ```
/// use padwatch::deadzone::apply_trigger_dead_zone;
///
/// assert_eq!(apply_trigger_dead_zone(30, 30), 0);
/// assert_eq!(apply_trigger_dead_zone(200, 30), 192);
/// assert_eq!(apply_trigger_dead_zone(255, 30), 255);
/// ```
pub fn apply_trigger_dead_zone(position: u8, radius: u8) -> u8 {
    if position <= radius {
        return 0;
    }
    let valid_range = TRIGGER_MAX - f32::from(radius);
    let normalized = (f32::from(position - radius) / valid_range).min(1.0);
    (normalized * TRIGGER_MAX).min(TRIGGER_MAX) as u8
}

/// Apply a radial dead zone to a raw stick position.
///
/// A radius `<= 0` disables the dead zone. Inputs at or inside the radius,
/// including the zero vector, return `(0, 0)`.
///
/// ```
/// use padwatch::deadzone::apply_thumbstick_dead_zone;
///
/// assert_eq!(apply_thumbstick_dead_zone(100, -100, 0), (100, -100));
/// assert_eq!(apply_thumbstick_dead_zone(1000, 1000, 7849), (0, 0));
/// assert_eq!(apply_thumbstick_dead_zone(i16::MAX, 0, 7849), (i16::MAX, 0));
/// ```
pub fn apply_thumbstick_dead_zone(x: i16, y: i16, radius: i16) -> (i16, i16) {
    if radius <= 0 {
        return (x, y);
    }

    let fx = f32::from(x);
    let fy = f32::from(y);
    let magnitude = (fx * fx + fy * fy).sqrt();
    let radius = f32::from(radius);

    // Zero-length input has no direction.
    if magnitude <= 0.0 {
        return (0, 0);
    }

    let clipped = magnitude.min(STICK_MAX);
    if clipped <= radius {
        return (0, 0);
    }

    let dir_x = fx / magnitude;
    let dir_y = fy / magnitude;
    let normalized = (clipped - radius) / (STICK_MAX - radius);
    let scaled = normalized * STICK_MAX;

    ((dir_x * scaled) as i16, (dir_y * scaled) as i16)
}
