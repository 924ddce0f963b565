//! Closed-form height field and pointer repulsion.
//!
//! Everything here is a pure `f32` function of its arguments so a frame can be
//! recomputed bit-for-bit from `(x, z, t, cursor)`.

use crate::config::{ColorRampConfig, RepulsionConfig, WaveConfig};
use crate::cursor::Cursor;

/// Wave height at ground position `(x, z)` and time `t` seconds.
///
/// ```text
/// h = A1·sin(x·f1 + t·s1) + A2·sin(z·f2 + t·s2) + A3·sin(|(x, z)|·f3 − t·s3)
/// ```
pub fn target_height(x: f32, z: f32, t: f32, wave: &WaveConfig) -> f32 {
    let roll = &wave.roll;
    let cross = &wave.cross;
    let ripple = &wave.ripple;
    let radius = (x * x + z * z).sqrt();

    let mut y = 0.0;
    y += (x * roll.frequency + t * roll.speed).sin() * roll.amplitude;
    y += (z * cross.frequency + t * cross.speed).sin() * cross.amplitude;
    y += (radius * ripple.frequency - t * ripple.speed).sin() * ripple.amplitude;
    y
}

/// Ground-plane distance from `(x, z)` to the cursor's tilt-compensated
/// projection `(mx·Kx, −my·Kz)`.
pub fn cursor_distance(x: f32, z: f32, cursor: Cursor, repulsion: &RepulsionConfig) -> f32 {
    let dx = x - cursor.x * repulsion.tilt_x;
    let dz = z + cursor.y * repulsion.tilt_z;
    (dx * dx + dz * dz).sqrt()
}

/// Height offset caused by the cursor at ground distance `distance`.
///
/// `-depth` at distance 0, falling linearly to 0 at `radius` and beyond.
pub fn repulsion(distance: f32, repulsion: &RepulsionConfig) -> f32 {
    if distance < repulsion.radius {
        let force = (repulsion.radius - distance) / repulsion.radius;
        -force * repulsion.depth
    } else {
        0.0
    }
}

/// Wave height plus cursor repulsion: the value a particle eases toward.
pub fn displaced_height(
    x: f32,
    z: f32,
    t: f32,
    cursor: Cursor,
    wave: &WaveConfig,
    push: &RepulsionConfig,
) -> f32 {
    target_height(x, z, t, wave) + repulsion(cursor_distance(x, z, cursor, push), push)
}

/// One step of exponential smoothing toward `target`.
pub fn smooth_toward(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

/// Position of height `y` on the color ramp, clamped to [0, 1].
pub fn height_mix(y: f32, ramp: &ColorRampConfig) -> f32 {
    let t = (y - ramp.low) / (ramp.high - ramp.low);
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}
