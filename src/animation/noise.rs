use crate::foundation::math::{lerp, mix64};

/// Deterministic 2-D gradient noise remapped to `[0, 1]`.
///
/// Lattice gradients are unit vectors whose angle is hashed from `(seed, ix, iy)`, so the same
/// inputs give the same value on every platform. The value is exactly `0.5` on lattice points.
pub fn gradient_noise_2d(x: f32, y: f32, seed: u64) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let ix = x0 as i64;
    let iy = y0 as i64;

    let n00 = corner(seed, ix, iy, fx, fy);
    let n10 = corner(seed, ix + 1, iy, fx - 1.0, fy);
    let n01 = corner(seed, ix, iy + 1, fx, fy - 1.0);
    let n11 = corner(seed, ix + 1, iy + 1, fx - 1.0, fy - 1.0);

    let u = fade(fx);
    let v = fade(fy);
    let n = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v);

    // Unit gradients bound |n| by sqrt(1/2).
    (n * std::f32::consts::SQRT_2 * 0.5 + 0.5).clamp(0.0, 1.0)
}

fn corner(seed: u64, ix: i64, iy: i64, dx: f32, dy: f32) -> f32 {
    let h = mix64(mix64(seed ^ ix as u64) ^ iy as u64);
    let angle = (h >> 40) as f32 * (std::f32::consts::TAU / (1u64 << 24) as f32);
    angle.cos() * dx + angle.sin() * dy
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
