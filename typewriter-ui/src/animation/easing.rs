//! Cubic-bezier timing curves and the cursor blink keyframes

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// CSS `ease`
pub const EASE: CubicBezier = CubicBezier::new(0.25, 0.1, 0.25, 1.0);

/// CSS `linear`
pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample_curve(a1: f32, a2: f32, t: f32) -> f32 {
        // B(t) = 3(1-t)^2 t a1 + 3(1-t) t^2 a2 + t^3
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn sample_derivative(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Find the curve parameter whose x equals `x`
    fn solve_t(&self, x: f32) -> f32 {
        // Newton-Raphson first, bisection if the slope is too flat
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample_curve(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let slope = Self::sample_derivative(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let value = Self::sample_curve(self.x1, self.x2, t);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1]
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample_curve(self.y1, self.y2, self.solve_t(x))
    }
}

/// Opacity of the `blink` keyframes (1 -> 0 -> 1) at `phase` in [0, 1)
///
/// The timing function applies to each keyframe segment separately.
pub fn blink_opacity(phase: f32, timing: CubicBezier) -> f32 {
    let phase = phase.rem_euclid(1.0);
    if phase < 0.5 {
        1.0 - timing.ease(phase / 0.5)
    } else {
        timing.ease((phase - 0.5) / 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(EASE.ease(0.0), 0.0);
        assert_eq!(EASE.ease(1.0), 1.0);
        assert_eq!(EASE.ease(-2.0), 0.0);
        assert_eq!(EASE.ease(3.0), 1.0);
    }

    #[test]
    fn test_linear_is_identity() {
        for i in 1..10 {
            let x = i as f32 / 10.0;
            assert!((LINEAR.ease(x) - x).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ease_is_monotonic_and_front_loaded() {
        let mut previous = 0.0;
        for i in 1..=20 {
            let value = EASE.ease(i as f32 / 20.0);
            assert!(value >= previous);
            previous = value;
        }
        // `ease` accelerates quickly: halfway in time is well past halfway in value
        assert!(EASE.ease(0.5) > 0.75);
    }

    #[test]
    fn test_blink_keyframes() {
        assert!((blink_opacity(0.0, EASE) - 1.0).abs() < 1e-6);
        assert!(blink_opacity(0.5, EASE).abs() < 1e-6);
        assert!((blink_opacity(0.999, EASE) - 1.0).abs() < 0.01);
        // Wraps every period
        assert!((blink_opacity(1.25, EASE) - blink_opacity(0.25, EASE)).abs() < 1e-6);
    }
}
