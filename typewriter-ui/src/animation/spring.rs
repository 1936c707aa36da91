//! Damped spring used for the wrapper fade-in
//!
//! Closed-form solution of a mass-spring-damper released from rest, so the
//! value at any time is exact regardless of frame rate.

/// Displacement below which the spring is considered at rest
const REST_DELTA: f32 = 0.01;
/// Speed below which the spring is considered at rest
const REST_SPEED: f32 = 0.01;
/// Window used to estimate velocity from two samples
const VELOCITY_SAMPLE: f32 = 0.005;

/// Spring parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTransition {
    /// Opposing force proportional to velocity (0 = oscillates forever)
    pub damping: f32,
    /// Spring constant (higher = snappier)
    pub stiffness: f32,
    /// Mass of the moving object
    pub mass: f32,
}

impl Default for SpringTransition {
    fn default() -> Self {
        Self {
            damping: 10.0,
            stiffness: 100.0,
            mass: 1.0,
        }
    }
}

impl SpringTransition {
    /// Damping ratio (1.0 = critically damped)
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Undamped angular frequency in rad/s
    pub fn angular_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }
}

/// A running spring animation between two values
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringTransition,
    from: f32,
    to: f32,
    elapsed: f32,
    current: f32,
    settled: bool,
}

impl Spring {
    /// Create a spring at `from`, pulled towards `to`
    pub fn new(config: SpringTransition, from: f32, to: f32) -> Self {
        Self {
            config,
            from,
            to,
            elapsed: 0.0,
            current: from,
            settled: (from - to).abs() < f32::EPSILON,
        }
    }

    /// Position at `t` seconds after release
    pub fn value_at(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return self.from;
        }

        let x0 = self.from - self.to;
        let zeta = self.config.damping_ratio();
        let omega = self.config.angular_frequency();

        let displacement = if (zeta - 1.0).abs() < 1e-4 {
            // Critically damped
            (-omega * t).exp() * (x0 + omega * x0 * t)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            (-zeta * omega * t).exp()
                * (x0 * (omega_d * t).cos() + (zeta * omega * x0 / omega_d) * (omega_d * t).sin())
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            x0 * (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        };

        self.to + displacement
    }

    /// Advance by `delta` seconds and return the new value
    pub fn update(&mut self, delta: f32) -> f32 {
        if self.settled {
            return self.current;
        }

        self.elapsed += delta;
        self.current = self.value_at(self.elapsed);

        let previous = self.value_at(self.elapsed - VELOCITY_SAMPLE);
        let velocity = (self.current - previous) / VELOCITY_SAMPLE;

        if (self.to - self.current).abs() < REST_DELTA && velocity.abs() < REST_SPEED {
            self.current = self.to;
            self.settled = true;
        }

        self.current
    }

    /// Jump straight to the target
    pub fn settle(&mut self) {
        self.current = self.to;
        self.settled = true;
    }

    /// Current value (may overshoot the target while underdamped)
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Target value
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}
