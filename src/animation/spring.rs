use std::time::Duration;

const STIFFNESS: f64 = 100.0;
const MASS: f64 = 1.0;
const SETTLE_TOLERANCE: f64 = 0.005;

/// Unit step response of a damped spring (mass 1, stiffness 100).
///
/// `value(t)` starts at 0 and settles at 1; under-damped configurations overshoot once before
/// settling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    omega0: f64,
    zeta: f64,
}

impl Spring {
    /// Spring with the given damping coefficient.
    pub fn with_damping(damping: f64) -> Self {
        let omega0 = (STIFFNESS / MASS).sqrt();
        let zeta = (damping / (2.0 * (STIFFNESS * MASS).sqrt())).max(1e-3);
        Self { omega0, zeta }
    }

    /// Damping ratio.
    pub fn zeta(&self) -> f64 {
        self.zeta
    }

    /// Normalized displacement at `t` seconds.
    pub fn value(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let (w0, z) = (self.omega0, self.zeta);
        if z < 1.0 {
            let wd = w0 * (1.0 - z * z).sqrt();
            let decay = (-z * w0 * t).exp();
            1.0 - decay * ((wd * t).cos() + (z * w0 / wd) * (wd * t).sin())
        } else {
            // Critically damped response; over-damped ratios are treated the same.
            1.0 - (1.0 + w0 * t) * (-w0 * t).exp()
        }
    }

    /// Largest value reached, `1.0` when the spring does not overshoot.
    pub fn peak(&self) -> f64 {
        if self.zeta >= 1.0 {
            return 1.0;
        }
        let z = self.zeta;
        1.0 + (-std::f64::consts::PI * z / (1.0 - z * z).sqrt()).exp()
    }

    /// Time after which the response stays within tolerance of 1.
    pub fn settle_time(&self) -> Duration {
        let (w0, z) = (self.omega0, self.zeta);
        let secs = if z < 1.0 {
            let amp = 1.0 / (1.0 - z * z).sqrt();
            (amp / SETTLE_TOLERANCE).ln() / (z * w0)
        } else {
            // Solve (1 + w0 t) e^{-w0 t} = tol by fixed-point iteration.
            let mut t = 1.0 / w0;
            for _ in 0..32 {
                t = (1.0 + w0 * t).ln() / w0 + (1.0 / SETTLE_TOLERANCE).ln() / w0;
            }
            t
        };
        Duration::from_secs_f64(secs.max(0.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
