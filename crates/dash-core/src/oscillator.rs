//! Closed-form damped harmonic oscillator.
//!
//! Solves `x'' + 2ζω x' + ω² x = 0` exactly over an elapsed interval `t`,
//! returning the state-transition matrix
//!
//! ```text
//! [ x(t) ]   [ pos_pos  pos_vel ] [ x0 ]
//! [ v(t) ] = [ vel_pos  vel_vel ] [ v0 ]
//! ```
//!
//! Work is done in scaled time `s = ωt`, where the equation becomes
//! `x'' + 2ζx' + x = 0`; the off-diagonal terms are then rescaled by `1/ω`
//! (position per unit velocity) and `ω` (velocity per unit position).

/// Damping ratios this close to 1 take the critically damped branch.
const CRITICAL_BAND: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub pos_pos: f64,
    pub pos_vel: f64,
    pub vel_pos: f64,
    pub vel_vel: f64,
}

impl Transition {
    pub const IDENTITY: Transition = Transition {
        pos_pos: 1.0,
        pos_vel: 0.0,
        vel_pos: 0.0,
        vel_vel: 1.0,
    };

    /// Everything decays to rest immediately.
    pub const ARRIVED: Transition = Transition {
        pos_pos: 0.0,
        pos_vel: 0.0,
        vel_pos: 0.0,
        vel_vel: 0.0,
    };

    /// Map `(displacement, velocity)` forward by the interval this matrix was
    /// built for.
    #[inline]
    pub fn apply(&self, displacement: f64, velocity: f64) -> (f64, f64) {
        (
            displacement * self.pos_pos + velocity * self.pos_vel,
            displacement * self.vel_pos + velocity * self.vel_vel,
        )
    }

    #[inline]
    pub fn as_array(&self) -> [f64; 4] {
        [self.pos_pos, self.pos_vel, self.vel_pos, self.vel_vel]
    }
}

/// Transition coefficients for elapsed `time` (seconds), damping ratio
/// `damping` and angular `speed` (rad/s).
///
/// `time <= 0` or `speed == 0` is the identity: a spring with zero speed is
/// frozen where it is. An infinite speed arrives instantly.
pub fn spring_coefficients(time: f64, damping: f64, speed: f64) -> Transition {
    if !(time > 0.0) || !(speed > 0.0) {
        return Transition::IDENTITY;
    }
    if speed.is_infinite() {
        return Transition::ARRIVED;
    }
    let damping = damping.max(0.0);
    let scaled_time = time * speed;

    if (damping - 1.0).abs() <= CRITICAL_BAND {
        // repeated root -1 (scaled):
        // x(s) = x0 e^-s (1 + s) + u0 e^-s s
        // u(s) = -x0 e^-s s      + u0 e^-s (1 - s)
        let exp_term = (-scaled_time).exp();
        Transition {
            pos_pos: exp_term * (1.0 + scaled_time),
            pos_vel: exp_term * time,
            vel_pos: -exp_term * scaled_time * speed,
            vel_vel: exp_term * (1.0 - scaled_time),
        }
    } else if damping > 1.0 {
        // real roots z1 = -ζ - α, z2 = -ζ + α = 1/z1, α = sqrt(ζ² - 1)
        // x(s) = x0 (z1 e^(s z2) - z2 e^(s z1))/(z1 - z2) + u0 (e^(s z1) - e^(s z2))/(z1 - z2)
        // u(s) = x0 (e^(s z2) - e^(s z1))/(z1 - z2)       + u0 (z1 e^(s z1) - z2 e^(s z2))/(z1 - z2)
        let alpha = (damping * damping - 1.0).sqrt();
        let inv_diff = -0.5 / alpha;
        let z1 = -alpha - damping;
        let z2 = 1.0 / z1;
        let exp_z1 = (scaled_time * z1).exp();
        let exp_z2 = (scaled_time * z2).exp();
        Transition {
            pos_pos: (exp_z2 * z1 - exp_z1 * z2) * inv_diff,
            pos_vel: (exp_z1 - exp_z2) * inv_diff / speed,
            vel_pos: (exp_z2 - exp_z1) * inv_diff * speed,
            vel_vel: (exp_z1 * z1 - exp_z2 * z2) * inv_diff,
        }
    } else {
        // complex roots -ζ ± iα, α = sqrt(1 - ζ²)
        // x(s) = x0 e^-ζs (cos αs + ζ/α sin αs) + u0 e^-ζs sin(αs)/α
        // u(s) = -x0 e^-ζs sin(αs)/α            + u0 e^-ζs (cos αs - ζ/α sin αs)
        let alpha = (1.0 - damping * damping).sqrt();
        let alpha_time = alpha * scaled_time;
        let exp_term = (-scaled_time * damping).exp();
        let sin_term = exp_term * alpha_time.sin();
        let cos_term = exp_term * alpha_time.cos();
        let sin_inv_alpha = sin_term / alpha;
        let sin_inv_alpha_damp = sin_inv_alpha * damping;
        Transition {
            pos_pos: cos_term + sin_inv_alpha_damp,
            pos_vel: sin_inv_alpha / speed,
            vel_pos: -(sin_inv_alpha_damp * damping + sin_term * alpha) * speed,
            vel_vel: cos_term - sin_inv_alpha_damp,
        }
    }
}
