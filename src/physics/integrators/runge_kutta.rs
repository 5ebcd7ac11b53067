//! Runge-Kutta integration methods

use super::Integrator;
use crate::physics::gravity::AccelerationField;
use crate::physics::math::{Scalar, Vector};

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// A classic multi-stage integrator that provides fourth-order accuracy
/// by combining four intermediate evaluations of the derivative. The state
/// is the coupled (position, velocity) system of every body, with
/// `dPos = velocity` and `dVel = acceleration(positions)`.
///
/// The RK4 algorithm:
/// 1. k1 = f(t, y)
/// 2. k2 = f(t + dt/2, y + k1*dt/2)
/// 3. k3 = f(t + dt/2, y + k2*dt/2)
/// 4. k4 = f(t + dt, y + k3*dt)
/// 5. y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
///
/// Every stage state is built from the original state, never from the
/// previous stage state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

/// Derivative of the whole system at one stage
struct Derivatives {
    d_pos: Vec<Vector>,
    d_vel: Vec<Vector>,
}

impl Derivatives {
    fn evaluate(
        positions: &[Vector],
        velocities: &[Vector],
        masses: &[Scalar],
        field: &dyn AccelerationField,
    ) -> Self {
        Self {
            d_pos: velocities.to_vec(),
            d_vel: field.accelerations(positions, masses),
        }
    }
}

/// `base + derivative * h`, element-wise
fn offset(base: &[Vector], derivative: &[Vector], h: Scalar) -> Vec<Vector> {
    base.iter()
        .zip(derivative)
        .map(|(&value, &rate)| value + rate * h)
        .collect()
}

impl Integrator for RungeKuttaFourthOrder {
    fn advance(
        &self,
        positions: &mut [Vector],
        velocities: &mut [Vector],
        masses: &[Scalar],
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> Vec<Vector> {
        let half_dt = dt * 0.5;

        // Stage 1: k1 at current state
        let k1 = Derivatives::evaluate(positions, velocities, masses, field);

        // Stage 2: k2 at midpoint using k1
        let k2 = Derivatives::evaluate(
            &offset(positions, &k1.d_pos, half_dt),
            &offset(velocities, &k1.d_vel, half_dt),
            masses,
            field,
        );

        // Stage 3: k3 at midpoint using k2
        let k3 = Derivatives::evaluate(
            &offset(positions, &k2.d_pos, half_dt),
            &offset(velocities, &k2.d_vel, half_dt),
            masses,
            field,
        );

        // Stage 4: k4 at endpoint using k3
        let k4 = Derivatives::evaluate(
            &offset(positions, &k3.d_pos, dt),
            &offset(velocities, &k3.d_vel, dt),
            masses,
            field,
        );

        // Combine stages using RK4 weights: y_n+1 = y_n + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
        let weight = dt / 6.0;
        for i in 0..positions.len() {
            positions[i] +=
                (k1.d_pos[i] + k2.d_pos[i] * 2.0 + k3.d_pos[i] * 2.0 + k4.d_pos[i]) * weight;
            velocities[i] +=
                (k1.d_vel[i] + k2.d_vel[i] * 2.0 + k3.d_vel[i] * 2.0 + k4.d_vel[i]) * weight;
        }

        k1.d_vel
    }

    fn name(&self) -> &'static str {
        "runge_kutta_fourth_order"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["rk4"]
    }

    fn convergence_order(&self) -> usize {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uniform field, the same acceleration everywhere
    struct ConstantField(Vector);

    impl AccelerationField for ConstantField {
        fn accelerations(&self, positions: &[Vector], _: &[Scalar]) -> Vec<Vector> {
            vec![self.0; positions.len()]
        }
    }

    #[test]
    fn test_rk4_constant_acceleration_is_exact() {
        let rk4 = RungeKuttaFourthOrder;
        let mut positions = [Vector::new(1.0, 0.0, 0.0)];
        let mut velocities = [Vector::new(0.0, 1.0, 0.0)];
        let field = ConstantField(Vector::new(0.0, 0.0, -9.81));
        let dt = 0.01;

        let forces = rk4.advance(&mut positions, &mut velocities, &[1.0], &field, dt);

        // For constant acceleration RK4 reproduces the exact kinematics
        assert!((velocities[0] - Vector::new(0.0, 1.0, -0.0981)).length() < 1e-12);
        let expected_pos = Vector::new(1.0, 0.01, -0.0004905);
        assert!(
            (positions[0] - expected_pos).length() < 1e-10,
            "Position should match RK4 result, got {:?}",
            positions[0]
        );
        assert_eq!(forces, vec![Vector::new(0.0, 0.0, -9.81)]);
    }

    /// Position-dependent field a = -x, so stages actually differ
    struct Spring;

    impl AccelerationField for Spring {
        fn accelerations(&self, positions: &[Vector], _: &[Scalar]) -> Vec<Vector> {
            positions.iter().map(|&p| -p).collect()
        }
    }

    #[test]
    fn test_rk4_single_step_matches_taylor_series() {
        let rk4 = RungeKuttaFourthOrder;
        let mut positions = [Vector::new(1.0, 0.0, 0.0)];
        let mut velocities = [Vector::ZERO];
        let dt: Scalar = 0.1;

        rk4.advance(&mut positions, &mut velocities, &[1.0], &Spring, dt);

        // Local error of RK4 is O(dt^5)
        assert!((positions[0].x - dt.cos()).abs() < 1e-6);
        assert!((velocities[0].x + dt.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_properties() {
        let rk4 = RungeKuttaFourthOrder;
        assert_eq!(rk4.name(), "runge_kutta_fourth_order");
        assert_eq!(rk4.aliases(), vec!["rk4"]);
        assert_eq!(rk4.convergence_order(), 4);
    }
}
