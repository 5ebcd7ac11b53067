//! Velocity Verlet integration method

use super::Integrator;
use crate::physics::gravity::AccelerationField;
use crate::physics::math::{Scalar, Vector};

/// Velocity Verlet integrator
///
/// A second-order symplectic integrator that provides excellent energy
/// conservation for Hamiltonian systems like gravitational n-body
/// simulations: the energy error oscillates instead of drifting. Two force
/// evaluations per step, one of which could be reused by the next step.
///
/// The algorithm (kick-drift-kick):
/// 1. v(t+dt/2) = v(t) + 0.5*a(x(t))*dt
/// 2. x(t+dt) = x(t) + v(t+dt/2)*dt
/// 3. a(t+dt) = a(x(t+dt))
/// 4. v(t+dt) = v(t+dt/2) + 0.5*a(t+dt)*dt
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerlet;

impl Integrator for VelocityVerlet {
    fn advance(
        &self,
        positions: &mut [Vector],
        velocities: &mut [Vector],
        masses: &[Scalar],
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> Vec<Vector> {
        let half_dt = 0.5 * dt;
        let accelerations = field.accelerations(positions, masses);

        // Half kick, then full drift with the half-updated velocity
        for ((position, velocity), acceleration) in
            positions.iter_mut().zip(velocities.iter_mut()).zip(&accelerations)
        {
            *velocity += *acceleration * half_dt;
            *position += *velocity * dt;
        }

        // Finish the kick with forces at the new positions
        let next_accelerations = field.accelerations(positions, masses);
        for (velocity, acceleration) in velocities.iter_mut().zip(&next_accelerations) {
            *velocity += *acceleration * half_dt;
        }

        accelerations
    }

    fn name(&self) -> &'static str {
        "velocity_verlet"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["verlet"]
    }

    fn convergence_order(&self) -> usize {
        2
    }
}
