use crate::resources::SharedRng;
use rand::Rng;

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions, velocities, and accelerations
pub type Vector = bevy::math::DVec3;

/// Squared magnitude, spelled the way the force law reads
#[inline]
pub fn magnitude_squared(v: Vector) -> Scalar {
    v.x * v.x + v.y * v.y + v.z * v.z
}

pub fn random_unit_vector(rng: &mut SharedRng) -> Vector {
    let theta = rng.random_range(0.0..=2.0 * std::f64::consts::PI);
    let phi = libm::acos(rng.random_range(-1.0..=1.0));

    Vector::new(
        libm::sin(phi) * libm::cos(theta),
        libm::sin(phi) * libm::sin(theta),
        libm::cos(phi),
    )
}

/// Uniform sample from the axis-aligned cube `[-half_width, half_width)^3`
pub fn random_in_cube(rng: &mut SharedRng, half_width: Scalar) -> Vector {
    if half_width <= 0.0 {
        return Vector::ZERO;
    }

    Vector::new(
        rng.random_range(-half_width..half_width),
        rng.random_range(-half_width..half_width),
        rng.random_range(-half_width..half_width),
    )
}

#[cfg(test)]
mod math_tests {
    use super::*;

    #[test]
    fn test_magnitude_squared() {
        assert_eq!(magnitude_squared(Vector::new(1.0, 2.0, 2.0)), 9.0);
        assert_eq!(magnitude_squared(Vector::ZERO), 0.0);
    }

    #[test]
    fn test_random_unit_vector_properties() {
        let mut rng = SharedRng::from_seed(7);
        for _ in 0..10_000 {
            let v = random_unit_vector(&mut rng);
            assert!(
                (v.length() - 1.0).abs() < 1e-12,
                "Vector length should be 1, but was: {}",
                v.length()
            );
        }
    }

    #[test]
    fn test_random_in_cube_bounds() {
        let mut rng = SharedRng::from_seed(11);
        for _ in 0..10_000 {
            let v = random_in_cube(&mut rng, 4.0);
            assert!(v.x >= -4.0 && v.x < 4.0);
            assert!(v.y >= -4.0 && v.y < 4.0);
            assert!(v.z >= -4.0 && v.z < 4.0);
        }
    }

    #[test]
    fn test_random_in_degenerate_cube_is_origin() {
        let mut rng = SharedRng::from_seed(3);
        assert_eq!(random_in_cube(&mut rng, 0.0), Vector::ZERO);
    }
}
