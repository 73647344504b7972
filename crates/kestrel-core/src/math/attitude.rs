//! Euler-angle attitude kinematics
//!
//! The attitude is the Euler triple Θ = (φ, θ, ψ) of roll, pitch, and
//! yaw, composed in the aerospace Z-Y-X order:
//!
//! R(Θ) = Rz(ψ) · Ry(θ) · Rx(φ)
//!
//! which maps body-frame vectors into the world frame. This module
//! provides the rotation itself, the body-rate to Euler-rate transform
//! T(φ, θ), and gravity resolved in the body frame together with its
//! attitude Jacobian (used by the linearization).

use nalgebra::{Matrix3, Rotation3, Vector3};

/// Body-to-world rotation matrix from the Euler attitude (roll, pitch, yaw)
pub fn rotation_body_to_world(attitude: &Vector3<f64>) -> Matrix3<f64> {
    *Rotation3::from_euler_angles(attitude.x, attitude.y, attitude.z).matrix()
}

/// Body-rate to Euler-rate transformation T(φ, θ)
///
/// Θ̇ = T(φ, θ) · ω with
/// ```text
/// T = [1  sin φ · tan θ   cos φ · tan θ]
///     [0  cos φ          -sin φ        ]
///     [0  sin φ / cos θ   cos φ / cos θ]
/// ```
///
/// Singular at θ = ±90° (gimbal lock): the last row divides by cos θ,
/// so the Euler rates are undefined there and the entries grow without
/// bound as the pitch approaches the vertical. Callers must keep the
/// vehicle away from that attitude; the singularity is inherent to the
/// Euler parametrization and is not handled here.
pub fn euler_rate_matrix(attitude: &Vector3<f64>) -> Matrix3<f64> {
    let (sin_phi, cos_phi) = attitude.x.sin_cos();
    let (sin_theta, cos_theta) = attitude.y.sin_cos();
    let tan_theta = sin_theta / cos_theta;

    Matrix3::new(
        1.0, sin_phi * tan_theta, cos_phi * tan_theta,
        0.0, cos_phi, -sin_phi,
        0.0, sin_phi / cos_theta, cos_phi / cos_theta,
    )
}

/// Gravity resolved in the body frame
///
/// g_b(Θ) = R(Θ)ᵀ · [0, 0, g]ᵀ = g · [-sin θ, cos θ sin φ, cos θ cos φ]ᵀ
///
/// Independent of yaw; the world z-axis points down.
pub fn gravity_body(attitude: &Vector3<f64>, gravity: f64) -> Vector3<f64> {
    let (sin_phi, cos_phi) = attitude.x.sin_cos();
    let (sin_theta, cos_theta) = attitude.y.sin_cos();

    gravity * Vector3::new(-sin_theta, cos_theta * sin_phi, cos_theta * cos_phi)
}

/// Jacobian of [`gravity_body`] with respect to (roll, pitch, yaw)
///
/// ```text
/// ∂g_b/∂Θ = g · [ 0            -cos θ           0]
///               [ cos θ cos φ  -sin θ sin φ     0]
///               [-cos θ sin φ  -sin θ cos φ     0]
/// ```
///
/// The yaw column is zero: rotating about the world vertical does not
/// change how gravity projects onto the body axes.
pub fn gravity_body_jacobian(attitude: &Vector3<f64>, gravity: f64) -> Matrix3<f64> {
    let (sin_phi, cos_phi) = attitude.x.sin_cos();
    let (sin_theta, cos_theta) = attitude.y.sin_cos();

    gravity
        * Matrix3::new(
            0.0, -cos_theta, 0.0,
            cos_theta * cos_phi, -sin_theta * sin_phi, 0.0,
            -cos_theta * sin_phi, -sin_theta * cos_phi, 0.0,
        )
}
