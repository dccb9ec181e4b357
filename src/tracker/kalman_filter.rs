//! Constant-velocity Kalman filter over a 2D position.
//!
//! State vector: `[x, y, vx, vy]`, one frame per time step.
//! Measurement:  `[x, y]`.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};
use tracing::warn;

use crate::tracker::rect::Point;

/// Noise magnitudes for the motion estimator. Each one seeds a diagonal
/// covariance (`value * I`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    pub process_noise: f64,
    pub measurement_noise: f64,
    pub initial_uncertainty: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            process_noise: 1e-4,
            measurement_noise: 1e-4,
            initial_uncertainty: 0.1,
        }
    }
}

/// Position/velocity state and its covariance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub mean: Vector4<f64>,
    pub covariance: Matrix4<f64>,
}

impl TargetState {
    pub fn position(&self) -> Point {
        Point::new(self.mean[0] as f32, self.mean[1] as f32)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.mean[2], self.mean[3])
    }
}

#[derive(Debug, Clone)]
pub struct MotionEstimator {
    motion_mat: Matrix4<f64>,
    update_mat: Matrix2x4<f64>,
    process_cov: Matrix4<f64>,
    measurement_cov: Matrix2<f64>,
    state: TargetState,
}

impl MotionEstimator {
    pub fn new(config: MotionConfig) -> Self {
        #[rustfmt::skip]
        let motion_mat = Matrix4::new(
            1.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 1.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        #[rustfmt::skip]
        let update_mat = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );

        Self {
            motion_mat,
            update_mat,
            process_cov: Matrix4::identity() * config.process_noise,
            measurement_cov: Matrix2::identity() * config.measurement_noise,
            state: TargetState {
                mean: Vector4::zeros(),
                covariance: Matrix4::identity() * config.initial_uncertainty,
            },
        }
    }

    /// Reinitialise at `position` with zero velocity, discarding history.
    pub fn reset(&mut self, position: Point, config: MotionConfig) {
        *self = Self::new(config);
        self.state.mean = Vector4::new(position.x as f64, position.y as f64, 0.0, 0.0);
    }

    /// Advance one frame and return the prior position.
    pub fn predict(&mut self) -> Point {
        let f = &self.motion_mat;
        self.state.mean = f * self.state.mean;
        self.state.covariance = f * self.state.covariance * f.transpose() + self.process_cov;
        self.state.position()
    }

    /// Blend an accepted measurement into the predicted state and return the
    /// posterior position.
    pub fn correct(&mut self, measurement: Point) -> Point {
        let h = &self.update_mat;
        let z = Vector2::new(measurement.x as f64, measurement.y as f64);

        let innovation = z - h * self.state.mean;
        let innovation_cov = h * self.state.covariance * h.transpose() + self.measurement_cov;

        // Only reachable with zero noise after the covariance has fully collapsed.
        let Some(s_inv) = innovation_cov.try_inverse() else {
            warn!(
                x = measurement.x,
                y = measurement.y,
                "singular innovation covariance, keeping prediction"
            );
            return self.state.position();
        };

        let kalman_gain = self.state.covariance * h.transpose() * s_inv;
        self.state.mean += kalman_gain * innovation;
        self.state.covariance = (Matrix4::identity() - kalman_gain * h) * self.state.covariance;
        self.state.position()
    }

    pub fn state(&self) -> &TargetState {
        &self.state
    }
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
