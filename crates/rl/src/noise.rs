//! Gaussian actuator and sensor noise channels.

use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use profile::DynamicsConfig;

/// Noise sources for one environment instance.
///
/// A channel with zero standard deviation stays disabled and never draws
/// from the RNG, so the draw sequence of a seeded episode depends only on
/// the channels the profile actually enables.
#[derive(Debug, Clone)]
pub struct NoiseModel {
    sensor: Option<Normal<f32>>,
    heading_drift: Option<Normal<f32>>,
    turn_jitter: Option<Normal<f32>>,
    speed_scale: Option<Normal<f32>>,
}

fn channel(std_dev: f32) -> Option<Normal<f32>> {
    if std_dev > 0.0 {
        Normal::new(0.0, std_dev).ok()
    } else {
        None
    }
}

impl NoiseModel {
    #[must_use]
    pub fn from_dynamics(dynamics: &DynamicsConfig) -> Self {
        Self {
            sensor: channel(dynamics.sensor_noise_std),
            heading_drift: channel(dynamics.heading_drift_std),
            turn_jitter: channel(dynamics.turn_noise_std),
            speed_scale: channel(dynamics.speed_noise_std),
        }
    }

    /// Add sensor noise to each ray and clamp back into `[0, 1]`.
    /// No-op when the channel is disabled.
    pub fn perturb_rays(&self, rng: &mut StdRng, rays: &mut [f32]) {
        if let Some(normal) = self.sensor {
            for ray in rays {
                *ray = (*ray + normal.sample(rng)).clamp(0.0, 1.0);
            }
        }
    }

    /// Unmodelled heading drift for this tick, in degrees.
    pub fn heading_drift(&self, rng: &mut StdRng) -> Option<f32> {
        self.heading_drift.map(|normal| normal.sample(rng))
    }

    /// Extra heading error on turn commands, in degrees.
    pub fn turn_jitter(&self, rng: &mut StdRng) -> Option<f32> {
        self.turn_jitter.map(|normal| normal.sample(rng))
    }

    /// Multiplicative velocity scale drawn around 1.0.
    pub fn speed_scale(&self, rng: &mut StdRng) -> Option<f32> {
        self.speed_scale.map(|normal| 1.0 + normal.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn noisy_dynamics() -> DynamicsConfig {
        DynamicsConfig {
            sensor_noise_std: 0.05,
            heading_drift_std: 0.3,
            speed_noise_std: 0.1,
            turn_noise_std: 0.8,
            ..DynamicsConfig::default()
        }
    }

    #[test]
    fn default_dynamics_disable_every_channel() {
        let noise = NoiseModel::from_dynamics(&DynamicsConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(noise.heading_drift(&mut rng), None);
        assert_eq!(noise.turn_jitter(&mut rng), None);
        assert_eq!(noise.speed_scale(&mut rng), None);

        let mut rays = vec![0.25, 0.75];
        noise.perturb_rays(&mut rng, &mut rays);
        assert_eq!(rays, vec![0.25, 0.75]);
    }

    #[test]
    fn perturbed_rays_stay_in_unit_range() {
        let noise = NoiseModel::from_dynamics(&DynamicsConfig {
            sensor_noise_std: 0.5,
            ..DynamicsConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(11);
        let mut rays = vec![0.0, 0.02, 0.5, 0.98, 1.0];
        for _ in 0..50 {
            noise.perturb_rays(&mut rng, &mut rays);
            assert!(rays.iter().all(|r| (0.0..=1.0).contains(r)));
        }
    }

    #[test]
    fn same_seed_draws_the_same_sequence() {
        let noise = NoiseModel::from_dynamics(&noisy_dynamics());
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(noise.heading_drift(&mut a), noise.heading_drift(&mut b));
            assert_eq!(noise.speed_scale(&mut a), noise.speed_scale(&mut b));
        }
    }

    #[test]
    fn drift_magnitude_tracks_the_configured_std() {
        let noise = NoiseModel::from_dynamics(&noisy_dynamics());
        let mut rng = StdRng::seed_from_u64(3);
        let mut sum_sq = 0.0_f32;
        let draws = 2000;
        for _ in 0..draws {
            let d = noise.heading_drift(&mut rng).unwrap();
            sum_sq += d * d;
        }
        let std = (sum_sq / draws as f32).sqrt();
        assert!((std - 0.3).abs() < 0.05, "sample std {std} too far from 0.3");
    }
}
