//! Particles bound to clusters.
//!
//! A particle stores its offset from the owning cluster's center, so it is
//! carried along as the cluster drifts. Containment is soft: an offset past
//! the cluster radius is scaled down by a decay factor each frame instead of
//! being clamped, which reads as a springy pull back towards the center.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;
use rand::Rng;

use crate::cluster::{Cluster, ClusterField};
use crate::config::ParticleConfig;

/// A point in a cluster's neighborhood.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Index of the owning cluster.
    pub cluster: usize,
    /// Position relative to the cluster center.
    pub offset: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub base_opacity: f32,
    /// Drives the opacity pulse.
    pub phase: f32,
}

impl Particle {
    /// Advance one frame inside a cluster of the given radius.
    pub fn advance(&mut self, cluster_radius: f32, config: &ParticleConfig) {
        self.offset += self.velocity;
        self.phase += config.pulse_rate;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        if self.offset.length() > cluster_radius {
            self.offset *= config.containment_decay;
        }
    }

    /// Instantaneous opacity, never negative.
    #[inline]
    pub fn opacity(&self, amplitude: f32) -> f32 {
        (self.base_opacity + self.phase.sin() * amplitude).max(0.0)
    }

    /// Absolute position given the owning cluster.
    #[inline]
    pub fn position(&self, cluster: &Cluster) -> Vec2 {
        cluster.position + self.offset
    }
}

/// All particles, stored contiguously per cluster.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    /// `ranges[c]` are the indices owned by cluster `c`.
    ranges: Vec<Range<usize>>,
}

impl ParticleSet {
    /// Spawn `config.per_cluster` particles inside each cluster.
    pub fn spawn(config: &ParticleConfig, clusters: &ClusterField, rng: &mut impl Rng) -> Self {
        let mut particles = Vec::with_capacity(clusters.len() * config.per_cluster);
        let mut ranges = Vec::with_capacity(clusters.len());

        for (index, cluster) in clusters.iter().enumerate() {
            let start = particles.len();
            for _ in 0..config.per_cluster {
                let angle = rng.gen::<f32>() * TAU;
                let distance = rng.gen::<f32>() * cluster.radius;
                particles.push(Particle {
                    cluster: index,
                    offset: Vec2::from_angle(angle) * distance,
                    velocity: Vec2::new(
                        rng.gen_range(-config.speed..=config.speed),
                        rng.gen_range(-config.speed..=config.speed),
                    ),
                    radius: config.radius,
                    base_opacity: rng.gen_range(config.opacity_min..=config.opacity_max),
                    phase: rng.gen::<f32>() * TAU,
                });
            }
            ranges.push(start..particles.len());
        }

        Self { particles, ranges }
    }

    /// Build a set from explicit particles grouped by cluster in ascending
    /// cluster order. `None` if they are not, or if any particle names a
    /// cluster at or past `cluster_count`.
    #[cfg(test)]
    pub(crate) fn from_particles(particles: Vec<Particle>, cluster_count: usize) -> Option<Self> {
        let mut ranges = Vec::with_capacity(cluster_count);
        let mut start = 0;
        for cluster in 0..cluster_count {
            let end = start
                + particles[start..]
                    .iter()
                    .take_while(|p| p.cluster == cluster)
                    .count();
            ranges.push(start..end);
            start = end;
        }
        (start == particles.len()).then_some(Self { particles, ranges })
    }

    /// Advance every particle relative to its owning cluster.
    ///
    /// Particles whose cluster is missing from `clusters` are left in place.
    pub fn advance(&mut self, clusters: &ClusterField, config: &ParticleConfig) {
        for particle in &mut self.particles {
            if let Some(cluster) = clusters.get(particle.cluster) {
                particle.advance(cluster.radius, config);
            }
        }
    }

    /// Indices of the particles owned by `cluster`.
    pub fn cluster_range(&self, cluster: usize) -> Range<usize> {
        self.ranges.get(cluster).cloned().unwrap_or(0..0)
    }

    /// Absolute position of particle `index`.
    #[inline]
    pub fn position(&self, index: usize, clusters: &ClusterField) -> Vec2 {
        let p = &self.particles[index];
        p.position(&clusters[p.cluster])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn cluster_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }
}

impl std::ops::Index<usize> for ParticleSet {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Viewport;
    use crate::config::{ClusterConfig, StyleConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn particle(offset: Vec2, velocity: Vec2) -> Particle {
        Particle {
            cluster: 0,
            offset,
            velocity,
            radius: 1.5,
            base_opacity: 0.5,
            phase: 0.0,
        }
    }

    #[test]
    fn test_offset_inside_radius_is_untouched() {
        let config = ParticleConfig::default();
        let mut p = particle(Vec2::new(10.0, 0.0), Vec2::new(0.1, 0.1));
        p.advance(100.0, &config);
        assert_eq!(p.offset, Vec2::new(10.1, 0.1));
    }

    #[test]
    fn test_escaping_offset_decays_instead_of_clamping() {
        let config = ParticleConfig::default();
        let mut p = particle(Vec2::new(100.0, 0.0), Vec2::new(1.0, 0.0));
        p.advance(100.0, &config);

        let expected = 101.0 * config.containment_decay;
        assert!((p.offset.x - expected).abs() < 1e-4);
        assert!(p.offset.length() < 101.0);
        assert!(p.offset.length() != 100.0);
    }

    #[test]
    fn test_phase_advances_by_pulse_rate() {
        let config = ParticleConfig::default();
        let mut p = particle(Vec2::ZERO, Vec2::ZERO);
        p.advance(100.0, &config);
        assert!((p.phase - config.pulse_rate).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_is_clamped_at_zero() {
        let mut p = particle(Vec2::ZERO, Vec2::ZERO);
        p.base_opacity = 0.1;
        p.phase = -std::f32::consts::FRAC_PI_2;
        assert_eq!(p.opacity(0.5), 0.0);

        p.phase = std::f32::consts::FRAC_PI_2;
        assert!((p.opacity(0.5) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_groups_particles_by_cluster() {
        let mut rng = StdRng::seed_from_u64(11);
        let clusters = ClusterField::spawn(
            &ClusterConfig::default(),
            &StyleConfig::default(),
            Viewport::new(1024, 768),
            &mut rng,
        );
        let config = ParticleConfig::default();
        let set = ParticleSet::spawn(&config, &clusters, &mut rng);

        assert_eq!(set.len(), clusters.len() * config.per_cluster);
        for c in 0..clusters.len() {
            let range = set.cluster_range(c);
            assert_eq!(range.len(), config.per_cluster);
            for i in range {
                assert_eq!(set[i].cluster, c);
                assert!(set[i].offset.length() <= clusters[c].radius);
            }
        }
    }

    #[test]
    fn test_from_particles_rebuilds_ranges() {
        let mut a = particle(Vec2::ZERO, Vec2::ZERO);
        let mut b = a.clone();
        b.cluster = 1;
        a.cluster = 0;
        let set = ParticleSet::from_particles(vec![a.clone(), a, b], 3).unwrap();
        assert_eq!(set.cluster_range(0), 0..2);
        assert_eq!(set.cluster_range(1), 2..3);
        assert_eq!(set.cluster_range(2), 3..3);
        assert_eq!(set.cluster_range(9), 0..0);
    }

    #[test]
    fn test_from_particles_rejects_bad_cluster_layout() {
        let mut a = particle(Vec2::ZERO, Vec2::ZERO);
        let mut b = a.clone();
        a.cluster = 0;
        b.cluster = 3;
        // Cluster 3 does not exist in a one-cluster field.
        assert!(ParticleSet::from_particles(vec![a.clone(), b.clone()], 1).is_none());

        // Out of order.
        b.cluster = 1;
        assert!(ParticleSet::from_particles(vec![b, a], 2).is_none());
    }

    #[test]
    fn test_advance_skips_particles_without_a_cluster() {
        let mut rng = StdRng::seed_from_u64(3);
        let clusters = ClusterField::spawn(
            &ClusterConfig {
                count: 1,
                ..Default::default()
            },
            &StyleConfig::default(),
            Viewport::new(640, 480),
            &mut rng,
        );
        let mut set = ParticleSet::spawn(&ParticleConfig::default(), &clusters, &mut rng);
        let before = set.as_slice().to_vec();

        set.advance(&ClusterField::default(), &ParticleConfig::default());
        assert_eq!(set.as_slice(), before.as_slice());
    }
}
