//! Drifting cluster anchors.
//!
//! Clusters move at a constant velocity and wrap around the viewport. The
//! wrap span on each axis is the viewport extended by the cluster's own
//! radius, so a cluster is fully off screen before it reappears on the
//! opposite side, and it keeps any overflow past the edge.

use glam::Vec2;
use rand::Rng;

use crate::canvas::Viewport;
use crate::config::{ClusterConfig, Color, StyleConfig};

/// A moving anchor that owns a neighborhood of particles.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Center in viewport pixels.
    pub position: Vec2,
    /// Pixels per frame. Never changes after spawn.
    pub velocity: Vec2,
    /// Neighborhood radius in pixels.
    pub radius: f32,
    pub color: Color,
}

impl Cluster {
    /// Move one frame and wrap inside `bounds` extended by the radius.
    pub fn advance(&mut self, bounds: Vec2) {
        self.position += self.velocity;
        self.position.x = wrap_axis(self.position.x, bounds.x, self.radius);
        self.position.y = wrap_axis(self.position.y, bounds.y, self.radius);
    }
}

/// Wrap `value` over the span `[-margin, extent + margin]`.
///
/// A value beyond one end reappears past the other end by the same amount.
pub fn wrap_axis(value: f32, extent: f32, margin: f32) -> f32 {
    let low = -margin;
    let high = extent + margin;
    if value < low {
        high - (low - value)
    } else if value > high {
        low + (value - high)
    } else {
        value
    }
}

/// The fixed set of clusters.
#[derive(Clone, Debug, Default)]
pub struct ClusterField {
    clusters: Vec<Cluster>,
}

impl ClusterField {
    /// Scatter `config.count` clusters over the viewport.
    pub fn spawn(
        config: &ClusterConfig,
        style: &StyleConfig,
        viewport: Viewport,
        rng: &mut impl Rng,
    ) -> Self {
        let size = viewport.size();
        let clusters = (0..config.count)
            .map(|i| Cluster {
                position: Vec2::new(rng.gen::<f32>() * size.x, rng.gen::<f32>() * size.y),
                velocity: Vec2::new(
                    rng.gen_range(-config.speed..=config.speed),
                    rng.gen_range(-config.speed..=config.speed),
                ),
                radius: rng.gen_range(config.radius_min..=config.radius_max),
                color: style.cluster_color(i, config.count),
            })
            .collect();
        Self { clusters }
    }

    /// Build a field from explicit clusters.
    pub fn from_clusters(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    /// Advance every cluster one frame.
    pub fn advance(&mut self, viewport: Viewport) {
        let bounds = viewport.size();
        for cluster in &mut self.clusters {
            cluster.advance(bounds);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn as_slice(&self) -> &[Cluster] {
        &self.clusters
    }
}

impl std::ops::Index<usize> for ClusterField {
    type Output = Cluster;

    fn index(&self, index: usize) -> &Cluster {
        &self.clusters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cluster(position: Vec2, velocity: Vec2, radius: f32) -> Cluster {
        Cluster {
            position,
            velocity,
            radius,
            color: Color::rgb8(255, 255, 255),
        }
    }

    #[test]
    fn test_moves_by_velocity_inside_bounds() {
        let mut c = cluster(Vec2::new(100.0, 100.0), Vec2::new(0.5, -0.25), 50.0);
        c.advance(Vec2::new(800.0, 600.0));
        assert_eq!(c.position, Vec2::new(100.5, 99.75));
    }

    #[test]
    fn test_wraps_left_edge_to_right_with_overflow() {
        let mut c = cluster(Vec2::new(-49.5, 300.0), Vec2::new(-1.0, 0.0), 50.0);
        c.advance(Vec2::new(800.0, 600.0));
        // -50.5 overflows -50 by 0.5
        assert!((c.position.x - 849.5).abs() < 1e-4);
        assert_eq!(c.velocity, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_wraps_bottom_edge_to_top() {
        let mut c = cluster(Vec2::new(400.0, 649.0), Vec2::new(0.0, 2.0), 50.0);
        c.advance(Vec2::new(800.0, 600.0));
        assert!((c.position.y - (-49.0)).abs() < 1e-4);
    }

    #[test]
    fn test_no_wrap_exactly_at_margin() {
        assert_eq!(wrap_axis(-50.0, 800.0, 50.0), -50.0);
        assert_eq!(wrap_axis(850.0, 800.0, 50.0), 850.0);
    }

    #[test]
    fn test_spawn_respects_config_ranges() {
        let config = ClusterConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let field = ClusterField::spawn(
            &config,
            &StyleConfig::default(),
            Viewport::new(800, 600),
            &mut rng,
        );

        assert_eq!(field.len(), 7);
        for c in field.iter() {
            assert!((0.0..800.0).contains(&c.position.x));
            assert!((0.0..600.0).contains(&c.position.y));
            assert!(c.velocity.x.abs() <= config.speed);
            assert!(c.velocity.y.abs() <= config.speed);
            assert!((config.radius_min..=config.radius_max).contains(&c.radius));
        }
    }

    #[test]
    fn test_spawn_in_zero_sized_viewport() {
        let mut rng = StdRng::seed_from_u64(0);
        let field = ClusterField::spawn(
            &ClusterConfig::default(),
            &StyleConfig::default(),
            Viewport::new(0, 0),
            &mut rng,
        );
        assert!(field.iter().all(|c| c.position == Vec2::ZERO));
    }
}
