//! Proximity edges between particles of the same cluster.
//!
//! Edge membership is fixed when the set is built: every unordered pair of
//! particles sharing a cluster. Pairs spanning two clusters are never
//! candidates, which keeps clusters visually separate even when they drift
//! through each other. Only the opacity changes from frame to frame.

use crate::cluster::ClusterField;
use crate::config::ConnectionConfig;
use crate::particle::ParticleSet;

/// Opacity of an edge of length `distance`.
///
/// `max_opacity` at distance 0, falling linearly to 0 at `threshold`, and 0
/// beyond it.
#[inline]
pub fn connection_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if distance >= threshold {
        0.0
    } else {
        max_opacity * (1.0 - distance / threshold)
    }
}

/// An undirected edge. `a < b` always.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectionSet {
    connections: Vec<Connection>,
}

impl ConnectionSet {
    /// Every same-cluster pair in `particles`.
    pub fn between(particles: &ParticleSet) -> Self {
        let pair_count: usize = (0..particles.cluster_count())
            .map(|c| {
                let n = particles.cluster_range(c).len();
                n * n.saturating_sub(1) / 2
            })
            .sum();

        let mut connections = Vec::with_capacity(pair_count);
        for c in 0..particles.cluster_count() {
            let range = particles.cluster_range(c);
            for a in range.clone() {
                for b in (a + 1)..range.end {
                    connections.push(Connection { a, b, opacity: 0.0 });
                }
            }
        }
        Self { connections }
    }

    /// Recompute every opacity from live absolute positions.
    pub fn update(
        &mut self,
        particles: &ParticleSet,
        clusters: &ClusterField,
        config: &ConnectionConfig,
    ) {
        for connection in &mut self.connections {
            let pa = particles.position(connection.a, clusters);
            let pb = particles.position(connection.b, clusters);
            connection.opacity =
                connection_opacity(pa.distance(pb), config.threshold, config.max_opacity);
        }
    }

    /// Current opacity of the edge joining `a` and `b`, in either order.
    ///
    /// `None` when the two particles are not connected.
    pub fn opacity_between(&self, a: usize, b: usize) -> Option<f32> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.connections
            .binary_search_by(|c| (c.a, c.b).cmp(&(lo, hi)))
            .ok()
            .map(|i| self.connections[i].opacity)
    }

    /// Edges with a non-zero opacity this frame.
    pub fn visible(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(|c| c.opacity > 0.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.connections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;
    use crate::config::Color;
    use crate::particle::Particle;
    use glam::Vec2;

    fn field() -> ClusterField {
        let cluster = |x: f32| Cluster {
            position: Vec2::new(x, 100.0),
            velocity: Vec2::ZERO,
            radius: 100.0,
            color: Color::rgb8(0, 0, 0),
        };
        ClusterField::from_clusters(vec![cluster(100.0), cluster(110.0)])
    }

    fn particle(cluster: usize, x: f32) -> Particle {
        Particle {
            cluster,
            offset: Vec2::new(x, 0.0),
            velocity: Vec2::ZERO,
            radius: 1.5,
            base_opacity: 0.5,
            phase: 0.0,
        }
    }

    #[test]
    fn test_opacity_boundaries() {
        assert_eq!(connection_opacity(0.0, 140.0, 0.25), 0.25);
        assert_eq!(connection_opacity(140.0, 140.0, 0.25), 0.0);
        assert_eq!(connection_opacity(500.0, 140.0, 0.25), 0.0);
        let near = connection_opacity(139.99, 140.0, 0.25);
        assert!(near > 0.0 && near < 0.25);
        assert!((connection_opacity(70.0, 140.0, 0.25) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_pairs_stay_inside_clusters() {
        let particles = ParticleSet::from_particles(
            vec![
                particle(0, 0.0),
                particle(0, 1.0),
                particle(0, 2.0),
                particle(1, 0.0),
                particle(1, 1.0),
            ],
            2,
        )
        .unwrap();
        let set = ConnectionSet::between(&particles);

        // 3 choose 2 + 2 choose 2
        assert_eq!(set.len(), 4);
        for c in set.iter() {
            assert!(c.a < c.b);
            assert_eq!(particles[c.a].cluster, particles[c.b].cluster);
        }
        assert_eq!(set.opacity_between(0, 3), None);
        assert_eq!(set.opacity_between(2, 4), None);
    }

    #[test]
    fn test_cross_cluster_neighbors_get_no_edge() {
        // Particles 1 and 2 sit on top of each other but belong to different clusters.
        let clusters = field();
        let particles =
            ParticleSet::from_particles(vec![particle(0, 0.0), particle(0, 10.0), particle(1, 0.0)], 2)
                .unwrap();
        let mut set = ConnectionSet::between(&particles);
        set.update(&particles, &clusters, &ConnectionConfig::default());

        assert_eq!(set.len(), 1);
        assert_eq!(set.opacity_between(1, 2), None);
        let expected = connection_opacity(10.0, 140.0, 0.25);
        assert_eq!(set.opacity_between(0, 1), Some(expected));
        assert_eq!(set.opacity_between(1, 0), Some(expected));
    }

    #[test]
    fn test_far_pairs_are_not_visible() {
        let clusters = field();
        let particles =
            ParticleSet::from_particles(vec![particle(0, -80.0), particle(0, 80.0), particle(0, 0.0)], 2)
                .unwrap();
        let mut set = ConnectionSet::between(&particles);
        set.update(&particles, &clusters, &ConnectionConfig::default());

        assert_eq!(set.opacity_between(0, 1), Some(0.0));
        assert_eq!(set.visible().count(), 2);
    }
}
