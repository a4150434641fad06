//! Owned animation state.
//!
//! A [`Scene`] is built in three explicit stages, each consuming the output
//! of the previous one:
//!
//! ```ignore
//! let clusters = ClusterField::spawn(&config.clusters, &config.style, viewport, &mut rng);
//! let particles = ParticleSet::spawn(&config.particles, &clusters, &mut rng);
//! let connections = ConnectionSet::between(&particles);
//! ```
//!
//! [`Scene::build`] does exactly this after validating the config. Every
//! frame is then a single [`Scene::frame`] call.

use rand::Rng;

use crate::canvas::{Canvas, Viewport};
use crate::cluster::ClusterField;
use crate::config::BackdropConfig;
use crate::connection::ConnectionSet;
use crate::error::ConfigError;
use crate::particle::ParticleSet;

#[derive(Clone, Debug, Default)]
pub struct Scene {
    clusters: ClusterField,
    particles: ParticleSet,
    connections: ConnectionSet,
}

impl Scene {
    /// Spawn clusters, then their particles, then the connections between them.
    ///
    /// Rejects configs that fail [`BackdropConfig::validate`].
    pub fn build(
        config: &BackdropConfig,
        viewport: Viewport,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let clusters = ClusterField::spawn(&config.clusters, &config.style, viewport, rng);
        let particles = ParticleSet::spawn(&config.particles, &clusters, rng);
        let connections = ConnectionSet::between(&particles);
        Ok(Self::from_parts(clusters, particles, connections))
    }

    fn from_parts(
        clusters: ClusterField,
        particles: ParticleSet,
        connections: ConnectionSet,
    ) -> Self {
        Self {
            clusters,
            particles,
            connections,
        }
    }

    /// Advance one frame and paint it.
    ///
    /// Order: fill, clusters, particles (advance then draw), connections
    /// (update then draw), vignette. With no canvas the simulation still
    /// advances and every draw call is skipped.
    pub fn frame(
        &mut self,
        viewport: Viewport,
        config: &BackdropConfig,
        mut canvas: Option<&mut dyn Canvas>,
    ) {
        if let Some(canvas) = canvas.as_deref_mut() {
            canvas.fill(config.style.background.with_alpha(1.0));
        }

        self.clusters.advance(viewport);

        self.particles.advance(&self.clusters, &config.particles);
        if let Some(canvas) = canvas.as_deref_mut() {
            self.paint_particles(canvas, config);
        }

        self.connections
            .update(&self.particles, &self.clusters, &config.connections);
        if let Some(canvas) = canvas.as_deref_mut() {
            self.paint_connections(canvas, config);
            if let Some(vignette) = &config.style.vignette {
                canvas.vignette(
                    vignette.inner,
                    vignette.outer,
                    config.style.background.with_alpha(vignette.strength),
                );
            }
        }
    }

    /// Advance one frame without painting.
    pub fn step(&mut self, viewport: Viewport, config: &BackdropConfig) {
        self.frame(viewport, config, None);
    }

    fn paint_particles(&self, canvas: &mut dyn Canvas, config: &BackdropConfig) {
        let cfg = &config.particles;
        for particle in self.particles.iter() {
            let opacity = particle.opacity(cfg.pulse_amplitude);
            if opacity <= 0.0 {
                continue;
            }
            let cluster = &self.clusters[particle.cluster];
            let center = particle.position(cluster);
            canvas.glow(
                center,
                particle.radius * cfg.glow_scale,
                cluster.color.with_alpha(opacity * cfg.glow_strength),
            );
            canvas.disc(center, particle.radius, cluster.color.with_alpha(opacity));
        }
    }

    fn paint_connections(&self, canvas: &mut dyn Canvas, config: &BackdropConfig) {
        let style = &config.style;
        for connection in self.connections.visible() {
            canvas.gradient_line(
                self.particles.position(connection.a, &self.clusters),
                self.particles.position(connection.b, &self.clusters),
                config.connections.line_width,
                style.primary.with_alpha(connection.opacity),
                style.secondary.with_alpha(connection.opacity),
            );
        }
    }

    pub fn clusters(&self) -> &ClusterField {
        &self.clusters
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene(config: &BackdropConfig) -> Scene {
        let mut rng = StdRng::seed_from_u64(42);
        Scene::build(config, Viewport::new(1280, 720), &mut rng).unwrap()
    }

    #[test]
    fn test_build_counts() {
        let config = BackdropConfig::default();
        let scene = scene(&config);

        let n = config.particles.per_cluster;
        assert_eq!(scene.clusters().len(), 7);
        assert_eq!(scene.particles().len(), 7 * n);
        assert_eq!(scene.connections().len(), 7 * n * (n - 1) / 2);
    }

    #[test]
    fn test_frame_paint_order() {
        let config = BackdropConfig::default();
        let mut scene = scene(&config);
        let mut canvas = RecordingCanvas::new(1280, 720);

        scene.frame(Viewport::new(1280, 720), &config, Some(&mut canvas));
        let commands = canvas.commands();

        assert!(matches!(commands.first(), Some(DrawCommand::Fill(_))));
        assert!(matches!(commands.last(), Some(DrawCommand::Vignette { .. })));

        let last_particle = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Disc { .. } | DrawCommand::Glow { .. }))
            .unwrap();
        let first_line = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap();
        assert!(last_particle < first_line);
    }

    #[test]
    fn test_each_visible_particle_gets_glow_and_core() {
        let mut config = BackdropConfig::default();
        config.particles.opacity_min = 0.5;
        config.particles.pulse_amplitude = 0.2;
        let mut scene = scene(&config);
        let mut canvas = RecordingCanvas::new(1280, 720);

        scene.frame(Viewport::new(1280, 720), &config, Some(&mut canvas));

        let total = scene.particles().len();
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Glow { .. })), total);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Disc { .. })), total);
    }

    #[test]
    fn test_no_vignette_when_disabled() {
        let mut config = BackdropConfig::default();
        config.style.vignette = None;
        let mut scene = scene(&config);
        let mut canvas = RecordingCanvas::new(1280, 720);

        scene.frame(Viewport::new(1280, 720), &config, Some(&mut canvas));
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Vignette { .. })), 0);
    }

    #[test]
    fn test_step_without_canvas_still_moves() {
        let config = BackdropConfig::default();
        let mut scene = scene(&config);
        let before: Vec<_> = scene.clusters().iter().map(|c| c.position).collect();

        scene.step(Viewport::new(1280, 720), &config);

        let moved = scene
            .clusters()
            .iter()
            .zip(&before)
            .any(|(c, p)| c.position != *p);
        assert!(moved);
    }

    #[test]
    fn test_build_rejects_inverted_opacity_range() {
        let mut config = BackdropConfig::default();
        config.particles.opacity_min = 0.9;
        config.particles.opacity_max = 0.1;
        let mut rng = StdRng::seed_from_u64(42);

        let result = Scene::build(&config, Viewport::new(1280, 720), &mut rng);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
