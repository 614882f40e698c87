use rand::Rng;
use rex_core::errors::{ErrorInfo, RexError};
use rex_core::rng::{derive_substream_seed, RngHandle};
use rex_core::{Line, NormalizedRecord, TrackRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn default_count() -> usize {
    24
}

fn default_x_max() -> f64 {
    0.015
}

fn default_num_turns() -> usize {
    300
}

/// Background beam tracked for the phase-space figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSpec {
    /// Number of particles.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Smallest starting position in metres.
    #[serde(default)]
    pub x_min: f64,
    /// Largest starting position in metres.
    #[serde(default = "default_x_max")]
    pub x_max: f64,
    /// Full width of the uniform jitter added to each starting position.
    #[serde(default)]
    pub jitter: f64,
    /// Seed of the jitter stream.
    #[serde(default)]
    pub seed: u64,
    /// Turns tracked per particle.
    #[serde(default = "default_num_turns")]
    pub num_turns: usize,
}

impl Default for BeamSpec {
    fn default() -> Self {
        Self {
            count: default_count(),
            x_min: 0.0,
            x_max: default_x_max(),
            jitter: 0.0,
            seed: 0,
            num_turns: default_num_turns(),
        }
    }
}

impl BeamSpec {
    /// Evenly spaced starting positions, optionally jittered from the seeded stream.
    pub fn positions(&self) -> Result<Vec<f64>, RexError> {
        let finite = [self.x_min, self.x_max, self.jitter]
            .iter()
            .all(|value| value.is_finite());
        if self.count == 0 || !finite || self.x_min > self.x_max || self.jitter < 0.0 {
            return Err(RexError::InvalidInput(
                ErrorInfo::new("invalid-beam", "beam needs particles and an ordered range")
                    .with_context("count", self.count)
                    .with_context("x_min", self.x_min)
                    .with_context("x_max", self.x_max)
                    .with_context("jitter", self.jitter),
            ));
        }
        let step = if self.count > 1 {
            (self.x_max - self.x_min) / (self.count - 1) as f64
        } else {
            0.0
        };
        let mut rng = RngHandle::from_seed(derive_substream_seed(self.seed, 1));
        Ok((0..self.count)
            .map(|idx| {
                let base = self.x_min + step * idx as f64;
                if self.jitter > 0.0 {
                    base + (rng.gen::<f64>() - 0.5) * self.jitter
                } else {
                    base
                }
            })
            .collect())
    }
}

/// Tracks the background beam and normalizes it with the engine optics.
pub fn track_beam(
    line: &dyn Line,
    spec: &BeamSpec,
    delta: f64,
) -> Result<(TrackRecord, NormalizedRecord), RexError> {
    let positions = spec.positions()?;
    let particles = line.build_particles(&positions, delta)?;
    let record = line.track(&particles, spec.num_turns, true)?;
    let normalized = line.twiss().normalize_record(&record)?;
    debug!(
        particles = positions.len(),
        turns = spec.num_turns,
        "background beam tracked"
    );
    Ok((record, normalized))
}
