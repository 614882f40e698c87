#![deny(missing_docs)]
#![doc = "Core traits and record types for resonant extraction analysis: the tracking engine contract, turn-by-turn records, optics normalization and the shared error surface."]

pub mod errors;
pub mod provenance;
pub mod records;
pub mod rng;
pub mod twiss;

pub use errors::{ensure_finite, ErrorInfo, RexError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use records::{
    NormalizedRecord, NormalizedTrajectory, Particles, SearchInterval, TrackRecord, Trajectory,
};
pub use rng::{derive_substream_seed, RngHandle};
pub use twiss::Twiss;

/// Contract for the particle tracking / lattice engine the analysis routines drive.
///
/// Engines are treated as opaque: the routines only build particles, track them
/// for a number of turns and read back the recording returned by [`Line::track`].
pub trait Line {
    /// Short identifier recorded in report provenance.
    fn name(&self) -> &str;

    /// Builds on-axis particles at the given horizontal positions with a common momentum offset.
    fn build_particles(&self, x: &[f64], delta: f64) -> Result<Particles, RexError> {
        let particles = Particles::on_axis(x, delta);
        particles.validate()?;
        Ok(particles)
    }

    /// Tracks the particles for `num_turns` turns.
    ///
    /// With `turn_by_turn` set, every turn is recorded (turn 0 being the initial
    /// coordinates); otherwise only the coordinates after the last turn are kept.
    fn track(
        &self,
        particles: &Particles,
        num_turns: usize,
        turn_by_turn: bool,
    ) -> Result<TrackRecord, RexError>;

    /// Optics at the observation point, used to normalize recorded turns.
    fn twiss(&self) -> Twiss;
}

impl<L: Line + ?Sized> Line for &L {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn build_particles(&self, x: &[f64], delta: f64) -> Result<Particles, RexError> {
        (**self).build_particles(x, delta)
    }

    fn track(
        &self,
        particles: &Particles,
        num_turns: usize,
        turn_by_turn: bool,
    ) -> Result<TrackRecord, RexError> {
        (**self).track(particles, num_turns, turn_by_turn)
    }

    fn twiss(&self) -> Twiss {
        (**self).twiss()
    }
}
