use anyhow::Result;
use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::GazePoint;

/// Half-width of the on-target window around the screen centre.
const TARGET_HALF_WIDTH: f32 = 0.2;
const FIXATION_JITTER: f32 = 0.08;
const GLANCE_AWAY_PROBABILITY: f64 = 0.15;

/// Blocking producer of gaze frames (camera + pupil detection in production).
/// `Ok(None)` means no pupil was found in this frame.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<GazePoint>>;
}

pub fn is_on_target(x: f32, y: f32) -> bool {
    (x - 0.5).abs() <= TARGET_HALF_WIDTH && (y - 0.5).abs() <= TARGET_HALF_WIDTH
}

/// Development source: fixates near the centre with occasional glances away.
pub struct SyntheticSource {
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<GazePoint>> {
        let (x, y) = if self.rng.gen_bool(GLANCE_AWAY_PROBABILITY) {
            (self.rng.gen_range(0.0..=1.0), self.rng.gen_range(0.0..=1.0))
        } else {
            (
                0.5 + self.rng.gen_range(-FIXATION_JITTER..=FIXATION_JITTER),
                0.5 + self.rng.gen_range(-FIXATION_JITTER..=FIXATION_JITTER),
            )
        };

        Ok(Some(GazePoint {
            x,
            y,
            on_target: is_on_target(x, y),
            captured_at: Utc::now(),
        }))
    }
}
