use crate::models::Sample;

/// Append-only, chronologically ordered sample store for the current session.
/// No validation happens here; range checks run at classification time.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.clone()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Empty the buffer, handing back what it held.
    pub fn take(&mut self) -> Vec<Sample> {
        std::mem::take(&mut self.samples)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
