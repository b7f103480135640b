use duet_core::IceCandidate;

/// Remote candidates that arrived before any remote description was applied.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    pending: Vec<IceCandidate>,
}

impl CandidateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: IceCandidate) {
        self.pending.push(candidate);
    }

    /// Empties the buffer, yielding candidates in arrival order.
    pub fn take(&mut self) -> Vec<IceCandidate> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
