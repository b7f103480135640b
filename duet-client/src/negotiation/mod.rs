mod candidate_buffer;
mod machine;
mod state;

pub use candidate_buffer::CandidateBuffer;
pub use machine::NegotiationMachine;
pub use state::NegotiationState;
