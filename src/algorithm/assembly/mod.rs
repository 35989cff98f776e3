mod assembler;
mod problem_reporter;
mod proto_ring;
mod segment_list;

pub use assembler::Assembler;
pub use problem_reporter::{
    CollectingProblemReporter, LogProblemReporter, Problem, ProblemReporter,
};
pub use proto_ring::ProtoRing;
pub use segment_list::SegmentList;
