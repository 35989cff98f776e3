use thiserror::Error;

/// structural failures of an assembly call. geometry and topology problems
/// are not errors; those flow through the problem reporter.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("relation member offset {0} is not a valid handle into the member buffer of length {1}")]
    InvalidMemberOffset(usize, usize),
    #[error("relation has {members} members but was given {offsets} member offsets")]
    MemberOffsetMismatch { members: usize, offsets: usize },
    #[error("{0}")]
    InternalError(String),
}
