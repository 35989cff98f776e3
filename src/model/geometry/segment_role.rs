use std::fmt::Display;

/// the role a segment inherited from its source way's relation membership
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// the provenance of the segment is not known
    #[default]
    Unknown,
    Outer,
    Inner,
}

impl SegmentRole {
    /// maps a relation member role string: "inner" is inner, every other
    /// role (including the empty string) counts as outer
    pub fn from_member_role(role: &str) -> SegmentRole {
        if role == "inner" {
            SegmentRole::Inner
        } else {
            SegmentRole::Outer
        }
    }

    pub fn is_outer(&self) -> bool {
        matches!(self, SegmentRole::Outer)
    }

    pub fn is_inner(&self) -> bool {
        matches!(self, SegmentRole::Inner)
    }
}

impl Display for SegmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentRole::Unknown => write!(f, "unknown"),
            SegmentRole::Outer => write!(f, "outer"),
            SegmentRole::Inner => write!(f, "inner"),
        }
    }
}
