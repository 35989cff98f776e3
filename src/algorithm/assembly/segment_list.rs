use super::ProblemReporter;
use crate::model::geometry::{NodeRefSegment, SegmentRole};
use crate::model::osm::{Relation, Way, WayBuffer};
use crate::model::AssemblyError;
use itertools::Itertools;

/// the directed segments of one candidate area, in extraction order until
/// [`SegmentList::sort`] puts them into sweep order (lexicographic by
/// (first, second) endpoint location)
#[derive(Debug, Default)]
pub struct SegmentList<'a> {
    segments: Vec<NodeRefSegment<'a>>,
    debug: bool,
}

impl<'a> SegmentList<'a> {
    pub fn new() -> SegmentList<'a> {
        SegmentList::default()
    }

    pub fn enable_debug_output(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeRefSegment<'a>] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeRefSegment<'a>> {
        self.segments.iter()
    }

    /// flattens a way into canonical segments with the given role, dropping
    /// zero-length segments (degenerate but not an error). a way whose end
    /// nodes have different ids but the same location gets a duplicate-node
    /// advisory; if the locations differ as well, the closure check will
    /// catch the open ring later.
    pub fn extract_segments_from_way(
        &mut self,
        way: &'a Way,
        role: SegmentRole,
        mut reporter: Option<&mut dyn ProblemReporter>,
    ) {
        if let (Some(first), Some(last)) = (way.nodes.first(), way.nodes.last()) {
            if first.id != last.id && first.location == last.location {
                if let Some(r) = reporter.as_deref_mut() {
                    r.report_duplicate_node(first.id, last.id, first.location);
                }
            }
        }
        for (a, b) in way.nodes.iter().tuple_windows() {
            if a.location == b.location {
                continue;
            }
            self.segments.push(NodeRefSegment::new(*a, *b, role, way));
        }
    }

    /// flattens every resolved member way of a relation. member offsets and
    /// the relation's member list are parallel sequences; they are zipped so
    /// that absent members (offset 0) advance both cursors.
    pub fn extract_segments_from_ways(
        &mut self,
        relation: &Relation,
        member_offsets: &[usize],
        in_buffer: &'a WayBuffer,
        mut reporter: Option<&mut dyn ProblemReporter>,
    ) -> Result<(), AssemblyError> {
        if relation.members.len() != member_offsets.len() {
            return Err(AssemblyError::MemberOffsetMismatch {
                members: relation.members.len(),
                offsets: member_offsets.len(),
            });
        }
        for (member, &offset) in relation.members.iter().zip(member_offsets) {
            if offset == WayBuffer::ABSENT_MEMBER {
                continue;
            }
            let way = in_buffer.get(offset)?;
            let role = SegmentRole::from_member_role(&member.role);
            self.extract_segments_from_way(
                way,
                role,
                match &mut reporter {
                    Some(r) => Some(&mut **r),
                    None => None,
                },
            );
        }
        Ok(())
    }

    /// sorts all segments from bottom-left to top-right
    pub fn sort(&mut self) {
        self.segments.sort();
    }

    /// erases duplicate segments in pairs. two identical canonical segments
    /// describe the same edge twice and cancel each other out, as happens
    /// when two rings share an edge.
    pub fn erase_duplicate_segments(&mut self) {
        loop {
            let duplicate = self.segments.windows(2).position(|w| w[0] == w[1]);
            match duplicate {
                Some(i) => {
                    if self.debug {
                        log::debug!("  erase duplicate segment: {}", self.segments[i]);
                    }
                    self.segments.drain(i..i + 2);
                }
                None => break,
            }
        }
    }
}
