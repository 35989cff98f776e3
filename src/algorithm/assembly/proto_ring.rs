use crate::model::geometry::{Location, NodeRef, NodeRefSegment};
use crate::model::osm::Way;
use std::fmt::Display;
use std::ops::Range;

/// a chain of segments under construction. segments are kept in chain order:
/// each segment's `second` endpoint shares its location with the next
/// segment's `first`. the chain is a ring once the first endpoint of the
/// first segment meets the last endpoint of the last segment.
///
/// rings are identified by their index in the assembly's ring list; an outer
/// ring records the indices of the inner rings nested inside it.
#[derive(Debug)]
pub struct ProtoRing<'a> {
    segments: Vec<NodeRefSegment<'a>>,
    outer: bool,
    inner_rings: Vec<usize>,
}

impl<'a> ProtoRing<'a> {
    pub fn new(segment: NodeRefSegment<'a>) -> ProtoRing<'a> {
        ProtoRing {
            segments: vec![segment],
            outer: true,
            inner_rings: Vec::new(),
        }
    }

    fn from_segments(segments: Vec<NodeRefSegment<'a>>) -> ProtoRing<'a> {
        debug_assert!(!segments.is_empty());
        ProtoRing {
            segments,
            outer: true,
            inner_rings: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[NodeRefSegment<'a>] {
        &self.segments
    }

    pub fn first_segment(&self) -> NodeRefSegment<'a> {
        self.segments[0]
    }

    pub fn last_segment(&self) -> NodeRefSegment<'a> {
        self.segments[self.segments.len() - 1]
    }

    pub fn closed(&self) -> bool {
        self.first_segment().first().location == self.last_segment().second().location
    }

    pub fn outer(&self) -> bool {
        self.outer
    }

    pub fn set_inner(&mut self) {
        self.outer = false;
    }

    pub fn add_inner_ring(&mut self, ring_index: usize) {
        self.inner_rings.push(ring_index);
    }

    pub fn inner_rings(&self) -> &[usize] {
        &self.inner_rings
    }

    pub fn add_segment_end(&mut self, segment: NodeRefSegment<'a>) {
        self.segments.push(segment);
    }

    pub fn add_segment_start(&mut self, segment: NodeRefSegment<'a>) {
        self.segments.insert(0, segment);
    }

    /// splits the ring at an index range: the removed slice becomes a new
    /// ring and this ring keeps the rest
    pub fn split_range(&mut self, range: Range<usize>) -> ProtoRing<'a> {
        let removed: Vec<NodeRefSegment<'a>> = self.segments.drain(range).collect();
        ProtoRing::from_segments(removed)
    }

    /// appends another ring whose first endpoint continues this ring's end
    pub fn merge_ring(&mut self, other: ProtoRing<'a>) {
        self.segments.extend(other.segments);
    }

    /// appends another ring that runs the opposite way: its segments are
    /// taken in reverse order with their endpoints swapped
    pub fn merge_ring_reverse(&mut self, other: ProtoRing<'a>) {
        self.segments
            .extend(other.segments.into_iter().rev().map(|mut s| {
                s.swap_locations();
                s
            }));
    }

    /// splices another ring in front of this one; its last endpoint
    /// continues into this ring's start
    pub fn prepend_ring(&mut self, other: ProtoRing<'a>) {
        self.segments.splice(0..0, other.segments);
    }

    /// reverses the chain direction in place
    pub fn reverse(&mut self) {
        for segment in &mut self.segments {
            segment.swap_locations();
        }
        self.segments.reverse();
    }

    /// twice the signed polygon area (shoelace sum over the chain).
    /// non-positive means clockwise under this coordinate convention.
    pub fn sum(&self) -> i64 {
        self.segments
            .iter()
            .map(|s| {
                i64::from(s.first().location.x) * i64::from(s.second().location.y)
                    - i64::from(s.second().location.x) * i64::from(s.first().location.y)
            })
            .sum()
    }

    pub fn is_cw(&self) -> bool {
        self.sum() <= 0
    }

    /// absolute polygon area / 2, used to order outer rings for nesting
    pub fn area(&self) -> i64 {
        self.sum().abs() / 2
    }

    /// the lexicographically smallest endpoint of any segment in the ring
    pub fn min_node(&self) -> NodeRef {
        let mut min = self.segments[0].first();
        for segment in &self.segments {
            for nr in [segment.first(), segment.second()] {
                if nr.location < min.location {
                    min = nr;
                }
            }
        }
        min
    }

    /// whether the ring carries this segment, in either orientation
    pub fn contains(&self, segment: &NodeRefSegment) -> bool {
        self.segments.iter().any(|s| {
            (s.first().location == segment.first().location
                && s.second().location == segment.second().location)
                || (s.first().location == segment.second().location
                    && s.second().location == segment.first().location)
        })
    }

    /// whether this ring lies inside `outer`: the first vertex that is not
    /// on `outer`'s boundary decides, by exact ray casting over `outer`'s
    /// edges. rings that only touch `outer` at shared boundary points are
    /// not inside it.
    pub fn is_in(&self, outer: &ProtoRing) -> bool {
        for segment in &self.segments {
            let vertex = segment.first().location;
            if outer.on_boundary(vertex) {
                continue;
            }
            return outer.encloses_point(vertex);
        }
        false
    }

    /// the distinct source ways of this ring's segments, ordered by id
    pub fn ways(&self) -> Vec<&'a Way> {
        let mut ways: Vec<&'a Way> = self.segments.iter().map(|s| s.way()).collect();
        ways.sort_by_key(|w| w.id);
        ways.dedup_by_key(|w| w.id);
        ways
    }

    /// the ring's node sequence: the first segment's first endpoint followed
    /// by every segment's second endpoint
    pub fn nodes(&self) -> Vec<NodeRef> {
        let mut nodes = Vec::with_capacity(self.segments.len() + 1);
        nodes.push(self.first_segment().first());
        for segment in &self.segments {
            nodes.push(segment.second());
        }
        nodes
    }

    fn on_boundary(&self, p: Location) -> bool {
        self.segments
            .iter()
            .any(|s| point_on_segment(p, s.first().location, s.second().location))
    }

    /// exact even-odd point-in-polygon test over the ring's edges
    fn encloses_point(&self, p: Location) -> bool {
        let mut inside = false;
        for segment in &self.segments {
            let a = segment.first().location;
            let b = segment.second().location;
            if (a.y > p.y) != (b.y > p.y) {
                // p.x < crossing x of the edge at height p.y, cross-multiplied
                // by the edge's dy to stay in integers
                let dy = i64::from(b.y) - i64::from(a.y);
                let lhs = (i64::from(p.x) - i64::from(a.x)) * dy;
                let rhs = (i64::from(b.x) - i64::from(a.x)) * (i64::from(p.y) - i64::from(a.y));
                if (dy > 0 && lhs < rhs) || (dy < 0 && lhs > rhs) {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

fn point_on_segment(p: Location, a: Location, b: Location) -> bool {
    let cross = (i64::from(b.x) - i64::from(a.x)) * (i64::from(p.y) - i64::from(a.y))
        - (i64::from(b.y) - i64::from(a.y)) * (i64::from(p.x) - i64::from(a.x));
    cross == 0
        && a.x.min(b.x) <= p.x
        && p.x <= a.x.max(b.x)
        && a.y.min(b.y) <= p.y
        && p.y <= a.y.max(b.y)
}

impl Display for ProtoRing<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{segment}")?;
        }
        write!(f, "]")
    }
}
