use super::{ProblemReporter, ProtoRing, SegmentList};
use crate::model::area::{AreaBuffer, AreaBuilder, AreaId, InnerRing, OuterRing};
use crate::model::geometry::{
    calculate_intersection, outside_x_range, y_range_overlap, NodeRef, NodeRefSegment, SegmentRole,
};
use crate::model::osm::{ObjectId, Relation, TagList, Way, WayBuffer};
use crate::model::AssemblyError;
use std::collections::{BTreeMap, HashSet};

/// keys that describe the mapping process rather than the mapped area; they
/// never participate in tag selection
const AREA_TAG_EXCLUSIONS: [&str; 6] = [
    "type",
    "created_by",
    "source",
    "note",
    "test:id",
    "test:section",
];

/// the same set without "type", used when comparing an inner way's own tags
/// against the assembled area's tags
const ORPHAN_TAG_EXCLUSIONS: [&str; 5] = ["created_by", "source", "note", "test:id", "test:section"];

/// assembles area objects from closed ways or from multipolygon relations
/// and their member ways.
///
/// each call runs the full pipeline: segment extraction, canonical sort and
/// duplicate-pair erasure, the crossing sweep, ring assembly with sub-ring
/// splitting and chain merging, the closure check, inner/outer
/// classification, nesting, orientation normalization, tag selection and
/// emission. the attribute-only area shell is committed to the output buffer
/// before validation, so a rejected area remains visible as a shell without
/// rings.
pub struct Assembler<'r> {
    problem_reporter: Option<&'r mut dyn ProblemReporter>,
    debug: bool,
}

impl Default for Assembler<'_> {
    fn default() -> Self {
        Assembler::new()
    }
}

impl<'r> Assembler<'r> {
    pub fn new() -> Assembler<'r> {
        Assembler {
            problem_reporter: None,
            debug: false,
        }
    }

    pub fn with_problem_reporter(problem_reporter: &'r mut dyn ProblemReporter) -> Assembler<'r> {
        Assembler {
            problem_reporter: Some(problem_reporter),
            debug: false,
        }
    }

    /// enables verbose trace output through the log facade. no semantic
    /// effect.
    pub fn enable_debug_output(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// assembles an area from a single (treated-as-closed) way into the
    /// output buffer. returns whether the area is valid; on `false` the
    /// buffer retains the ringless shell.
    pub fn assemble_way(
        &mut self,
        way: &Way,
        out_buffer: &mut AreaBuffer,
    ) -> Result<bool, AssemblyError> {
        let mut assembly = AreaAssembly::new(
            ObjectId::from(way.id),
            self.debug,
            match &mut self.problem_reporter {
                Some(r) => Some(&mut **r),
                None => None,
            },
        );
        assembly.extract_way(way);

        if assembly.debug {
            log::debug!(
                "build way id={} segments={}",
                way.id,
                assembly.segment_list.len()
            );
        }

        let mut builder =
            AreaBuilder::from_object(out_buffer, AreaId::from_way(way.id), way.meta.clone());

        if !assembly.stage2() {
            return Ok(false);
        }

        builder.set_tags(way.tags.clone());
        assembly.add_rings_to_area(&mut builder);
        Ok(true)
    }

    /// assembles an area from a relation and its member ways. the members
    /// live in `in_buffer` at the given offsets; a zero offset marks an
    /// absent member and is skipped. returns whether the area is valid; on
    /// `false` the output buffer retains the ringless shell.
    pub fn assemble_relation(
        &mut self,
        relation: &Relation,
        member_offsets: &[usize],
        in_buffer: &WayBuffer,
        out_buffer: &mut AreaBuffer,
    ) -> Result<bool, AssemblyError> {
        let area_index;
        let mismatches;
        {
            let mut assembly = AreaAssembly::new(
                ObjectId::from(relation.id),
                self.debug,
                match &mut self.problem_reporter {
                    Some(r) => Some(&mut **r),
                    None => None,
                },
            );
            assembly.extract_relation(relation, member_offsets, in_buffer)?;

            if assembly.debug {
                log::debug!(
                    "build relation id={} members={} segments={}",
                    relation.id,
                    member_offsets.len(),
                    assembly.segment_list.len()
                );
            }

            let mut builder = AreaBuilder::from_object(
                out_buffer,
                AreaId::from_relation(relation.id),
                relation.meta.clone(),
            );

            if !assembly.stage2() {
                return Ok(false);
            }

            let tags = assembly.select_relation_tags(relation);
            builder.set_tags(tags);
            assembly.add_rings_to_area(&mut builder);

            area_index = builder.index();
            mismatches = assembly.inner_outer_mismatches;
        }

        if mismatches == 0 {
            self.recover_orphan_inners(relation, member_offsets, in_buffer, area_index, out_buffer)?;
        }
        Ok(true)
    }

    /// a closed inner way whose own tags disagree with the area it punched a
    /// hole into describes its own area; it is re-assembled standalone. only
    /// runs when role tagging was consistent, since a mismatch means the
    /// inner/outer interpretation is already in doubt.
    fn recover_orphan_inners(
        &mut self,
        relation: &Relation,
        member_offsets: &[usize],
        in_buffer: &WayBuffer,
        area_index: usize,
        out_buffer: &mut AreaBuffer,
    ) -> Result<(), AssemblyError> {
        let filter: HashSet<&str> = ORPHAN_TAG_EXCLUSIONS.into_iter().collect();
        let area_tags = match out_buffer.get(area_index) {
            Some(area) => area.tags.clone(),
            None => {
                return Err(AssemblyError::InternalError(format!(
                    "area at buffer index {area_index} is gone before orphan recovery"
                )))
            }
        };
        let area_pairs: Vec<(String, String)> = area_tags
            .filtered_pairs(&filter)
            .into_iter()
            .map(|(k, v)| (String::from(k), String::from(v)))
            .collect();

        for (member, &offset) in relation.members.iter().zip(member_offsets) {
            if offset == WayBuffer::ABSENT_MEMBER || !member.is_inner() {
                continue;
            }
            let way = in_buffer.get(offset)?;
            if !way.is_closed() || way.tags.is_empty() {
                continue;
            }
            let way_pairs = way.tags.filtered_pairs(&filter);
            if way_pairs.is_empty() {
                continue;
            }
            let same = way_pairs.len() == area_pairs.len()
                && way_pairs
                    .iter()
                    .zip(&area_pairs)
                    .all(|(w, a)| w.0 == a.0 && w.1 == a.1);
            if !same {
                if self.debug {
                    log::debug!("  inner way {} has its own tags, assembling it standalone", way.id);
                }
                self.assemble_way(way, out_buffer)?;
            }
        }
        Ok(())
    }
}

/// the working state of one assembly: the segment list, the rings under
/// construction (referenced by index so that sub-ring splits and chain
/// merges do not invalidate each other), the classified ring index lists and
/// the role-mismatch counter. a fresh value per call is what resets the
/// state between assemblies.
struct AreaAssembly<'a, 'r> {
    object_id: ObjectId,
    debug: bool,
    reporter: Option<&'r mut dyn ProblemReporter>,
    segment_list: SegmentList<'a>,
    rings: Vec<ProtoRing<'a>>,
    outer_rings: Vec<usize>,
    inner_rings: Vec<usize>,
    inner_outer_mismatches: u32,
}

impl<'a, 'r> AreaAssembly<'a, 'r> {
    fn new(
        object_id: ObjectId,
        debug: bool,
        reporter: Option<&'r mut dyn ProblemReporter>,
    ) -> AreaAssembly<'a, 'r> {
        let mut segment_list = SegmentList::new();
        segment_list.enable_debug_output(debug);
        AreaAssembly {
            object_id,
            debug,
            reporter,
            segment_list,
            rings: Vec::new(),
            outer_rings: Vec::new(),
            inner_rings: Vec::new(),
            inner_outer_mismatches: 0,
        }
    }

    fn extract_way(&mut self, way: &'a Way) {
        self.segment_list.extract_segments_from_way(
            way,
            SegmentRole::Outer,
            match &mut self.reporter {
                Some(r) => Some(&mut **r),
                None => None,
            },
        );
    }

    fn extract_relation(
        &mut self,
        relation: &Relation,
        member_offsets: &[usize],
        in_buffer: &'a WayBuffer,
    ) -> Result<(), AssemblyError> {
        self.segment_list.extract_segments_from_ways(
            relation,
            member_offsets,
            in_buffer,
            match &mut self.reporter {
                Some(r) => Some(&mut **r),
                None => None,
            },
        )
    }

    /// whether the two node refs are at the same location. a location shared
    /// by two different node ids is legal but reported as a duplicate node.
    fn has_same_location(&mut self, nr1: NodeRef, nr2: NodeRef) -> bool {
        if nr1.location != nr2.location {
            return false;
        }
        if nr1.id != nr2.id {
            if let Some(reporter) = self.reporter.as_deref_mut() {
                reporter.report_duplicate_node(nr1.id, nr2.id, nr1.location);
            }
        }
        true
    }

    /// validates the segment list and builds, classifies and orients the
    /// rings. returns false if the geometry is rejected.
    fn stage2(&mut self) -> bool {
        self.segment_list.sort();
        self.segment_list.erase_duplicate_segments();

        // any segments crossing each other make the area invalid
        if self.find_intersections() {
            return false;
        }

        // tack each segment onto an end of an existing ring if possible,
        // otherwise start a new ring with it
        for i in 0..self.segment_list.len() {
            let segment = self.segment_list.as_slice()[i];
            if self.debug {
                log::debug!("  checking segment {segment}");
            }
            if !self.add_to_existing_ring(segment) {
                if self.debug {
                    log::debug!("    new ring for segment {segment}");
                }
                self.rings.push(ProtoRing::new(segment));
            }
        }

        if self.check_for_open_rings() {
            if self.debug {
                log::debug!("  not all rings are closed");
            }
            return false;
        }

        if self.rings.len() == 1 {
            if !self.rings[0].is_cw() {
                self.rings[0].reverse();
            }
            self.outer_rings.push(0);
        } else {
            for idx in 0..self.rings.len() {
                self.check_inner_outer(idx);
                if self.rings[idx].outer() {
                    if !self.rings[idx].is_cw() {
                        self.rings[idx].reverse();
                    }
                    self.outer_rings.push(idx);
                } else {
                    if self.rings[idx].is_cw() {
                        self.rings[idx].reverse();
                    }
                    self.inner_rings.push(idx);
                }
            }

            if self.outer_rings.len() == 1 {
                let outer_idx = self.outer_rings[0];
                for i in 0..self.inner_rings.len() {
                    self.rings[outer_idx].add_inner_ring(self.inner_rings[i]);
                }
            } else {
                // smallest outer ring first, so each inner ring attaches to
                // the tightest ring that contains it
                let rings = &self.rings;
                self.outer_rings.sort_by_key(|&idx| rings[idx].area());
                for i in 0..self.inner_rings.len() {
                    let inner_idx = self.inner_rings[i];
                    for j in 0..self.outer_rings.len() {
                        let outer_idx = self.outer_rings[j];
                        let contained = self.rings[inner_idx].is_in(&self.rings[outer_idx]);
                        if contained {
                            self.rings[outer_idx].add_inner_ring(inner_idx);
                            break;
                        }
                    }
                }
            }
        }

        self.check_inner_outer_roles();

        true
    }

    /// plane sweep over the sorted segment list looking for true crossings
    fn find_intersections(&mut self) -> bool {
        if self.segment_list.is_empty() {
            return false;
        }

        let mut found = false;
        let segments = self.segment_list.as_slice();
        for (i, s1) in segments.iter().enumerate() {
            for s2 in &segments[i + 1..] {
                if outside_x_range(s2, s1) {
                    // the list is sorted, no later segment can overlap s1
                    break;
                }
                if !y_range_overlap(s1, s2) {
                    continue;
                }
                if let Some(intersection) = calculate_intersection(s1, s2) {
                    found = true;
                    if self.debug {
                        log::debug!("  segments {s1} and {s2} intersecting at {intersection}");
                    }
                    if let Some(reporter) = self.reporter.as_deref_mut() {
                        reporter.report_intersection(
                            self.object_id,
                            s1.way().id,
                            s1.first().location,
                            s1.second().location,
                            s2.way().id,
                            s2.first().location,
                            s2.second().location,
                            intersection,
                        );
                    }
                }
            }
        }
        found
    }

    /// tries to attach the segment to an open ring at one of its ends,
    /// reversing the segment where needed
    fn add_to_existing_ring(&mut self, mut segment: NodeRefSegment<'a>) -> bool {
        for idx in 0..self.rings.len() {
            if self.rings[idx].closed() {
                continue;
            }
            let ring_last = self.rings[idx].last_segment().second();
            let ring_first = self.rings[idx].first_segment().first();
            if self.has_same_location(ring_last, segment.first()) {
                self.combine_rings(segment, idx, true);
                return true;
            }
            if self.has_same_location(ring_last, segment.second()) {
                segment.swap_locations();
                self.combine_rings(segment, idx, true);
                return true;
            }
            if self.has_same_location(ring_first, segment.first()) {
                segment.swap_locations();
                self.combine_rings(segment, idx, false);
                return true;
            }
            if self.has_same_location(ring_first, segment.second()) {
                self.combine_rings(segment, idx, false);
                return true;
            }
        }
        false
    }

    fn combine_rings(&mut self, segment: NodeRefSegment<'a>, ring_idx: usize, at_end: bool) {
        if self.debug {
            log::debug!(
                "    match at {} of ring {}",
                if at_end { "end" } else { "start" },
                self.rings[ring_idx]
            );
        }
        if at_end {
            self.rings[ring_idx].add_segment_end(segment);
            self.has_closed_subring_end(ring_idx, segment);
            if let Some(idx) = self.possibly_combine_rings_end(ring_idx) {
                self.check_for_closed_subring(idx);
            }
        } else {
            self.rings[ring_idx].add_segment_start(segment);
            self.has_closed_subring_start(ring_idx, segment);
            if let Some(idx) = self.possibly_combine_rings_start(ring_idx) {
                self.check_for_closed_subring(idx);
            }
        }
    }

    /// after appending at the end: if an interior segment starts at the new
    /// free endpoint's location, the tail closed a loop. split it off.
    fn has_closed_subring_end(&mut self, ring_idx: usize, segment: NodeRefSegment<'a>) -> bool {
        let len = self.rings[ring_idx].segments().len();
        if len < 3 {
            return false;
        }
        let nr = segment.second();
        for i in 1..len - 1 {
            let candidate = self.rings[ring_idx].segments()[i].first();
            if self.has_same_location(nr, candidate) {
                let new_ring = self.rings[ring_idx].split_range(i..len);
                if self.debug {
                    log::debug!(
                        "      tail sub-ring split off: {} leaving {}",
                        new_ring,
                        self.rings[ring_idx]
                    );
                }
                self.rings.push(new_ring);
                return true;
            }
        }
        false
    }

    /// after prepending at the start: if an interior segment ends at the new
    /// free endpoint's location, the head closed a loop. split it off.
    fn has_closed_subring_start(&mut self, ring_idx: usize, segment: NodeRefSegment<'a>) -> bool {
        let len = self.rings[ring_idx].segments().len();
        if len < 3 {
            return false;
        }
        let nr = segment.first();
        for i in 1..len - 1 {
            let candidate = self.rings[ring_idx].segments()[i].second();
            if self.has_same_location(nr, candidate) {
                let new_ring = self.rings[ring_idx].split_range(0..i + 1);
                if self.debug {
                    log::debug!(
                        "      head sub-ring split off: {} leaving {}",
                        new_ring,
                        self.rings[ring_idx]
                    );
                }
                self.rings.push(new_ring);
                return true;
            }
        }
        false
    }

    /// after two chains merged: if any location starts two segments of the
    /// ring, the slice between the two occurrences is a closed loop. split
    /// it off.
    fn check_for_closed_subring(&mut self, ring_idx: usize) {
        let mut sorted = self.rings[ring_idx].segments().to_vec();
        sorted.sort();
        let mut found = None;
        for w in sorted.windows(2) {
            if self.has_same_location(w[0].first(), w[1].first()) {
                found = Some((w[0], w[1]));
                break;
            }
        }
        let (s1, s2) = match found {
            Some(pair) => pair,
            None => return,
        };
        let segments = self.rings[ring_idx].segments();
        let r1 = segments.iter().position(|s| *s == s1);
        let r2 = segments.iter().position(|s| *s == s2);
        let (r1, r2) = match (r1, r2) {
            (Some(r1), Some(r2)) => (r1.min(r2), r1.max(r2)),
            _ => return,
        };
        let new_ring = self.rings[ring_idx].split_range(r1..r2);
        if self.debug {
            log::debug!(
                "      sub-ring split after merge: {} leaving {}",
                new_ring,
                self.rings[ring_idx]
            );
        }
        self.rings.push(new_ring);
    }

    /// merges any open ring whose endpoint continues this ring's end.
    /// returns the ring's index after the merge (removal may shift it), or
    /// None if nothing merged.
    fn possibly_combine_rings_end(&mut self, ring_idx: usize) -> Option<usize> {
        let nr = self.rings[ring_idx].last_segment().second();
        for j in 0..self.rings.len() {
            if j == ring_idx || self.rings[j].closed() {
                continue;
            }
            let other_first = self.rings[j].first_segment().first();
            let other_last = self.rings[j].last_segment().second();
            if self.has_same_location(nr, other_first) {
                let other = self.rings.remove(j);
                let idx = if j < ring_idx { ring_idx - 1 } else { ring_idx };
                self.rings[idx].merge_ring(other);
                return Some(idx);
            }
            if self.has_same_location(nr, other_last) {
                let other = self.rings.remove(j);
                let idx = if j < ring_idx { ring_idx - 1 } else { ring_idx };
                self.rings[idx].merge_ring_reverse(other);
                return Some(idx);
            }
        }
        None
    }

    /// merges any open ring whose endpoint continues this ring's start.
    /// returns the ring's index after the merge, or None if nothing merged.
    fn possibly_combine_rings_start(&mut self, ring_idx: usize) -> Option<usize> {
        let nr = self.rings[ring_idx].first_segment().first();
        for j in 0..self.rings.len() {
            if j == ring_idx || self.rings[j].closed() {
                continue;
            }
            let other_first = self.rings[j].first_segment().first();
            let other_last = self.rings[j].last_segment().second();
            if self.has_same_location(nr, other_last) {
                let other = self.rings.remove(j);
                let idx = if j < ring_idx { ring_idx - 1 } else { ring_idx };
                self.rings[idx].prepend_ring(other);
                return Some(idx);
            }
            if self.has_same_location(nr, other_first) {
                let other = self.rings.remove(j);
                let idx = if j < ring_idx { ring_idx - 1 } else { ring_idx };
                self.rings[idx].reverse();
                self.rings[idx].merge_ring(other);
                return Some(idx);
            }
        }
        None
    }

    /// reports the free endpoints of every open ring. any open ring rejects
    /// the area.
    fn check_for_open_rings(&mut self) -> bool {
        let mut open = false;
        for idx in 0..self.rings.len() {
            if !self.rings[idx].closed() {
                open = true;
                let first = self.rings[idx].first_segment().first().location;
                let last = self.rings[idx].last_segment().second().location;
                if let Some(reporter) = self.reporter.as_deref_mut() {
                    reporter.report_ring_not_closed(self.object_id, first, last);
                }
            }
        }
        open
    }

    /// classifies one ring by casting a horizontal ray leftward from its
    /// lexicographically smallest node and counting crossings against the
    /// rest of the segment list. an odd count means the ring is inside
    /// something, so it is a hole.
    fn check_inner_outer(&mut self, ring_idx: usize) {
        let min_node = self.rings[ring_idx].min_node();
        if self.debug {
            log::debug!("    check_inner_outer min_node={min_node}");
        }

        let mut count: u32 = 0;
        let mut above: u32 = 0;
        for segment in self.segment_list.iter() {
            if segment.first().location.x > min_node.location.x {
                break;
            }
            if self.rings[ring_idx].contains(segment) {
                continue;
            }
            if segment.is_to_left_of(min_node.location) {
                count += 1;
            }
            // segments incident to the probe point itself are tallied
            // separately: a pair passing above adds nothing, a single one
            // adds a crossing
            if segment.first().location == min_node.location
                && segment.second().location.y > min_node.location.y
            {
                above += 1;
            }
            if segment.second().location == min_node.location
                && segment.first().location.y > min_node.location.y
            {
                above += 1;
            }
        }

        count += above % 2;
        if self.debug {
            log::debug!("      count={count} above={above}");
        }
        if count % 2 == 1 {
            self.rings[ring_idx].set_inner();
        }
    }

    /// verifies that segments of outer rings carry the "outer" role and
    /// segments of inner rings the "inner" role. advisory only.
    fn check_inner_outer_roles(&mut self) {
        for k in 0..self.outer_rings.len() {
            let ring_idx = self.outer_rings[k];
            for s in 0..self.rings[ring_idx].segments().len() {
                let segment = self.rings[ring_idx].segments()[s];
                if !segment.role().is_outer() {
                    self.inner_outer_mismatches += 1;
                    if let Some(reporter) = self.reporter.as_deref_mut() {
                        reporter.report_role_should_be_outer(
                            self.object_id,
                            segment.way().id,
                            segment.first().location,
                            segment.second().location,
                        );
                    }
                }
            }
        }
        for k in 0..self.inner_rings.len() {
            let ring_idx = self.inner_rings[k];
            for s in 0..self.rings[ring_idx].segments().len() {
                let segment = self.rings[ring_idx].segments()[s];
                if !segment.role().is_inner() {
                    self.inner_outer_mismatches += 1;
                    if let Some(reporter) = self.reporter.as_deref_mut() {
                        reporter.report_role_should_be_inner(
                            self.object_id,
                            segment.way().id,
                            segment.first().location,
                            segment.second().location,
                        );
                    }
                }
            }
        }
    }

    /// picks the tag set describing a relation area: the relation's own
    /// significant tags (minus type), or the tags of the single outer way,
    /// or the tags every outer way agrees on
    fn select_relation_tags(&self, relation: &Relation) -> TagList {
        let filter: HashSet<&str> = AREA_TAG_EXCLUSIONS.into_iter().collect();
        let significant = relation
            .tags
            .iter()
            .filter(|t| !filter.contains(t.key.as_str()))
            .count();
        if self.debug {
            log::debug!("  found {significant} significant tags on relation");
        }

        if significant > 0 {
            let mut tags = TagList::new();
            for tag in relation.tags.iter() {
                if tag.key != "type" {
                    tags.push(&tag.key, &tag.value);
                }
            }
            return tags;
        }

        let ways = self.outer_ways();
        if ways.len() == 1 {
            if self.debug {
                log::debug!("    only one outer way, copying its tags");
            }
            ways[0].tags.clone()
        } else {
            if self.debug {
                log::debug!("    multiple outer ways, keeping common tags");
            }
            common_tags(&ways)
        }
    }

    /// the distinct ways contributing segments to outer rings, ordered by id
    fn outer_ways(&self) -> Vec<&'a Way> {
        let mut ways: Vec<&'a Way> = self
            .outer_rings
            .iter()
            .flat_map(|&idx| self.rings[idx].ways())
            .collect();
        ways.sort_by_key(|w| w.id);
        ways.dedup_by_key(|w| w.id);
        ways
    }

    /// emits every outer ring followed by its inner rings
    fn add_rings_to_area(&self, builder: &mut AreaBuilder) {
        for &outer_idx in &self.outer_rings {
            let outer = &self.rings[outer_idx];
            if self.debug {
                log::debug!("    ring {outer} is outer");
            }
            let mut ring = OuterRing {
                nodes: outer.nodes(),
                inner_rings: Vec::new(),
            };
            for &inner_idx in outer.inner_rings() {
                ring.inner_rings.push(InnerRing {
                    nodes: self.rings[inner_idx].nodes(),
                });
            }
            builder.add_outer_ring(ring);
        }
    }
}

/// the `(key, value)` pairs present identically on every one of the given
/// ways, in sorted order
fn common_tags(ways: &[&Way]) -> TagList {
    let mut counter: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for way in ways {
        for tag in way.tags.iter() {
            *counter
                .entry((tag.key.as_str(), tag.value.as_str()))
                .or_default() += 1;
        }
    }
    let mut tags = TagList::new();
    for ((key, value), n) in counter {
        if n == ways.len() {
            tags.push(key, value);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::Assembler;
    use crate::algorithm::assembly::{CollectingProblemReporter, Problem};
    use crate::model::area::{Area, AreaBuffer, AreaId};
    use crate::model::geometry::{Location, NodeRef};
    use crate::model::osm::{
        Member, NodeId, Relation, RelationId, TagList, Way, WayBuffer, WayId,
    };
    use std::collections::HashSet;

    fn node(id: i64, x: i32, y: i32) -> NodeRef {
        NodeRef::new(NodeId(id), Location::new(x, y))
    }

    fn tag_list(tags: &[(&str, &str)]) -> TagList {
        let mut list = TagList::new();
        for (k, v) in tags {
            list.push(k, v);
        }
        list
    }

    fn way(id: i64, tags: &[(&str, &str)], nodes: &[(i64, i32, i32)]) -> Way {
        Way {
            id: WayId(id),
            tags: tag_list(tags),
            nodes: nodes.iter().map(|&(id, x, y)| node(id, x, y)).collect(),
            ..Default::default()
        }
    }

    fn relation_fixture(
        id: i64,
        tags: &[(&str, &str)],
        members: Vec<(Way, &str)>,
    ) -> (Relation, Vec<usize>, WayBuffer) {
        let mut buffer = WayBuffer::new();
        let mut offsets = Vec::new();
        let mut member_list = Vec::new();
        for (way, role) in members {
            member_list.push(Member::new(way.id, role));
            offsets.push(buffer.push(way));
        }
        let relation = Relation {
            id: RelationId(id),
            tags: tag_list(tags),
            members: member_list,
            ..Default::default()
        };
        (relation, offsets, buffer)
    }

    /// twice the signed area of a closed node sequence
    fn shoelace(nodes: &[NodeRef]) -> i64 {
        nodes
            .windows(2)
            .map(|w| {
                i64::from(w[0].location.x) * i64::from(w[1].location.y)
                    - i64::from(w[1].location.x) * i64::from(w[0].location.y)
            })
            .sum()
    }

    fn locations(nodes: &[NodeRef]) -> HashSet<Location> {
        nodes.iter().map(|n| n.location).collect()
    }

    fn emitted_segment_count(area: &Area) -> usize {
        area.outer_rings
            .iter()
            .map(|outer| {
                outer.nodes.len() - 1
                    + outer
                        .inner_rings
                        .iter()
                        .map(|inner| inner.nodes.len() - 1)
                        .sum::<usize>()
            })
            .sum()
    }

    /// canonical (min, max) location pairs of every ring edge in the area,
    /// sorted, for multiset comparison
    fn segment_pairs(area: &Area) -> Vec<(Location, Location)> {
        fn collect(nodes: &[NodeRef], pairs: &mut Vec<(Location, Location)>) {
            for w in nodes.windows(2) {
                let a = w[0].location;
                let b = w[1].location;
                pairs.push((a.min(b), a.max(b)));
            }
        }
        let mut pairs = Vec::new();
        for outer in &area.outer_rings {
            collect(&outer.nodes, &mut pairs);
            for inner in &outer.inner_rings {
                collect(&inner.nodes, &mut pairs);
            }
        }
        pairs.sort();
        pairs
    }

    const SQUARE: [(i64, i32, i32); 5] =
        [(1, 0, 0), (2, 10, 0), (3, 10, 10), (4, 0, 10), (1, 0, 0)];
    const HOLE: [(i64, i32, i32); 5] = [(5, 2, 2), (6, 8, 2), (7, 8, 8), (8, 2, 8), (5, 2, 2)];

    #[test]
    fn square_way_becomes_one_clockwise_outer_ring() {
        let mut w = way(17, &[("natural", "water")], &SQUARE);
        w.meta = crate::model::osm::ObjectMeta {
            version: 3,
            changeset: 77,
            timestamp: 1234567890,
            visible: true,
            uid: 42,
            user: String::from("mapper"),
        };
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler.assemble_way(&w, &mut out).unwrap();
        assert!(valid);
        assert!(reporter.is_empty());
        assert_eq!(out.len(), 1);
        let area = &out.areas()[0];
        assert_eq!(area.id, AreaId(34));
        assert_eq!(area.meta, w.meta);
        assert_eq!(area.tags, tag_list(&[("natural", "water")]));
        assert_eq!(area.outer_rings.len(), 1);
        let ring = &area.outer_rings[0];
        assert!(ring.inner_rings.is_empty());
        assert!(ring.is_closed());
        assert_eq!(ring.nodes.len(), 5);
        assert!(shoelace(&ring.nodes) <= 0);
        assert_eq!(locations(&ring.nodes), locations(&w.nodes));
    }

    #[test]
    fn relation_with_a_hole_attaches_the_inner_ring() {
        let outer = way(20, &[], &SQUARE);
        let inner = way(21, &[], &HOLE);
        let (relation, offsets, buffer) = relation_fixture(
            9,
            &[("type", "multipolygon"), ("building", "yes")],
            vec![(outer, "outer"), (inner, "inner")],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(valid);
        assert!(reporter.is_empty());
        assert_eq!(out.len(), 1);
        let area = &out.areas()[0];
        assert_eq!(area.id, AreaId(19));
        assert_eq!(area.tags, tag_list(&[("building", "yes")]));
        assert_eq!(area.outer_rings.len(), 1);
        let ring = &area.outer_rings[0];
        assert!(ring.is_closed());
        assert!(shoelace(&ring.nodes) <= 0);
        assert_eq!(ring.inner_rings.len(), 1);
        let hole = &ring.inner_rings[0];
        assert!(hole.is_closed());
        assert!(shoelace(&hole.nodes) >= 0);
        // every deduplicated input segment ends up in exactly one ring
        assert_eq!(emitted_segment_count(area), 8);
    }

    #[test]
    fn self_crossing_way_is_rejected_with_a_shell() {
        let w = way(
            8,
            &[("natural", "water")],
            &[(1, 0, 0), (2, 10, 10), (3, 10, 0), (4, 0, 10), (1, 0, 0)],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler.assemble_way(&w, &mut out).unwrap();
        assert!(!valid);
        assert_eq!(out.len(), 1);
        let shell = &out.areas()[0];
        assert_eq!(shell.id, AreaId(16));
        assert!(!shell.is_valid());
        assert!(shell.tags.is_empty());
        assert_eq!(reporter.len(), 1);
        match &reporter.problems()[0] {
            Problem::Intersection {
                way1,
                way2,
                intersection,
                ..
            } => {
                assert_eq!(*way1, WayId(8));
                assert_eq!(*way2, WayId(8));
                assert_eq!(*intersection, Location::new(5, 5));
            }
            other => panic!("expected an intersection report, got {other:?}"),
        }
    }

    #[test]
    fn two_outer_ways_merge_into_one_ring_with_common_tags() {
        let a = way(
            30,
            &[("natural", "water"), ("name", "lake")],
            &[(1, 0, 0), (2, 10, 0), (3, 10, 10)],
        );
        let b = way(31, &[("natural", "water")], &[(3, 10, 10), (4, 0, 10), (1, 0, 0)]);
        let (relation, offsets, buffer) = relation_fixture(
            12,
            &[("type", "multipolygon")],
            vec![(a, "outer"), (b, "outer")],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(valid);
        assert!(reporter.is_empty());
        let area = &out.areas()[0];
        assert_eq!(area.id, AreaId(25));
        // the relation itself carries nothing significant, so the area keeps
        // the tags both outer ways agree on
        assert_eq!(area.tags, tag_list(&[("natural", "water")]));
        assert_eq!(area.outer_rings.len(), 1);
        let ring = &area.outer_rings[0];
        assert!(ring.is_closed());
        assert!(ring.inner_rings.is_empty());
        assert_eq!(ring.nodes.len(), 5);
    }

    #[test]
    fn topologically_outer_ring_with_inner_role_is_reported_not_rejected() {
        let big = way(40, &[], &SQUARE);
        let small = way(41, &[("natural", "water")], &HOLE);
        let (relation, offsets, buffer) = relation_fixture(
            13,
            &[("type", "multipolygon"), ("landuse", "forest")],
            vec![(big, "inner"), (small, "inner")],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(valid);
        let area = &out.areas()[0];
        assert!(area.is_valid());
        assert_eq!(area.outer_rings.len(), 1);
        assert_eq!(area.outer_rings[0].inner_rings.len(), 1);
        let mismatches = reporter
            .problems()
            .iter()
            .filter(|p| matches!(p, Problem::RoleShouldBeOuter { .. }))
            .count();
        assert_eq!(mismatches, 4);
        // the small way has its own divergent tags, but role mismatches
        // suppress orphan recovery
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unclosed_chain_is_rejected_with_a_shell() {
        let a = way(50, &[], &[(1, 0, 0), (2, 10, 0)]);
        let b = way(51, &[], &[(2, 10, 0), (3, 10, 10)]);
        let (relation, offsets, buffer) = relation_fixture(
            14,
            &[("type", "multipolygon"), ("natural", "water")],
            vec![(a, "outer"), (b, "outer")],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(!valid);
        assert_eq!(out.len(), 1);
        assert!(!out.areas()[0].is_valid());
        assert_eq!(
            reporter.problems(),
            &[Problem::RingNotClosed {
                object_id: relation.id.into(),
                first: Location::new(0, 0),
                last: Location::new(10, 10),
            }]
        );
    }

    #[test]
    fn relation_without_members_leaves_an_invalid_shell() {
        let (relation, offsets, buffer) = relation_fixture(
            15,
            &[("type", "multipolygon"), ("landuse", "forest")],
            vec![],
        );
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::new();
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        // nothing failed, there was just nothing to build
        assert!(valid);
        assert_eq!(out.len(), 1);
        let shell = &out.areas()[0];
        assert!(!shell.is_valid());
        assert_eq!(shell.tags, tag_list(&[("landuse", "forest")]));
    }

    #[test]
    fn shared_location_with_different_node_ids_is_advisory() {
        let a = way(
            60,
            &[("natural", "water")],
            &[(1, 0, 0), (2, 10, 0), (3, 10, 10)],
        );
        let b = way(
            61,
            &[("natural", "water")],
            &[(4, 10, 10), (5, 0, 10), (1, 0, 0)],
        );
        let (relation, offsets, buffer) = relation_fixture(
            16,
            &[("type", "multipolygon")],
            vec![(a, "outer"), (b, "outer")],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(valid);
        assert!(out.areas()[0].is_valid());
        assert_eq!(
            reporter.problems(),
            &[Problem::DuplicateNode {
                node1: NodeId(4),
                node2: NodeId(3),
                location: Location::new(10, 10),
            }]
        );
    }

    #[test]
    fn rings_touching_at_one_vertex_are_split_into_two_closed_rings() {
        let t1 = way(70, &[], &[(1, 5, 5), (2, 6, 0), (3, 0, 0), (1, 5, 5)]);
        let t2 = way(71, &[], &[(1, 5, 5), (4, 6, 10), (5, 0, 10), (1, 5, 5)]);
        let (relation, offsets, buffer) = relation_fixture(
            19,
            &[("type", "multipolygon")],
            vec![(t1, "outer"), (t2, "outer")],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(valid);
        assert!(reporter.is_empty());
        let area = &out.areas()[0];
        assert_eq!(area.outer_rings.len(), 2);
        for ring in &area.outer_rings {
            assert!(ring.is_closed());
            assert_eq!(ring.nodes.len(), 4);
            assert!(ring.inner_rings.is_empty());
            assert!(shoelace(&ring.nodes) <= 0);
        }
        assert_eq!(emitted_segment_count(area), 6);
    }

    #[test]
    fn separated_chains_merge_into_one_ring() {
        // the sorted segment order starts a second chain at (1,1)-(2,2)
        // before anything connects it to the first chain
        let w = way(
            80,
            &[("natural", "water")],
            &[
                (1, 0, 0),
                (2, 10, 20),
                (3, 1, 1),
                (4, 2, 2),
                (5, 20, 0),
                (1, 0, 0),
            ],
        );
        let mut reporter = CollectingProblemReporter::new();
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::with_problem_reporter(&mut reporter);
        let valid = assembler.assemble_way(&w, &mut out).unwrap();
        assert!(valid);
        assert!(reporter.is_empty());
        let area = &out.areas()[0];
        assert_eq!(area.outer_rings.len(), 1);
        let ring = &area.outer_rings[0];
        assert!(ring.is_closed());
        assert_eq!(ring.nodes.len(), 6);
        assert_eq!(locations(&ring.nodes).len(), 5);
    }

    #[test]
    fn orphan_inner_way_with_its_own_tags_is_recovered() {
        let outer = way(90, &[], &SQUARE);
        let inner = way(91, &[("natural", "wood")], &HOLE);
        let (relation, offsets, buffer) = relation_fixture(
            17,
            &[("type", "multipolygon"), ("natural", "water")],
            vec![(outer, "outer"), (inner, "inner")],
        );
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::new();
        let valid = assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert!(valid);
        assert_eq!(out.len(), 2);
        let area = &out.areas()[0];
        assert_eq!(area.id, AreaId(35));
        assert_eq!(area.tags, tag_list(&[("natural", "water")]));
        assert_eq!(area.outer_rings[0].inner_rings.len(), 1);
        let orphan = &out.areas()[1];
        assert_eq!(orphan.id, AreaId(182));
        assert_eq!(orphan.tags, tag_list(&[("natural", "wood")]));
        assert_eq!(orphan.outer_rings.len(), 1);
        assert!(orphan.outer_rings[0].inner_rings.is_empty());
    }

    #[test]
    fn orphan_recovery_skips_inner_ways_matching_the_area_tags() {
        let outer = way(90, &[], &SQUARE);
        let inner = way(91, &[("natural", "water")], &HOLE);
        let (relation, offsets, buffer) = relation_fixture(
            17,
            &[("type", "multipolygon"), ("natural", "water")],
            vec![(outer, "outer"), (inner, "inner")],
        );
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::new();
        assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn re_assembling_an_emitted_area_preserves_the_segment_multiset() {
        let outer = way(20, &[], &SQUARE);
        let inner = way(21, &[], &HOLE);
        let (relation, offsets, buffer) = relation_fixture(
            9,
            &[("type", "multipolygon"), ("building", "yes")],
            vec![(outer, "outer"), (inner, "inner")],
        );
        let mut out = AreaBuffer::new();
        let mut assembler = Assembler::new();
        assembler
            .assemble_relation(&relation, &offsets, &buffer, &mut out)
            .unwrap();
        let first = out.areas()[0].clone();

        // rebuild ways from the emitted rings and run the assembly again
        let outer_again = Way {
            id: WayId(100),
            nodes: first.outer_rings[0].nodes.clone(),
            ..Default::default()
        };
        let inner_again = Way {
            id: WayId(101),
            nodes: first.outer_rings[0].inner_rings[0].nodes.clone(),
            ..Default::default()
        };
        let (relation2, offsets2, buffer2) = relation_fixture(
            9,
            &[("type", "multipolygon"), ("building", "yes")],
            vec![(outer_again, "outer"), (inner_again, "inner")],
        );
        let mut out2 = AreaBuffer::new();
        assembler
            .assemble_relation(&relation2, &offsets2, &buffer2, &mut out2)
            .unwrap();
        let second = &out2.areas()[0];
        assert!(second.is_valid());
        assert_eq!(segment_pairs(&first), segment_pairs(second));
    }
}
