use super::document::AreaDocument;
use crate::algorithm::assembly::{Assembler, CollectingProblemReporter, Problem};
use crate::config::AssemblerConfiguration;
use crate::model::area::{Area, AreaBuffer};
use crate::model::osm::{Relation, Way, WayBuffer, WayId};
use crate::model::{AssemblyError, CliError};
use kdam::tqdm;
use rayon::prelude::*;
use std::collections::HashMap;

/// assembles every candidate in the document: closed tagged ways, and
/// relations tagged type=multipolygon. returns the areas in candidate order
/// (rejected candidates appear as ringless shells) plus every recorded
/// problem.
pub fn assemble_document(
    document: &AreaDocument,
    config: &AssemblerConfiguration,
) -> Result<(Vec<Area>, Vec<Problem>), CliError> {
    let ways_by_id: HashMap<WayId, &Way> = document.ways.iter().map(|w| (w.id, w)).collect();

    let way_candidates: Vec<&Way> = if config.ways {
        document
            .ways
            .iter()
            .filter(|w| w.is_closed() && !w.tags.is_empty())
            .collect()
    } else {
        Vec::new()
    };
    let relation_candidates: Vec<&Relation> = if config.relations {
        document
            .relations
            .iter()
            .filter(|r| r.tags.get("type") == Some("multipolygon"))
            .collect()
    } else {
        Vec::new()
    };

    log::info!(
        "assembling {} way and {} relation candidates",
        way_candidates.len(),
        relation_candidates.len()
    );

    let (areas, problems) = if config.parallelize {
        assemble_parallel(&way_candidates, &relation_candidates, &ways_by_id, config.debug)?
    } else {
        assemble_sequential(&way_candidates, &relation_candidates, &ways_by_id, config.debug)?
    };

    let valid = areas.iter().filter(|a| a.is_valid()).count();
    log::info!(
        "assembled {} areas ({} valid, {} rejected shells), {} problems recorded",
        areas.len(),
        valid,
        areas.len() - valid,
        problems.len()
    );
    Ok((areas, problems))
}

fn assemble_sequential(
    ways: &[&Way],
    relations: &[&Relation],
    ways_by_id: &HashMap<WayId, &Way>,
    debug: bool,
) -> Result<(Vec<Area>, Vec<Problem>), AssemblyError> {
    let mut out = AreaBuffer::new();
    let mut reporter = CollectingProblemReporter::new();
    for way in tqdm!(ways.iter(), desc = "assembling ways") {
        assemble_one_way(way, debug, &mut out, &mut reporter)?;
    }
    for relation in tqdm!(relations.iter(), desc = "assembling relations") {
        assemble_one_relation(relation, ways_by_id, debug, &mut out, &mut reporter)?;
    }
    Ok((out.into_areas(), reporter.into_problems()))
}

/// one assembler, output buffer and reporter per work item; results are
/// stitched back together in candidate order
fn assemble_parallel(
    ways: &[&Way],
    relations: &[&Relation],
    ways_by_id: &HashMap<WayId, &Way>,
    debug: bool,
) -> Result<(Vec<Area>, Vec<Problem>), AssemblyError> {
    let way_results: Result<Vec<_>, AssemblyError> = ways
        .par_iter()
        .map(|way| {
            let mut out = AreaBuffer::new();
            let mut reporter = CollectingProblemReporter::new();
            assemble_one_way(way, debug, &mut out, &mut reporter)?;
            Ok((out.into_areas(), reporter.into_problems()))
        })
        .collect();
    let relation_results: Result<Vec<_>, AssemblyError> = relations
        .par_iter()
        .map(|relation| {
            let mut out = AreaBuffer::new();
            let mut reporter = CollectingProblemReporter::new();
            assemble_one_relation(relation, ways_by_id, debug, &mut out, &mut reporter)?;
            Ok((out.into_areas(), reporter.into_problems()))
        })
        .collect();

    let mut areas = Vec::new();
    let mut problems = Vec::new();
    for (a, p) in way_results?.into_iter().chain(relation_results?) {
        areas.extend(a);
        problems.extend(p);
    }
    Ok((areas, problems))
}

fn assemble_one_way(
    way: &Way,
    debug: bool,
    out: &mut AreaBuffer,
    reporter: &mut CollectingProblemReporter,
) -> Result<(), AssemblyError> {
    let mut assembler = Assembler::with_problem_reporter(reporter);
    assembler.enable_debug_output(debug);
    assembler.assemble_way(way, out)?;
    Ok(())
}

/// groups the relation's members into a way buffer (the collector's job in a
/// streaming setup) and assembles it. members missing from the document get
/// the absent-member offset and are skipped.
fn assemble_one_relation(
    relation: &Relation,
    ways_by_id: &HashMap<WayId, &Way>,
    debug: bool,
    out: &mut AreaBuffer,
    reporter: &mut CollectingProblemReporter,
) -> Result<(), AssemblyError> {
    let mut members = WayBuffer::new();
    let mut offsets = Vec::with_capacity(relation.members.len());
    for member in &relation.members {
        match ways_by_id.get(&member.way) {
            Some(way) => offsets.push(members.push((*way).clone())),
            None => {
                log::debug!(
                    "relation {} member way {} is not in the document",
                    relation.id,
                    member.way
                );
                offsets.push(WayBuffer::ABSENT_MEMBER);
            }
        }
    }
    let mut assembler = Assembler::with_problem_reporter(reporter);
    assembler.enable_debug_output(debug);
    assembler.assemble_relation(relation, &offsets, &members, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::assemble_document;
    use crate::app::document::AreaDocument;
    use crate::config::AssemblerConfiguration;
    use crate::model::area::AreaId;
    use crate::model::geometry::{Location, NodeRef};
    use crate::model::osm::{Member, NodeId, Relation, RelationId, TagList, Way, WayId};

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

    fn fixture_document() -> AreaDocument {
        let pond = Way {
            id: WayId(17),
            tags: tag_list(&[("natural", "water")]),
            nodes: vec![
                node(1, 0, 0),
                node(2, 30, 0),
                node(3, 30, 30),
                node(4, 0, 30),
                node(1, 0, 0),
            ],
            ..Default::default()
        };
        // untagged members of the relation below; not way candidates
        let outer = Way {
            id: WayId(20),
            nodes: vec![
                node(5, 100, 0),
                node(6, 110, 0),
                node(7, 110, 10),
                node(8, 100, 10),
                node(5, 100, 0),
            ],
            ..Default::default()
        };
        let inner = Way {
            id: WayId(21),
            nodes: vec![
                node(9, 102, 2),
                node(10, 108, 2),
                node(11, 108, 8),
                node(12, 102, 8),
                node(9, 102, 2),
            ],
            ..Default::default()
        };
        // an unclosed path, never a candidate
        let path = Way {
            id: WayId(22),
            tags: tag_list(&[("highway", "track")]),
            nodes: vec![node(13, 50, 0), node(14, 60, 0)],
            ..Default::default()
        };
        let building = Relation {
            id: RelationId(9),
            tags: tag_list(&[("type", "multipolygon"), ("building", "yes")]),
            members: vec![
                Member::new(WayId(20), "outer"),
                Member::new(WayId(21), "inner"),
                Member::new(WayId(99), "outer"),
            ],
            ..Default::default()
        };
        AreaDocument {
            ways: vec![pond, outer, inner, path],
            relations: vec![building],
        }
    }

    #[test]
    fn assembles_way_and_relation_candidates() {
        let document = fixture_document();
        let config = AssemblerConfiguration {
            parallelize: false,
            ..Default::default()
        };
        let (areas, problems) = assemble_document(&document, &config).unwrap();
        assert!(problems.is_empty());
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].id, AreaId(34));
        assert!(areas[0].is_valid());
        assert_eq!(areas[1].id, AreaId(19));
        assert!(areas[1].is_valid());
        assert_eq!(areas[1].outer_rings[0].inner_rings.len(), 1);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let document = fixture_document();
        let sequential = AssemblerConfiguration {
            parallelize: false,
            ..Default::default()
        };
        let parallel = AssemblerConfiguration {
            parallelize: true,
            ..Default::default()
        };
        let (seq_areas, seq_problems) = assemble_document(&document, &sequential).unwrap();
        let (par_areas, par_problems) = assemble_document(&document, &parallel).unwrap();
        let seq_ids: Vec<_> = seq_areas.iter().map(|a| a.id).collect();
        let par_ids: Vec<_> = par_areas.iter().map(|a| a.id).collect();
        assert_eq!(seq_ids, par_ids);
        assert_eq!(seq_problems, par_problems);
    }

    #[test]
    fn candidate_kinds_can_be_disabled() {
        let document = fixture_document();
        let config = AssemblerConfiguration {
            parallelize: false,
            ways: false,
            ..Default::default()
        };
        let (areas, _) = assemble_document(&document, &config).unwrap();
        assert_eq!(areas.len(), 1);
        assert!(areas[0].id.from_relation_source());
    }
}
