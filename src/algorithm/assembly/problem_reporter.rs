use crate::model::geometry::Location;
use crate::model::osm::{NodeId, ObjectId, WayId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// receives notifications about geometry and topology problems found during
/// assembly. all methods are pure notifications; fatal problems additionally
/// make the assembler reject the area, advisory ones do not.
pub trait ProblemReporter {
    /// two distinct node ids share one location
    fn report_duplicate_node(&mut self, node1: NodeId, node2: NodeId, location: Location);

    /// two segments truly cross
    #[allow(clippy::too_many_arguments)]
    fn report_intersection(
        &mut self,
        object_id: ObjectId,
        way1: WayId,
        way1_first: Location,
        way1_second: Location,
        way2: WayId,
        way2_first: Location,
        way2_second: Location,
        intersection: Location,
    );

    /// a ring failed to close; both free endpoints are given
    fn report_ring_not_closed(&mut self, object_id: ObjectId, first: Location, last: Location);

    /// a segment of an outer ring carries a role other than "outer"
    fn report_role_should_be_outer(
        &mut self,
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    );

    /// a segment of an inner ring carries a role other than "inner"
    fn report_role_should_be_inner(
        &mut self,
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    );
}

/// one recorded reporter notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    DuplicateNode {
        node1: NodeId,
        node2: NodeId,
        location: Location,
    },
    Intersection {
        object_id: ObjectId,
        way1: WayId,
        way1_first: Location,
        way1_second: Location,
        way2: WayId,
        way2_first: Location,
        way2_second: Location,
        intersection: Location,
    },
    RingNotClosed {
        object_id: ObjectId,
        first: Location,
        last: Location,
    },
    RoleShouldBeOuter {
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    },
    RoleShouldBeInner {
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    },
}

impl Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Problem::DuplicateNode {
                node1,
                node2,
                location,
            } => write!(f, "duplicate node: ids {node1} and {node2} at {location}"),
            Problem::Intersection {
                object_id,
                way1,
                way2,
                intersection,
                ..
            } => write!(
                f,
                "object {object_id}: ways {way1} and {way2} intersect at {intersection}"
            ),
            Problem::RingNotClosed {
                object_id,
                first,
                last,
            } => write!(
                f,
                "object {object_id}: ring not closed, open between {first} and {last}"
            ),
            Problem::RoleShouldBeOuter {
                object_id,
                way,
                first,
                second,
            } => write!(
                f,
                "object {object_id}: role of way {way} segment {first}--{second} should be outer"
            ),
            Problem::RoleShouldBeInner {
                object_id,
                way,
                first,
                second,
            } => write!(
                f,
                "object {object_id}: role of way {way} segment {first}--{second} should be inner"
            ),
        }
    }
}

/// records every notification for later inspection or export
#[derive(Debug, Default)]
pub struct CollectingProblemReporter {
    problems: Vec<Problem>,
}

impl CollectingProblemReporter {
    pub fn new() -> CollectingProblemReporter {
        CollectingProblemReporter::default()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl ProblemReporter for CollectingProblemReporter {
    fn report_duplicate_node(&mut self, node1: NodeId, node2: NodeId, location: Location) {
        self.problems.push(Problem::DuplicateNode {
            node1,
            node2,
            location,
        });
    }

    fn report_intersection(
        &mut self,
        object_id: ObjectId,
        way1: WayId,
        way1_first: Location,
        way1_second: Location,
        way2: WayId,
        way2_first: Location,
        way2_second: Location,
        intersection: Location,
    ) {
        self.problems.push(Problem::Intersection {
            object_id,
            way1,
            way1_first,
            way1_second,
            way2,
            way2_first,
            way2_second,
            intersection,
        });
    }

    fn report_ring_not_closed(&mut self, object_id: ObjectId, first: Location, last: Location) {
        self.problems.push(Problem::RingNotClosed {
            object_id,
            first,
            last,
        });
    }

    fn report_role_should_be_outer(
        &mut self,
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    ) {
        self.problems.push(Problem::RoleShouldBeOuter {
            object_id,
            way,
            first,
            second,
        });
    }

    fn report_role_should_be_inner(
        &mut self,
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    ) {
        self.problems.push(Problem::RoleShouldBeInner {
            object_id,
            way,
            first,
            second,
        });
    }
}

/// forwards every notification to the log facade at warn level
#[derive(Debug, Default)]
pub struct LogProblemReporter;

impl ProblemReporter for LogProblemReporter {
    fn report_duplicate_node(&mut self, node1: NodeId, node2: NodeId, location: Location) {
        log::warn!(
            "{}",
            Problem::DuplicateNode {
                node1,
                node2,
                location
            }
        );
    }

    fn report_intersection(
        &mut self,
        object_id: ObjectId,
        way1: WayId,
        way1_first: Location,
        way1_second: Location,
        way2: WayId,
        way2_first: Location,
        way2_second: Location,
        intersection: Location,
    ) {
        log::warn!(
            "{}",
            Problem::Intersection {
                object_id,
                way1,
                way1_first,
                way1_second,
                way2,
                way2_first,
                way2_second,
                intersection
            }
        );
    }

    fn report_ring_not_closed(&mut self, object_id: ObjectId, first: Location, last: Location) {
        log::warn!(
            "{}",
            Problem::RingNotClosed {
                object_id,
                first,
                last
            }
        );
    }

    fn report_role_should_be_outer(
        &mut self,
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    ) {
        log::warn!(
            "{}",
            Problem::RoleShouldBeOuter {
                object_id,
                way,
                first,
                second
            }
        );
    }

    fn report_role_should_be_inner(
        &mut self,
        object_id: ObjectId,
        way: WayId,
        first: Location,
        second: Location,
    ) {
        log::warn!(
            "{}",
            Problem::RoleShouldBeInner {
                object_id,
                way,
                first,
                second
            }
        );
    }
}
