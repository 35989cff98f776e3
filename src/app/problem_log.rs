use crate::algorithm::assembly::Problem;
use crate::model::CliError;
use serde::Serialize;
use std::path::Path;

/// one flattened CSV row per recorded problem. locations are written as a
/// space-separated list of `(x,y)` pairs in the order the report carried
/// them.
#[derive(Debug, Serialize)]
struct ProblemRow {
    kind: &'static str,
    object_id: Option<i64>,
    way1: Option<i64>,
    way2: Option<i64>,
    node1: Option<i64>,
    node2: Option<i64>,
    locations: String,
}

impl From<&Problem> for ProblemRow {
    fn from(problem: &Problem) -> Self {
        match problem {
            Problem::DuplicateNode {
                node1,
                node2,
                location,
            } => ProblemRow {
                kind: "duplicate_node",
                object_id: None,
                way1: None,
                way2: None,
                node1: Some(node1.0),
                node2: Some(node2.0),
                locations: location.to_string(),
            },
            Problem::Intersection {
                object_id,
                way1,
                way1_first,
                way1_second,
                way2,
                way2_first,
                way2_second,
                intersection,
            } => ProblemRow {
                kind: "intersection",
                object_id: Some(object_id.0),
                way1: Some(way1.0),
                way2: Some(way2.0),
                node1: None,
                node2: None,
                locations: format!(
                    "{way1_first} {way1_second} {way2_first} {way2_second} {intersection}"
                ),
            },
            Problem::RingNotClosed {
                object_id,
                first,
                last,
            } => ProblemRow {
                kind: "ring_not_closed",
                object_id: Some(object_id.0),
                way1: None,
                way2: None,
                node1: None,
                node2: None,
                locations: format!("{first} {last}"),
            },
            Problem::RoleShouldBeOuter {
                object_id,
                way,
                first,
                second,
            } => ProblemRow {
                kind: "role_should_be_outer",
                object_id: Some(object_id.0),
                way1: Some(way.0),
                way2: None,
                node1: None,
                node2: None,
                locations: format!("{first} {second}"),
            },
            Problem::RoleShouldBeInner {
                object_id,
                way,
                first,
                second,
            } => ProblemRow {
                kind: "role_should_be_inner",
                object_id: Some(object_id.0),
                way1: Some(way.0),
                way2: None,
                node1: None,
                node2: None,
                locations: format!("{first} {second}"),
            },
        }
    }
}

/// writes the recorded problems to a CSV file
pub fn write_problem_file<P: AsRef<Path>>(path: P, problems: &[Problem]) -> Result<(), CliError> {
    let path_str = path.as_ref().display().to_string();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())
        .map_err(|e| CliError::CsvWriteError(path_str.clone(), e))?;
    for problem in problems {
        writer
            .serialize(ProblemRow::from(problem))
            .map_err(|e| CliError::CsvWriteError(path_str.clone(), e))?;
    }
    writer.flush()?;
    Ok(())
}
