use crate::model::area::Area;
use crate::model::osm::{Relation, Way};
use crate::model::CliError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// the primitives one assembly batch works over, as read from a JSON
/// document: ways with located node references and relations with way
/// members. this stands in for the upstream reader/collector plumbing.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AreaDocument {
    #[serde(default)]
    pub ways: Vec<Way>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl AreaDocument {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AreaDocument, CliError> {
        let s = std::fs::read_to_string(path)?;
        let document = serde_json::from_str(&s)?;
        Ok(document)
    }
}

/// the assembled output document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AssembledAreas {
    pub areas: Vec<Area>,
}

impl AssembledAreas {
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let s = serde_json::to_string_pretty(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }
}
