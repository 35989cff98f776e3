use crate::model::CliError;
use serde::{Deserialize, Serialize};

/// defines behaviors for a batch area assembly run
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct AssemblerConfiguration {
    /// enables the assembler's verbose trace output. no semantic effect.
    pub debug: bool,
    /// assemble candidates on a thread pool, one assembler and one output
    /// buffer per worker
    pub parallelize: bool,
    /// assemble areas from closed, tagged ways
    pub ways: bool,
    /// assemble areas from type=multipolygon relations
    pub relations: bool,
    /// optional CSV output path for recorded problems
    pub problem_file: Option<String>,
}

impl Default for AssemblerConfiguration {
    fn default() -> Self {
        Self {
            debug: false,
            parallelize: true,
            ways: true,
            relations: true,
            problem_file: None,
        }
    }
}

impl TryFrom<&String> for AssemblerConfiguration {
    type Error = CliError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f)
                .map_err(|e| CliError::ConfigurationError(format!("failure reading {f}: {e}")))?;
            toml::from_str(&s)
                .map_err(|e| CliError::ConfigurationError(format!("failure decoding {f}: {e}")))
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f)
                .map_err(|e| CliError::ConfigurationError(format!("failure reading {f}: {e}")))?;
            serde_json::from_str(&s)
                .map_err(|e| CliError::ConfigurationError(format!("failure decoding {f}: {e}")))
        } else {
            Err(CliError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AssemblerConfiguration;

    #[test]
    fn decodes_partial_json() {
        let conf: AssemblerConfiguration =
            serde_json::from_str(r#"{ "parallelize": false }"#).unwrap();
        assert!(!conf.parallelize);
        assert!(conf.ways);
        assert!(conf.relations);
        assert!(!conf.debug);
    }
}
