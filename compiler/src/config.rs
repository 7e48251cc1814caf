use serde::Deserialize;

use crate::error::Error;

/// Driver options. Loadable from YAML; every field is optional there.
///
/// ```yaml
/// input: prog.sl
/// output: prog.sml
/// verbose: true
/// symbols: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Source file, `-` for stdin
    pub input: String,
    /// Compiled program file, `-` for stdout
    pub output: String,
    pub verbose: bool,
    /// Print the symbol table after compiling
    pub symbols: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            input: "main.sl".to_string(),
            output: "main.sml".to_string(),
            verbose: false,
            symbols: false,
        }
    }
}

impl Options {
    pub fn from_yaml(name: &str, text: &str) -> Result<Self, Error> {
        serde_yaml::from_str(text).map_err(|e| Error::Config(name.to_string(), e))
    }

    pub fn load(path: &str) -> Result<Self, Error> {
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        Self::from_yaml(path, &text)
    }
}
