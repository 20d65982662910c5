use std::path::PathBuf;

use crate::error::ImportError;

pub const DEFAULT_INPUT_DIR: &str = "sanderland-tsumego/problems/";
pub const DEFAULT_OUTPUT: &str = "all_problems.json";
pub const DEFAULT_MAX_PROBLEMS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    /// `None` converts every problem found.
    pub max_problems: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_problems: Some(DEFAULT_MAX_PROBLEMS),
        }
    }
}

impl Config {
    /// Read `TSUMEGO_INPUT_DIR`, `TSUMEGO_OUTPUT` and `TSUMEGO_MAX_PROBLEMS`.
    pub fn from_env() -> Result<Self, ImportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ImportError> {
        let defaults = Config::default();

        let input_dir = lookup("TSUMEGO_INPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.input_dir);
        let output = lookup("TSUMEGO_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or(defaults.output);
        let max_problems = match lookup("TSUMEGO_MAX_PROBLEMS") {
            None => defaults.max_problems,
            Some(v) => parse_max(&v)?,
        };

        Ok(Config {
            input_dir,
            output,
            max_problems,
        })
    }
}

fn parse_max(value: &str) -> Result<Option<usize>, ImportError> {
    match value.trim() {
        "none" | "0" => Ok(None),
        v => v.parse().map(Some).map_err(|_| {
            ImportError::Config(format!(
                "TSUMEGO_MAX_PROBLEMS must be a number or 'none', was '{value}'"
            ))
        }),
    }
}
