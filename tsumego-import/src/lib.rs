use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tsumego_engine::{Problem, TsumegoData};

pub mod config;
pub mod error;

use config::Config;
use error::ImportError;

#[derive(Serialize)]
struct Collection<'a> {
    problems: &'a [TsumegoData],
}

/// Outcome of a batch conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

/// Convert the problems under `config.input_dir` and write them to
/// `config.output`. Problems that fail to convert are logged and skipped.
pub fn run(config: &Config) -> Result<Summary, ImportError> {
    let mut paths = find_problem_paths(&config.input_dir)?;
    paths.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    if let Some(max) = config.max_problems {
        paths.truncate(max);
    }

    let mut problems = Vec::with_capacity(paths.len());
    let mut failed = 0;
    for path in &paths {
        match load_problem(path, &config.input_dir) {
            Ok(data) => problems.push(data),
            Err(e) => {
                tracing::warn!("Failed to load {e}");
                failed += 1;
            }
        }
    }

    write_output(&config.output, &problems)?;

    Ok(Summary {
        converted: problems.len(),
        failed,
    })
}

/// Load and validate one problem file. Every exported problem has Black to play.
pub fn load_problem(path: &Path, input_dir: &Path) -> Result<TsumegoData, ImportError> {
    let text = fs::read_to_string(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|e| ImportError::Json(path.to_path_buf(), e))?;

    let problem_err = |e| ImportError::Problem(path.to_path_buf(), e);
    let problem = Problem::from_input(&problem_name(path, input_dir), &value)
        .map_err(problem_err)?
        .black_to_play();
    problem.to_tsumego().map_err(problem_err)?;
    let data = problem.to_data().map_err(problem_err)?;

    tracing::debug!("Loaded {}", problem.name);
    Ok(data)
}

/// All `.json` files under `dir`, recursively. Symbolic links are skipped.
pub fn find_problem_paths(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut paths = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| ImportError::Io(dir.clone(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ImportError::Io(dir.clone(), e))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|e| ImportError::Io(path.clone(), e))?;
            if file_type.is_symlink() {
                tracing::debug!("Skipping symbolic link {}", path.display());
            } else if file_type.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}

/// The path relative to the input directory, without the `.json` suffix,
/// using `/` as separator.
pub fn problem_name(path: &Path, input_dir: &Path) -> String {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compare strings so that runs of digits are ordered by value:
/// `"p2"` sorts before `"p10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x = take_digits(&mut a);
                let y = take_digits(&mut b);
                let x_trim = x.trim_start_matches('0');
                let y_trim = y.trim_start_matches('0');
                let ord = x_trim
                    .len()
                    .cmp(&y_trim.len())
                    .then_with(|| x_trim.cmp(y_trim))
                    .then_with(|| x.len().cmp(&y.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn write_output(path: &Path, problems: &[TsumegoData]) -> Result<(), ImportError> {
    let json = serde_json::to_string(&Collection { problems })
        .map_err(|e| ImportError::Json(path.to_path_buf(), e))?;
    fs::write(path, json).map_err(|e| ImportError::Io(path.to_path_buf(), e))
}
