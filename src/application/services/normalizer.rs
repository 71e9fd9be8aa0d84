use crate::domain::value_objects::commit_record::CommitRecord;
use crate::domain::value_objects::file_status::FileStatus;
use chrono::DateTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::OnceLock;
use thiserror::Error;

/// Raw output did not have the shape a normalizer expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NormalizeError {
    message: String,
}

impl NormalizeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns the raw stdout of a successful command into a typed value
///
/// Called at most once per operation, and only when the command exited with 0.
pub trait Normalizer: Send + Sync {
    type Output: Send;

    fn normalize(&self, raw: &str) -> Result<Self::Output, NormalizeError>;
}

/// Hands stdout back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalizer for Identity {
    type Output = String;

    fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        Ok(raw.to_string())
    }
}

/// Parses `git log --pretty=format:%h%n%at%n%ad%n%s%n%n` output
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitHistory;

impl CommitHistory {
    fn parse_block(block: &str) -> Result<CommitRecord, NormalizeError> {
        let mut lines = block.lines();

        let hash = lines
            .next()
            .map(str::trim)
            .filter(|hash| !hash.is_empty())
            .ok_or_else(|| NormalizeError::new(format!("commit without hash: {:?}", block)))?;

        let seconds: i64 = lines
            .next()
            .and_then(|at| at.trim().parse().ok())
            .ok_or_else(|| {
                NormalizeError::new(format!("commit {} has no unix timestamp", hash))
            })?;
        let timestamp = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            NormalizeError::new(format!("commit {} has an out of range timestamp", hash))
        })?;

        let date = lines
            .next()
            .ok_or_else(|| NormalizeError::new(format!("commit {} has no date", hash)))?;
        // subject may be empty
        let message = lines.next().unwrap_or_default();

        if lines.next().is_some() {
            return Err(NormalizeError::new(format!(
                "commit {} has unexpected extra lines",
                hash
            )));
        }

        Ok(CommitRecord {
            hash: hash.to_string(),
            timestamp,
            date: date.to_string(),
            message: message.to_string(),
        })
    }
}

impl Normalizer for CommitHistory {
    type Output = Vec<CommitRecord>;

    fn normalize(&self, raw: &str) -> Result<Vec<CommitRecord>, NormalizeError> {
        raw.split("\n\n")
            .map(|block| block.trim_matches(|c| c == '\n' || c == '\r'))
            .filter(|block| !block.is_empty())
            .map(Self::parse_block)
            .collect()
    }
}

/// Parses `git diff --name-status` output into path → status
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMap;

impl Normalizer for StatusMap {
    type Output = BTreeMap<String, FileStatus>;

    fn normalize(&self, raw: &str) -> Result<Self::Output, NormalizeError> {
        let mut statuses = BTreeMap::new();

        for line in raw.lines().filter(|line| !line.trim().is_empty()) {
            let (status, path) = line.split_once('\t').ok_or_else(|| {
                NormalizeError::new(format!("expected '<status>\\t<path>', got {:?}", line))
            })?;
            let letter = status
                .chars()
                .next()
                .ok_or_else(|| NormalizeError::new(format!("missing status for {}", path)))?;

            statuses.insert(path.to_string(), FileStatus::from_letter(letter));
        }

        Ok(statuses)
    }
}

/// Line count reported by `wc -l`
///
/// With several files `wc` prints one line per file and a closing `total`
/// line, which wins. Otherwise the first integer of the first line is taken.
/// A single count such as `echo 0` reads the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCount;

fn integer_regex() -> &'static Regex {
    static INTEGER: OnceLock<Regex> = OnceLock::new();
    INTEGER.get_or_init(|| Regex::new(r"\d+").expect("integer regex is valid"))
}

impl Normalizer for LineCount {
    type Output = u64;

    fn normalize(&self, raw: &str) -> Result<u64, NormalizeError> {
        let line = raw
            .lines()
            .map(str::trim)
            .filter(|line| line.ends_with("total"))
            .last()
            .or_else(|| raw.lines().map(str::trim).find(|line| !line.is_empty()))
            .unwrap_or_default();

        let digits = integer_regex()
            .find(line)
            .ok_or_else(|| NormalizeError::new(format!("no line count in {:?}", raw.trim())))?;

        digits
            .as_str()
            .parse()
            .map_err(|e| NormalizeError::new(format!("invalid line count: {}", e)))
    }
}

/// Normalizer backed by a closure
pub struct FnNormalizer<F, T> {
    f: F,
    _output: PhantomData<fn() -> T>,
}

/// Wrap a closure as a [`Normalizer`]
///
/// ```
/// use repos_service::application::services::normalizer::{from_fn, Normalizer};
///
/// let lines = from_fn(|raw: &str| Ok(raw.lines().count()));
/// assert_eq!(lines.normalize("a\nb\n").unwrap(), 2);
/// ```
pub fn from_fn<F, T>(f: F) -> FnNormalizer<F, T>
where
    F: Fn(&str) -> Result<T, NormalizeError> + Send + Sync,
    T: Send,
{
    FnNormalizer {
        f,
        _output: PhantomData,
    }
}

impl<F, T> Normalizer for FnNormalizer<F, T>
where
    F: Fn(&str) -> Result<T, NormalizeError> + Send + Sync,
    T: Send,
{
    type Output = T;

    fn normalize(&self, raw: &str) -> Result<T, NormalizeError> {
        (self.f)(raw)
    }
}
