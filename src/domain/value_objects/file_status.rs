use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-letter status git reports per file in `--name-status` output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    TypeChanged,
    Unmerged,
    Unknown,
    /// Any other status letter, kept as reported
    Other(char),
}

impl FileStatus {
    pub fn from_letter(letter: char) -> Self {
        match letter {
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'T' => Self::TypeChanged,
            'U' => Self::Unmerged,
            'X' => Self::Unknown,
            other => Self::Other(other),
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::TypeChanged => 'T',
            Self::Unmerged => 'U',
            Self::Unknown => 'X',
            Self::Other(letter) => *letter,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl From<FileStatus> for String {
    fn from(status: FileStatus) -> Self {
        status.letter().to_string()
    }
}

impl TryFrom<String> for FileStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Ok(Self::from_letter(letter)),
            _ => Err(format!("expected a single status letter, got '{}'", value)),
        }
    }
}
