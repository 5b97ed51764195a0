use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    NoEntropy(String),
    InvalidArgs(String),
    InvalidLength,
    NoClassesSpecified,
    EmptyClass,
    IncludeExcludeConflict(String),
    IncludeExceedsLength { include: usize, length: usize },
    InvalidIncludeCharacter(char),
    InvalidIncludeWord(String),
    InvalidSeparator(String),
    ClassFullyExcluded(String),
    PoolExhausted { length: usize, available: usize },
    RetriesExhausted(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::NoEntropy(msg) => write!(f, "entropy error: {}", msg),
            Error::InvalidArgs(msg) => write!(f, "invalid arguments: {}", msg),
            Error::InvalidLength => write!(f, "invalid length: must be at least 1"),
            Error::NoClassesSpecified => write!(f, "no character classes were specified"),
            Error::EmptyClass => write!(f, "empty character classes aren't allowed"),
            Error::IncludeExcludeConflict(item) => {
                write!(f, "{:?} cannot be both included and excluded", item)
            }
            Error::IncludeExceedsLength { include, length } => write!(
                f,
                "{} included items exceed the secret length of {}",
                include, length
            ),
            Error::InvalidIncludeCharacter(c) => {
                write!(f, "include contains an invalid character: {:?}", c)
            }
            Error::InvalidIncludeWord(word) => {
                write!(f, "included word {:?} contains invalid characters", word)
            }
            Error::InvalidSeparator(sep) => {
                write!(f, "separator {:?} must be a single printable character", sep)
            }
            Error::ClassFullyExcluded(name) => write!(
                f,
                "{} class is used and all its characters are excluded",
                name
            ),
            Error::PoolExhausted { length, available } => write!(
                f,
                "length {} is higher than the {} available characters and repetition is turned off",
                length, available
            ),
            Error::RetriesExhausted(step) => write!(f, "gave up after too many retries during {}", step),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<rand_core::OsError> for Error {
    fn from(e: rand_core::OsError) -> Self {
        Error::NoEntropy(format!("operating system RNG failed: {}", e))
    }
}
