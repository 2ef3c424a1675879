use std::{error::Error, fmt, io};

/// Everything that can stop a simulation from starting (or, for
/// `Cancelled`, from finishing).
#[derive(Debug)]
pub enum SimError {
    UnknownAlgorithm(String),
    MissingQuantum,
    InvalidQuantum(i64),
    InvalidContextSwitch(i64),
    InvalidBurst { process: String, burst: i64 },
    NegativeArrival { process: String, arrival: i64 },
    DuplicateName(String),
    ReservedName(String),
    Cancelled { at: u64 },
    Io(io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownAlgorithm(name) => write!(
                f,
                "unknown algorithm `{name}` (expected one of FCFS, SJF, PRIORITY, SRT, RR)"
            ),
            SimError::MissingQuantum => write!(f, "RR requires a quantum"),
            SimError::InvalidQuantum(q) => write!(f, "quantum must be > 0, got {q}"),
            SimError::InvalidContextSwitch(cs) => {
                write!(f, "context switch cost must be >= 0, got {cs}")
            }
            SimError::InvalidBurst { process, burst } => {
                write!(f, "process {process}: burst must be > 0, got {burst}")
            }
            SimError::NegativeArrival { process, arrival } => {
                write!(f, "process {process}: arrival must be >= 0, got {arrival}")
            }
            SimError::DuplicateName(name) => write!(f, "duplicate process name `{name}`"),
            SimError::ReservedName(name) => {
                write!(f, "process name `{name}` is reserved")
            }
            SimError::Cancelled { at } => write!(f, "simulation cancelled at tick {at}"),
            SimError::Io(err) => write!(f, "i/o error: {err}"),
            SimError::Toml(err) => write!(f, "invalid TOML config: {err}"),
            SimError::Json(err) => write!(f, "invalid JSON config: {err}"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimError::Io(err) => Some(err),
            SimError::Toml(err) => Some(err),
            SimError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SimError {
    fn from(err: io::Error) -> Self {
        SimError::Io(err)
    }
}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::Toml(err)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Json(err)
    }
}
