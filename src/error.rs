/// Possible gain selection errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GainError {
    /// The band number is outside of 1 to 9
    InvalidBand(i64),
    /// The node is neither +1 (ascending) nor -1 (descending)
    InvalidNode(i64),
    /// The orbit never crosses this latitude
    UnreachableLatitude(f32),
    /// The inputs don't have the expected shape(s)
    InconsistentInputs,
    /// The operation was aborted early
    Cancelled,
    /// The worker thread pool couldn't be started
    ThreadPool(String),
    /// A STAR date field couldn't be parsed
    InvalidDate(String),
    /// A STAR corner point couldn't be parsed
    InvalidPoint(String),
}

impl std::fmt::Display for GainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GainError::InvalidBand(band) => {
                write!(f, "band must be >= 1 and <= 9, got {band}")
            }
            GainError::InvalidNode(node) => {
                write!(f, "node must be +1 (ascending) or -1 (descending), got {node}")
            }
            GainError::UnreachableLatitude(lat) => {
                write!(f, "latitude {lat} is never crossed by the orbit")
            }
            GainError::InconsistentInputs => write!(f, "inputs have the wrong shape"),
            GainError::Cancelled => write!(f, "operation cancelled early"),
            GainError::ThreadPool(e) => write!(f, "couldn't build thread pool: {e}"),
            GainError::InvalidDate(field) => write!(f, "couldn't parse date field {field:?}"),
            GainError::InvalidPoint(point) => write!(f, "couldn't parse point {point:?}"),
        }
    }
}

impl std::error::Error for GainError {}
