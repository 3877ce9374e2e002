//! Connection types: the connector seam, race attempts and race outcomes

pub mod attempt;
pub mod connector;
pub mod outcome;

pub use attempt::{AttemptError, AttemptRecord, AttemptState, RaceError, WinnerGate};
pub use connector::{Connect, Connecting};
pub use outcome::RaceOutcome;
