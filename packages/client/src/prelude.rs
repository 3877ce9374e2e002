//! Types most callers need

pub use crate::client::{
    Client, ClientBuilder, ClientStatsSnapshot, FetchHandle, FetchState,
};
pub use crate::config::{FetchConfig, FetchOptions};
pub use crate::connect::{
    AttemptError, AttemptRecord, AttemptState, Connect, RaceConfig, RaceError, RaceOutcome,
    TcpConnector,
};
pub use crate::dns::{OrderingPolicy, Resolve, ResolveError};
pub use crate::error::{Error, Kind, Result};
pub use crate::http::{BodyStream, CopyError, FetchRequest, FetchResponse};

pub use ::http::{HeaderMap, StatusCode};
