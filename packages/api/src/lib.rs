//! # happyfetch
//!
//! Fire-and-forget downloads over the happyfetch client.
//!
//! A download takes a URL and two switches: whether to race connection
//! attempts (Happy Eyeballs) and whether to prefer IPv4. The body is written
//! into a [`DownloadSink`] under a timestamp filename and the result is
//! reported to a [`DownloadObserver`]. Cancelled downloads report nothing.

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod builder;
pub mod download;
pub mod handle;
pub mod observer;
pub mod sink;

pub use builder::DownloadBuilder;
pub use download::{DownloadError, DownloadOutcome, suggested_filename};
pub use handle::DownloadHandle;
pub use observer::{DownloadObserver, TracingObserver};
pub use sink::{DirectorySink, DownloadSink, SinkWriter};

pub use happyfetch_client::{Client, FetchConfig, FetchOptions, FetchState, OrderingPolicy};

/// Start downloading `url` into `sink`, reporting to `observer`.
///
/// Must be called from within a tokio runtime. The returned handle can be
/// awaited for the outcome or used to cancel.
pub fn start_download<S, O>(
    url: impl Into<String>,
    use_race_algorithm: bool,
    prefer_ipv4: bool,
    sink: S,
    observer: O,
) -> DownloadHandle
where
    S: DownloadSink,
    O: DownloadObserver,
{
    DownloadBuilder::new(url)
        .happy_eyeballs(use_race_algorithm)
        .prefer_ipv4(prefer_ipv4)
        .sink(sink)
        .observer(observer)
        .start()
}
