//! Downloads end to end against loopback servers.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use happyfetch::{
    DirectorySink, DownloadBuilder, DownloadObserver, DownloadOutcome, DownloadSink, SinkWriter,
    start_download,
};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_head(stream: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
}

async fn serve(response: &'static str, stall: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        read_head(&mut stream).await;
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        if stall {
            let mut buf = [0u8; 64];
            while stream.read(&mut buf).await.map(|n| n > 0).unwrap_or(false) {}
        } else {
            let _ = stream.shutdown().await;
        }
    });
    addr
}

#[derive(Clone, Default)]
struct MemorySink {
    files: Arc<Mutex<HashMap<String, Arc<Mutex<Vec<u8>>>>>>,
}

impl MemorySink {
    fn contents(&self, filename: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().expect("sink poisoned");
        files
            .get(filename)
            .map(|buf| buf.lock().expect("buffer poisoned").clone())
    }

    fn len(&self) -> usize {
        self.files.lock().expect("sink poisoned").len()
    }
}

struct MemoryWriter(Arc<Mutex<Vec<u8>>>);

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.0.lock().expect("buffer poisoned").extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl DownloadSink for MemorySink {
    fn create<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, io::Result<SinkWriter>> {
        let buf = Arc::new(Mutex::new(Vec::new()));
        self.files
            .lock()
            .expect("sink poisoned")
            .insert(filename.to_owned(), Arc::clone(&buf));
        Box::pin(async move { Ok(Box::new(MemoryWriter(buf)) as SinkWriter) })
    }

    fn discard<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, ()> {
        self.files.lock().expect("sink poisoned").remove(filename);
        Box::pin(async {})
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Complete(String, u64),
    Error(String),
}

#[derive(Clone, Default)]
struct RecordingObserver {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<Event> {
        self.events.lock().expect("observer poisoned").clone()
    }
}

impl DownloadObserver for RecordingObserver {
    fn on_complete(&self, filename: &str, bytes: u64) {
        self.events
            .lock()
            .expect("observer poisoned")
            .push(Event::Complete(filename.to_owned(), bytes));
    }

    fn on_error(&self, message: &str) {
        self.events
            .lock()
            .expect("observer poisoned")
            .push(Event::Error(message.to_owned()));
    }
}

#[tokio::test]
async fn completed_download_is_saved_and_reported() {
    let addr = serve(
        "HTTP/1.1 200 OK\r\nContent-Length: 11\r\nConnection: close\r\n\r\nhello world",
        false,
    )
    .await;
    let sink = MemorySink::default();
    let observer = RecordingObserver::default();

    let outcome = start_download(
        format!("http://{addr}/file"),
        true,
        true,
        sink.clone(),
        observer.clone(),
    )
    .await;

    let DownloadOutcome::Completed { filename, bytes } = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(bytes, 11);
    assert!(filename.chars().all(|c| c.is_ascii_digit()), "{filename}");
    assert_eq!(sink.contents(&filename).as_deref(), Some(&b"hello world"[..]));
    assert_eq!(observer.events(), vec![Event::Complete(filename, 11)]);
}

#[tokio::test]
async fn http_error_reports_status_code() {
    let addr = serve(
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        false,
    )
    .await;
    let sink = MemorySink::default();
    let observer = RecordingObserver::default();

    let outcome = start_download(
        format!("http://{addr}/missing"),
        false,
        false,
        sink.clone(),
        observer.clone(),
    )
    .await;

    assert_eq!(outcome, DownloadOutcome::Failed("404".to_owned()));
    assert_eq!(observer.events(), vec![Event::Error("404".to_owned())]);
    assert_eq!(sink.len(), 0);
}

#[tokio::test]
async fn invalid_url_is_reported_through_observer() {
    let observer = RecordingObserver::default();
    let outcome = DownloadBuilder::new("ftp://example.com/file")
        .sink(MemorySink::default())
        .observer(observer.clone())
        .start()
        .await;

    let DownloadOutcome::Failed(message) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.starts_with("builder error"), "{message}");
    assert_eq!(observer.events(), vec![Event::Error(message)]);
}

#[tokio::test]
async fn missing_sink_fails() {
    let outcome = DownloadBuilder::new("http://127.0.0.1/").start().await;
    assert_eq!(
        outcome,
        DownloadOutcome::Failed("no download sink configured".to_owned())
    );
}

#[tokio::test]
async fn cancelled_download_reports_nothing() {
    let addr = serve(
        "HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\n\r\npartial",
        true,
    )
    .await;
    let sink = MemorySink::default();
    let observer = RecordingObserver::default();

    let handle = DownloadBuilder::new(format!("http://{addr}/big"))
        .happy_eyeballs(true)
        .stagger_delay(Duration::from_millis(50))
        .sink(sink.clone())
        .observer(observer.clone())
        .start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.cancel();

    assert_eq!(handle.await, DownloadOutcome::Cancelled);
    assert!(observer.events().is_empty());
    assert_eq!(sink.len(), 0, "partial download is discarded");
}

#[tokio::test]
async fn directory_sink_writes_file() {
    let addr = serve(
        "HTTP/1.1 200 OK\r\nContent-Length: 4\r\nConnection: close\r\n\r\ndata",
        false,
    )
    .await;
    let dir = std::env::temp_dir().join(format!("happyfetch-test-{}", std::process::id()));
    let sink = DirectorySink::new(&dir);

    let outcome = DownloadBuilder::new(format!("http://{addr}/"))
        .timeout(Duration::from_secs(5))
        .sink(sink.clone())
        .observer(RecordingObserver::default())
        .start()
        .await;

    let DownloadOutcome::Completed { filename, .. } = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    let saved = tokio::fs::read(sink.path_for(&filename))
        .await
        .expect("file exists");
    assert_eq!(saved, b"data");
    tokio_test::assert_ok!(tokio::fs::remove_dir_all(&dir).await);
}
