//! End-to-end fetches against loopback HTTP/1.1 servers.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use happyfetch_client::connect::{Connect, Connecting};
use happyfetch_client::dns::{Addrs, Name, OverrideResolver, Resolve, ResolveError, Resolving};
use happyfetch_client::{Client, FetchConfig, FetchState, Kind};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

async fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Serve one connection with a canned response, returning the request head.
async fn serve_once(response: &'static str) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let head = read_head(&mut stream).await;
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = stream.shutdown().await;
        head
    });
    (addr, server)
}

/// Serve headers and a first chunk of a large body, then wait for the client
/// to hang up. Resolves once the connection is closed.
async fn serve_stalled_body() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\n\r\nfirst-chunk")
            .await
            .expect("write response head");
        let mut buf = [0u8; 64];
        while stream.read(&mut buf).await.map(|n| n > 0).unwrap_or(false) {}
    });
    (addr, server)
}

/// Read the request head, report it, then wait for the client to hang up
/// without ever replying. Resolves to the bytes read after the head.
async fn serve_silent() -> (SocketAddr, oneshot::Receiver<()>, JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    let (head_tx, head_rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        read_head(&mut stream).await;
        let _ = head_tx.send(());
        let mut rest = 0;
        let mut buf = [0u8; 64];
        while let Ok(n) = stream.read(&mut buf).await {
            if n == 0 {
                break;
            }
            rest += n;
        }
        rest
    });
    (addr, head_rx, server)
}

/// Decrements a counter when dropped.
struct Live(Arc<AtomicUsize>);

impl Live {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for Live {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Connector whose attempts never complete.
#[derive(Clone, Default)]
struct HangingConnector {
    in_flight: Arc<AtomicUsize>,
}

impl Connect for HangingConnector {
    type Conn = DuplexStream;

    fn connect(&self, _addr: SocketAddr) -> Connecting<DuplexStream> {
        let live = Live::new(&self.in_flight);
        Box::pin(async move {
            let _live = live;
            std::future::pending::<io::Result<DuplexStream>>().await
        })
    }
}

/// Resolver whose lookups never complete.
struct HangingResolver;

impl Resolve for HangingResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        Box::pin(std::future::pending::<Result<Addrs, ResolveError>>())
    }
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn fetches_body_over_loopback() {
    let (addr, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 11\r\nConnection: close\r\n\r\nhello world",
    )
    .await;
    let client = Client::new();
    let request = client
        .request(format!("http://{addr}/files/a.bin?v=1"))
        .expect("valid url");

    let response = client.fetch(request).await.expect("fetch succeeds");
    assert_eq!(response.status(), 200);
    assert_eq!(response.remote_addr(), addr);
    assert_eq!(response.content_length(), Some(11));
    assert_eq!(response.state(), FetchState::ReceivingBody);

    let state = response.subscribe();
    let body = response.bytes().await.expect("body is readable");
    assert_eq!(&body[..], b"hello world");
    assert_eq!(*state.borrow(), FetchState::Completed);

    let head = server.await.expect("server task").to_ascii_lowercase();
    assert!(head.starts_with("get /files/a.bin?v=1 http/1.1\r\n"), "{head}");
    assert!(head.contains(&format!("host: {addr}\r\n")), "{head}");
    assert!(head.contains("user-agent: happyfetch/"), "{head}");
    assert!(head.contains("accept: */*"), "{head}");

    let stats = client.stats();
    assert_eq!(stats.fetches_total, 1);
    assert_eq!(stats.fetches_completed, 1);
    assert_eq!(stats.bytes_received, 11);
}

#[tokio::test]
async fn copies_body_into_writer() {
    let (addr, _server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nabcde",
    )
    .await;
    let client = Client::new();
    let request = client.request(format!("http://{addr}/")).expect("valid url");

    let response = client.fetch(request).await.expect("fetch succeeds");
    let mut sink = Vec::new();
    let written = response
        .into_body()
        .copy_to(&mut sink)
        .await
        .expect("copy succeeds");
    assert_eq!(written, 5);
    assert_eq!(sink, b"abcde");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (addr, _server) = serve_once(
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;
    let client = Client::new();
    let request = client.request(format!("http://{addr}/missing")).expect("valid url");

    let err = client.fetch(request).await.expect_err("404 is a failure");
    assert!(err.is_status());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert_eq!(err.user_message().as_deref(), Some("404"));
    assert_eq!(client.stats().fetches_failed, 1);
}

#[tokio::test]
async fn resolution_failure_is_distinct() {
    let client = Client::builder()
        .resolver(OverrideResolver::system().with_override("empty.test", Vec::new()))
        .build()
        .expect("valid client");
    let request = client.request("http://empty.test/").expect("valid url");

    let err = tokio_test::assert_err!(client.fetch(request).await);
    assert_eq!(err.kind(), Kind::Resolve);
    assert!(err.user_message().is_some());
}

#[tokio::test]
async fn refused_connection_is_a_race_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
        listener.local_addr().expect("probe address")
    };
    let client = Client::new();
    let request = client
        .request(format!("http://{addr}/"))
        .expect("valid url")
        .with_race(true);

    let err = client.fetch(request).await.expect_err("nothing listens");
    assert!(err.is_race());
    let race = err.race_error().expect("race error attached");
    assert_eq!(race.attempts().len(), 1);
    assert_eq!(race.attempts()[0].addr(), addr);
}

#[tokio::test]
async fn race_falls_back_from_unroutable_ipv6() {
    let (addr, _server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
    )
    .await;
    let ips: Vec<IpAddr> = vec![
        "2001:db8::1".parse().expect("valid ip in test"),
        "127.0.0.1".parse().expect("valid ip in test"),
    ];
    let config = FetchConfig::default()
        .with_race(true)
        .with_stagger_delay(Duration::from_millis(50));
    let client = Client::builder()
        .config(config)
        .resolver(OverrideResolver::system().with_override("race.test", ips))
        .build()
        .expect("valid client");
    let request = client
        .request(format!("http://race.test:{}/", addr.port()))
        .expect("valid url");

    let response = tokio_test::assert_ok!(client.fetch(request).await);
    assert_eq!(response.remote_addr(), addr);
    assert_eq!(&response.bytes().await.expect("body")[..], b"ok");
}

#[tokio::test(start_paused = true)]
async fn overall_deadline_times_out_racing_fetch() {
    let connector = HangingConnector::default();
    let config = FetchConfig::default()
        .with_race(true)
        .with_attempt_timeout(None)
        .with_overall_timeout(Duration::from_millis(10_000));
    let client = Client::builder()
        .config(config)
        .connector(connector.clone())
        .build()
        .expect("valid client");
    let request = client.request("http://192.0.2.1/").expect("valid url");

    let handle = client.spawn(request);
    let state = handle.subscribe();
    let err = handle.await.expect_err("every attempt hangs");

    assert!(err.is_timeout());
    assert_eq!(*state.borrow(), FetchState::TimedOut);
    settle().await;
    assert_eq!(connector.in_flight.load(Ordering::SeqCst), 0);
    assert_eq!(client.stats().fetches_timed_out, 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_while_racing() {
    let connector = HangingConnector::default();
    let client = Client::builder()
        .config(FetchConfig::default().with_race(true))
        .connector(connector.clone())
        .build()
        .expect("valid client");
    let request = client.request("http://192.0.2.1/").expect("valid url");

    let handle = client.spawn(request);
    let mut state = handle.subscribe();
    state
        .wait_for(|s| *s == FetchState::Racing)
        .await
        .expect("fetch task alive");
    settle().await;
    assert_eq!(connector.in_flight.load(Ordering::SeqCst), 1);

    handle.cancel();
    let err = handle.await.expect_err("cancelled");
    assert!(err.is_canceled());
    assert_eq!(err.user_message(), None);
    assert_eq!(*state.borrow(), FetchState::Cancelled);

    settle().await;
    assert_eq!(connector.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancel_while_resolving() {
    let client = Client::builder()
        .resolver(HangingResolver)
        .build()
        .expect("valid client");
    let request = client.request("http://slow.test/").expect("valid url");

    let handle = client.spawn(request);
    let mut state = handle.subscribe();
    state
        .wait_for(|s| *s == FetchState::Resolving)
        .await
        .expect("fetch task alive");

    handle.cancel();
    let err = handle.await.expect_err("cancelled");
    assert!(err.is_canceled());
    assert_eq!(*state.borrow(), FetchState::Cancelled);
}

#[tokio::test]
async fn cancel_while_sending_closes_connection() {
    let (addr, head_seen, server) = serve_silent().await;
    let client = Client::new();
    let request = client.request(format!("http://{addr}/slow")).expect("valid url");

    let handle = client.spawn(request);
    let mut state = handle.subscribe();
    state
        .wait_for(|s| *s == FetchState::Sending)
        .await
        .expect("fetch task alive");
    head_seen.await.expect("server received the request");

    handle.cancel();
    let err = handle.await.expect_err("cancelled");
    assert_eq!(err.kind(), Kind::Canceled);
    assert_eq!(*state.borrow(), FetchState::Cancelled);

    let rest = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server sees the connection close")
        .expect("server task");
    assert_eq!(rest, 0);
    assert_eq!(client.stats().fetches_cancelled, 1);
}

#[tokio::test]
async fn cancel_while_receiving_body_closes_connection() {
    let (addr, server) = serve_stalled_body().await;
    let client = Client::new();
    let request = client.request(format!("http://{addr}/big")).expect("valid url");

    let handle = client.spawn(request);
    let token = handle.cancellation_token();
    let response = handle.await.expect("headers arrive");
    let state = response.subscribe();
    let mut body = response.into_body();

    let first = body
        .next()
        .await
        .expect("first chunk")
        .expect("first chunk is readable");
    assert_eq!(&first[..], b"first-chunk");
    assert_eq!(*state.borrow(), FetchState::ReceivingBody);

    token.cancel();
    let err = body
        .next()
        .await
        .expect("cancellation is reported")
        .expect_err("body was cancelled");
    assert!(err.is_canceled());
    assert_eq!(*state.borrow(), FetchState::Cancelled);
    assert!(body.next().await.is_none());

    drop(body);
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server sees the connection close")
        .expect("server task");
}

#[tokio::test]
async fn dropping_body_marks_fetch_cancelled() {
    let (addr, server) = serve_stalled_body().await;
    let client = Client::new();
    let request = client.request(format!("http://{addr}/big")).expect("valid url");

    let response = client.fetch(request).await.expect("headers arrive");
    let state = response.subscribe();
    drop(response);

    assert_eq!(*state.borrow(), FetchState::Cancelled);
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server sees the connection close")
        .expect("server task");
}

#[tokio::test]
async fn out_of_range_request_timeout_is_rejected() {
    let client = Client::new();

    for timeout in [Duration::MAX, Duration::ZERO, Duration::from_secs(7200)] {
        let request = client
            .request("http://127.0.0.1:9/")
            .expect("valid url")
            .with_timeout(timeout);
        let handle = client.spawn(request);
        let state = handle.subscribe();

        let err = handle.await.expect_err("timeout is out of range");
        assert!(err.is_builder(), "{timeout:?}: {err}");
        assert_eq!(*state.borrow(), FetchState::Failed);
    }

    let stats = client.stats();
    assert_eq!(stats.fetches_failed, 3);
    assert_eq!(stats.attempts_launched, 0);
}
