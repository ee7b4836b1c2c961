//! Native HTTP server implementation
//!
//! - One listener on a fixed port, all interfaces if permitted
//! - Loopback-only fallback when binding all interfaces is denied
//! - One tokio task per accepted connection, HTTP/1.1 via hyper
//! - TCP_NODELAY for low latency

use crate::dispatch::ServerState;
use crate::{Error, Method, Request, Response, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn, Instrument};

/// Interfaces the listener ended up bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindScope {
    AllInterfaces,
    /// Binding all interfaces was denied; reachable from this host only
    LoopbackOnly,
}

/// Bind `port` on all interfaces, falling back to loopback on `PermissionDenied`
///
/// Any other failure, or a failed fallback, is returned as [`Error::Bind`].
pub fn bind_with_fallback<T>(
    port: u16,
    mut bind: impl FnMut(SocketAddr) -> io::Result<T>,
) -> Result<(T, BindScope)> {
    let wildcard = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    match bind(wildcard) {
        Ok(listener) => Ok((listener, BindScope::AllInterfaces)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(addr = %wildcard, err = %e, "access denied binding all interfaces");

            let loopback = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
            let listener = bind(loopback).map_err(|source| Error::Bind {
                addr: loopback,
                source,
            })?;

            warn!(addr = %loopback, "listener only bound to localhost");
            Ok((listener, BindScope::LoopbackOnly))
        }
        Err(source) => Err(Error::Bind {
            addr: wildcard,
            source,
        }),
    }
}

/// Create a listening TCP socket with optimizations
pub fn create_listener_socket(addr: &SocketAddr) -> io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    Ok(socket)
}

fn bind_tokio(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = create_listener_socket(&addr)?;
    TcpListener::from_std(socket.into())
}

/// Bound listener, ready to accept
pub struct Listener {
    inner: TcpListener,
    scope: BindScope,
}

impl Listener {
    /// Bind the service port; must run inside a tokio runtime
    pub fn bind(port: u16) -> Result<Self> {
        let (inner, scope) = bind_with_fallback(port, bind_tokio)?;
        Ok(Self { inner, scope })
    }

    pub fn scope(&self) -> BindScope {
        self.scope
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }

    /// Accept connections forever, one task per connection
    ///
    /// Accept errors are logged and the loop continues.
    pub async fn serve(self, state: Arc<ServerState>) {
        loop {
            let (stream, peer) = match self.inner.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(err = %e, "failed to accept connection");
                    continue;
                }
            };

            let state = state.clone();
            tokio::spawn(
                serve_connection(stream, state).instrument(tracing::debug_span!("conn", %peer)),
            );
        }
    }
}

/// Bind `port` and serve until the process exits
pub async fn run(port: u16, state: Arc<ServerState>) -> Result<()> {
    let listener = Listener::bind(port)?;
    info!(
        addr = %listener.local_addr()?,
        scope = ?listener.scope(),
        "admin HTTP server listening"
    );

    listener.serve(state).await;
    Ok(())
}

async fn serve_connection(stream: TcpStream, state: Arc<ServerState>) {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(err = %e, "cannot set TCP_NODELAY");
    }

    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        let state = state.clone();
        async move { handle_request(state, req).await }
    });

    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        debug!(err = %e, "connection closed with error");
    }
}

async fn handle_request(
    state: Arc<ServerState>,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>> {
    let request = from_hyper_request(req).await?;
    let response = state.handle(request).await?;
    to_hyper_response(response)
}

/// Convert hyper request to our Request type, reading the whole body
pub async fn from_hyper_request(req: hyper::Request<Incoming>) -> Result<Request> {
    let (parts, body) = req.into_parts();

    let method = parts.method.as_str().parse().unwrap_or(Method::Get);
    let mut request = Request::new(method, parts.uri.path());
    request.query = parts.uri.query().map(|s| s.to_string());

    for (name, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    request.body = body
        .collect()
        .await
        .map_err(|e| Error::Hyper(e.to_string()))?
        .to_bytes();

    Ok(request)
}

/// Convert our Response to hyper Response
pub fn to_hyper_response(res: Response) -> Result<hyper::Response<Full<Bytes>>> {
    let mut builder = hyper::Response::builder()
        .status(res.status.as_u16())
        .header(http::header::CONTENT_LENGTH, res.content_length());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Full::new(res.body))
        .map_err(|e| Error::Hyper(e.to_string()))
}
