//! Transport to the game server.
//!
//! A transport sends one [`Request`] and blocks until exactly one reply
//! document arrives. The episode controller owns its transport and never has
//! more than one request in flight.

use crate::protocol::Request;
use serde::{Deserialize, Serialize};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;
use tungstenite::error::ProtocolError;
use tungstenite::{Message, WebSocket};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PATH: &str = "/handleMove";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not resolve server address {0}")]
    Resolve(String),
    #[error("WebSocket handshake with {url} failed: {reason}")]
    Handshake { url: String, reason: String },
    #[error("WebSocket error: {0}")]
    WebSocket(tungstenite::Error),
    /// The server closed the connection instead of replying.
    #[error("connection closed by server")]
    Closed,
}

impl From<tungstenite::Error> for TransportError {
    fn from(e: tungstenite::Error) -> Self {
        match e {
            tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
                TransportError::Closed
            }
            tungstenite::Error::Io(e) => TransportError::Io(e),
            other => TransportError::WebSocket(other),
        }
    }
}

/// Request/response channel to the game server.
pub trait Transport {
    /// Send `request` and return the raw reply document.
    fn exchange(&mut self, request: &Request) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exchange(&mut self, request: &Request) -> Result<String, TransportError> {
        (**self).exchange(request)
    }
}

/// Where and how to reach the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Endpoint that accepts the WebSocket upgrade.
    pub path: String,
    pub connect_timeout_ms: u64,
    /// `None` blocks indefinitely on a stalled reply.
    pub read_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn url(&self) -> String {
        let slash = if self.path.starts_with('/') { "" } else { "/" };
        format!("ws://{}:{}{}{}", self.host, self.port, slash, self.path)
    }
}

/// JSON text frames over a persistent WebSocket connection.
///
/// The connection is established lazily on the first exchange and reused
/// afterwards. Each request is one text frame; the next text frame back is
/// its reply.
pub struct WsTransport {
    config: ServerConfig,
    socket: Option<WebSocket<TcpStream>>,
}

impl WsTransport {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            socket: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    pub fn connect(&mut self) -> Result<(), TransportError> {
        if self.socket.is_some() {
            return Ok(());
        }

        let address = self.config.address();
        let url = self.config.url();
        log::info!("Connecting to game server at {}", url);
        let addr = address
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| TransportError::Resolve(address.clone()))?;

        let stream = TcpStream::connect_timeout(
            &addr,
            Duration::from_millis(self.config.connect_timeout_ms),
        )?;
        stream.set_read_timeout(self.config.read_timeout_ms.map(Duration::from_millis))?;
        stream.set_nodelay(true).ok(); // one small message per step

        let (socket, _response) =
            tungstenite::client(url.as_str(), stream).map_err(|e| TransportError::Handshake {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        log::info!("Connected to game server");
        self.socket = Some(socket);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None);
            log::info!("Disconnected from game server");
        }
    }

    fn exchange_connected(&mut self, text: String) -> Result<String, TransportError> {
        let Some(socket) = self.socket.as_mut() else {
            return Err(TransportError::Closed);
        };

        socket.send(Message::Text(text))?;
        loop {
            match socket.read()? {
                Message::Text(reply) => {
                    log::trace!("<- {}", reply);
                    return Ok(reply);
                }
                Message::Binary(bytes) => {
                    let reply = String::from_utf8(bytes).map_err(|e| {
                        TransportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                    })?;
                    log::trace!("<- {}", reply);
                    return Ok(reply);
                }
                Message::Close(_) => return Err(TransportError::Closed),
                // Pings are answered inside tungstenite.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }
}

impl Transport for WsTransport {
    fn exchange(&mut self, request: &Request) -> Result<String, TransportError> {
        self.connect()?;
        let text = request.to_json()?;
        log::trace!("-> {}", text);

        let result = self.exchange_connected(text);
        if result.is_err() {
            // A half-finished exchange leaves the socket out of sync.
            self.disconnect();
        }
        result
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;
    use tungstenite::handshake::server::{Request as Upgrade, Response};

    fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    fn config(port: u16) -> ServerConfig {
        ServerConfig {
            port,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.url(), "ws://127.0.0.1:8080/handleMove");
        assert_eq!(config.read_timeout_ms, None);
    }

    #[test]
    fn test_url_adds_missing_slash() {
        let config = ServerConfig {
            path: "play".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(config.url(), "ws://127.0.0.1:8080/play");
    }

    #[test]
    fn test_exchange_upgrades_and_sends_text_frames() {
        let (listener, port) = listener();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut path = String::new();
            let mut ws = tungstenite::accept_hdr(stream, |req: &Upgrade, resp: Response| {
                path = req.uri().path().to_string();
                Ok(resp)
            })
            .map_err(|e| e.to_string())
            .unwrap();

            let mut seen = Vec::new();
            for _ in 0..2 {
                match ws.read().unwrap() {
                    Message::Text(text) => seen.push(text),
                    other => panic!("expected a text frame, got {other:?}"),
                }
                ws.send(Message::Text("{\"ok\":true}".to_string())).unwrap();
            }
            (path, seen)
        });

        let mut transport = WsTransport::new(config(port));
        assert!(!transport.is_connected());
        let reply = transport.exchange(&Request::NewGame).unwrap();
        assert_eq!(reply, "{\"ok\":true}");
        assert!(transport.is_connected());
        transport.exchange(&Request::NewGame).unwrap();
        drop(transport);

        let (path, seen) = server.join().unwrap();
        assert_eq!(path, "/handleMove");
        assert_eq!(seen, vec!["{\"command\":\"new_game\"}"; 2]);
    }

    #[test]
    fn test_server_close_is_closed() {
        let (listener, port) = listener();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).map_err(|e| e.to_string()).unwrap();
            ws.read().unwrap();
            ws.close(None).unwrap();
            // Drain until the client acknowledges or hangs up.
            while ws.read().is_ok() {}
        });

        let mut transport = WsTransport::new(config(port));
        let err = transport.exchange(&Request::NewGame).unwrap_err();
        assert!(matches!(err, TransportError::Closed), "got {err:?}");
        assert!(!transport.is_connected());
        server.join().unwrap();
    }

    #[test]
    fn test_plain_http_peer_fails_handshake() {
        let (listener, port) = listener();

        let server = thread::spawn(move || {
            use std::io::{Read, Write};
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).unwrap();
            stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
                .unwrap();
        });

        let mut transport = WsTransport::new(config(port));
        let err = transport.exchange(&Request::NewGame).unwrap_err();
        assert!(matches!(err, TransportError::Handshake { .. }), "got {err:?}");
        assert!(!transport.is_connected());
        server.join().unwrap();
    }
}
