//! WebSocket listener and connection on `tokio-tungstenite`.

use std::net::SocketAddr;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Transport, TransportError};

type Socket = WebSocketStream<TcpStream>;

pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds a TCP listener; `"127.0.0.1:0"` picks a free port.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Bind)?;
        tracing::info!(addr, "listening for websocket clients");
        Ok(Self { listener })
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<WebSocketConnection, TransportError> {
        let (tcp, peer_addr) = self.listener.accept().await.map_err(TransportError::Accept)?;
        let socket = tokio_tungstenite::accept_async(tcp)
            .await
            .map_err(|e| TransportError::Upgrade(e.to_string()))?;

        let id = ConnectionId::next();
        tracing::debug!(%id, %peer_addr, "websocket upgraded");

        let (writer, reader) = socket.split();
        Ok(WebSocketConnection {
            id,
            peer_addr,
            writer: Mutex::new(writer),
            reader: Mutex::new(reader),
        })
    }

    fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// An upgraded socket, split so reads and writes lock separately.
pub struct WebSocketConnection {
    id: ConnectionId,
    peer_addr: SocketAddr,
    writer: Mutex<SplitSink<Socket, Message>>,
    reader: Mutex<SplitStream<Socket>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    /// Valid UTF-8 goes out as a text frame, anything else as binary.
    async fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        let msg = match std::str::from_utf8(frame) {
            Ok(text) => Message::text(text.to_owned()),
            Err(_) => Message::binary(frame.to_vec()),
        };
        self.writer
            .lock()
            .await
            .send(msg)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    /// Text and binary frames are both returned as bytes; control frames
    /// are skipped.
    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut reader = self.reader.lock().await;
        while let Some(frame) = reader.next().await {
            match frame.map_err(|e| TransportError::Receive(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text.as_bytes().to_vec())),
                Message::Binary(data) => return Ok(Some(data.to_vec())),
                Message::Close(_) => return Ok(None),
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
        Ok(None)
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.writer
            .lock()
            .await
            .close()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    fn id(&self) -> ConnectionId {
        self.id
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
