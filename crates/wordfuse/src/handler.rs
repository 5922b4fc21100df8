//! Per-connection handler: handshake, request routing, and event delivery.
//!
//! Each accepted connection gets its own Tokio task running this handler:
//!   1. Receive `hello` → check the protocol version
//!   2. Open a session → send `welcome` with the player's id
//!   3. Loop over three sources until one of them ends the connection:
//!      client frames (routed to the room manager, answered directly),
//!      room events (forwarded as they arrive), and the idle deadline.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use wordfuse_dictionary::Dictionary;
use wordfuse_protocol::{
    ClientMessage, Codec, Envelope, PROTOCOL_VERSION, PlayerId, ProtocolError, ServerMessage,
};
use wordfuse_room::{PlayerSender, RoomError};
use wordfuse_transport::{Connection, WebSocketConnection};

use crate::WordfuseError;
use crate::server::ServerState;

/// Takes the player out of their room and closes their session when the
/// handler exits, however it exits.
///
/// `Drop` is synchronous, so the cleanup runs on a spawned task.
struct SessionGuard<D: Dictionary, C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<D, C>>,
}

impl<D: Dictionary, C: Codec> Drop for SessionGuard<D, C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let left = state.rooms.lock().await.leave_room(player_id).await;
            if let Ok(room) = left {
                tracing::info!(%player_id, %room, "left room on disconnect");
            }
            let _ = state.sessions.lock().await.disconnect(player_id);
        });
    }
}

/// Writes envelopes to one connection, numbering them as it goes.
struct Outgoing<'a, C: Codec> {
    conn: &'a WebSocketConnection,
    codec: &'a C,
    seq: u64,
    start: Instant,
}

impl<'a, C: Codec> Outgoing<'a, C> {
    fn new(conn: &'a WebSocketConnection, codec: &'a C) -> Self {
        Self {
            conn,
            codec,
            seq: 0,
            start: Instant::now(),
        }
    }

    /// Milliseconds since the connection was accepted.
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn next_seq(&mut self) -> u64 {
        let current = self.seq;
        self.seq += 1;
        current
    }

    async fn send(&mut self, msg: ServerMessage) -> Result<(), WordfuseError> {
        let envelope = Envelope::new(self.next_seq(), self.elapsed_ms(), msg);
        let bytes = self.codec.encode(&envelope)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }

    /// Protocol-level failure, outside any room.
    async fn send_error(&mut self, code: u16, message: impl Into<String>) -> Result<(), WordfuseError> {
        self.send(ServerMessage::Error {
            code,
            message: message.into(),
        })
        .await
    }
}

enum Flow {
    Continue,
    Close,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<D, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<D, C>>,
) -> Result<(), WordfuseError>
where
    D: Dictionary,
    C: Codec,
{
    let player_id = PlayerId::from(conn.id());
    let peer_addr = conn.peer_addr();
    tracing::debug!(%player_id, %peer_addr, "handling new connection");

    let mut out = Outgoing::new(&conn, &state.codec);

    // --- Step 1: hello ---
    if let Err(e) = perform_handshake(&conn, &state, &mut out).await {
        let _ = conn.close().await;
        return Err(e);
    }

    // --- Step 2: session ---
    let created = state
        .sessions
        .lock()
        .await
        .create(player_id, peer_addr)
        .map(|_| ());
    if let Err(e) = created {
        out.send_error(503, e.to_string()).await?;
        let _ = conn.close().await;
        return Err(e.into());
    }
    let _guard = SessionGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let server_time = out.elapsed_ms();
    out.send(ServerMessage::Welcome {
        player_id,
        server_time,
    })
    .await?;
    tracing::info!(%player_id, %peer_addr, "player connected");

    // --- Step 3: message loop ---
    let (events_tx, mut events) = mpsc::unbounded_channel();

    loop {
        let Some(deadline) = state.sessions.lock().await.idle_deadline(&player_id) else {
            break;
        };

        tokio::select! {
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };
                let _ = state.sessions.lock().await.touch(player_id);

                let envelope: Envelope<ClientMessage> = match state.codec.decode(&data) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "failed to decode envelope");
                        continue;
                    }
                };

                let flow = handle_request(&state, player_id, envelope.payload, &events_tx, &mut out).await?;
                if let Flow::Close = flow {
                    break;
                }
            }
            Some(event) = events.recv() => {
                out.send(event).await?;
            }
            () = tokio::time::sleep_until(deadline) => {
                tracing::info!(%player_id, "connection idle; closing");
                break;
            }
        }
    }

    let _ = conn.close().await;
    // _guard drops here → room leave and session disconnect fire.
    Ok(())
}

/// Waits for `hello` and checks its version. Answers `error` on failure.
async fn perform_handshake<D, C>(
    conn: &WebSocketConnection,
    state: &ServerState<D, C>,
    out: &mut Outgoing<'_, C>,
) -> Result<(), WordfuseError>
where
    D: Dictionary,
    C: Codec,
{
    let data = match tokio::time::timeout(state.handshake_timeout, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => return Err(invalid("connection closed before hello")),
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(invalid("hello timed out")),
    };

    let envelope: Envelope<ClientMessage> = match state.codec.decode(&data) {
        Ok(envelope) => envelope,
        Err(e) => {
            out.send_error(400, "malformed hello").await?;
            return Err(e.into());
        }
    };

    let ClientMessage::Hello { version } = envelope.payload else {
        out.send_error(400, "expected hello").await?;
        return Err(invalid("first message must be hello"));
    };

    if version != PROTOCOL_VERSION {
        out.send_error(
            400,
            format!("version mismatch: expected {PROTOCOL_VERSION}, got {version}"),
        )
        .await?;
        return Err(invalid("protocol version mismatch"));
    }

    Ok(())
}

/// Routes one request. The room manager lock is released before any
/// reply is written.
async fn handle_request<D, C>(
    state: &ServerState<D, C>,
    player_id: PlayerId,
    msg: ClientMessage,
    events: &PlayerSender,
    out: &mut Outgoing<'_, C>,
) -> Result<Flow, WordfuseError>
where
    D: Dictionary,
    C: Codec,
{
    match msg {
        ClientMessage::Hello { .. } => {
            tracing::debug!(%player_id, "repeated hello ignored");
        }

        ClientMessage::CreateRoom {
            host_name,
            lives,
            peer_id,
        } => {
            let created = state.rooms.lock().await.create_room(
                player_id,
                &host_name,
                lives,
                peer_id,
                events.clone(),
            );
            match created {
                Ok(room_code) => out.send(ServerMessage::RoomCreated { room_code }).await?,
                Err(e) => out.send(refused(player_id, &e)).await?,
            }
        }

        ClientMessage::JoinRoom {
            room_code,
            player_name,
            peer_id,
        } => {
            let joined = state
                .rooms
                .lock()
                .await
                .join_room(player_id, &room_code, &player_name, peer_id, events.clone())
                .await;
            match joined {
                Ok(()) => out.send(ServerMessage::RoomJoined { room_code }).await?,
                Err(e) => out.send(refused(player_id, &e)).await?,
            }
        }

        ClientMessage::StartGame { room_code } => {
            let started = state.rooms.lock().await.start_game(player_id, &room_code).await;
            if let Err(e) = started {
                out.send(game_error(player_id, &e)).await?;
            }
        }

        ClientMessage::SubmitWord { room_code, word } => {
            let submitted = state
                .rooms
                .lock()
                .await
                .submit_word(player_id, &room_code, word)
                .await;
            // Outcomes arrive as room events; a submit that reaches no room is dropped.
            if let Err(e) = submitted {
                tracing::debug!(%player_id, room = %room_code, error = %e, "submit ignored");
            }
        }

        ClientMessage::GetPlayerList { room_code } => {
            let players = state.rooms.lock().await.player_list(&room_code).await;
            match players {
                Ok(players) => out.send(ServerMessage::PlayerListUpdate { players }).await?,
                Err(e) => out.send(refused(player_id, &e)).await?,
            }
        }

        ClientMessage::RestartGame { room_code, lives } => {
            let restarted = state
                .rooms
                .lock()
                .await
                .restart_game(player_id, &room_code, lives)
                .await;
            if let Err(e) = restarted {
                out.send(game_error(player_id, &e)).await?;
            }
        }

        ClientMessage::LeaveRoom { room_code } => {
            let mut rooms = state.rooms.lock().await;
            if rooms.player_room(&player_id) == Some(&room_code) {
                if let Err(e) = rooms.leave_room(player_id).await {
                    tracing::debug!(%player_id, error = %e, "leave room failed");
                }
            } else {
                tracing::debug!(%player_id, room = %room_code, "leave for a room the player is not in");
            }
        }

        ClientMessage::Heartbeat { client_time } => {
            let server_time = out.elapsed_ms();
            out.send(ServerMessage::HeartbeatAck {
                client_time,
                server_time,
            })
            .await?;
        }

        ClientMessage::Disconnect { reason } => {
            tracing::info!(%player_id, %reason, "client disconnected");
            return Ok(Flow::Close);
        }
    }

    Ok(Flow::Continue)
}

/// Answer to a refused create/join/list request.
fn refused(player_id: PlayerId, err: &RoomError) -> ServerMessage {
    tracing::debug!(%player_id, error = %err, fault = ?err.fault(), "request refused");
    ServerMessage::RequestFailed {
        code: err.code(),
        message: err.to_string(),
    }
}

/// Answer to a refused in-game request.
fn game_error(player_id: PlayerId, err: &RoomError) -> ServerMessage {
    tracing::debug!(%player_id, error = %err, fault = ?err.fault(), "game request refused");
    ServerMessage::GameError {
        code: err.code(),
        message: err.to_string(),
    }
}

fn invalid(reason: &str) -> WordfuseError {
    ProtocolError::InvalidMessage(reason.to_string()).into()
}
