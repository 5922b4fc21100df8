//! Room actor: one tokio task per room.
//!
//! The actor owns the room's [`Game`] and is the only code that touches
//! it. It waits on two sources at once: its command queue and the game's
//! fuse. Dictionary lookups run on spawned tasks and come back through
//! the same queue, so every mutation is a single, uninterrupted step.
//!
//! ```text
//! RoomHandle ──cmd──▶ ┌────────────┐ ──events──▶ player channels
//!                     │ RoomActor  │
//! lookup task ──────▶ │  Game+Fuse │
//!                     └────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use wordfuse_dictionary::{Dictionary, Rejection, confirm};
use wordfuse_protocol::{PlayerId, PlayerView, RoomCode};

use crate::dispatch::{Dispatcher, PlayerSender};
use crate::game::{Game, PendingLookup, RoomSnapshot};
use crate::RoomError;

pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        peer_id: Option<String>,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Replies with the number of players left.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },

    Start {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    Submit {
        player_id: PlayerId,
        word: String,
    },

    LookupResolved {
        lookup: PendingLookup,
        verdict: Result<(), Rejection>,
    },

    Restart {
        player_id: PlayerId,
        lives: Option<i64>,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    PlayerList {
        reply: oneshot::Sender<Vec<PlayerView>>,
    },

    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cloneable address of a running room.
///
/// Every method fails with [`RoomError::Unavailable`] once the actor has
/// stopped.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.code.clone())
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        peer_id: Option<String>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Join {
            player_id,
            name,
            peer_id,
            sender,
            reply,
        })
        .await?
    }

    /// Returns how many players remain. At zero the actor stops.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await?
    }

    pub async fn start(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Start { player_id, reply })
            .await?
    }

    /// Fire-and-forget; the verdict arrives as room events.
    pub async fn submit(&self, player_id: PlayerId, word: String) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Submit { player_id, word })
            .await
            .map_err(|_| self.unavailable())
    }

    pub async fn restart(&self, player_id: PlayerId, lives: Option<i64>) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Restart {
            player_id,
            lives,
            reply,
        })
        .await?
    }

    pub async fn player_list(&self) -> Result<Vec<PlayerView>, RoomError> {
        self.request(|reply| RoomCommand::PlayerList { reply }).await
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct RoomActor<D: Dictionary> {
    game: Game,
    dispatcher: Dispatcher,
    dictionary: Arc<D>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// For lookup tasks to report back without keeping the room alive.
    loopback: mpsc::WeakSender<RoomCommand>,
}

enum Flow {
    Continue,
    Stop,
}

impl<D: Dictionary> RoomActor<D> {
    async fn run(mut self) {
        let code = self.game.code().clone();
        tracing::info!(room = %code, "room actor started");
        self.flush();

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if let Flow::Stop = self.handle(cmd) {
                        break;
                    }
                }
                boom = self.game.fuse_mut().wait_for_detonation() => {
                    self.game.detonate(boom);
                    self.flush();
                }
            }
        }

        tracing::info!(room = %code, "room actor stopped");
    }

    /// Applies one command. Events are flushed before the reply is sent.
    fn handle(&mut self, cmd: RoomCommand) -> Flow {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                peer_id,
                sender,
                reply,
            } => {
                let result = self.game.add_player(player_id, &name, peer_id);
                if result.is_ok() {
                    // Registered before the flush so the joiner gets the roster.
                    self.dispatcher.insert(player_id, sender);
                }
                self.flush();
                let _ = reply.send(result);
            }
            RoomCommand::Leave { player_id, reply } => {
                self.dispatcher.remove(player_id);
                let result = self.game.remove_player(player_id);
                self.flush();
                let empty = matches!(result, Ok(0));
                let _ = reply.send(result);
                if empty {
                    return Flow::Stop;
                }
            }
            RoomCommand::Start { player_id, reply } => {
                let result = self.game.start(player_id);
                self.flush();
                let _ = reply.send(result);
            }
            RoomCommand::Submit { player_id, word } => {
                if let Some(lookup) = self.game.begin_submission(player_id, &word) {
                    self.spawn_lookup(lookup);
                }
                self.flush();
            }
            RoomCommand::LookupResolved { lookup, verdict } => {
                self.game.finish_submission(lookup, verdict);
                self.flush();
            }
            RoomCommand::Restart {
                player_id,
                lives,
                reply,
            } => {
                let result = self.game.restart(player_id, lives);
                self.flush();
                let _ = reply.send(result);
            }
            RoomCommand::PlayerList { reply } => {
                let _ = reply.send(self.game.roster());
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.game.snapshot());
            }
        }
        Flow::Continue
    }

    fn spawn_lookup(&self, lookup: PendingLookup) {
        let dictionary = Arc::clone(&self.dictionary);
        let timeout = self.game.config().lookup_timeout;
        let loopback = self.loopback.clone();

        tokio::spawn(async move {
            let verdict = confirm(&*dictionary, &lookup.word, timeout).await;
            if let Some(tx) = loopback.upgrade() {
                let _ = tx.send(RoomCommand::LookupResolved { lookup, verdict }).await;
            }
        });
    }

    fn flush(&mut self) {
        let events = self.game.take_outbox();
        if !events.is_empty() {
            self.dispatcher.dispatch(events);
        }
    }
}

/// Starts the actor for `game` with the creator's channel already
/// registered.
pub(crate) fn spawn_room<D: Dictionary>(
    game: Game,
    creator: (PlayerId, PlayerSender),
    dictionary: Arc<D>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(game.config().channel_size);
    let code = game.code().clone();

    let mut dispatcher = Dispatcher::default();
    dispatcher.insert(creator.0, creator.1);

    let actor = RoomActor {
        game,
        dispatcher,
        dictionary,
        receiver: rx,
        loopback: tx.downgrade(),
    };
    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
