//! Fan-out of room events to connections.

use std::collections::HashMap;

use tokio::sync::mpsc;
use wordfuse_protocol::{PlayerId, Recipient, ServerMessage};

use crate::game::Outbound;

/// Channel a connection handler drains to receive room events.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Outbound channels of everyone seated in one room.
#[derive(Debug, Default)]
pub(crate) struct Dispatcher {
    senders: HashMap<PlayerId, PlayerSender>,
}

impl Dispatcher {
    pub(crate) fn insert(&mut self, player_id: PlayerId, sender: PlayerSender) {
        self.senders.insert(player_id, sender);
    }

    pub(crate) fn remove(&mut self, player_id: PlayerId) {
        self.senders.remove(&player_id);
    }

    /// Delivers events in order. A closed channel means the connection is
    /// already going away; its leave will follow, so the event is dropped.
    pub(crate) fn dispatch(&self, events: Vec<Outbound>) {
        for (recipient, msg) in events {
            match recipient {
                Recipient::Player(player_id) => self.send_to(player_id, msg),
                _ => {
                    for (&player_id, sender) in &self.senders {
                        if recipient.includes(player_id) && sender.send(msg.clone()).is_err() {
                            tracing::trace!(%player_id, kind = msg.kind(), "receiver gone, event dropped");
                        }
                    }
                }
            }
        }
    }

    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            if sender.send(msg).is_err() {
                tracing::trace!(%player_id, "receiver gone, event dropped");
            }
        }
    }
}
