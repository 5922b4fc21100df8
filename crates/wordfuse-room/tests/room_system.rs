//! End-to-end tests through `RoomManager` and the room actors it spawns.
//!
//! Time is paused; the runtime jumps the clock forward whenever every task
//! is idle, so fuses burn down instantly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use wordfuse_dictionary::{Dictionary, DictionaryError, WordList};
use wordfuse_fuse::FuseConfig;
use wordfuse_protocol::{PlayerId, RoomCode, ServerMessage};
use wordfuse_room::{PROMPTS, PlayerSender, RoomConfig, RoomError, RoomManager, RoomStatus};

// ===========================================================================
// Test fixtures
// ===========================================================================

/// Says yes to every word, but only once the test opens the gate.
struct GatedDictionary {
    gate: Semaphore,
}

impl GatedDictionary {
    fn closed() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
        })
    }

    fn open(&self) {
        self.gate.add_permits(64);
    }
}

impl Dictionary for GatedDictionary {
    async fn contains(&self, _word: &str) -> Result<bool, DictionaryError> {
        let _permit = self.gate.acquire().await;
        Ok(true)
    }
}

type Events = mpsc::UnboundedReceiver<ServerMessage>;

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn channel() -> (PlayerSender, Events) {
    mpsc::unbounded_channel()
}

/// Every prompt followed by "zz" is a word.
fn word_for(prompt: &str) -> String {
    format!("{prompt}zz")
}

/// Every prompt preceded by "zz" is a word too.
fn other_word_for(prompt: &str) -> String {
    format!("zz{prompt}")
}

fn word_list() -> Arc<WordList> {
    let words = PROMPTS
        .iter()
        .flat_map(|p| [word_for(p), other_word_for(p)]);
    Arc::new(WordList::from_words(words))
}

fn config() -> RoomConfig {
    RoomConfig {
        fuse: FuseConfig::new(5, 5),
        ..RoomConfig::default()
    }
}

async fn recv(rx: &mut Events) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(600), rx.recv())
        .await
        .expect("no event within 600s")
        .expect("event channel closed")
}

/// Skips events until one of `kind` arrives.
async fn until(rx: &mut Events, kind: &str) -> ServerMessage {
    loop {
        let msg = recv(rx).await;
        if msg.kind() == kind {
            return msg;
        }
    }
}

fn drain(rx: &mut Events) -> Vec<ServerMessage> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn kinds(events: &[ServerMessage]) -> Vec<&'static str> {
    events.iter().map(ServerMessage::kind).collect()
}

/// Host P1 and guest P2 in a fresh room.
async fn two_player_room<D: Dictionary>(
    mgr: &mut RoomManager<D>,
    lives: Option<i64>,
) -> (RoomCode, Events, Events) {
    let (tx1, rx1) = channel();
    let (tx2, rx2) = channel();
    let code = mgr.create_room(pid(1), "Ann", lives, None, tx1).unwrap();
    mgr.join_room(pid(2), &code, "Bob", None, tx2).await.unwrap();
    (code, rx1, rx2)
}

// ===========================================================================
// Creating and joining
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_room_seats_host() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (tx, mut rx) = channel();
    let code = mgr.create_room(pid(1), "Ann", None, Some("peer-ann".into()), tx).unwrap();

    assert_eq!(code.as_str().len(), 6);
    assert_eq!(mgr.room_count(), 1);
    assert_eq!(mgr.player_room(&pid(1)), Some(&code));

    match recv(&mut rx).await {
        ServerMessage::PlayerListUpdate { players } => {
            assert_eq!(players.len(), 1);
            assert!(players[0].is_host);
            assert_eq!(players[0].name, "Ann");
            assert_eq!(players[0].lives, 3);
            assert_eq!(players[0].peer_id.as_deref(), Some("peer-ann"));
        }
        other => panic!("expected playerListUpdate, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_create_room_clamps_lives() {
    let mut mgr = RoomManager::new(config(), word_list());
    let code = mgr.create_room(pid(1), "Ann", Some(99), None, channel().0).unwrap();
    assert_eq!(mgr.snapshot(&code).await.unwrap().lives_per_player, 5);
}

#[tokio::test(start_paused = true)]
async fn test_join_room_broadcasts_roster() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, None).await;

    let for_host = drain(&mut rx1);
    let for_guest = drain(&mut rx2);
    assert_eq!(kinds(&for_host), ["playerListUpdate", "playerListUpdate"]);
    assert_eq!(for_guest.len(), 1);
    assert_eq!(for_host[1], for_guest[0]);

    let ServerMessage::PlayerListUpdate { players } = &for_guest[0] else {
        panic!("expected playerListUpdate");
    };
    assert_eq!(players[1].name, "Bob");
    assert!(!players[1].is_host);
    assert_eq!(mgr.player_room(&pid(2)), Some(&code));
}

#[tokio::test(start_paused = true)]
async fn test_join_unknown_room_fails() {
    let mut mgr = RoomManager::new(config(), word_list());
    let code = RoomCode::parse("abc123");

    let err = mgr
        .join_room(pid(1), &code, "Ann", None, channel().0)
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::NotFound(RoomCode::parse("ABC123")));
    assert_eq!(mgr.player_room(&pid(1)), None);
}

#[tokio::test(start_paused = true)]
async fn test_join_room_code_is_case_insensitive() {
    let mut mgr = RoomManager::new(config(), word_list());
    let code = mgr.create_room(pid(1), "Ann", None, None, channel().0).unwrap();
    let lower = RoomCode::parse(&format!("  {}  ", code.as_str().to_lowercase()));

    mgr.join_room(pid(2), &lower, "Bob", None, channel().0).await.unwrap();
    assert_eq!(mgr.snapshot(&code).await.unwrap().players.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_seated_player_cannot_create_or_join() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, _rx2) = two_player_room(&mut mgr, None).await;
    let other = mgr.create_room(pid(3), "Cat", None, None, channel().0).unwrap();

    let err = mgr.create_room(pid(1), "Ann", None, None, channel().0).unwrap_err();
    assert_eq!(err, RoomError::AlreadyInRoom(pid(1), code.clone()));

    let err = mgr
        .join_room(pid(2), &other, "Bob", None, channel().0)
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::AlreadyInRoom(pid(2), code));
    assert_eq!(mgr.room_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_join_full_room_fails() {
    let mut mgr = RoomManager::new(config(), word_list());
    let code = mgr.create_room(pid(1), "Ann", None, None, channel().0).unwrap();
    for id in 2..=4 {
        mgr.join_room(pid(id), &code, "Guest", None, channel().0).await.unwrap();
    }

    let err = mgr
        .join_room(pid(5), &code, "Late", None, channel().0)
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::RoomFull { code: code.clone(), max: 4 });
    assert_eq!(mgr.player_room(&pid(5)), None);
    assert_eq!(mgr.snapshot(&code).await.unwrap().players.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_join_started_room_fails() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, _rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();

    let err = mgr
        .join_room(pid(3), &code, "Cat", None, channel().0)
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::GameAlreadyStarted(code));
}

// ===========================================================================
// Starting
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_start_game_announces_prompt_and_first_turn() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    drain(&mut rx2);

    mgr.start_game(pid(1), &code).await.unwrap();

    let events = drain(&mut rx2);
    assert_eq!(kinds(&events), ["gameStarted", "turnStarted"]);
    let ServerMessage::GameStarted { prompt, current_player_id } = &events[0] else {
        panic!("expected gameStarted");
    };
    assert_eq!(prompt.chars().count(), 2);
    assert!(PROMPTS.contains(&prompt.as_str()));
    assert_eq!(*current_player_id, pid(1));

    let ServerMessage::TurnStarted { current_player_id, bomb_time, .. } = &events[1] else {
        panic!("expected turnStarted");
    };
    assert_eq!(*current_player_id, pid(1));
    assert_eq!(*bomb_time, 5);

    let snap = mgr.snapshot(&code).await.unwrap();
    assert_eq!(snap.status, RoomStatus::Playing);
    assert!(snap.fuse_remaining.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_start_game_alone_is_refused() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (tx, mut rx) = channel();
    let code = mgr.create_room(pid(1), "Ann", None, None, tx).unwrap();
    drain(&mut rx);

    let err = mgr.start_game(pid(1), &code).await.unwrap_err();
    assert_eq!(err, RoomError::InsufficientPlayers { needed: 2, have: 1 });
    assert_eq!(mgr.snapshot(&code).await.unwrap().status, RoomStatus::Lobby);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_game_by_guest_is_refused() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, _rx2) = two_player_room(&mut mgr, None).await;

    let err = mgr.start_game(pid(2), &code).await.unwrap_err();
    assert!(matches!(err, RoomError::NotAuthorized { .. }));
    assert_eq!(mgr.snapshot(&code).await.unwrap().status, RoomStatus::Lobby);
}

// ===========================================================================
// Turns
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_accepted_words_pass_the_turn_around() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();

    let ServerMessage::TurnStarted { prompt, .. } = until(&mut rx2, "turnStarted").await else {
        unreachable!()
    };
    mgr.submit_word(pid(1), &code, word_for(&prompt).to_uppercase())
        .await
        .unwrap();

    let accepted = until(&mut rx2, "wordAccepted").await;
    assert_eq!(
        accepted,
        ServerMessage::WordAccepted {
            player_id: pid(1),
            word: word_for(&prompt),
        }
    );
    let ServerMessage::NextTurn { current_player_id, prompt } = recv(&mut rx2).await else {
        panic!("expected nextTurn");
    };
    assert_eq!(current_player_id, pid(2));

    // The guest answers and the turn comes back to the host.
    let ServerMessage::TurnStarted { prompt: turn_prompt, .. } = recv(&mut rx2).await else {
        panic!("expected turnStarted");
    };
    assert_eq!(turn_prompt, prompt);
    mgr.submit_word(pid(2), &code, other_word_for(&prompt)).await.unwrap();

    until(&mut rx1, "wordAccepted").await;
    let ServerMessage::NextTurn { current_player_id, .. } = recv(&mut rx1).await else {
        panic!("expected nextTurn");
    };
    assert_eq!(current_player_id, pid(1));

    let snap = mgr.snapshot(&code).await.unwrap();
    assert_eq!(snap.current_player, Some(pid(1)));
    assert_eq!(snap.used_words, 2);
    assert!(snap.players.iter().all(|p| p.lives == 3));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_word_reaches_only_submitter() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx1);
    drain(&mut rx2);

    mgr.submit_word(pid(1), &code, "qqqqqq".into()).await.unwrap();
    let snap = mgr.snapshot(&code).await.unwrap();

    assert_eq!(
        drain(&mut rx1),
        [ServerMessage::WordInvalid {
            reason: "Word does not contain the prompt.".into()
        }]
    );
    assert!(drain(&mut rx2).is_empty());
    assert_eq!(snap.current_player, Some(pid(1)));
    assert!(snap.fuse_remaining.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_word_is_refused_after_lookup() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, _rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();

    let ServerMessage::TurnStarted { prompt, .. } = until(&mut rx1, "turnStarted").await else {
        unreachable!()
    };
    mgr.submit_word(pid(1), &code, format!("{prompt}qq")).await.unwrap();

    assert_eq!(
        recv(&mut rx1).await,
        ServerMessage::WordInvalid {
            reason: "Not a valid English word.".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_out_of_turn_submission_is_ignored() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx1);
    drain(&mut rx2);

    mgr.submit_word(pid(2), &code, "anything".into()).await.unwrap();
    let snap = mgr.snapshot(&code).await.unwrap();

    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
    assert_eq!(snap.used_words, 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_lookup_is_refused_before_fuse() {
    let dict = GatedDictionary::closed();
    let config = RoomConfig {
        lookup_timeout: Duration::from_secs(2),
        ..config()
    };
    let mut mgr = RoomManager::new(config, Arc::clone(&dict));
    let (code, mut rx1, _rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();

    let ServerMessage::TurnStarted { prompt, .. } = until(&mut rx1, "turnStarted").await else {
        unreachable!()
    };
    mgr.submit_word(pid(1), &code, word_for(&prompt)).await.unwrap();

    assert_eq!(
        recv(&mut rx1).await,
        ServerMessage::WordInvalid {
            reason: "Dictionary API error.".into()
        }
    );
    assert_eq!(recv(&mut rx1).await.kind(), "bombExploded");
}

#[tokio::test(start_paused = true)]
async fn test_lookup_finishing_after_explosion_is_discarded() {
    let dict = GatedDictionary::closed();
    let config = RoomConfig {
        lookup_timeout: Duration::from_secs(60),
        ..config()
    };
    let mut mgr = RoomManager::new(config, Arc::clone(&dict));
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();

    let ServerMessage::TurnStarted { prompt, .. } = until(&mut rx1, "turnStarted").await else {
        unreachable!()
    };
    mgr.submit_word(pid(1), &code, word_for(&prompt)).await.unwrap();

    // The fuse burns down while the lookup is stuck.
    assert_eq!(
        until(&mut rx1, "bombExploded").await,
        ServerMessage::BombExploded {
            player_id: pid(1),
            remaining_lives: 2,
        }
    );

    dict.open();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snap = mgr.snapshot(&code).await.unwrap();
    assert_eq!(snap.used_words, 0);
    assert_eq!(snap.current_player, Some(pid(2)));
    assert!(snap.fuse_remaining.is_some());
    assert!(
        drain(&mut rx2)
            .iter()
            .all(|m| !matches!(m, ServerMessage::WordAccepted { .. }))
    );
}

// ===========================================================================
// Bomb and game over
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_fuse_costs_a_life_and_passes_turn() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx2);

    let boom = recv(&mut rx2).await;
    assert_eq!(
        boom,
        ServerMessage::BombExploded {
            player_id: pid(1),
            remaining_lives: 2,
        }
    );
    assert_eq!(recv(&mut rx2).await.kind(), "playerListUpdate");
    let ServerMessage::NextTurn { current_player_id, .. } = recv(&mut rx2).await else {
        panic!("expected nextTurn");
    };
    assert_eq!(current_player_id, pid(2));
    assert_eq!(recv(&mut rx2).await.kind(), "turnStarted");
}

#[tokio::test(start_paused = true)]
async fn test_last_life_lost_ends_game_once() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, Some(1)).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx2);

    let mut events = Vec::new();
    loop {
        let msg = recv(&mut rx2).await;
        let over = msg.kind() == "gameOver";
        events.push(msg);
        if over {
            break;
        }
    }
    assert_eq!(
        kinds(&events),
        ["bombExploded", "playerEliminated", "playerListUpdate", "gameOver"]
    );
    let ServerMessage::GameOver { winner_name, scoreboard } = events.pop().unwrap() else {
        unreachable!()
    };
    assert_eq!(winner_name.as_deref(), Some("Bob"));
    assert_eq!(scoreboard.len(), 2);

    let snap = mgr.snapshot(&code).await.unwrap();
    assert_eq!(snap.status, RoomStatus::Over);
    assert_eq!(snap.fuse_remaining, None);
    assert_eq!(snap.players[1].wins, 1);

    // Nothing further happens on its own.
    drain(&mut rx1);
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_leaving_mid_game_ends_it() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, _rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx1);

    assert_eq!(mgr.leave_room(pid(2)).await.unwrap(), code);

    let events = drain(&mut rx1);
    assert_eq!(kinds(&events), ["playerListUpdate", "gameOver"]);
    let ServerMessage::GameOver { winner_name, .. } = &events[1] else {
        unreachable!()
    };
    assert_eq!(winner_name.as_deref(), Some("Ann"));
    assert_eq!(mgr.snapshot(&code).await.unwrap().status, RoomStatus::Over);
}

#[tokio::test(start_paused = true)]
async fn test_current_player_leaving_forfeits_turn() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, _rx2) = two_player_room(&mut mgr, None).await;
    let (tx3, mut rx3) = channel();
    mgr.join_room(pid(3), &code, "Cat", None, tx3).await.unwrap();
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx3);

    mgr.leave_room(pid(1)).await.unwrap();

    let events = drain(&mut rx3);
    assert_eq!(kinds(&events), ["playerListUpdate", "nextTurn", "turnStarted"]);
    let snap = mgr.snapshot(&code).await.unwrap();
    assert_eq!(snap.host, pid(2));
    assert_eq!(snap.current_player, Some(pid(2)));
    assert_eq!(snap.status, RoomStatus::Playing);
}

// ===========================================================================
// Restart
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_restart_by_host_revives_everyone() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, mut rx2) = two_player_room(&mut mgr, Some(1)).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    until(&mut rx2, "gameOver").await;

    mgr.restart_game(pid(1), &code, Some(2)).await.unwrap();

    let ServerMessage::GameRestarted { lives_per_player, players, current_player_id, .. } =
        recv(&mut rx2).await
    else {
        panic!("expected gameRestarted");
    };
    assert_eq!(lives_per_player, 2);
    assert_eq!(current_player_id, pid(1));
    assert!(players.iter().all(|p| p.is_alive && p.lives == 2));
    assert_eq!(players[1].wins, 1);
    assert_eq!(recv(&mut rx2).await.kind(), "turnStarted");
}

#[tokio::test(start_paused = true)]
async fn test_restart_by_guest_is_refused() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, Some(1)).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    until(&mut rx2, "gameOver").await;
    drain(&mut rx1);

    let err = mgr.restart_game(pid(2), &code, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Only the host can restart the game.");
    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
    assert_eq!(mgr.snapshot(&code).await.unwrap().status, RoomStatus::Over);
}

// ===========================================================================
// Leaving and teardown
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_last_leave_destroys_room() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, _rx2) = two_player_room(&mut mgr, None).await;

    mgr.leave_room(pid(1)).await.unwrap();
    assert_eq!(mgr.room_count(), 1);
    mgr.leave_room(pid(2)).await.unwrap();

    assert_eq!(mgr.room_count(), 0);
    assert!(mgr.room_codes().is_empty());
    assert_eq!(mgr.snapshot(&code).await.unwrap_err(), RoomError::NotFound(code));
}

#[tokio::test(start_paused = true)]
async fn test_leave_without_room_fails() {
    let mut mgr = RoomManager::new(config(), word_list());
    assert_eq!(
        mgr.leave_room(pid(7)).await.unwrap_err(),
        RoomError::NotInRoom(pid(7))
    );
}

#[tokio::test(start_paused = true)]
async fn test_host_leaving_lobby_passes_host() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, _rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    drain(&mut rx2);

    mgr.leave_room(pid(1)).await.unwrap();

    let ServerMessage::PlayerListUpdate { players } = recv(&mut rx2).await else {
        panic!("expected playerListUpdate");
    };
    assert_eq!(players.len(), 1);
    assert!(players[0].is_host);
    assert_eq!(mgr.player_room(&pid(1)), None);
    mgr.start_game(pid(2), &code).await.unwrap_err();
}

// ===========================================================================
// Queries
// ===========================================================================

#[tokio::test(start_paused = true)]
async fn test_player_list_does_not_mutate() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (code, mut rx1, mut rx2) = two_player_room(&mut mgr, None).await;
    mgr.start_game(pid(1), &code).await.unwrap();
    drain(&mut rx1);
    drain(&mut rx2);

    let before = mgr.snapshot(&code).await.unwrap();
    let list = mgr.player_list(&code).await.unwrap();
    let after = mgr.snapshot(&code).await.unwrap();

    assert_eq!(list, before.players);
    assert_eq!(before.turn, after.turn);
    assert_eq!(before.prompt, after.prompt);
    assert_eq!(before.current_player, after.current_player);
    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rooms_are_independent() {
    let mut mgr = RoomManager::new(config(), word_list());
    let (a, mut rx_a, _rx_a2) = two_player_room(&mut mgr, Some(1)).await;
    let (tx3, mut rx_b) = channel();
    let b = mgr.create_room(pid(3), "Cat", None, None, tx3).unwrap();
    mgr.join_room(pid(4), &b, "Dan", None, channel().0).await.unwrap();
    drain(&mut rx_b);

    mgr.start_game(pid(1), &a).await.unwrap();
    until(&mut rx_a, "gameOver").await;

    assert!(drain(&mut rx_b).is_empty());
    assert_eq!(mgr.snapshot(&b).await.unwrap().status, RoomStatus::Lobby);
}
