//! Game orchestrator.
//!
//! Every request follows the same shape: check out the session for its key,
//! validate against a copy of the board, and commit only once the whole
//! request (player move plus computer reply) has succeeded. Terminal outcomes
//! remove the session before the call returns.

use super::registry::Registry;
use super::types::{
    ChatId, GameSession, MoveReport, Outcome, Participant, PlayerId, SessionKey,
    SessionSnapshot, StartReport,
};
use crate::board::{detect, has_legal_move, Board, Illegal, Placement, Ruleset, Side};
use crate::core::constants::{MARK_VALUE, MAX_SEARCH_DEPTH};
use crate::core::{EngineConfig, GameError};
use crate::games::{Difficulty, Variant};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

pub struct Engine {
    config: EngineConfig,
    registry: Registry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a session for `(chat, variant)`.
    ///
    /// `players` must name exactly two distinct participants, at most one of
    /// them the computer. If the computer sits first it makes its opening move
    /// before this returns. `Hard` searches at [`EngineConfig::hard_depth`]
    /// whatever depth the caller passed.
    #[instrument(skip(self, players), fields(chat = %chat, variant = %variant))]
    pub fn start(
        &self,
        chat: &ChatId,
        variant: Variant,
        players: &[Participant],
        difficulty: Option<Difficulty>,
    ) -> Result<StartReport, GameError> {
        let key = SessionKey::new(chat.clone(), variant);
        let participants = check_participants(players).inspect_err(|err| {
            warn!(error = %err, "start rejected");
        })?;
        if self.registry.contains(&key) {
            warn!("start rejected, session already active");
            return Err(GameError::SessionAlreadyActive { variant });
        }

        let has_computer = participants.iter().any(Participant::is_computer);
        let difficulty = match (has_computer, variant.ruleset()) {
            (true, Ruleset::Hybrid) => {
                Some(self.resolve(difficulty.unwrap_or(Difficulty::Medium)))
            }
            (true, Ruleset::Line) => difficulty.map(|d| self.resolve(d)),
            (false, _) => None,
        };

        let rng = self.rng_for(chat, variant);
        let mut session = GameSession::new(key, participants, difficulty, rng, Utc::now());

        let mut opening = None;
        if session.turn_holder().is_computer() {
            let side = session.turn;
            let board = session.board.clone();
            if let Some(placement) = computer_reply(&mut session, &board, side) {
                session.board = board
                    .place(placement)
                    .map_err(|reason| illegal(&board, placement, reason))?;
                session.turn = side.opponent();
                opening = Some(placement);
            }
        }

        let report = StartReport {
            session_id: session.id,
            board: session.board.clone(),
            turn: session.turn,
            turn_holder: session.turn_holder().clone(),
            opening,
        };
        let strategy = session.strategy;
        self.registry.insert(session)?;
        info!(
            session_id = %report.session_id,
            ?strategy,
            first = %report.turn_holder,
            "session started"
        );
        Ok(report)
    }

    /// Apply `player`'s move at `cell` (0-based) and, when the computer is
    /// next, its reply.
    ///
    /// The hybrid game requires `value`; the line game ignores it. A rejected
    /// move leaves the session exactly as it was.
    #[instrument(skip(self), fields(chat = %chat, variant = %variant, player = %player))]
    pub fn make_move(
        &self,
        chat: &ChatId,
        variant: Variant,
        player: &PlayerId,
        cell: usize,
        value: Option<u8>,
    ) -> Result<MoveReport, GameError> {
        let key = SessionKey::new(chat.clone(), variant);
        let result = self.apply_move(&key, player, cell, value);
        if let Err(err) = &result {
            warn!(code = err.code(), error = %err, "move rejected");
        }
        result
    }

    fn apply_move(
        &self,
        key: &SessionKey,
        player: &PlayerId,
        cell: usize,
        value: Option<u8>,
    ) -> Result<MoveReport, GameError> {
        let no_session = || GameError::NoActiveSession {
            variant: key.variant,
        };
        let (id, handle) = self.registry.get(key).ok_or_else(no_session)?;
        let mut session = handle.lock();
        // cancelled, swept or finished while we waited for the lock
        if !self.registry.is_current(key, id) {
            return Err(no_session());
        }

        let side = session.turn;
        if session.side_of(player) != Some(side) {
            return Err(GameError::OutOfTurn {
                player: player.to_string(),
            });
        }

        let value = match key.variant.ruleset() {
            Ruleset::Line => MARK_VALUE,
            Ruleset::Hybrid => value.ok_or(GameError::InvalidValue {
                value: None,
                max: session.board.max_value(),
            })?,
        };
        let placement = Placement { cell, value, side };
        let mut board = session
            .board
            .place(placement)
            .map_err(|reason| illegal(&session.board, placement, reason))?;
        let mut placements = vec![placement];
        debug!(cell, value, ?side, "player move applied");

        let mut outcome = settle(&board, side, &session);
        let computer_turn = match &outcome {
            Outcome::InProgress { turn, turn_holder } if turn_holder.is_computer() => Some(*turn),
            _ => None,
        };
        if let Some(turn) = computer_turn {
            match computer_reply(&mut session, &board, turn) {
                Some(reply) => {
                    board = board
                        .place(reply)
                        .map_err(|reason| illegal(&board, reply, reason))?;
                    placements.push(reply);
                    debug!(cell = reply.cell, value = reply.value, "computer replied");
                    outcome = settle(&board, turn, &session);
                }
                None => outcome = Outcome::Draw,
            }
        }

        session.board = board.clone();
        session.last_activity = Utc::now();
        if let Outcome::InProgress { turn, .. } = &outcome {
            session.turn = *turn;
        } else {
            self.registry.remove(key, id);
            info!(session_id = %id, ?outcome, "session finished");
        }

        Ok(MoveReport {
            board,
            placements,
            outcome,
        })
    }

    /// End the session for `(chat, variant)`. Returns whether one existed.
    #[instrument(skip(self), fields(chat = %chat, variant = %variant))]
    pub fn cancel(&self, chat: &ChatId, variant: Variant) -> bool {
        let key = SessionKey::new(chat.clone(), variant);
        match self.registry.remove_key(&key) {
            Some(id) => {
                info!(session_id = %id, "session cancelled");
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self, chat: &ChatId, variant: Variant) -> Option<SessionSnapshot> {
        let key = SessionKey::new(chat.clone(), variant);
        let (id, handle) = self.registry.get(&key)?;
        let session = handle.lock();
        if !self.registry.is_current(&key, id) {
            return None;
        }
        Some(session.snapshot())
    }

    pub fn active_sessions(&self) -> usize {
        self.registry.count()
    }

    /// Remove sessions with no activity for the configured idle timeout.
    pub fn sweep_idle(&self, now: DateTime<Utc>) -> Vec<SessionKey> {
        let removed = self.registry.sweep(now, self.config.idle_timeout());
        for key in &removed {
            info!(session = %key, "idle session reclaimed");
        }
        removed
    }

    /// Hard always searches at the configured depth.
    fn resolve(&self, difficulty: Difficulty) -> Difficulty {
        match difficulty {
            Difficulty::Hard { .. } => Difficulty::Hard {
                depth: self.config.hard_depth.clamp(1, MAX_SEARCH_DEPTH),
            },
            other => other,
        }
    }

    fn rng_for(&self, chat: &ChatId, variant: Variant) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ key_hash(chat, variant)),
            None => StdRng::from_entropy(),
        }
    }
}

fn check_participants(players: &[Participant]) -> Result<[Participant; 2], GameError> {
    let [first, second] = players else {
        return Err(GameError::InvalidParticipants(format!(
            "expected 2 participants, got {}",
            players.len()
        )));
    };
    if first.is_computer() && second.is_computer() {
        return Err(GameError::InvalidParticipants(
            "at least one participant must be a player".to_string(),
        ));
    }
    if first == second {
        return Err(GameError::InvalidParticipants(format!(
            "{first} cannot play against themselves"
        )));
    }
    Ok([first.clone(), second.clone()])
}

/// Outcome after `mover` has played on `board`.
fn settle(board: &Board, mover: Side, session: &GameSession) -> Outcome {
    if let Some(win) = detect(board) {
        return Outcome::Win {
            side: win.side,
            pattern: win.pattern,
            line: win.line,
            winner: session.participant(win.side).clone(),
        };
    }
    if !has_legal_move(board) {
        return Outcome::Draw;
    }
    let turn = mover.opponent();
    Outcome::InProgress {
        turn,
        turn_holder: session.participant(turn).clone(),
    }
}

fn computer_reply(session: &mut GameSession, board: &Board, side: Side) -> Option<Placement> {
    let strategy = session.strategy;
    strategy.choose(board, side, &mut session.rng)
}

fn illegal(board: &Board, placement: Placement, reason: Illegal) -> GameError {
    GameError::from_illegal(
        reason,
        placement.cell,
        placement.value,
        board.cell_count(),
        board.max_value(),
    )
}

/// FNV-1a over the key, so seeded runs do not depend on hasher internals.
fn key_hash(chat: &ChatId, variant: Variant) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in chat.0.bytes().chain([0]).chain(variant.name().bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pattern;
    use crate::games::Strategy;

    fn players(a: &str, b: &str) -> Vec<Participant> {
        vec![Participant::from_name(a), Participant::from_name(b)]
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::seeded(42))
    }

    #[test]
    fn test_start_rejects_bad_participants() {
        let engine = engine();
        let chat = ChatId::from("c");
        for bad in [
            vec![Participant::from_name("a")],
            players("computer", "computer"),
            players("a", "a"),
            vec![
                Participant::from_name("a"),
                Participant::from_name("b"),
                Participant::from_name("c"),
            ],
        ] {
            let err = engine
                .start(&chat, Variant::TicTacToe, &bad, None)
                .unwrap_err();
            assert_eq!(err.code(), "invalid-participants");
        }
        assert_eq!(engine.active_sessions(), 0);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::TicTacToe, &players("a", "b"), None)
            .unwrap();
        let err = engine
            .start(&chat, Variant::TicTacToe, &players("a", "b"), None)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::SessionAlreadyActive {
                variant: Variant::TicTacToe
            }
        );
    }

    #[test]
    fn test_hybrid_difficulty_defaults_to_medium() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::SudokuToe, &players("a", "computer"), None)
            .unwrap();
        let snap = engine.snapshot(&chat, Variant::SudokuToe).unwrap();
        assert_eq!(snap.difficulty, Some(Difficulty::Medium));

        engine
            .start(&chat, Variant::TicTacToe, &players("a", "b"), Some(Difficulty::Easy))
            .unwrap();
        let snap = engine.snapshot(&chat, Variant::TicTacToe).unwrap();
        assert_eq!(snap.difficulty, None);
    }

    #[test]
    fn test_hard_uses_configured_depth() {
        let engine = Engine::new(EngineConfig {
            hard_depth: 2,
            ..EngineConfig::seeded(42)
        });
        let chat = ChatId::from("c");
        for (variant, requested) in [
            (Variant::SudokuToe, Difficulty::hard()),
            (Variant::SudokuToeMini, Difficulty::Hard { depth: 99 }),
        ] {
            engine
                .start(&chat, variant, &players("a", "computer"), Some(requested))
                .unwrap();
            let snap = engine.snapshot(&chat, variant).unwrap();
            assert_eq!(snap.difficulty, Some(Difficulty::Hard { depth: 2 }));

            let key = SessionKey::new(chat.clone(), variant);
            let (_, handle) = engine.registry.get(&key).unwrap();
            assert_eq!(handle.lock().strategy, Strategy::Minimax { depth: 2 });
        }
    }

    #[test]
    fn test_hard_depth_is_clamped() {
        let engine = Engine::new(EngineConfig {
            hard_depth: 99,
            ..EngineConfig::default()
        });
        let chat = ChatId::from("c");
        engine
            .start(
                &chat,
                Variant::SudokuToe,
                &players("a", "computer"),
                Some(Difficulty::hard()),
            )
            .unwrap();
        let snap = engine.snapshot(&chat, Variant::SudokuToe).unwrap();
        assert_eq!(
            snap.difficulty,
            Some(Difficulty::Hard {
                depth: MAX_SEARCH_DEPTH
            })
        );
    }

    #[test]
    fn test_cancel_while_move_waits_for_lock() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::TicTacToe, &players("a", "b"), None)
            .unwrap();
        let key = SessionKey::new(chat.clone(), Variant::TicTacToe);
        let (_, handle) = engine.registry.get(&key).unwrap();

        let held = handle.lock();
        let result = std::thread::scope(|scope| {
            let mover = scope.spawn(|| {
                engine.make_move(&chat, Variant::TicTacToe, &PlayerId::from("a"), 0, None)
            });
            std::thread::sleep(std::time::Duration::from_millis(50));
            assert!(engine.cancel(&chat, Variant::TicTacToe));
            drop(held);
            mover.join().unwrap()
        });

        assert_eq!(
            result,
            Err(GameError::NoActiveSession {
                variant: Variant::TicTacToe
            })
        );
        assert_eq!(handle.lock().board.occupied_count(), 0);
        assert_eq!(engine.active_sessions(), 0);
    }

    #[test]
    fn test_computer_first_opens() {
        let engine = engine();
        let chat = ChatId::from("c");
        let report = engine
            .start(&chat, Variant::TicTacToe, &players("computer", "a"), None)
            .unwrap();
        // heuristic opens in the center
        assert_eq!(report.opening.map(|p| p.cell), Some(4));
        assert_eq!(report.board.occupied_count(), 1);
        assert_eq!(report.turn, Side::O);
        assert_eq!(report.turn_holder, Participant::from_name("a"));
    }

    #[test]
    fn test_out_of_turn() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::TicTacToe, &players("a", "b"), None)
            .unwrap();
        for who in ["b", "stranger"] {
            let err = engine
                .make_move(&chat, Variant::TicTacToe, &PlayerId::from(who), 0, None)
                .unwrap_err();
            assert_eq!(err.code(), "out-of-turn");
        }
    }

    #[test]
    fn test_hybrid_move_needs_value() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::SudokuToe, &players("a", "b"), None)
            .unwrap();
        let a = PlayerId::from("a");
        let err = engine
            .make_move(&chat, Variant::SudokuToe, &a, 0, None)
            .unwrap_err();
        assert_eq!(err, GameError::InvalidValue { value: None, max: 4 });
        let err = engine
            .make_move(&chat, Variant::SudokuToe, &a, 0, Some(5))
            .unwrap_err();
        assert_eq!(err.code(), "invalid-value");
        assert_eq!(
            engine.snapshot(&chat, Variant::SudokuToe).unwrap().board,
            Variant::SudokuToe.new_board()
        );
    }

    #[test]
    fn test_two_player_turns_alternate() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::SudokuToe, &players("a", "b"), None)
            .unwrap();
        let report = engine
            .make_move(&chat, Variant::SudokuToe, &PlayerId::from("a"), 0, Some(1))
            .unwrap();
        assert_eq!(report.placements.len(), 1);
        assert_eq!(
            report.outcome,
            Outcome::InProgress {
                turn: Side::O,
                turn_holder: Participant::from_name("b")
            }
        );
        let err = engine
            .make_move(&chat, Variant::SudokuToe, &PlayerId::from("b"), 1, Some(1))
            .unwrap_err();
        assert_eq!(err, GameError::ConstraintViolation { cell: 1, value: 1 });
    }

    #[test]
    fn test_sequence_win_removes_session() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::SudokuToe, &players("a", "b"), None)
            .unwrap();
        let a = PlayerId::from("a");
        let b = PlayerId::from("b");
        engine.make_move(&chat, Variant::SudokuToe, &a, 0, Some(1)).unwrap();
        engine.make_move(&chat, Variant::SudokuToe, &b, 1, Some(2)).unwrap();
        engine.make_move(&chat, Variant::SudokuToe, &a, 2, Some(3)).unwrap();
        let report = engine
            .make_move(&chat, Variant::SudokuToe, &b, 3, Some(4))
            .unwrap();
        match report.outcome {
            Outcome::Win {
                side,
                pattern,
                winner,
                ..
            } => {
                assert_eq!(side, Side::O);
                assert_eq!(pattern, Pattern::Sequence);
                assert_eq!(winner, Participant::from_name("b"));
            }
            other => panic!("expected a win, got {other:?}"),
        }
        assert_eq!(engine.active_sessions(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let engine = engine();
        let chat = ChatId::from("c");
        engine
            .start(&chat, Variant::TicTacToe, &players("a", "b"), None)
            .unwrap();
        assert!(engine.cancel(&chat, Variant::TicTacToe));
        assert!(!engine.cancel(&chat, Variant::TicTacToe));
        let err = engine
            .make_move(&chat, Variant::TicTacToe, &PlayerId::from("a"), 0, None)
            .unwrap_err();
        assert_eq!(err.code(), "no-active-session");
    }

    #[test]
    fn test_seeded_engines_agree() {
        let run = || {
            let engine = Engine::new(EngineConfig::seeded(7));
            let chat = ChatId::from("c");
            engine
                .start(
                    &chat,
                    Variant::SudokuToe,
                    &players("a", "computer"),
                    Some(Difficulty::Easy),
                )
                .unwrap();
            engine
                .make_move(&chat, Variant::SudokuToe, &PlayerId::from("a"), 0, Some(1))
                .unwrap()
                .placements
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_key_hash_separates_keys() {
        let chat = ChatId::from("c");
        assert_ne!(
            key_hash(&chat, Variant::SudokuToe),
            key_hash(&chat, Variant::SudokuToeMini)
        );
        assert_ne!(
            key_hash(&chat, Variant::TicTacToe),
            key_hash(&ChatId::from("d"), Variant::TicTacToe)
        );
    }
}
