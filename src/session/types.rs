//! Session data: typed keys, participants, live sessions and move reports.

use crate::board::{Board, Line, Pattern, Placement, Side};
use crate::games::{Difficulty, Strategy, Variant};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Name a caller uses to seat the computer.
pub const COMPUTER_NAME: &str = "computer";

/// Identifier of the chat a game is played in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// At most one session exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat: ChatId,
    pub variant: Variant,
}

impl SessionKey {
    pub fn new(chat: impl Into<ChatId>, variant: Variant) -> Self {
        Self {
            chat: chat.into(),
            variant,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat, self.variant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two seats at a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Player(PlayerId),
    Computer,
}

impl Participant {
    /// `"computer"` (any case) seats the computer, anything else is a player.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case(COMPUTER_NAME) {
            Self::Computer
        } else {
            Self::Player(PlayerId(name.to_string()))
        }
    }

    pub fn is_computer(&self) -> bool {
        matches!(self, Self::Computer)
    }

    pub fn is_player(&self, id: &PlayerId) -> bool {
        matches!(self, Self::Player(p) if p == id)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "{id}"),
            Self::Computer => f.write_str(COMPUTER_NAME),
        }
    }
}

/// A live game. Owned by the registry and only mutated under its session lock.
#[derive(Debug)]
pub struct GameSession {
    pub(crate) id: Uuid,
    pub(crate) key: SessionKey,
    /// Seat 0 plays `X`, seat 1 plays `O`
    pub(crate) participants: [Participant; 2],
    pub(crate) board: Board,
    pub(crate) turn: Side,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) strategy: Strategy,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_activity: DateTime<Utc>,
    pub(crate) rng: StdRng,
}

impl GameSession {
    pub(crate) fn new(
        key: SessionKey,
        participants: [Participant; 2],
        difficulty: Option<Difficulty>,
        rng: StdRng,
        now: DateTime<Utc>,
    ) -> Self {
        let strategy = Strategy::for_game(key.variant, difficulty);
        Self {
            id: Uuid::new_v4(),
            board: key.variant.new_board(),
            key,
            participants,
            turn: Side::X,
            difficulty,
            strategy,
            created_at: now,
            last_activity: now,
            rng,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn participant(&self, side: Side) -> &Participant {
        &self.participants[side.index()]
    }

    pub fn turn_holder(&self) -> &Participant {
        self.participant(self.turn)
    }

    /// Side played by `player`, if seated here.
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        self.participants
            .iter()
            .position(|p| p.is_player(player))
            .map(Side::from_index)
    }

    pub fn is_idle(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now - self.last_activity >= timeout
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            key: self.key.clone(),
            participants: self.participants.clone(),
            board: self.board.clone(),
            turn: self.turn,
            turn_holder: self.turn_holder().clone(),
            difficulty: self.difficulty,
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}

/// Read-only, serializable copy of a live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub key: SessionKey,
    pub participants: [Participant; 2],
    pub board: Board,
    pub turn: Side,
    pub turn_holder: Participant,
    pub difficulty: Option<Difficulty>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl SessionSnapshot {
    /// JSON form, for hosts that persist sessions across restarts.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// State of the game after a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress {
        turn: Side,
        turn_holder: Participant,
    },
    Win {
        side: Side,
        pattern: Pattern,
        line: Line,
        winner: Participant,
    },
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress { .. })
    }
}

/// Result of a successful `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartReport {
    pub session_id: Uuid,
    pub board: Board,
    pub turn: Side,
    pub turn_holder: Participant,
    /// The computer's opening move, when it sits in the first seat
    pub opening: Option<Placement>,
}

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    pub board: Board,
    /// The player's placement, then the computer's reply if one was made
    pub placements: Vec<Placement>,
    pub outcome: Outcome,
}
