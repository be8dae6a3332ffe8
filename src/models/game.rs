//! Games, teams and rounds: what the engine proposes and what the session records.

use crate::models::court::CourtId;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recorded game.
pub type GameId = Uuid;

/// Which side of the net a team plays.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Serve,
    Receive,
}

/// Two teammates.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
}

impl Team {
    pub fn new(player1_id: PlayerId, player2_id: PlayerId) -> Self {
        Self {
            player1_id,
            player2_id,
        }
    }

    pub fn ids(&self) -> [PlayerId; 2] {
        [self.player1_id, self.player2_id]
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }
}

/// One court's proposed game for the round being generated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameAssignment {
    pub court_id: CourtId,
    pub serve_team: Team,
    pub receive_team: Team,
}

impl GameAssignment {
    /// All four players: serve team first.
    pub fn player_ids(&self) -> [PlayerId; 4] {
        [
            self.serve_team.player1_id,
            self.serve_team.player2_id,
            self.receive_team.player1_id,
            self.receive_team.player2_id,
        ]
    }
}

/// The engine's output: games for this round plus who sits out.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundAssignment {
    pub game_assignments: Vec<GameAssignment>,
    pub sitting_out_ids: Vec<PlayerId>,
}

impl RoundAssignment {
    /// No games could be formed. A legitimate outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.game_assignments.is_empty()
    }

    /// Ids of every player placed in a game.
    pub fn playing_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.game_assignments.iter().flat_map(|g| g.player_ids())
    }

    /// Materialize into a recorded round: one pending game per assignment.
    pub fn into_round(self, number: u32) -> Round {
        let created_at = Utc::now();
        Round {
            number,
            games: self
                .game_assignments
                .into_iter()
                .map(|a| Game::new(a.court_id, a.serve_team, a.receive_team, created_at))
                .collect(),
            sitting_out_ids: self.sitting_out_ids,
            created_at,
        }
    }
}

/// How a game finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Scored { serve: u32, receive: u32 },
    /// Played, but the score was not recorded.
    Scoreless,
}

impl GameResult {
    /// Winning side; None for ties and scoreless games.
    pub fn winner(&self) -> Option<Side> {
        match *self {
            GameResult::Scored { serve, receive } if serve > receive => Some(Side::Serve),
            GameResult::Scored { serve, receive } if receive > serve => Some(Side::Receive),
            _ => None,
        }
    }
}

/// A recorded game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub court_id: CourtId,
    pub serve_team: Team,
    pub receive_team: Team,
    /// None while the game is in progress.
    pub result: Option<GameResult>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(
        court_id: CourtId,
        serve_team: Team,
        receive_team: Team,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            court_id,
            serve_team,
            receive_team,
            result: None,
            created_at,
            completed_at: None,
        }
    }

    pub fn record_score(&mut self, serve: u32, receive: u32) {
        self.complete(GameResult::Scored { serve, receive });
    }

    pub fn mark_scoreless(&mut self) {
        self.complete(GameResult::Scoreless);
    }

    fn complete(&mut self, result: GameResult) {
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }
}

/// One completed (or in-progress) round in the session history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number within the session.
    pub number: u32,
    pub games: Vec<Game>,
    pub sitting_out_ids: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.games.iter().all(Game::is_complete)
    }
}
