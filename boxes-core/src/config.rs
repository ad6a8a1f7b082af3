//! Match configuration
//!
//! Loaded from JSON, e.g.
//!
//! ```json
//! { "width": 3, "height": 3, "games": 4, "seed": 7,
//!   "red": { "kind": "minimax", "ply": 5 },
//!   "blue": { "kind": "random" } }
//! ```

use crate::ai::{MinimaxAI, SearchClock};
use crate::board::{BoardError, Side};
use crate::dots::DotsBoard;
use crate::player::{Player, RandomPlayer};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// How one side picks its moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerConfig {
    /// Alpha-beta search to a fixed depth
    Minimax { ply: u32 },
    /// Uniformly random moves
    Random,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig::Minimax { ply: 4 }
    }
}

impl PlayerConfig {
    /// Build the player. Minimax players record their search time on `clock`.
    pub fn build(&self, side: Side, clock: &Arc<SearchClock>, seed: Option<u64>) -> Box<dyn Player> {
        match *self {
            PlayerConfig::Minimax { ply } => Box::new(MinimaxAI::with_clock(side, ply, Arc::clone(clock))),
            PlayerConfig::Random => match seed {
                Some(seed) => Box::new(RandomPlayer::with_seed(side, seed)),
                None => Box::new(RandomPlayer::new(side)),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("a match needs at least one game")]
    NoGames,

    #[error("{side} minimax player needs a ply of at least 1")]
    ZeroPly { side: Side },
}

/// Settings for a series of games
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Board width in boxes
    pub width: usize,
    /// Board height in boxes
    pub height: usize,
    pub games: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    pub red: PlayerConfig,
    pub blue: PlayerConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
            games: 1,
            seed: None,
            red: PlayerConfig::default(),
            blue: PlayerConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        DotsBoard::new(self.width, self.height)?;
        if self.games == 0 {
            return Err(ConfigError::NoGames);
        }
        for (side, player) in [(Side::Red, self.red), (Side::Blue, self.blue)] {
            if player == (PlayerConfig::Minimax { ply: 0 }) {
                return Err(ConfigError::ZeroPly { side });
            }
        }
        Ok(())
    }

    /// Set board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set both players
    pub fn with_players(mut self, red: PlayerConfig, blue: PlayerConfig) -> Self {
        self.red = red;
        self.blue = blue;
        self
    }

    /// Set number of games
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fresh empty board of the configured size
    pub fn new_board(&self) -> Result<DotsBoard, BoardError> {
        DotsBoard::new(self.width, self.height)
    }
}
