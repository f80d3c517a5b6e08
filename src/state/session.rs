use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{KitchenError, Result};
use crate::kitchen::constants::{COUNTDOWN_SECS, GAME_SECS, default_layout};
use crate::kitchen::{Dispatcher, Kitchen, PlayerInteractor, Target, tick_stations};
use crate::models::{ActorId, FoodCatalog, Recipe, StationSpec, standard_recipes};
use crate::state::{EventQueue, GameEvent, MenuConfig, RecipeBook};

/// Round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    Countdown,
    Playing,
    Paused,
    GameOver,
}

/// Everything needed to build a session, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub game_secs: f64,

    pub countdown_secs: f64,

    #[serde(default)]
    pub menu: MenuConfig,

    #[serde(default)]
    pub foods: FoodCatalog,

    #[serde(default = "default_layout")]
    pub layout: Vec<StationSpec>,

    #[serde(default = "default_players")]
    pub players: usize,
}

fn default_players() -> usize {
    1
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_secs: GAME_SECS,
            countdown_secs: COUNTDOWN_SECS,
            menu: MenuConfig::default(),
            foods: FoodCatalog::standard(),
            layout: default_layout(),
            players: default_players(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.game_secs > 0.0) {
            return Err(KitchenError::InvalidInput(
                "game_secs must be positive".to_string(),
            ));
        }
        if !(self.countdown_secs >= 0.0) {
            return Err(KitchenError::InvalidInput(
                "countdown_secs must not be negative".to_string(),
            ));
        }
        if self.players == 0 {
            return Err(KitchenError::InvalidInput(
                "a session needs at least one player".to_string(),
            ));
        }
        self.menu.validate()?;
        self.foods.validate()
    }
}

/// Deliveries counted while playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub delivered: u32,
    pub total: u32,
}

/// Discrete triggers from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    InteractPressed,
    InteractReleased,
    CutPressed,
    CutReleased,
    MoveAxis(f64, f64),
    PausePressed,
}

/// One round of play: the kitchen, the menu, the clock and the score.
///
/// Gameplay mutations push onto an internal queue; after every tick or input
/// the queue is settled (scoring applied) and moved to the outbox that
/// presentation code drains.
pub struct GameSession {
    config: SessionConfig,
    kitchen: Kitchen,
    book: RecipeBook,
    players: Vec<PlayerInteractor>,
    pending: EventQueue,
    outbox: Vec<GameEvent>,
    state: GameState,
    state_before_pause: GameState,
    time_scale: f64,
    countdown_left: f64,
    remaining: f64,
    score: Score,
}

impl GameSession {
    /// Build a session. `seed` fixes the menu rotation; `None` draws one.
    pub fn new(config: SessionConfig, recipes: Vec<Recipe>, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..u64::MAX));
        let book = RecipeBook::new(recipes, config.menu.clone(), StdRng::seed_from_u64(seed))?;
        let (kitchen, players) = build_kitchen(&config);
        debug!(seed, players = players.len(), "session created");

        Ok(Self {
            remaining: config.game_secs,
            countdown_left: config.countdown_secs,
            config,
            kitchen,
            book,
            players,
            pending: EventQueue::new(),
            outbox: Vec::new(),
            state: GameState::NotStarted,
            state_before_pause: GameState::NotStarted,
            time_scale: 1.0,
            score: Score::default(),
        })
    }

    /// Default kitchen and the built-in menu.
    pub fn standard(seed: Option<u64>) -> Result<Self> {
        Self::new(SessionConfig::default(), standard_recipes(), seed)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Open the menu and start the countdown.
    pub fn start(&mut self) {
        if self.state != GameState::NotStarted {
            return;
        }
        self.book.open(&mut self.pending);
        self.countdown_left = self.config.countdown_secs;
        self.remaining = self.config.game_secs;
        self.pending.push(GameEvent::TimeChanged {
            remaining: self.remaining,
        });
        self.set_state(GameState::Countdown);
        if self.countdown_left <= 0.0 {
            self.set_state(GameState::Playing);
        }
        self.settle();
    }

    /// Throw the round away and start over with a fresh kitchen.
    pub fn restart(&mut self) {
        let (kitchen, players) = build_kitchen(&self.config);
        self.kitchen = kitchen;
        self.players = players;
        self.score = Score::default();
        self.time_scale = 1.0;
        self.pending.push(GameEvent::ScoreChanged {
            delivered: 0,
            total: 0,
        });
        self.book.reset(&mut self.pending);
        self.state = GameState::NotStarted;
        self.state_before_pause = GameState::NotStarted;
        info!("session restarted");
        self.start();
    }

    /// Advance the round by `delta_secs` of real time.
    ///
    /// Time left over when the countdown ends is spent playing, and playing
    /// time stops at the end of the round.
    pub fn tick(&mut self, delta_secs: f64) {
        let mut delta = delta_secs.max(0.0) * self.time_scale;

        if self.state == GameState::Countdown {
            let spent = delta.min(self.countdown_left);
            self.countdown_left -= spent;
            delta -= spent;
            if self.countdown_left <= 0.0 {
                self.countdown_left = 0.0;
                self.set_state(GameState::Playing);
            }
        }

        if self.state == GameState::Playing {
            let delta = delta.min(self.remaining);
            self.book.tick(delta, &mut self.pending);
            tick_stations(&mut self.kitchen, delta, &mut self.pending);
            self.remaining = (self.remaining - delta).max(0.0);
            self.pending.push(GameEvent::TimeChanged {
                remaining: self.remaining,
            });
            if self.remaining <= 0.0 {
                self.set_state(GameState::GameOver);
            }
        }
        self.settle();
    }

    pub fn toggle_pause(&mut self) {
        if self.state == GameState::Paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn pause(&mut self) {
        if matches!(self.state, GameState::Countdown | GameState::Playing) {
            self.state_before_pause = self.state;
            self.time_scale = 0.0;
            self.set_state(GameState::Paused);
            self.pending.push(GameEvent::PauseChanged { paused: true });
            self.settle();
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.time_scale = 1.0;
            self.set_state(self.state_before_pause);
            self.pending.push(GameEvent::PauseChanged { paused: false });
            self.settle();
        }
    }

    fn set_state(&mut self, state: GameState) {
        if self.state == state {
            return;
        }
        info!("game state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.pending.push(GameEvent::GameStateChanged { state });
    }

    /// Apply scoring to pending events and hand them to the outbox.
    fn settle(&mut self) {
        for event in self.pending.drain() {
            let price = match &event {
                GameEvent::RecipeSuccess { price, .. } if self.state == GameState::Playing => {
                    Some(*price)
                }
                _ => None,
            };
            self.outbox.push(event);
            if let Some(price) = price {
                self.score.delivered += 1;
                self.score.total += price;
                self.outbox.push(GameEvent::ScoreChanged {
                    delivered: self.score.delivered,
                    total: self.score.total,
                });
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Player actions
    // ─────────────────────────────────────────────────────────────────────

    fn player_index(&self, actor: ActorId) -> Option<usize> {
        self.players.iter().position(|p| p.actor == actor)
    }

    pub fn set_focus(&mut self, actor: ActorId, target: Option<Target>) {
        if let Some(i) = self.player_index(actor) {
            self.players[i].set_focus(target);
        }
    }

    /// Focus the nearest of `(target, distance)` candidates.
    pub fn select_nearest(&mut self, actor: ActorId, candidates: &[(Target, f64)]) -> Option<Target> {
        let i = self.player_index(actor)?;
        self.players[i].select_nearest(&self.kitchen, candidates)
    }

    /// Main interact action on the actor's focus. Only answers while playing.
    pub fn interact(&mut self, actor: ActorId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(i) = self.player_index(actor) else {
            return false;
        };
        let mut dispatcher = Dispatcher::new(&mut self.kitchen, &mut self.book, &mut self.pending);
        let handled = self.players[i].interact(&mut dispatcher);
        self.settle();
        handled
    }

    /// Focus `target` and interact with it.
    pub fn interact_with(&mut self, actor: ActorId, target: Target) -> bool {
        self.set_focus(actor, Some(target));
        self.interact(actor)
    }

    pub fn cut(&mut self, actor: ActorId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(i) = self.player_index(actor) else {
            return false;
        };
        let mut dispatcher = Dispatcher::new(&mut self.kitchen, &mut self.book, &mut self.pending);
        let handled = self.players[i].cut(&mut dispatcher);
        self.settle();
        handled
    }

    pub fn cut_at(&mut self, actor: ActorId, target: Target) -> bool {
        self.set_focus(actor, Some(target));
        self.cut(actor)
    }

    /// Let go of the held item in the facing direction.
    pub fn drop_held(&mut self, actor: ActorId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(i) = self.player_index(actor) else {
            return false;
        };
        let dropped = self.players[i].drop_held(&mut self.kitchen, &mut self.pending);
        self.settle();
        dropped
    }

    /// Route an input trigger. Releases are accepted and ignored.
    pub fn handle_input(&mut self, actor: ActorId, input: InputEvent) -> bool {
        match input {
            InputEvent::InteractPressed => self.interact(actor),
            InputEvent::CutPressed => self.cut(actor),
            InputEvent::MoveAxis(x, y) => {
                if let Some(i) = self.player_index(actor) {
                    self.players[i].set_move_axis(x, y);
                }
                true
            }
            InputEvent::PausePressed => {
                self.toggle_pause();
                true
            }
            InputEvent::InteractReleased | InputEvent::CutReleased => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Take every event published since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, GameState::Countdown | GameState::Playing | GameState::Paused)
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining
    }

    pub fn countdown_secs(&self) -> f64 {
        self.countdown_left
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn kitchen(&self) -> &Kitchen {
        &self.kitchen
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.book
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn players(&self) -> &[PlayerInteractor] {
        &self.players
    }

    pub fn player_mut(&mut self, actor: ActorId) -> Option<&mut PlayerInteractor> {
        self.players.iter_mut().find(|p| p.actor == actor)
    }

    /// Actor of the first player.
    pub fn first_actor(&self) -> ActorId {
        self.players.first().map(|p| p.actor).unwrap_or(ActorId(0))
    }
}

fn build_kitchen(config: &SessionConfig) -> (Kitchen, Vec<PlayerInteractor>) {
    let mut kitchen = Kitchen::new(config.foods.clone(), &config.layout);
    let players = (0..config.players)
        .map(|_| PlayerInteractor::new(kitchen.add_actor()))
        .collect();
    (kitchen, players)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> GameSession {
        let mut session = GameSession::standard(Some(42)).unwrap();
        session.start();
        session
    }

    #[test]
    fn test_countdown_then_playing() {
        let mut session = started();
        assert_eq!(session.state(), GameState::Countdown);
        session.tick(COUNTDOWN_SECS - 0.5);
        assert_eq!(session.state(), GameState::Countdown);
        session.tick(1.0);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_countdown_leftover_is_played() {
        let mut coarse = started();
        coarse.tick(10.0);

        let mut fine = started();
        for _ in 0..10 {
            fine.tick(1.0);
        }

        assert_eq!(coarse.state(), GameState::Playing);
        assert_eq!(coarse.remaining_secs(), GAME_SECS - (10.0 - COUNTDOWN_SECS));
        assert_eq!(coarse.remaining_secs(), fine.remaining_secs());
    }

    #[test]
    fn test_pause_restores_previous_state() {
        let mut session = started();
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Paused);
        assert_eq!(session.time_scale(), 0.0);

        session.tick(100.0);
        assert_eq!(session.countdown_secs(), COUNTDOWN_SECS);

        session.toggle_pause();
        assert_eq!(session.state(), GameState::Countdown);
        assert_eq!(session.time_scale(), 1.0);
    }

    #[test]
    fn test_round_ends_when_time_runs_out() {
        let mut session = started();
        session.tick(COUNTDOWN_SECS);
        session.tick(GAME_SECS + 1.0);
        assert_eq!(session.state(), GameState::GameOver);
        assert_eq!(session.remaining_secs(), 0.0);
        assert!(!session.is_running());
    }

    #[test]
    fn test_actions_ignored_before_play() {
        let mut session = started();
        let actor = session.first_actor();
        let bread = session.kitchen().supply_for(crate::models::FoodType::Bread).unwrap();
        assert!(!session.interact_with(actor, Target::Container(bread)));
        assert_eq!(session.kitchen().held_by(actor), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig {
            players: 0,
            ..SessionConfig::default()
        };
        assert!(GameSession::new(config, standard_recipes(), Some(1)).is_err());
    }
}
