use serde::Serialize;
use tracing::{debug, info};

use crate::kitchen::Target;
use crate::models::{ActorId, ContainerId, FoodType, PrepStep, Recipe, StationKind};
use crate::state::{GameEvent, GameSession, GameState};

/// Upper bound on knife strokes for a single cut before giving up.
const MAX_STROKES: u32 = 64;

/// Extra seconds allowed on top of a cook duration.
const COOK_SLACK_SECS: f64 = 5.0;

/// Longest the bot will stand at an empty plate rack.
const PLATE_WAIT_SECS: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Simulated seconds each action takes; also the idle tick.
    pub step_secs: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self { step_secs: 0.5 }
    }
}

/// Outcome of one autoplayed round.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub seed: u64,
    pub delivered: u32,
    pub coins: u32,
    pub failed_deliveries: u32,
    pub trashed: u32,
    pub actions: u32,
    pub abandoned_orders: u32,
}

/// Why a plan stopped early.
#[derive(Debug)]
enum Halt {
    RoundOver,
    Stuck(String),
}

type Step<T> = std::result::Result<T, Halt>;

/// A scripted cook working one actor through the public session API.
pub struct Bot {
    actor: ActorId,
    config: BotConfig,
    stats: RunStats,
}

impl Bot {
    pub fn new(actor: ActorId, config: BotConfig) -> Self {
        Self {
            actor,
            config,
            stats: RunStats::default(),
        }
    }

    /// Cook until the round ends. The session must already be started.
    pub fn play(mut self, session: &mut GameSession, seed: u64) -> RunStats {
        self.stats.seed = seed;
        loop {
            match self.round(session) {
                Ok(()) => {}
                Err(Halt::RoundOver) => break,
                Err(Halt::Stuck(reason)) => {
                    debug!("bot abandoned an order: {}", reason);
                    self.stats.abandoned_orders += 1;
                    if self.discard(session).and_then(|_| self.wait(session)).is_err() {
                        break;
                    }
                }
            }
        }

        let score = session.score();
        self.stats.delivered = score.delivered;
        self.stats.coins = score.total;
        info!(
            seed,
            delivered = self.stats.delivered,
            coins = self.stats.coins,
            "autoplay round finished"
        );
        self.stats
    }

    fn round(&mut self, session: &mut GameSession) -> Step<()> {
        self.until_playing(session)?;
        match choose_recipe(session) {
            Some(recipe) => self.serve(session, &recipe),
            None => self.wait(session),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Primitive moves, each costing simulated time
    // ─────────────────────────────────────────────────────────────────────

    fn wait(&mut self, session: &mut GameSession) -> Step<()> {
        session.tick(self.config.step_secs);
        self.absorb(session);
        match session.state() {
            GameState::Countdown | GameState::Playing => Ok(()),
            _ => Err(Halt::RoundOver),
        }
    }

    fn until_playing(&mut self, session: &mut GameSession) -> Step<()> {
        while session.state() != GameState::Playing {
            self.wait(session)?;
        }
        Ok(())
    }

    fn act(&mut self, session: &mut GameSession, station: ContainerId) -> Step<bool> {
        self.until_playing(session)?;
        let handled = session.interact_with(self.actor, Target::Container(station));
        self.stats.actions += 1;
        self.absorb(session);
        self.wait(session)?;
        Ok(handled)
    }

    fn chop(&mut self, session: &mut GameSession, board: ContainerId) -> Step<bool> {
        self.until_playing(session)?;
        let landed = session.cut_at(self.actor, Target::Container(board));
        self.stats.actions += 1;
        self.absorb(session);
        self.wait(session)?;
        Ok(landed)
    }

    fn wait_until<F>(&mut self, session: &mut GameSession, max_secs: f64, done: F) -> Step<()>
    where
        F: Fn(&GameSession) -> bool,
    {
        let mut waited = 0.0;
        while !done(session) {
            if waited >= max_secs {
                return Err(Halt::Stuck(format!("gave up after waiting {:.1}s", waited)));
            }
            self.wait(session)?;
            waited += self.config.step_secs;
        }
        Ok(())
    }

    fn absorb(&mut self, session: &mut GameSession) {
        for event in session.drain_events() {
            match event {
                GameEvent::RecipeFailed { .. } => self.stats.failed_deliveries += 1,
                GameEvent::ItemTrashed { .. } => self.stats.trashed += 1,
                _ => {}
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Plans
    // ─────────────────────────────────────────────────────────────────────

    fn held_food(&self, session: &GameSession) -> Option<FoodType> {
        let kitchen = session.kitchen();
        kitchen
            .held_by(self.actor)
            .and_then(|id| kitchen.item(id))
            .and_then(|item| item.food)
    }

    fn holds_plate(&self, session: &GameSession) -> bool {
        let kitchen = session.kitchen();
        kitchen
            .held_by(self.actor)
            .and_then(|id| kitchen.item(id))
            .is_some_and(|item| item.is_plate())
    }

    /// Bin whatever is in hand; drop it if the bin refuses.
    fn discard(&mut self, session: &mut GameSession) -> Step<()> {
        if session.kitchen().held_by(self.actor).is_none() {
            return Ok(());
        }
        if let Some(trash) = session.kitchen().find_station(StationKind::Trash) {
            if self.act(session, trash)? {
                return Ok(());
            }
        }
        session.drop_held(self.actor);
        self.absorb(session);
        Ok(())
    }

    /// Empty a station so the bot can use it.
    fn clear_station(&mut self, session: &mut GameSession, station: ContainerId) -> Step<()> {
        let occupied = session
            .kitchen()
            .container(station)
            .is_some_and(|c| c.is_occupied());
        if occupied {
            self.act(session, station)?;
            self.discard(session)?;
        }
        Ok(())
    }

    fn serve(&mut self, session: &mut GameSession, recipe: &Recipe) -> Step<()> {
        let counter = station(session, StationKind::Counter)?;
        let rack = station(session, StationKind::PlateDispenser)?;
        let delivery = station(session, StationKind::Delivery)?;
        debug!("bot starts on {}", recipe.id);

        self.discard(session)?;
        self.clear_station(session, counter)?;

        self.wait_until(session, PLATE_WAIT_SECS, |s| {
            s.kitchen()
                .container(rack)
                .and_then(|c| c.dispenser())
                .is_some_and(|d| d.count() > 0)
        })?;
        self.act(session, rack)?;
        if !self.holds_plate(session) {
            return Err(Halt::Stuck("no plate from the rack".to_string()));
        }
        self.act(session, counter)?;

        for ingredient in &recipe.ingredients {
            self.prepare(session, ingredient.food_type())?;
            self.act(session, counter)?;
            if session.kitchen().held_by(self.actor).is_some() {
                return Err(Halt::Stuck(format!("plate refused {}", ingredient)));
            }
        }

        self.act(session, counter)?;
        if !self.holds_plate(session) {
            return Err(Halt::Stuck("plate left on the counter".to_string()));
        }
        if !self.act(session, delivery)? {
            return Err(Halt::Stuck(format!("{} was not accepted", recipe.id)));
        }
        Ok(())
    }

    /// Fetch the raw food behind `target` and process it; ends holding `target`.
    fn prepare(&mut self, session: &mut GameSession, target: FoodType) -> Step<()> {
        let (raw, steps) = session.kitchen().catalog().preparation(target);
        let supply = session
            .kitchen()
            .supply_for(raw)
            .ok_or_else(|| Halt::Stuck(format!("no crate for {}", raw)))?;

        let board = session.kitchen().find_station(StationKind::CuttingBoard);
        let stove = session.kitchen().find_station(StationKind::Stove);
        for step in &steps {
            let needed = match step {
                PrepStep::Cut => board,
                PrepStep::Cook => stove,
            };
            let needed = needed.ok_or_else(|| Halt::Stuck(format!("no station to {:?}", step)))?;
            self.clear_station(session, needed)?;
        }

        self.act(session, supply)?;
        let mut current = raw;
        if self.held_food(session) != Some(current) {
            return Err(Halt::Stuck(format!("crate did not hand out {}", raw)));
        }

        for step in steps {
            let spec = session
                .kitchen()
                .catalog()
                .get(current)
                .cloned()
                .ok_or_else(|| Halt::Stuck(format!("no template for {}", current)))?;
            current = match step {
                PrepStep::Cut => {
                    let cut = spec
                        .cut
                        .ok_or_else(|| Halt::Stuck(format!("{} cannot be cut", current)))?;
                    let board = station(session, StationKind::CuttingBoard)?;
                    self.cut_on(session, board, cut.result)?;
                    cut.result
                }
                PrepStep::Cook => {
                    let cook = spec
                        .cook
                        .ok_or_else(|| Halt::Stuck(format!("{} cannot be cooked", current)))?;
                    let stove = station(session, StationKind::Stove)?;
                    self.cook_on(session, stove, cook.result, cook.secs)?;
                    cook.result
                }
            };
        }

        if self.held_food(session) != Some(target) {
            return Err(Halt::Stuck(format!("ended up without {}", target)));
        }
        Ok(())
    }

    fn cut_on(&mut self, session: &mut GameSession, board: ContainerId, result: FoodType) -> Step<()> {
        if !self.act(session, board)? {
            return Err(Halt::Stuck("cutting board refused the item".to_string()));
        }
        let mut strokes = 0;
        while session.kitchen().food_on(board) != Some(result) {
            if strokes >= MAX_STROKES || !self.chop(session, board)? {
                return Err(Halt::Stuck(format!("could not cut {}", result)));
            }
            strokes += 1;
        }
        self.act(session, board)?;
        Ok(())
    }

    fn cook_on(
        &mut self,
        session: &mut GameSession,
        stove: ContainerId,
        result: FoodType,
        secs: f64,
    ) -> Step<()> {
        if !self.act(session, stove)? {
            return Err(Halt::Stuck("stove refused the item".to_string()));
        }
        self.wait_until(session, secs + COOK_SLACK_SECS, |s| {
            s.kitchen().food_on(stove) == Some(result)
        })?;
        self.act(session, stove)?;
        Ok(())
    }
}

fn station(session: &GameSession, kind: StationKind) -> Step<ContainerId> {
    session
        .kitchen()
        .find_station(kind)
        .ok_or_else(|| Halt::Stuck(format!("kitchen has no {}", kind)))
}

/// The best-paying active recipe this kitchen can make.
fn choose_recipe(session: &GameSession) -> Option<Recipe> {
    let kitchen = session.kitchen();
    let has = |kind| kitchen.find_station(kind).is_some();
    if !(has(StationKind::Counter) && has(StationKind::PlateDispenser) && has(StationKind::Delivery)) {
        return None;
    }

    let makeable = |recipe: &Recipe| {
        recipe.ingredients.iter().all(|ingredient| {
            let (raw, steps) = kitchen.catalog().preparation(ingredient.food_type());
            kitchen.supply_for(raw).is_some()
                && steps.iter().all(|step| match step {
                    PrepStep::Cut => has(StationKind::CuttingBoard),
                    PrepStep::Cook => has(StationKind::Stove),
                })
        })
    };

    session
        .recipes()
        .active_recipes()
        .into_iter()
        .filter(|r| makeable(*r))
        .fold(None, |best: Option<&Recipe>, r| match best {
            Some(b) if b.price >= r.price => Some(b),
            _ => Some(r),
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::standard_recipes;
    use crate::state::SessionConfig;

    #[test]
    fn test_bot_delivers_in_standard_kitchen() {
        let config = SessionConfig {
            game_secs: 120.0,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config, standard_recipes(), Some(5)).unwrap();
        session.start();
        let actor = session.first_actor();

        let stats = Bot::new(actor, BotConfig::default()).play(&mut session, 5);
        assert_eq!(session.state(), GameState::GameOver);
        assert!(stats.delivered > 0);
        assert!(stats.coins > 0);
        session.kitchen().check_invariants().unwrap();
    }

    #[test]
    fn test_choose_recipe_prefers_price() {
        let mut session = GameSession::standard(Some(9)).unwrap();
        session.start();
        let best = choose_recipe(&session).unwrap();
        let top = session
            .recipes()
            .active_recipes()
            .iter()
            .map(|r| r.price)
            .max()
            .unwrap();
        assert_eq!(best.price, top);
    }
}
