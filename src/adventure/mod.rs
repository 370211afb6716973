//! Kaito's Adventure: gather, brew, trade and fight across three towns.

pub mod actions;
pub mod catalog;
pub mod combat;
pub mod error;
pub mod logic;
pub mod progress;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::GameConfig;
use crate::input::{ClickState, InputEvent};

use actions::*;
use catalog::{ALL_RECIPES, ALL_TOWNS, LEARNABLE_SKILLS};
use error::ActionError;
use state::{AdventureState, Overlay};

pub struct AdventureGame {
    pub state: AdventureState,
    ticks_since_save: u64,
}

/// Position of a lowercase letter key (`'a'` → 0).
fn letter_index(key: char) -> Option<usize> {
    key.is_ascii_lowercase().then(|| (key as u8 - b'a') as usize)
}

/// Position of a digit key (`'1'` → 0); `'0'` is reserved for closing.
fn digit_index(key: char) -> Option<usize> {
    match key {
        '1'..='9' => Some((key as u8 - b'1') as usize),
        _ => None,
    }
}

impl AdventureGame {
    pub fn new(config: GameConfig) -> Self {
        let state = AdventureState::with_config(config);

        #[cfg(target_arch = "wasm32")]
        let state = {
            let mut s = state;
            if save::load_game(&mut s) {
                s.add_log("Save data loaded.");
            }
            s
        };

        Self { state, ticks_since_save: 0 }
    }

    /// Start a new day (or week) of tasks if the calendar moved on.
    pub fn refresh_day(&mut self, day: u64) {
        progress::refresh_day(&mut self.state, day);
    }

    fn report<T>(&mut self, result: Result<T, ActionError>) -> bool {
        if let Err(e) = result {
            tracing::debug!(error = ?e, "action refused");
            self.state.add_log(&e.to_string());
        }
        true
    }

    fn open(&mut self, overlay: Overlay) -> bool {
        if self.state.in_combat() {
            return self.report::<()>(Err(ActionError::InCombat));
        }
        self.state.overlay = Some(overlay);
        true
    }

    fn close_overlay(&mut self) -> bool {
        self.state.overlay.take().is_some()
    }

    /// Act on the `index`-th entry of the open overlay.
    fn overlay_entry(&mut self, overlay: Overlay, index: usize) -> bool {
        let s = &mut self.state;
        match overlay {
            Overlay::Craft => match ALL_RECIPES.get(index) {
                Some(&recipe) => {
                    let r = logic::craft(s, recipe);
                    self.report(r)
                }
                None => false,
            },
            Overlay::Inventory => {
                let r = logic::use_item(s, index);
                self.report(r)
            }
            Overlay::Market => {
                let r = logic::sell(s, index);
                self.report(r)
            }
            Overlay::Travel => match ALL_TOWNS.get(index) {
                Some(&town) => {
                    let r = logic::travel(s, town);
                    if r.is_ok() {
                        s.overlay = None;
                    }
                    self.report(r)
                }
                None => false,
            },
            Overlay::Townsfolk => {
                let r = progress::talk_to_npc(s, index);
                self.report(r)
            }
            Overlay::Skills => match LEARNABLE_SKILLS.get(index) {
                Some(&skill) => {
                    let r = logic::learn_skill(s, skill);
                    self.report(r)
                }
                None => false,
            },
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        let in_range = |base: u16| (base..base + ENTRY_RANGE).contains(&action_id);
        match action_id {
            GATHER => {
                let r = logic::gather(&mut self.state);
                self.report(r)
            }
            OPEN_CRAFT => self.open(Overlay::Craft),
            OPEN_INVENTORY => self.open(Overlay::Inventory),
            OPEN_MARKET => self.open(Overlay::Market),
            OPEN_TRAVEL => self.open(Overlay::Travel),
            OPEN_TOWNSFOLK => self.open(Overlay::Townsfolk),
            OPEN_SKILLS => self.open(Overlay::Skills),
            SEEK_FIGHT => {
                let r = combat::start_combat(&mut self.state);
                self.report(r)
            }
            CLOSE_OVERLAY => self.close_overlay(),
            DRINK_POTION => {
                let r = combat::drink_potion(&mut self.state);
                self.report(r)
            }
            FLEE => {
                let r = combat::flee(&mut self.state);
                self.report(r)
            }
            LEAVE_COMBAT => {
                let r = combat::leave_combat(&mut self.state);
                self.report(r)
            }
            id if (ATTACK_BASE..DRINK_POTION).contains(&id) => {
                let r = combat::attack(&mut self.state, (id - ATTACK_BASE) as usize);
                self.report(r)
            }
            id if in_range(BUY_OFFER_BASE) => {
                let r = logic::buy(&mut self.state, (id - BUY_OFFER_BASE) as usize);
                self.report(r)
            }
            id => {
                let entry = [
                    (CRAFT_BASE, Overlay::Craft),
                    (USE_ITEM_BASE, Overlay::Inventory),
                    (SELL_ITEM_BASE, Overlay::Market),
                    (TRAVEL_BASE, Overlay::Travel),
                    (TALK_NPC_BASE, Overlay::Townsfolk),
                    (LEARN_SKILL_BASE, Overlay::Skills),
                ]
                .into_iter()
                .find(|&(base, _)| in_range(base));
                match entry {
                    Some((base, overlay)) => self.overlay_entry(overlay, (id - base) as usize),
                    None => false,
                }
            }
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        if self.state.in_combat() {
            return self.handle_combat_key(key);
        }
        if let Some(overlay) = self.state.overlay {
            if key == '0' || key == 'q' {
                return self.close_overlay();
            }
            if overlay == Overlay::Market {
                if let Some(i) = digit_index(key) {
                    let r = logic::buy(&mut self.state, i);
                    return self.report(r);
                }
            }
            return match letter_index(key) {
                Some(i) => self.overlay_entry(overlay, i),
                None => false,
            };
        }
        match key {
            '1' => self.handle_click(GATHER),
            '2' => self.open(Overlay::Craft),
            '3' => self.open(Overlay::Inventory),
            '4' => self.open(Overlay::Market),
            '5' => self.open(Overlay::Travel),
            '6' => self.open(Overlay::Townsfolk),
            '7' => self.open(Overlay::Skills),
            '8' => self.handle_click(SEEK_FIGHT),
            _ => false,
        }
    }

    fn handle_combat_key(&mut self, key: char) -> bool {
        let over = self.state.combat.as_ref().is_some_and(|c| c.is_over());
        if over {
            return match key {
                '0' | 'q' | ' ' => self.handle_click(LEAVE_COMBAT),
                _ => false,
            };
        }
        match key {
            'p' => self.handle_click(DRINK_POTION),
            'f' => self.handle_click(FLEE),
            k => match digit_index(k) {
                Some(i) => self.handle_click(ATTACK_BASE + i as u16),
                None => false,
            },
        }
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        };
        if consumed {
            self.save();
        }
        consumed
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
        self.ticks_since_save += delta_ticks as u64;
        let interval = self.state.config.secs_to_ticks(self.state.config.autosave_secs);
        if interval > 0 && self.ticks_since_save >= interval {
            self.save();
        }
    }

    fn save(&mut self) {
        self.ticks_since_save = 0;
        #[cfg(target_arch = "wasm32")]
        {
            if let Err(e) = save::save_game(&self.state) {
                tracing::warn!("save failed: {e}");
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Ingredient, Item, RecipeId, TownId};

    fn game() -> AdventureGame {
        AdventureGame::new(GameConfig::default())
    }

    fn press(g: &mut AdventureGame, key: char) -> bool {
        g.handle_input(&InputEvent::Key(key))
    }

    #[test]
    fn gather_key_collects_ingredient() {
        let mut g = game();
        assert!(press(&mut g, '1'));
        assert_eq!(g.state.player.stats.gathers, 1);
    }

    #[test]
    fn refused_action_is_logged() {
        let mut g = game();
        press(&mut g, '1');
        press(&mut g, '1');
        let last = g.state.log.last().unwrap();
        assert!(last.contains("Gather again in 30s"), "{}", last);
    }

    #[test]
    fn overlay_opens_and_closes() {
        let mut g = game();
        press(&mut g, '2');
        assert_eq!(g.state.overlay, Some(Overlay::Craft));
        assert!(press(&mut g, '0'));
        assert_eq!(g.state.overlay, None);
        assert!(!press(&mut g, '0'));
    }

    #[test]
    fn craft_overlay_letter_picks_recipe() {
        let mut g = game();
        g.state.config.craft_base_chance = 1.0;
        g.state.config.craft_max_chance = 1.0;
        press(&mut g, '2');
        press(&mut g, 'a');
        assert_eq!(g.state.player.item_count(Item::Crafted(RecipeId::HerbalTea)), 1);
    }

    #[test]
    fn market_digits_buy_and_letters_sell() {
        let mut g = game();
        press(&mut g, '4');
        press(&mut g, '1');
        assert_eq!(g.state.player.ingredient_count(Ingredient::Pepper), 1);
        assert_eq!(g.state.player.gold, 0);
        press(&mut g, 'a');
        assert!(g.state.log.last().unwrap().contains("Nobody here will buy Water"));
    }

    #[test]
    fn travel_closes_overlay() {
        let mut g = game();
        press(&mut g, '5');
        press(&mut g, 'c');
        assert_eq!(g.state.world.town, TownId::MistHollow);
        assert_eq!(g.state.overlay, None);
    }

    #[test]
    fn click_ids_dispatch() {
        let mut g = game();
        assert!(g.handle_input(&InputEvent::Click(OPEN_TRAVEL)));
        assert!(g.handle_input(&InputEvent::Click(TRAVEL_BASE + 1)));
        assert_eq!(g.state.world.town, TownId::IronPort);
        assert!(g.handle_input(&InputEvent::Click(OPEN_TOWNSFOLK)));
        assert!(g.handle_input(&InputEvent::Click(TALK_NPC_BASE)));
        assert_eq!(g.state.player.quests.len(), 1);
        assert!(!g.handle_input(&InputEvent::Click(999)));
    }

    #[test]
    fn fight_keys() {
        let mut g = game();
        press(&mut g, '8');
        assert!(g.state.in_combat());
        assert!(!press(&mut g, 'q'));
        press(&mut g, '1');
        assert_eq!(g.state.player.skills[0].uses, 1);

        g.state.config.flee_chance = 1.0;
        press(&mut g, 'f');
        assert!(g.state.combat.as_ref().unwrap().is_over());
        press(&mut g, '0');
        assert!(!g.state.in_combat());
    }

    #[test]
    fn overlay_clicks_ignored_in_combat() {
        let mut g = game();
        press(&mut g, '8');
        g.handle_input(&InputEvent::Click(OPEN_SKILLS));
        assert_eq!(g.state.overlay, None);
    }

    #[test]
    fn tick_advances_world() {
        let mut g = game();
        g.tick(10);
        assert_eq!(g.state.world.ticks, 10);
    }

    #[test]
    fn autosave_resets_after_interval() {
        let mut g = game();
        let interval = g.state.config.secs_to_ticks(g.state.config.autosave_secs);
        g.tick(interval as u32 - 1);
        assert_eq!(g.ticks_since_save, interval - 1);
        g.tick(1);
        assert_eq!(g.ticks_since_save, 0);

        g.tick(5);
        assert!(press(&mut g, '1'));
        assert_eq!(g.ticks_since_save, 0);
    }

    #[test]
    fn refresh_day_delegates() {
        let mut g = game();
        g.refresh_day(3);
        assert_eq!(g.state.player.daily_tasks.len(), 3);
    }
}
