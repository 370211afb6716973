//! Save / load through browser localStorage.
//!
//! Only the persistent halves of the game (`Player` and `World`) are stored,
//! as one JSON object under `GameConfig::storage_key`. An in-progress fight
//! is not saved. Unreadable saves are discarded and a fresh game starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{AdventureState, Player, World, MAX_LEVEL};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("localStorage is unavailable")]
    StorageUnavailable,
    #[error("localStorage rejected the write: {0}")]
    Write(String),
    #[error("save data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save data is invalid: `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    player: Player,
    world: World,
}

impl SaveData {
    /// Reject saves that parse but break the player invariants.
    fn validate(&self) -> Result<(), SaveError> {
        let p = &self.player;
        if p.level == 0 || p.level > MAX_LEVEL {
            return Err(invalid("player.level", "is outside 1..=MAX_LEVEL"));
        }
        if p.max_health == 0 {
            return Err(invalid("player.max_health", "must be positive"));
        }
        if p.health > p.max_health {
            return Err(invalid("player.health", "exceeds max_health"));
        }
        if p.inventory.iter().any(|s| s.quantity == 0) {
            return Err(invalid("player.inventory", "holds an empty stack"));
        }
        if p.inventory.len() > p.inventory_slots {
            return Err(invalid("player.inventory", "holds more stacks than slots"));
        }
        if p.skills.iter().any(|s| s.level == 0) {
            return Err(invalid("player.skills", "holds a level 0 skill"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SaveError {
    SaveError::Invalid { field, reason }
}

fn extract_save(state: &AdventureState) -> SaveData {
    SaveData {
        player: state.player.clone(),
        world: state.world.clone(),
    }
}

fn apply_save(state: &mut AdventureState, save: SaveData) {
    state.player = save.player;
    state.world = save.world;
    state.combat = None;
    state.overlay = None;
}

pub fn to_json(state: &AdventureState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// Replace the saved halves of `state` with the contents of `json`.
/// On error `state` is left untouched.
pub fn restore_json(state: &mut AdventureState, json: &str) -> Result<(), SaveError> {
    let save: SaveData = serde_json::from_str(json)?;
    save.validate()?;
    apply_save(state, save);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &AdventureState) -> Result<(), SaveError> {
    let json = to_json(state)?;
    let storage = get_storage().ok_or(SaveError::StorageUnavailable)?;
    storage
        .set_item(&state.config.storage_key, &json)
        .map_err(|e| SaveError::Write(format!("{e:?}")))?;
    tracing::debug!(bytes = json.len(), "game saved");
    Ok(())
}

/// Returns true when a save was found and applied.
#[cfg(target_arch = "wasm32")]
pub fn load_game(state: &mut AdventureState) -> bool {
    let Some(storage) = get_storage() else {
        return false;
    };
    let json = match storage.get_item(&state.config.storage_key) {
        Ok(Some(j)) => j,
        _ => return false,
    };
    match restore_json(state, &json) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("discarding save: {e}");
            let _ = storage.remove_item(&state.config.storage_key);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::catalog::{
        BuffKind, Ingredient, Item, QuestId, RecipeId, SkillId, TownId, Weather,
    };
    use crate::adventure::state::{ActiveBuff, ItemStack, LearnedSkill, QuestProgress};

    #[test]
    fn fresh_game_roundtrip() {
        let state = AdventureState::new();
        let json = to_json(&state).unwrap();

        let mut restored = AdventureState::new();
        restored.player.gold = 999;
        restore_json(&mut restored, &json).unwrap();
        assert_eq!(restored.player, state.player);
        assert_eq!(restored.world, state.world);
    }

    #[test]
    fn progressed_game_roundtrip() {
        let mut original = AdventureState::new();
        original.player.gold = 1234;
        original.player.level = 7;
        original.player.xp = 42;
        original.player.inventory.push(ItemStack {
            item: Item::Crafted(RecipeId::GoldenElixir),
            quantity: 3,
        });
        original.player.rare_items.push(Ingredient::MistCrystal);
        original.player.equipment.weapon = Some(RecipeId::ShadowDagger);
        original.player.skills.push(LearnedSkill { id: SkillId::Stun, uses: 7, level: 2 });
        original.player.quests.push(QuestProgress {
            id: QuestId::BanditQuest,
            progress: 2,
            completed: false,
        });
        original.player.buffs.push(ActiveBuff { kind: BuffKind::LuckyGather, expires_at: 5000 });
        original.player.last_login_day = Some(20_000);
        original.world.town = TownId::IronPort;
        original.world.weather = Weather::Foggy;
        original.world.ticks = 4321;
        original.world.gather_ready_at = [0, 4500, 0];
        original.world.rng_seed = 7;

        let json = to_json(&original).unwrap();
        let mut restored = AdventureState::new();
        restore_json(&mut restored, &json).unwrap();

        assert_eq!(restored.player, original.player);
        assert_eq!(restored.world, original.world);
    }

    #[test]
    fn combat_is_not_restored() {
        let mut state = AdventureState::new();
        let json = to_json(&state).unwrap();
        crate::adventure::combat::start_combat(&mut state).unwrap();
        restore_json(&mut state, &json).unwrap();
        assert!(state.combat.is_none());
    }

    #[test]
    fn malformed_save_leaves_state_untouched() {
        let mut state = AdventureState::new();
        state.player.gold = 77;
        let err = restore_json(&mut state, r#"{"player": 3}"#).unwrap_err();
        assert!(matches!(err, SaveError::Json(_)));
        assert_eq!(state.player.gold, 77);
    }

    fn assert_rejected(edit: impl FnOnce(&mut AdventureState), field: &str) {
        let mut bad = AdventureState::new();
        edit(&mut bad);
        let json = to_json(&bad).unwrap();

        let mut state = AdventureState::new();
        state.player.gold = 77;
        let err = restore_json(&mut state, &json).unwrap_err();
        match err {
            SaveError::Invalid { field: f, .. } => assert_eq!(f, field),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(state.player.gold, 77);
        assert_eq!(state.player.level, 1);
    }

    #[test]
    fn invalid_level_is_rejected() {
        assert_rejected(|s| s.player.level = 0, "player.level");
        assert_rejected(|s| s.player.level = MAX_LEVEL + 1, "player.level");
    }

    #[test]
    fn invalid_health_is_rejected() {
        assert_rejected(|s| s.player.health = s.player.max_health + 1, "player.health");
        assert_rejected(
            |s| {
                s.player.max_health = 0;
                s.player.health = 0;
            },
            "player.max_health",
        );
    }

    #[test]
    fn empty_stack_is_rejected() {
        assert_rejected(|s| s.player.inventory[0].quantity = 0, "player.inventory");
    }

    #[test]
    fn overfull_bag_is_rejected() {
        assert_rejected(|s| s.player.inventory_slots = 1, "player.inventory");
    }

    #[test]
    fn level_zero_skill_is_rejected() {
        assert_rejected(|s| s.player.skills[0].level = 0, "player.skills");
    }

    #[test]
    fn max_level_save_is_accepted() {
        let mut original = AdventureState::new();
        original.player.level = MAX_LEVEL;
        original.player.health = 0;
        let json = to_json(&original).unwrap();
        let mut restored = AdventureState::new();
        restore_json(&mut restored, &json).unwrap();
        assert_eq!(restored.player.level, MAX_LEVEL);
    }

    #[test]
    fn config_is_not_part_of_the_save() {
        let state = AdventureState::new();
        let json = to_json(&state).unwrap();
        assert!(!json.contains("storage_key"));
    }
}
