//! Turn-based fights. The player acts, then the enemy answers unless the
//! fight ended or the enemy is stunned.

use tracing::{debug, info};

use super::catalog::{
    enemy_info, recipe_info, skill_info, town_info, weather_info, EnemyKind, Item, RecipeId,
    RecipeKind, SkillId, ALL_ENEMIES,
};
use super::error::ActionError;
use super::logic::{add_item, drink_heal, gain_xp, rng_range, roll};
use super::progress::{self, ProgressEvent};
use super::state::{AdventureState, CombatPhase, CombatState, Player};

fn combat_log(state: &mut AdventureState, text: String) {
    if let Some(combat) = state.combat.as_mut() {
        combat.log.push(text);
    }
}

fn ensure_active(state: &AdventureState) -> Result<(), ActionError> {
    match &state.combat {
        None => Err(ActionError::NotInCombat),
        Some(c) if c.is_over() => Err(ActionError::CombatOver),
        Some(_) => Ok(()),
    }
}

/// Pick a random enemy and start a fight.
pub fn start_combat(state: &mut AdventureState) -> Result<EnemyKind, ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let idx = rng_range(state, ALL_ENEMIES.len() as u32) as usize;
    start_combat_with(state, ALL_ENEMIES[idx])
}

pub fn start_combat_with(state: &mut AdventureState, enemy: EnemyKind) -> Result<EnemyKind, ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    state.combat = Some(CombatState::new(enemy));
    state.overlay = None;
    debug!(?enemy, "combat started");
    state.add_log(&format!("A {} appears!", enemy_info(enemy).name));
    Ok(enemy)
}

/// Learned skills that deal damage, in the order they were learned.
pub fn combat_skills(player: &Player) -> Vec<SkillId> {
    player
        .skills
        .iter()
        .map(|s| s.id)
        .filter(|&id| skill_info(id).effect.damage > 0)
        .collect()
}

pub fn skill_damage(state: &AdventureState, id: SkillId) -> u32 {
    let level = state
        .player
        .skills
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.level)
        .unwrap_or(1);
    let base = skill_info(id).effect.damage + 2 * (level - 1) + state.player.weapon_damage();
    let modifier = weather_info(state.world.weather).combat_modifier;
    ((base as f64 * modifier).round() as u32).max(1)
}

/// Count one use of a skill; returns the new level when it levels up.
fn train_skill(state: &mut AdventureState, id: SkillId) -> Option<u32> {
    let per_level = state.config.skill_uses_per_level;
    let max_level = state.config.max_skill_level;
    let skill = state.player.skills.iter_mut().find(|s| s.id == id)?;
    skill.uses += 1;
    if skill.uses % per_level == 0 && skill.level < max_level {
        skill.level += 1;
        return Some(skill.level);
    }
    None
}

pub fn attack(state: &mut AdventureState, skill_index: usize) -> Result<(), ActionError> {
    ensure_active(state)?;
    let id = *combat_skills(&state.player)
        .get(skill_index)
        .ok_or(ActionError::NoSuchSkill)?;
    let info = skill_info(id);
    let damage = skill_damage(state, id);

    if let Some(level) = train_skill(state, id) {
        state.add_log(&format!("{} reached level {}!", info.name, level));
    }
    let stunned = info.effect.stun_chance > 0.0 && roll(state) < info.effect.stun_chance;

    let Some(combat) = state.combat.as_mut() else {
        return Err(ActionError::NotInCombat);
    };
    let enemy_name = enemy_info(combat.enemy).name;
    combat.enemy_health = combat.enemy_health.saturating_sub(damage);
    combat
        .log
        .push(format!("You use {} for {} damage.", info.name, damage));
    if stunned && combat.enemy_health > 0 {
        combat.enemy_stunned = true;
        combat.log.push(format!("The {} is stunned!", enemy_name));
    }
    let defeated = combat.enemy_health == 0;
    debug!(skill = info.name, damage, "player attack");

    if defeated {
        victory(state);
    } else {
        enemy_turn(state);
    }
    Ok(())
}

fn enemy_turn(state: &mut AdventureState) {
    let armor = state.player.armor_defense();
    let Some(combat) = state.combat.as_mut() else {
        return;
    };
    let info = enemy_info(combat.enemy);
    if combat.enemy_stunned {
        combat.enemy_stunned = false;
        combat.log.push(format!("The {} is stunned and cannot attack.", info.name));
        return;
    }
    let damage = info.damage.saturating_sub(armor).max(1);
    state.player.health = state.player.health.saturating_sub(damage);
    combat
        .log
        .push(format!("The {} hits you for {} damage.", info.name, damage));
    if state.player.health == 0 {
        defeat(state);
    }
}

fn victory(state: &mut AdventureState) {
    let Some(combat) = state.combat.as_mut() else {
        return;
    };
    combat.phase = CombatPhase::Victory;
    let enemy = combat.enemy;
    let info = enemy_info(enemy);
    let gold = info.gold * town_info(state.world.town).reward_multiplier;
    let xp = info.gold * 2;

    state.player.gold = state.player.gold.saturating_add(gold);
    state.player.stats.enemies_defeated += 1;
    combat_log(state, format!("You defeated the {}! +{} gold, +{} xp.", info.name, gold, xp));

    if roll(state) < info.drop_chance {
        let drop = Item::Ingredient(info.drop);
        match add_item(&mut state.player, drop, 1) {
            Ok(()) => combat_log(state, format!("It dropped {}.", info.drop.name())),
            Err(_) => combat_log(state, format!("It dropped {}, but your bag is full.", info.drop.name())),
        }
    }

    info!(enemy = info.name, gold, xp, "enemy defeated");
    state.add_log(&format!("Victory over the {}! +{} gold.", info.name, gold));
    gain_xp(state, xp);
    progress::record(state, ProgressEvent::Defeated(enemy));
}

fn defeat(state: &mut AdventureState) {
    let lost = (state.player.gold as f64 * state.config.defeat_gold_penalty).floor() as u32;
    state.player.gold -= lost;
    state.player.health = state.player.max_health / 2;
    if let Some(combat) = state.combat.as_mut() {
        combat.phase = CombatPhase::Defeat;
    }
    combat_log(state, format!("You collapse and lose {} gold.", lost));
    info!(lost, "player defeated");
    state.add_log(&format!("You were defeated and lost {} gold.", lost));
}

/// Healing potion with the largest heal percent in the bag.
pub fn strongest_heal_potion(player: &Player) -> Option<RecipeId> {
    player
        .inventory
        .iter()
        .filter_map(|s| match s.item {
            Item::Crafted(r) => match recipe_info(r).kind {
                RecipeKind::Heal { heal_percent, .. } => Some((r, heal_percent)),
                _ => None,
            },
            Item::Ingredient(_) => None,
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(r, _)| r)
}

/// Drink the best healing potion; the enemy gets its turn afterwards.
pub fn drink_potion(state: &mut AdventureState) -> Result<(), ActionError> {
    ensure_active(state)?;
    let recipe = strongest_heal_potion(&state.player).ok_or(ActionError::NoPotion)?;
    let healed = drink_heal(state, recipe);
    combat_log(state, format!("You drink {} and recover {} health.", recipe_info(recipe).name, healed));
    enemy_turn(state);
    Ok(())
}

pub fn flee(state: &mut AdventureState) -> Result<(), ActionError> {
    ensure_active(state)?;
    if roll(state) < state.config.flee_chance {
        if let Some(combat) = state.combat.as_mut() {
            combat.phase = CombatPhase::Fled;
            combat.log.push("You escaped!".to_string());
        }
        state.add_log("You fled from the fight.");
        return Ok(());
    }
    combat_log(state, "You failed to escape!".to_string());
    enemy_turn(state);
    Ok(())
}

/// Dismiss a finished fight and return to town.
pub fn leave_combat(state: &mut AdventureState) -> Result<(), ActionError> {
    match &state.combat {
        None => Err(ActionError::NotInCombat),
        Some(c) if !c.is_over() => Err(ActionError::InCombat),
        Some(_) => {
            state.combat = None;
            Ok(())
        }
    }
}
