//! Kaito's Adventure engine: pure game logic, no rendering or IO.
//!
//! Town loop: gather → craft → sell / equip → fight → level up. Every action
//! returns `Err(ActionError)` without touching the state when it is refused.

use tracing::{debug, info};

use super::catalog::{
    buff_info, recipe_info, skill_info, town_info, weather_info, Ingredient, Item, RecipeId,
    RecipeKind, SkillId, TownId, ALL_WEATHER,
};
use super::error::ActionError;
use super::progress::{self, ProgressEvent};
use super::state::{ActiveBuff, AdventureState, ItemStack, LearnedSkill, Player, MAX_LEVEL};

// ── RNG ──────────────────────────────────────────────────────

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// Uniform integer in `0..max`. `max` must be positive.
pub(super) fn rng_range(state: &mut AdventureState, max: u32) -> u32 {
    state.world.rng_seed = next_rng(state.world.rng_seed);
    ((state.world.rng_seed >> 33) % max as u64) as u32
}

/// Uniform float in `[0, 1)`.
pub(super) fn roll(state: &mut AdventureState) -> f64 {
    state.world.rng_seed = next_rng(state.world.rng_seed);
    (state.world.rng_seed >> 11) as f64 / (1u64 << 53) as f64
}

// ── Tick ─────────────────────────────────────────────────────

/// Advance world time: expire potion buffs and rotate the weather.
pub fn tick(state: &mut AdventureState, delta_ticks: u32) {
    if delta_ticks == 0 {
        return;
    }
    state.world.ticks += delta_ticks as u64;
    let now = state.world.ticks;

    let expired: Vec<_> = state
        .player
        .buffs
        .iter()
        .filter(|b| b.expires_at <= now)
        .map(|b| b.kind)
        .collect();
    if !expired.is_empty() {
        state.player.buffs.retain(|b| b.expires_at > now);
        for kind in expired {
            debug!(?kind, "buff expired");
            state.add_log(&format!("{:?} potion wore off.", kind));
        }
    }

    if now >= state.world.next_weather_tick {
        change_weather(state);
        state.world.next_weather_tick =
            now + state.config.secs_to_ticks(state.config.weather_change_secs);
    }
}

fn change_weather(state: &mut AdventureState) {
    let idx = rng_range(state, ALL_WEATHER.len() as u32) as usize;
    let weather = ALL_WEATHER[idx];
    if weather != state.world.weather {
        state.world.weather = weather;
        info!(?weather, "weather changed");
        state.add_log(&format!("The weather turns {}.", weather_info(weather).name.to_lowercase()));
    }
}

// ── Inventory ────────────────────────────────────────────────

pub(super) fn add_item(player: &mut Player, item: Item, quantity: u32) -> Result<(), ActionError> {
    if let Some(stack) = player.inventory.iter_mut().find(|s| s.item == item) {
        stack.quantity += quantity;
        return Ok(());
    }
    if player.inventory.len() >= player.inventory_slots {
        return Err(ActionError::InventoryFull { slots: player.inventory_slots });
    }
    player.inventory.push(ItemStack { item, quantity });
    Ok(())
}

/// Remove up to `quantity` of `item`; returns false (and removes nothing)
/// when the player holds fewer.
pub(super) fn remove_item(player: &mut Player, item: Item, quantity: u32) -> bool {
    let Some(idx) = player.inventory.iter().position(|s| s.item == item) else {
        return false;
    };
    if player.inventory[idx].quantity < quantity {
        return false;
    }
    player.inventory[idx].quantity -= quantity;
    if player.inventory[idx].quantity == 0 {
        player.inventory.remove(idx);
    }
    true
}

fn required_count(ingredients: &[Ingredient], ingredient: Ingredient) -> u32 {
    ingredients.iter().filter(|&&i| i == ingredient).count() as u32
}

pub fn has_ingredients(player: &Player, recipe: RecipeId) -> bool {
    let needed = recipe_info(recipe).ingredients;
    needed
        .iter()
        .all(|&i| player.ingredient_count(i) >= required_count(needed, i))
}

// ── Gather ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GatherOutcome {
    pub ingredient: Ingredient,
    /// Extra ingredient granted by the weather, if any.
    pub bonus: Option<Ingredient>,
}

/// Bonus added to every rare roll from skills and potions.
pub fn rare_chance_bonus(player: &Player) -> f64 {
    let buffs: f64 = player
        .buffs
        .iter()
        .map(|b| buff_info(b.kind).rare_chance_boost)
        .sum();
    player.passive(|e| e.rare_chance) + buffs
}

/// Full cooldown in ticks for gathering in `town` with current bonuses.
pub fn gather_cooldown_ticks(state: &AdventureState, town: TownId) -> u64 {
    let base = state.config.secs_to_ticks(town_info(town).gather_cooldown_secs) as f64;
    let buffs: f64 = state
        .player
        .buffs
        .iter()
        .map(|b| buff_info(b.kind).cooldown_reduction)
        .sum();
    let reduction = state.player.passive(|e| e.cooldown_reduction) + buffs;
    (base * (1.0 - reduction).max(0.2)).round() as u64
}

pub fn gather(state: &mut AdventureState) -> Result<GatherOutcome, ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let left = state.world.gather_cooldown_left();
    if left > 0 {
        let per_sec = state.config.ticks_per_sec as u64;
        return Err(ActionError::OnCooldown { remaining_secs: left.div_ceil(per_sec) });
    }

    let town_id = state.world.town;
    let town = town_info(town_id);
    let rare_bonus = rare_chance_bonus(&state.player);

    let mut found = None;
    for &(rare, chance) in town.rare_ingredients {
        if roll(state) < chance + rare_bonus {
            found = Some(rare);
            break;
        }
    }
    let ingredient = match found {
        Some(rare) => rare,
        None => {
            let idx = rng_range(state, town.ingredients.len() as u32) as usize;
            town.ingredients[idx]
        }
    };

    add_item(&mut state.player, Item::Ingredient(ingredient), 1)?;
    state.add_log(&format!("You gathered {}.", ingredient.name()));

    if ingredient.is_rare() && !state.player.rare_items.contains(&ingredient) {
        state.player.rare_items.push(ingredient);
        info!(ingredient = ingredient.name(), "rare ingredient discovered");
        state.add_log(&format!("A rare find! {} added to your collection.", ingredient.name()));
    }

    let mut bonus = None;
    if let Some((extra, chance)) = weather_info(state.world.weather).gather_bonus {
        if roll(state) < chance && add_item(&mut state.player, Item::Ingredient(extra), 1).is_ok() {
            bonus = Some(extra);
            state.add_log(&format!("The weather brought an extra {}.", extra.name()));
        }
    }

    let cooldown = gather_cooldown_ticks(state, town_id);
    state.world.gather_ready_at[town_id.index()] = state.world.ticks + cooldown;
    state.player.stats.gathers += 1;
    debug!(ingredient = ingredient.name(), ?bonus, cooldown, "gathered");

    progress::record(state, ProgressEvent::Gathered(ingredient));
    if let Some(extra) = bonus {
        progress::record(state, ProgressEvent::Gathered(extra));
    }

    Ok(GatherOutcome { ingredient, bonus })
}

// ── Craft ────────────────────────────────────────────────────

/// Probability that a brew succeeds at the player's level.
pub fn craft_chance(state: &AdventureState) -> f64 {
    let cfg = &state.config;
    let chance = cfg.craft_base_chance + cfg.craft_chance_per_level * (state.player.level - 1) as f64;
    chance.min(cfg.craft_max_chance)
}

/// Whether the output fits once the ingredients have been consumed.
fn has_room_after_crafting(player: &Player, recipe: RecipeId) -> bool {
    let output = Item::Crafted(recipe);
    if player.item_count(output) > 0 {
        return true;
    }
    let needed = recipe_info(recipe).ingredients;
    let mut freed = 0;
    for stack in &player.inventory {
        if let Item::Ingredient(i) = stack.item {
            let req = required_count(needed, i);
            if req > 0 && stack.quantity == req {
                freed += 1;
            }
        }
    }
    player.inventory.len() - freed < player.inventory_slots
}

/// Attempt a recipe. Ingredients are spent either way; returns whether the
/// brew succeeded.
pub fn craft(state: &mut AdventureState, recipe: RecipeId) -> Result<bool, ActionError> {
    let info = recipe_info(recipe);
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    if !state.player.knows_recipe(recipe) {
        return Err(ActionError::UnknownRecipe(info.name));
    }
    if state.player.level < info.unlock_level {
        return Err(ActionError::LevelTooLow { required: info.unlock_level });
    }
    if !has_ingredients(&state.player, recipe) {
        return Err(ActionError::MissingIngredients { recipe: info.name });
    }
    if !has_room_after_crafting(&state.player, recipe) {
        return Err(ActionError::InventoryFull { slots: state.player.inventory_slots });
    }

    for &ingredient in info.ingredients {
        remove_item(&mut state.player, Item::Ingredient(ingredient), 1);
    }

    let chance = craft_chance(state);
    if roll(state) >= chance {
        debug!(recipe = info.name, chance, "craft failed");
        state.add_log(&format!("The {} fizzled. Ingredients lost.", info.name));
        return Ok(false);
    }

    add_item(&mut state.player, Item::Crafted(recipe), 1)?;
    state.player.stats.items_crafted += 1;
    if matches!(info.kind, RecipeKind::Heal { .. } | RecipeKind::Gather(_)) {
        state.player.stats.potions_crafted += 1;
    }
    debug!(recipe = info.name, "crafted");
    state.add_log(&format!("You crafted {}!", info.name));
    let xp = state.config.craft_xp;
    gain_xp(state, xp);
    progress::record(state, ProgressEvent::Crafted(recipe));
    Ok(true)
}

// ── Items ────────────────────────────────────────────────────

/// Health restored by a healing potion of the given strength.
pub fn heal_amount(player: &Player, heal_percent: f64) -> u32 {
    let base = (player.max_health as f64 * heal_percent).round() as u32;
    base + player.passive(|e| e.heal_bonus as f64) as u32
}

/// Consume one healing potion and apply it. Caller checks ownership.
pub(super) fn drink_heal(state: &mut AdventureState, recipe: RecipeId) -> u32 {
    let RecipeKind::Heal { heal_percent, .. } = recipe_info(recipe).kind else {
        return 0;
    };
    if !remove_item(&mut state.player, Item::Crafted(recipe), 1) {
        return 0;
    }
    let before = state.player.health;
    let amount = heal_amount(&state.player, heal_percent);
    state.player.health = (before + amount).min(state.player.max_health);
    state.player.health - before
}

/// Use or equip the item in inventory slot `index` (outside combat).
pub fn use_item(state: &mut AdventureState, index: usize) -> Result<(), ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let item = state
        .player
        .inventory
        .get(index)
        .map(|s| s.item)
        .ok_or(ActionError::NoSuchItem)?;
    let recipe = match item {
        Item::Ingredient(i) => return Err(ActionError::NotUsable(i.name())),
        Item::Crafted(r) => r,
    };
    let info = recipe_info(recipe);
    match info.kind {
        RecipeKind::Sell { .. } => Err(ActionError::NotUsable(info.name)),
        RecipeKind::Heal { .. } => {
            if state.player.health >= state.player.max_health {
                return Err(ActionError::HealthFull);
            }
            let healed = drink_heal(state, recipe);
            state.add_log(&format!("You drank {} and recovered {} health.", info.name, healed));
            Ok(())
        }
        RecipeKind::Gather(kind) => {
            remove_item(&mut state.player, item, 1);
            let expires_at =
                state.world.ticks + state.config.secs_to_ticks(buff_info(kind).duration_secs);
            if state.player.has_buff(kind) {
                for buff in state.player.buffs.iter_mut().filter(|b| b.kind == kind) {
                    buff.expires_at = expires_at;
                }
                state.add_log(&format!("You drank {}. The effect is refreshed.", info.name));
            } else {
                state.player.buffs.push(ActiveBuff { kind, expires_at });
                state.add_log(&format!("You drank {}. Gathering feels easier.", info.name));
            }
            Ok(())
        }
        RecipeKind::Weapon { .. } | RecipeKind::Armor { .. } => equip(state, index, recipe),
    }
}

fn equip(state: &mut AdventureState, index: usize, recipe: RecipeId) -> Result<(), ActionError> {
    let is_weapon = matches!(recipe_info(recipe).kind, RecipeKind::Weapon { .. });
    let current = if is_weapon {
        state.player.equipment.weapon
    } else {
        state.player.equipment.armor
    };
    if let Some(old) = current {
        let frees_slot = state.player.inventory[index].quantity == 1;
        if !frees_slot && !state.player.has_room_for(Item::Crafted(old)) {
            return Err(ActionError::InventoryFull { slots: state.player.inventory_slots });
        }
    }

    remove_item(&mut state.player, Item::Crafted(recipe), 1);
    let slot = if is_weapon {
        &mut state.player.equipment.weapon
    } else {
        &mut state.player.equipment.armor
    };
    if let Some(old) = slot.replace(recipe) {
        add_item(&mut state.player, Item::Crafted(old), 1)?;
    }
    state.add_log(&format!("You equipped {}.", recipe_info(recipe).name));
    Ok(())
}

// ── Market ───────────────────────────────────────────────────

/// What the current town pays for one `item`, or `None` if unsellable.
pub fn sell_price(state: &AdventureState, item: Item) -> Option<u32> {
    let Item::Crafted(recipe) = item else {
        return None;
    };
    match recipe_info(recipe).kind {
        RecipeKind::Sell { base_gold } => {
            let demand = town_info(state.world.town).demand_for(recipe);
            let weather = weather_info(state.world.weather).demand_bonus_for(recipe);
            let level = 1.0 + state.config.sell_level_bonus * (state.player.level - 1) as f64;
            let price = (base_gold as f64 * demand * weather * level).round() as u32;
            Some(price.max(1))
        }
        RecipeKind::Heal { sell_value, .. } => Some(sell_value),
        _ => None,
    }
}

pub fn sell(state: &mut AdventureState, index: usize) -> Result<u32, ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let item = state
        .player
        .inventory
        .get(index)
        .map(|s| s.item)
        .ok_or(ActionError::NoSuchItem)?;
    let price = sell_price(state, item).ok_or(ActionError::NotSellable(item.name()))?;

    remove_item(&mut state.player, item, 1);
    state.player.gold = state.player.gold.saturating_add(price);
    state.player.stats.items_sold += 1;
    debug!(item = item.name(), price, "sold");
    state.add_log(&format!("Sold {} for {} gold.", item.name(), price));
    progress::record(state, ProgressEvent::Sold);
    Ok(price)
}

/// Discounted price for an NPC ingredient offer.
pub fn buy_price(player: &Player, base_price: u32) -> u32 {
    let reduction = player.passive(|e| e.cost_reduction);
    ((base_price as f64 * (1.0 - reduction)).round() as u32).max(1)
}

pub fn buy(state: &mut AdventureState, offer_index: usize) -> Result<(), ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let &(ingredient, base) = town_info(state.world.town)
        .npc_offers
        .get(offer_index)
        .ok_or(ActionError::NoSuchOffer)?;
    let price = buy_price(&state.player, base);
    if state.player.gold < price {
        return Err(ActionError::NotEnoughGold { need: price, have: state.player.gold });
    }
    add_item(&mut state.player, Item::Ingredient(ingredient), 1)?;
    state.player.gold -= price;
    debug!(ingredient = ingredient.name(), price, "bought");
    state.add_log(&format!("Bought {} for {} gold.", ingredient.name(), price));
    Ok(())
}

// ── Travel ───────────────────────────────────────────────────

pub fn travel(state: &mut AdventureState, town: TownId) -> Result<(), ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let name = town_info(town).name;
    if state.world.town == town {
        return Err(ActionError::AlreadyThere(name));
    }
    state.world.town = town;
    debug!(town = name, "travelled");
    state.add_log(&format!("You arrived at {}!", name));
    Ok(())
}

// ── Level Up ─────────────────────────────────────────────────

pub fn xp_to_next(state: &AdventureState) -> u32 {
    state.player.level * state.config.xp_per_level
}

pub(super) fn gain_xp(state: &mut AdventureState, amount: u32) {
    if state.player.level >= MAX_LEVEL {
        return;
    }
    state.player.xp = state.player.xp.saturating_add(amount);
    while state.player.level < MAX_LEVEL {
        let needed = xp_to_next(state);
        if state.player.xp < needed {
            break;
        }
        state.player.xp -= needed;
        state.player.level += 1;
        state.player.max_health += 10;
        state.player.health = state.player.max_health;
        info!(level = state.player.level, "level up");
        state.add_log(&format!("Level up! You are now level {}.", state.player.level));
    }
    if state.player.level >= MAX_LEVEL {
        state.player.xp = 0;
    }
}

// ── Skills ───────────────────────────────────────────────────

pub fn learn_skill(state: &mut AdventureState, id: SkillId) -> Result<(), ActionError> {
    let info = skill_info(id);
    if state.player.knows_skill(id) {
        return Err(ActionError::SkillKnown(info.name));
    }
    if state.player.gold < info.cost_gold {
        return Err(ActionError::NotEnoughGold { need: info.cost_gold, have: state.player.gold });
    }
    state.player.gold -= info.cost_gold;
    state.player.skills.push(LearnedSkill { id, uses: 0, level: 1 });
    info!(skill = info.name, "skill learned");
    state.add_log(&format!("You learned {} ({}).", info.name, info.tree.name()));
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::adventure::catalog::{ALL_RECIPES, ALL_TOWNS};
    use proptest::prelude::*;

    fn arb_recipe() -> impl Strategy<Value = RecipeId> {
        (0..ALL_RECIPES.len()).prop_map(|i| ALL_RECIPES[i])
    }

    fn arb_town() -> impl Strategy<Value = TownId> {
        (0..ALL_TOWNS.len()).prop_map(|i| ALL_TOWNS[i])
    }

    proptest! {
        #[test]
        fn prop_bag_never_exceeds_slots(seed in any::<u64>(), steps in 1usize..60) {
            let mut s = AdventureState::new();
            s.world.rng_seed = seed;
            s.player.inventory_slots = 4;
            for step in 0..steps {
                s.world.gather_ready_at = [0; 3];
                let _ = gather(&mut s);
                let _ = craft(&mut s, ALL_RECIPES[step % ALL_RECIPES.len()]);
                prop_assert!(s.player.inventory.len() <= s.player.inventory_slots);
                prop_assert!(s.player.inventory.iter().all(|st| st.quantity > 0));
            }
        }

        #[test]
        fn prop_failed_craft_leaves_state_unchanged(recipe in arb_recipe(), seed in any::<u64>()) {
            let mut s = AdventureState::new();
            s.world.rng_seed = seed;
            s.player.inventory.clear();
            let before = s.player.clone();
            prop_assert!(craft(&mut s, recipe).is_err());
            prop_assert_eq!(s.player, before);
        }

        #[test]
        fn prop_sell_price_positive(recipe in arb_recipe(), town in arb_town(), level in 1u32..50) {
            let mut s = AdventureState::new();
            s.world.town = town;
            s.player.level = level;
            if let Some(price) = sell_price(&s, Item::Crafted(recipe)) {
                prop_assert!(price >= 1);
            }
        }

        #[test]
        fn prop_health_never_exceeds_max(start in 1u32..100, percent_idx in 0usize..3) {
            let potions = [
                RecipeId::WeakHealingPotion,
                RecipeId::MediumHealingPotion,
                RecipeId::StrongHealingPotion,
            ];
            let mut s = AdventureState::new();
            s.player.health = start;
            add_item(&mut s.player, Item::Crafted(potions[percent_idx]), 1).unwrap();
            let _ = use_item(&mut s, 2);
            prop_assert!(s.player.health <= s.player.max_health);
        }

        #[test]
        fn prop_xp_below_threshold_after_gain(amount in 0u32..100_000) {
            let mut s = AdventureState::new();
            gain_xp(&mut s, amount);
            prop_assert!(s.player.level <= MAX_LEVEL);
            if s.player.level < MAX_LEVEL {
                prop_assert!(s.player.xp < xp_to_next(&s));
            }
        }
    }
}
