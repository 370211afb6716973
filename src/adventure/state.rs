//! Kaito's Adventure game state: data structures only, no rules.
//!
//! `Player` and `World` are what gets saved. Combat, overlay and the message
//! log live only in memory.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

use super::catalog::{
    enemy_info, recipe_info, skill_info, BuffKind, EnemyKind, Ingredient, Item, QuestId, RecipeId,
    RecipeKind, SkillId, TaskId, TownId, Weather, ALL_RECIPES, TOWN_COUNT,
};

pub const MAX_LEVEL: u32 = 50;

// ── Player ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: Item,
    pub quantity: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<RecipeId>,
    pub armor: Option<RecipeId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearnedSkill {
    pub id: SkillId,
    pub uses: u32,
    pub level: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub enemies_defeated: u32,
    pub potions_crafted: u32,
    pub items_crafted: u32,
    pub items_sold: u32,
    pub gathers: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub id: QuestId,
    pub progress: u32,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub id: TaskId,
    pub progress: u32,
    pub completed: bool,
}

impl TaskProgress {
    pub fn new(id: TaskId) -> Self {
        Self { id, progress: 0, completed: false }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    /// World tick at which the buff wears off.
    pub expires_at: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub gold: u32,
    pub health: u32,
    pub max_health: u32,
    pub xp: u32,
    pub level: u32,
    pub inventory: Vec<ItemStack>,
    /// Number of distinct stacks the bag can hold.
    pub inventory_slots: usize,
    /// Rare ingredients found at least once, in discovery order.
    pub rare_items: Vec<Ingredient>,
    pub known_recipes: Vec<RecipeId>,
    pub equipment: Equipment,
    pub skills: Vec<LearnedSkill>,
    pub quests: Vec<QuestProgress>,
    pub stats: Stats,
    pub last_login_day: Option<u64>,
    pub daily_tasks: Vec<TaskProgress>,
    pub weekly_tasks: Vec<TaskProgress>,
    pub buffs: Vec<ActiveBuff>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            name: "Kaito Brewmaster".to_string(),
            gold: 5,
            health: 100,
            max_health: 100,
            xp: 0,
            level: 1,
            inventory: vec![
                ItemStack { item: Item::Ingredient(Ingredient::Water), quantity: 2 },
                ItemStack { item: Item::Ingredient(Ingredient::Herbs), quantity: 1 },
            ],
            inventory_slots: 10,
            rare_items: Vec::new(),
            known_recipes: ALL_RECIPES.to_vec(),
            equipment: Equipment::default(),
            skills: vec![LearnedSkill { id: SkillId::BasicAttack, uses: 0, level: 1 }],
            quests: Vec::new(),
            stats: Stats::default(),
            last_login_day: None,
            daily_tasks: Vec::new(),
            weekly_tasks: Vec::new(),
            buffs: Vec::new(),
        }
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.inventory
            .iter()
            .find(|s| s.item == item)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn ingredient_count(&self, ingredient: Ingredient) -> u32 {
        self.item_count(Item::Ingredient(ingredient))
    }

    /// Whether `item` can be added without opening a slot past the limit.
    pub fn has_room_for(&self, item: Item) -> bool {
        self.item_count(item) > 0 || self.inventory.len() < self.inventory_slots
    }

    pub fn knows_skill(&self, id: SkillId) -> bool {
        self.skills.iter().any(|s| s.id == id)
    }

    pub fn knows_recipe(&self, id: RecipeId) -> bool {
        self.known_recipes.contains(&id)
    }

    pub fn has_buff(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind)
    }

    /// Sum of a passive skill stat over every learned skill.
    pub fn passive<F>(&self, stat: F) -> f64
    where
        F: Fn(&super::catalog::SkillEffect) -> f64,
    {
        self.skills.iter().map(|s| stat(&skill_info(s.id).effect)).sum()
    }

    pub fn weapon_damage(&self) -> u32 {
        match self.equipment.weapon.map(|w| recipe_info(w).kind) {
            Some(RecipeKind::Weapon { damage }) => damage,
            _ => 0,
        }
    }

    pub fn armor_defense(&self) -> u32 {
        match self.equipment.armor.map(|a| recipe_info(a).kind) {
            Some(RecipeKind::Armor { defense }) => defense,
            _ => 0,
        }
    }

    pub fn quest(&self, id: QuestId) -> Option<&QuestProgress> {
        self.quests.iter().find(|q| q.id == id)
    }
}

// ── World ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Logic ticks elapsed while the game was running.
    pub ticks: u64,
    pub town: TownId,
    pub weather: Weather,
    pub next_weather_tick: u64,
    /// Tick at which each town's gathering spot is ready again, by `TownId::index`.
    pub gather_ready_at: [u64; TOWN_COUNT],
    pub rng_seed: u64,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            ticks: 0,
            town: TownId::SakuraVillage,
            weather: Weather::Sunny,
            next_weather_tick: config.secs_to_ticks(config.weather_change_secs),
            gather_ready_at: [0; TOWN_COUNT],
            rng_seed: 42,
        }
    }

    /// Ticks until gathering is possible in the current town.
    pub fn gather_cooldown_left(&self) -> u64 {
        self.gather_ready_at[self.town.index()].saturating_sub(self.ticks)
    }
}

// ── Combat ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CombatPhase {
    PlayerTurn,
    Victory,
    Defeat,
    Fled,
}

#[derive(Clone, Debug)]
pub struct CombatState {
    pub enemy: EnemyKind,
    pub enemy_health: u32,
    pub enemy_max_health: u32,
    /// Set by a successful stun; the enemy loses its next attack.
    pub enemy_stunned: bool,
    pub phase: CombatPhase,
    pub log: Vec<String>,
}

impl CombatState {
    pub fn new(enemy: EnemyKind) -> Self {
        let info = enemy_info(enemy);
        Self {
            enemy,
            enemy_health: info.health,
            enemy_max_health: info.health,
            enemy_stunned: false,
            phase: CombatPhase::PlayerTurn,
            log: vec![format!("A {} blocks your path!", info.name)],
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase != CombatPhase::PlayerTurn
    }
}

// ── UI overlays ──────────────────────────────────────────────

/// Panels drawn over the town screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay {
    Inventory,
    Craft,
    Market,
    Travel,
    Townsfolk,
    Skills,
}

// ── Root state ───────────────────────────────────────────────

pub struct AdventureState {
    pub player: Player,
    pub world: World,
    pub combat: Option<CombatState>,
    pub overlay: Option<Overlay>,
    pub log: Vec<String>,
    pub config: GameConfig,
}

impl AdventureState {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut state = Self {
            player: Player::new(),
            world: World::new(&config),
            combat: None,
            overlay: None,
            log: Vec::new(),
            config,
        };
        state.add_log("Welcome to Kaito's Adventure!");
        state
    }

    pub fn add_log(&mut self, text: &str) {
        self.log.push(text.to_string());
        if self.log.len() > self.config.log_capacity {
            let excess = self.log.len() - self.config.log_capacity;
            self.log.drain(..excess);
        }
    }

    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_player() {
        let p = Player::new();
        assert_eq!(p.gold, 5);
        assert_eq!(p.health, 100);
        assert_eq!(p.level, 1);
        assert_eq!(p.ingredient_count(Ingredient::Water), 2);
        assert_eq!(p.ingredient_count(Ingredient::Herbs), 1);
        assert_eq!(p.known_recipes.len(), 15);
        assert!(p.knows_skill(SkillId::BasicAttack));
    }

    #[test]
    fn initial_world() {
        let s = AdventureState::new();
        assert_eq!(s.world.town, TownId::SakuraVillage);
        assert_eq!(s.world.weather, Weather::Sunny);
        assert_eq!(s.world.next_weather_tick, 3000);
        assert_eq!(s.world.gather_cooldown_left(), 0);
        assert!(s.combat.is_none());
    }

    #[test]
    fn room_check_respects_slots() {
        let mut p = Player::new();
        p.inventory_slots = 2;
        assert!(p.has_room_for(Item::Ingredient(Ingredient::Water)));
        assert!(!p.has_room_for(Item::Ingredient(Ingredient::Wood)));
    }

    #[test]
    fn equipment_bonuses() {
        let mut p = Player::new();
        assert_eq!(p.weapon_damage(), 0);
        p.equipment.weapon = Some(RecipeId::SteelAxe);
        p.equipment.armor = Some(RecipeId::Chainmail);
        assert_eq!(p.weapon_damage(), 8);
        assert_eq!(p.armor_defense(), 10);
    }

    #[test]
    fn passive_sums_learned_skills() {
        let mut p = Player::new();
        assert_eq!(p.passive(|e| e.cooldown_reduction), 0.0);
        p.skills.push(LearnedSkill { id: SkillId::QuickGather, uses: 0, level: 1 });
        assert!((p.passive(|e| e.cooldown_reduction) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn log_truncation() {
        let mut s = AdventureState::new();
        for i in 0..50 {
            s.add_log(&format!("msg {}", i));
        }
        assert_eq!(s.log.len(), 30);
        assert_eq!(s.log.last().map(String::as_str), Some("msg 49"));
    }

    #[test]
    fn new_combat_uses_enemy_health() {
        let c = CombatState::new(EnemyKind::Golem);
        assert_eq!(c.enemy_health, 120);
        assert!(!c.is_over());
    }
}
