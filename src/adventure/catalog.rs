//! Kaito's Adventure static data: ingredients, recipes, towns, weather,
//! enemies, skills, quests and task templates. No logic lives here.

use serde::{Deserialize, Serialize};

// ── Ingredients ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Water,
    Herbs,
    Pepper,
    Sugar,
    MistEssence,
    ShadowRoot,
    IronOre,
    Wood,
    GoldenHerb,
    IronShard,
    MistCrystal,
}

impl Ingredient {
    pub fn name(self) -> &'static str {
        match self {
            Ingredient::Water => "Water",
            Ingredient::Herbs => "Herbs",
            Ingredient::Pepper => "Pepper",
            Ingredient::Sugar => "Sugar",
            Ingredient::MistEssence => "Mist Essence",
            Ingredient::ShadowRoot => "Shadow Root",
            Ingredient::IronOre => "Iron Ore",
            Ingredient::Wood => "Wood",
            Ingredient::GoldenHerb => "Golden Herb",
            Ingredient::IronShard => "Iron Shard",
            Ingredient::MistCrystal => "Mist Crystal",
        }
    }

    pub fn is_rare(self) -> bool {
        matches!(
            self,
            Ingredient::GoldenHerb | Ingredient::IronShard | Ingredient::MistCrystal
        )
    }
}

pub const ALL_INGREDIENTS: &[Ingredient] = &[
    Ingredient::Water,
    Ingredient::Herbs,
    Ingredient::Pepper,
    Ingredient::Sugar,
    Ingredient::MistEssence,
    Ingredient::ShadowRoot,
    Ingredient::IronOre,
    Ingredient::Wood,
    Ingredient::GoldenHerb,
    Ingredient::IronShard,
    Ingredient::MistCrystal,
];

// ── Recipes ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeId {
    HerbalTea,
    SpicySake,
    MistPotion,
    GoldenElixir,
    WeakHealingPotion,
    MediumHealingPotion,
    StrongHealingPotion,
    LuckyGatherPotion,
    SwiftGatherPotion,
    CombatBlade,
    SteelAxe,
    ShadowDagger,
    LeatherArmor,
    Chainmail,
    PlateArmor,
}

/// Timed gathering boosts granted by gather potions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    LuckyGather,
    SwiftGather,
}

pub struct BuffInfo {
    pub rare_chance_boost: f64,
    pub cooldown_reduction: f64,
    pub duration_secs: u32,
}

pub fn buff_info(kind: BuffKind) -> BuffInfo {
    match kind {
        BuffKind::LuckyGather => BuffInfo {
            rare_chance_boost: 0.1,
            cooldown_reduction: 0.0,
            duration_secs: 300,
        },
        BuffKind::SwiftGather => BuffInfo {
            rare_chance_boost: 0.0,
            cooldown_reduction: 0.2,
            duration_secs: 300,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecipeKind {
    /// Trade good, priced by town demand when sold.
    Sell { base_gold: u32 },
    Heal { heal_percent: f64, sell_value: u32 },
    Gather(BuffKind),
    Weapon { damage: u32 },
    Armor { defense: u32 },
}

pub struct RecipeInfo {
    pub name: &'static str,
    pub ingredients: &'static [Ingredient],
    pub kind: RecipeKind,
    pub unlock_level: u32,
}

pub fn recipe_info(id: RecipeId) -> RecipeInfo {
    use Ingredient::*;
    match id {
        RecipeId::HerbalTea => RecipeInfo {
            name: "Herbal Tea", ingredients: &[Water, Herbs],
            kind: RecipeKind::Sell { base_gold: 20 }, unlock_level: 1,
        },
        RecipeId::SpicySake => RecipeInfo {
            name: "Spicy Sake", ingredients: &[Water, Pepper],
            kind: RecipeKind::Sell { base_gold: 20 }, unlock_level: 1,
        },
        RecipeId::MistPotion => RecipeInfo {
            name: "Mist Potion", ingredients: &[MistEssence, Herbs],
            kind: RecipeKind::Sell { base_gold: 20 }, unlock_level: 1,
        },
        RecipeId::GoldenElixir => RecipeInfo {
            name: "Golden Elixir", ingredients: &[GoldenHerb, MistEssence],
            kind: RecipeKind::Sell { base_gold: 50 }, unlock_level: 1,
        },
        RecipeId::WeakHealingPotion => RecipeInfo {
            name: "Weak Healing Potion", ingredients: &[Water, Herbs],
            kind: RecipeKind::Heal { heal_percent: 0.2, sell_value: 15 }, unlock_level: 1,
        },
        RecipeId::MediumHealingPotion => RecipeInfo {
            name: "Medium Healing Potion", ingredients: &[Water, MistEssence],
            kind: RecipeKind::Heal { heal_percent: 0.4, sell_value: 25 }, unlock_level: 1,
        },
        RecipeId::StrongHealingPotion => RecipeInfo {
            name: "Strong Healing Potion", ingredients: &[MistEssence, ShadowRoot],
            kind: RecipeKind::Heal { heal_percent: 0.6, sell_value: 40 }, unlock_level: 1,
        },
        RecipeId::LuckyGatherPotion => RecipeInfo {
            name: "Lucky Gather Potion", ingredients: &[Herbs, GoldenHerb],
            kind: RecipeKind::Gather(BuffKind::LuckyGather), unlock_level: 1,
        },
        RecipeId::SwiftGatherPotion => RecipeInfo {
            name: "Swift Gather Potion", ingredients: &[Pepper, MistEssence],
            kind: RecipeKind::Gather(BuffKind::SwiftGather), unlock_level: 1,
        },
        RecipeId::CombatBlade => RecipeInfo {
            name: "Combat Blade", ingredients: &[IronOre, Wood],
            kind: RecipeKind::Weapon { damage: 5 }, unlock_level: 1,
        },
        RecipeId::SteelAxe => RecipeInfo {
            name: "Steel Axe", ingredients: &[IronOre, IronOre],
            kind: RecipeKind::Weapon { damage: 8 }, unlock_level: 1,
        },
        RecipeId::ShadowDagger => RecipeInfo {
            name: "Shadow Dagger", ingredients: &[ShadowRoot, IronOre],
            kind: RecipeKind::Weapon { damage: 6 }, unlock_level: 1,
        },
        RecipeId::LeatherArmor => RecipeInfo {
            name: "Leather Armor", ingredients: &[Herbs, Wood],
            kind: RecipeKind::Armor { defense: 5 }, unlock_level: 10,
        },
        RecipeId::Chainmail => RecipeInfo {
            name: "Chainmail", ingredients: &[IronOre, ShadowRoot],
            kind: RecipeKind::Armor { defense: 10 }, unlock_level: 10,
        },
        RecipeId::PlateArmor => RecipeInfo {
            name: "Plate Armor", ingredients: &[IronOre, MistCrystal],
            kind: RecipeKind::Armor { defense: 15 }, unlock_level: 10,
        },
    }
}

pub const ALL_RECIPES: &[RecipeId] = &[
    RecipeId::HerbalTea,
    RecipeId::SpicySake,
    RecipeId::MistPotion,
    RecipeId::GoldenElixir,
    RecipeId::WeakHealingPotion,
    RecipeId::MediumHealingPotion,
    RecipeId::StrongHealingPotion,
    RecipeId::LuckyGatherPotion,
    RecipeId::SwiftGatherPotion,
    RecipeId::CombatBlade,
    RecipeId::SteelAxe,
    RecipeId::ShadowDagger,
    RecipeId::LeatherArmor,
    RecipeId::Chainmail,
    RecipeId::PlateArmor,
];

// ── Items ────────────────────────────────────────────────────

/// Anything that can sit in an inventory slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Ingredient(Ingredient),
    Crafted(RecipeId),
}

impl Item {
    pub fn name(self) -> &'static str {
        match self {
            Item::Ingredient(i) => i.name(),
            Item::Crafted(r) => recipe_info(r).name,
        }
    }
}

// ── Enemies ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Bandit,
    ShadowNinja,
    Golem,
}

pub struct EnemyInfo {
    pub name: &'static str,
    pub health: u32,
    pub damage: u32,
    pub gold: u32,
    pub drop: Ingredient,
    pub drop_chance: f64,
}

pub fn enemy_info(kind: EnemyKind) -> EnemyInfo {
    match kind {
        EnemyKind::Bandit => EnemyInfo {
            name: "Bandit", health: 80, damage: 10, gold: 10,
            drop: Ingredient::ShadowRoot, drop_chance: 0.2,
        },
        EnemyKind::ShadowNinja => EnemyInfo {
            name: "Shadow Ninja", health: 60, damage: 15, gold: 15,
            drop: Ingredient::MistEssence, drop_chance: 0.3,
        },
        EnemyKind::Golem => EnemyInfo {
            name: "Golem", health: 120, damage: 8, gold: 20,
            drop: Ingredient::IronOre, drop_chance: 0.25,
        },
    }
}

pub const ALL_ENEMIES: &[EnemyKind] = &[EnemyKind::Bandit, EnemyKind::ShadowNinja, EnemyKind::Golem];

// ── Quests ───────────────────────────────────────────────────

/// What advances a quest or task counter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Goal {
    Gather(Ingredient),
    Craft(RecipeId),
    Defeat(EnemyKind),
    GatherAny,
    CraftAny,
    DefeatAny,
    SellAny,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestId {
    HerbQuest,
    BladeQuest,
    BanditQuest,
}

pub struct QuestInfo {
    pub description: &'static str,
    pub goal: Goal,
    pub target: u32,
    pub reward_gold: u32,
    pub reward_xp: u32,
}

pub fn quest_info(id: QuestId) -> QuestInfo {
    match id {
        QuestId::HerbQuest => QuestInfo {
            description: "Gather 5 Herbs for Hana",
            goal: Goal::Gather(Ingredient::Herbs), target: 5,
            reward_gold: 60, reward_xp: 60,
        },
        QuestId::BladeQuest => QuestInfo {
            description: "Craft a Combat Blade for Toru",
            goal: Goal::Craft(RecipeId::CombatBlade), target: 1,
            reward_gold: 80, reward_xp: 80,
        },
        QuestId::BanditQuest => QuestInfo {
            description: "Defeat 3 Bandits for Rei",
            goal: Goal::Defeat(EnemyKind::Bandit), target: 3,
            reward_gold: 100, reward_xp: 100,
        },
    }
}

// ── Daily / weekly tasks ─────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskId {
    DailyGather,
    DailyCraft,
    DailyDefeat,
    WeeklyGather,
    WeeklyCraft,
    WeeklyDefeat,
    WeeklySell,
}

pub struct TaskInfo {
    pub description: &'static str,
    pub goal: Goal,
    pub target: u32,
    pub reward_gold: u32,
    pub reward_xp: u32,
}

pub fn task_info(id: TaskId) -> TaskInfo {
    match id {
        TaskId::DailyGather => TaskInfo {
            description: "Gather 5 ingredients", goal: Goal::GatherAny,
            target: 5, reward_gold: 30, reward_xp: 20,
        },
        TaskId::DailyCraft => TaskInfo {
            description: "Craft 2 items", goal: Goal::CraftAny,
            target: 2, reward_gold: 40, reward_xp: 30,
        },
        TaskId::DailyDefeat => TaskInfo {
            description: "Defeat 2 enemies", goal: Goal::DefeatAny,
            target: 2, reward_gold: 50, reward_xp: 40,
        },
        TaskId::WeeklyGather => TaskInfo {
            description: "Gather 30 ingredients", goal: Goal::GatherAny,
            target: 30, reward_gold: 200, reward_xp: 150,
        },
        TaskId::WeeklyCraft => TaskInfo {
            description: "Craft 15 items", goal: Goal::CraftAny,
            target: 15, reward_gold: 250, reward_xp: 200,
        },
        TaskId::WeeklyDefeat => TaskInfo {
            description: "Defeat 10 enemies", goal: Goal::DefeatAny,
            target: 10, reward_gold: 300, reward_xp: 250,
        },
        TaskId::WeeklySell => TaskInfo {
            description: "Sell 10 items", goal: Goal::SellAny,
            target: 10, reward_gold: 200, reward_xp: 150,
        },
    }
}

pub const DAILY_TASKS: &[TaskId] = &[TaskId::DailyGather, TaskId::DailyCraft, TaskId::DailyDefeat];

pub const WEEKLY_TASKS: &[TaskId] = &[
    TaskId::WeeklyGather,
    TaskId::WeeklyCraft,
    TaskId::WeeklyDefeat,
    TaskId::WeeklySell,
];

// ── Towns ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TownId {
    SakuraVillage,
    IronPort,
    MistHollow,
}

impl TownId {
    /// Position in [`ALL_TOWNS`], used for per-town arrays.
    pub fn index(self) -> usize {
        match self {
            TownId::SakuraVillage => 0,
            TownId::IronPort => 1,
            TownId::MistHollow => 2,
        }
    }
}

pub const TOWN_COUNT: usize = 3;

pub const ALL_TOWNS: &[TownId] = &[TownId::SakuraVillage, TownId::IronPort, TownId::MistHollow];

pub struct NpcInfo {
    pub name: &'static str,
    pub dialogue: &'static str,
    pub quest: QuestId,
}

pub struct TownInfo {
    pub name: &'static str,
    pub ingredients: &'static [Ingredient],
    pub rare_ingredients: &'static [(Ingredient, f64)],
    pub gather_cooldown_secs: u32,
    pub reward_multiplier: u32,
    pub demand: &'static [(RecipeId, f64)],
    pub npc_offers: &'static [(Ingredient, u32)],
    pub npcs: &'static [NpcInfo],
}

impl TownInfo {
    /// Demand scalar for a trade good; goods the town does not list sell at par.
    pub fn demand_for(&self, recipe: RecipeId) -> f64 {
        self.demand
            .iter()
            .find(|(r, _)| *r == recipe)
            .map(|(_, d)| *d)
            .unwrap_or(1.0)
    }
}

pub fn town_info(id: TownId) -> TownInfo {
    use Ingredient::*;
    match id {
        TownId::SakuraVillage => TownInfo {
            name: "Sakura Village",
            ingredients: &[Water, Herbs, Wood],
            rare_ingredients: &[(GoldenHerb, 0.1)],
            gather_cooldown_secs: 30,
            reward_multiplier: 1,
            demand: &[
                (RecipeId::HerbalTea, 1.0),
                (RecipeId::SpicySake, 0.8),
                (RecipeId::MistPotion, 0.5),
                (RecipeId::GoldenElixir, 1.5),
            ],
            npc_offers: &[(Pepper, 5), (MistEssence, 7)],
            npcs: &[NpcInfo {
                name: "Hana the Herbalist",
                dialogue: "Greetings! I need Herbs for my remedies. Can you gather 5 for me?",
                quest: QuestId::HerbQuest,
            }],
        },
        TownId::IronPort => TownInfo {
            name: "Iron Port",
            ingredients: &[Pepper, Sugar, IronOre],
            rare_ingredients: &[(IronShard, 0.1)],
            gather_cooldown_secs: 60,
            reward_multiplier: 2,
            demand: &[
                (RecipeId::HerbalTea, 0.7),
                (RecipeId::SpicySake, 1.2),
                (RecipeId::MistPotion, 0.9),
                (RecipeId::GoldenElixir, 1.2),
            ],
            npc_offers: &[(Water, 5), (ShadowRoot, 8)],
            npcs: &[NpcInfo {
                name: "Captain Toru",
                dialogue: "Ahoy! We need a sturdy Combat Blade for our next voyage. Craft one for us!",
                quest: QuestId::BladeQuest,
            }],
        },
        TownId::MistHollow => TownInfo {
            name: "Mist Hollow",
            ingredients: &[MistEssence, ShadowRoot],
            rare_ingredients: &[(MistCrystal, 0.2)],
            gather_cooldown_secs: 120,
            reward_multiplier: 4,
            demand: &[
                (RecipeId::HerbalTea, 0.6),
                (RecipeId::SpicySake, 0.9),
                (RecipeId::MistPotion, 1.5),
                (RecipeId::GoldenElixir, 1.8),
            ],
            npc_offers: &[(Herbs, 6), (Sugar, 5)],
            npcs: &[NpcInfo {
                name: "Mystic Rei",
                dialogue: "The shadows grow restless. Defeat 3 Bandits to restore peace.",
                quest: QuestId::BanditQuest,
            }],
        },
    }
}

// ── Weather ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Rainy,
    Foggy,
}

pub struct WeatherInfo {
    pub name: &'static str,
    pub gather_bonus: Option<(Ingredient, f64)>,
    /// Scales the player's outgoing combat damage.
    pub combat_modifier: f64,
    pub demand_bonus: &'static [(RecipeId, f64)],
}

impl WeatherInfo {
    pub fn demand_bonus_for(&self, recipe: RecipeId) -> f64 {
        self.demand_bonus
            .iter()
            .find(|(r, _)| *r == recipe)
            .map(|(_, b)| *b)
            .unwrap_or(1.0)
    }
}

pub fn weather_info(weather: Weather) -> WeatherInfo {
    match weather {
        Weather::Sunny => WeatherInfo {
            name: "Sunny", gather_bonus: None, combat_modifier: 1.0,
            demand_bonus: &[(RecipeId::SpicySake, 1.1)],
        },
        Weather::Rainy => WeatherInfo {
            name: "Rainy", gather_bonus: Some((Ingredient::Water, 0.5)), combat_modifier: 0.9,
            demand_bonus: &[(RecipeId::HerbalTea, 1.2)],
        },
        Weather::Foggy => WeatherInfo {
            name: "Foggy", gather_bonus: Some((Ingredient::MistEssence, 0.3)), combat_modifier: 0.8,
            demand_bonus: &[(RecipeId::MistPotion, 1.3)],
        },
    }
}

pub const ALL_WEATHER: &[Weather] = &[Weather::Sunny, Weather::Rainy, Weather::Foggy];

// ── Skills ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillTree {
    Warrior,
    Herbalist,
    Explorer,
}

impl SkillTree {
    pub fn name(self) -> &'static str {
        match self {
            SkillTree::Warrior => "Warrior",
            SkillTree::Herbalist => "Herbalist",
            SkillTree::Explorer => "Explorer",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillId {
    BasicAttack,
    DoubleStrike,
    Stun,
    EfficientBrewing,
    PotentMix,
    QuickGather,
    LuckyFind,
}

/// Skill effect magnitudes; zero means the skill does not touch that stat.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SkillEffect {
    pub damage: u32,
    pub stun_chance: f64,
    pub cost_reduction: f64,
    pub heal_bonus: u32,
    pub cooldown_reduction: f64,
    pub rare_chance: f64,
}

pub struct SkillInfo {
    pub name: &'static str,
    pub tree: SkillTree,
    pub effect: SkillEffect,
    pub cost_gold: u32,
}

pub fn skill_info(id: SkillId) -> SkillInfo {
    let none = SkillEffect::default();
    match id {
        SkillId::BasicAttack => SkillInfo {
            name: "Basic Attack", tree: SkillTree::Warrior,
            effect: SkillEffect { damage: 10, ..none }, cost_gold: 0,
        },
        SkillId::DoubleStrike => SkillInfo {
            name: "Double Strike", tree: SkillTree::Warrior,
            effect: SkillEffect { damage: 10, ..none }, cost_gold: 50,
        },
        SkillId::Stun => SkillInfo {
            name: "Stun", tree: SkillTree::Warrior,
            effect: SkillEffect { damage: 5, stun_chance: 0.2, ..none }, cost_gold: 75,
        },
        SkillId::EfficientBrewing => SkillInfo {
            name: "Efficient Brewing", tree: SkillTree::Herbalist,
            effect: SkillEffect { cost_reduction: 0.2, ..none }, cost_gold: 50,
        },
        SkillId::PotentMix => SkillInfo {
            name: "Potent Mix", tree: SkillTree::Herbalist,
            effect: SkillEffect { heal_bonus: 10, ..none }, cost_gold: 75,
        },
        SkillId::QuickGather => SkillInfo {
            name: "Quick Gather", tree: SkillTree::Explorer,
            effect: SkillEffect { cooldown_reduction: 0.1, ..none }, cost_gold: 50,
        },
        SkillId::LuckyFind => SkillInfo {
            name: "Lucky Find", tree: SkillTree::Explorer,
            effect: SkillEffect { rare_chance: 0.05, ..none }, cost_gold: 75,
        },
    }
}

/// Skills that can be bought, in display order. Basic Attack is innate.
pub const LEARNABLE_SKILLS: &[SkillId] = &[
    SkillId::DoubleStrike,
    SkillId::Stun,
    SkillId::EfficientBrewing,
    SkillId::PotentMix,
    SkillId::QuickGather,
    SkillId::LuckyFind,
];
