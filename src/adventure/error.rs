//! Why a player action was refused. The shell shows these in the log.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("Still recovering from the last trip. Gather again in {remaining_secs}s.")]
    OnCooldown { remaining_secs: u64 },
    #[error("Your bag is full ({slots} slots).")]
    InventoryFull { slots: usize },
    #[error("You need {need} gold but only have {have}.")]
    NotEnoughGold { need: u32, have: u32 },
    #[error("Missing ingredients for {recipe}.")]
    MissingIngredients { recipe: &'static str },
    #[error("You don't know how to make {0}.")]
    UnknownRecipe(&'static str),
    #[error("Requires level {required}.")]
    LevelTooLow { required: u32 },
    #[error("No item in that slot.")]
    NoSuchItem,
    #[error("{0} can't be used.")]
    NotUsable(&'static str),
    #[error("Nobody here will buy {0}.")]
    NotSellable(&'static str),
    #[error("No such offer.")]
    NoSuchOffer,
    #[error("You are already at full health.")]
    HealthFull,
    #[error("You are already in {0}.")]
    AlreadyThere(&'static str),
    #[error("You can't do that during a fight.")]
    InCombat,
    #[error("You are not in a fight.")]
    NotInCombat,
    #[error("The fight is already over.")]
    CombatOver,
    #[error("That skill can't be used in battle.")]
    NoSuchSkill,
    #[error("You already know {0}.")]
    SkillKnown(&'static str),
    #[error("You have no healing potions.")]
    NoPotion,
    #[error("Nobody by that name lives here.")]
    NoSuchNpc,
    #[error("You already took that quest.")]
    QuestTaken,
}
