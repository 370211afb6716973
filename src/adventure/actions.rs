//! Semantic action IDs for Kaito's Adventure click targets.

// ── Town menu ────────────────────────────────────────────────
pub const GATHER: u16 = 1;
pub const OPEN_CRAFT: u16 = 2;
pub const OPEN_INVENTORY: u16 = 3;
pub const OPEN_MARKET: u16 = 4;
pub const OPEN_TRAVEL: u16 = 5;
pub const OPEN_TOWNSFOLK: u16 = 6;
pub const OPEN_SKILLS: u16 = 7;
pub const SEEK_FIGHT: u16 = 8;
pub const CLOSE_OVERLAY: u16 = 9;

// ── Overlay entries (base + index) ───────────────────────────
pub const CRAFT_BASE: u16 = 100;
pub const USE_ITEM_BASE: u16 = 200;
pub const SELL_ITEM_BASE: u16 = 300;
pub const BUY_OFFER_BASE: u16 = 400;
pub const TRAVEL_BASE: u16 = 500;
pub const TALK_NPC_BASE: u16 = 600;
pub const LEARN_SKILL_BASE: u16 = 700;

/// Width of each `*_BASE` range.
pub const ENTRY_RANGE: u16 = 100;

// ── Combat ───────────────────────────────────────────────────
pub const ATTACK_BASE: u16 = 800; // +combat skill index
pub const DRINK_POTION: u16 = 850;
pub const FLEE: u16 = 851;
pub const LEAVE_COMBAT: u16 = 852;
