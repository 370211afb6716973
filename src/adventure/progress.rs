//! NPC quests plus daily and weekly tasks.
//!
//! Engine actions report what happened through [`record`]; any active quest
//! or task whose goal matches advances and pays out once it hits its target.

use tracing::info;

use super::catalog::{
    quest_info, task_info, town_info, EnemyKind, Goal, Ingredient, QuestId, RecipeId, DAILY_TASKS,
    WEEKLY_TASKS,
};
use super::error::ActionError;
use super::logic::gain_xp;
use super::state::{AdventureState, QuestProgress, TaskProgress};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressEvent {
    Gathered(Ingredient),
    Crafted(RecipeId),
    Defeated(EnemyKind),
    Sold,
}

fn advances(goal: Goal, event: ProgressEvent) -> bool {
    match (goal, event) {
        (Goal::Gather(want), ProgressEvent::Gathered(got)) => want == got,
        (Goal::Craft(want), ProgressEvent::Crafted(got)) => want == got,
        (Goal::Defeat(want), ProgressEvent::Defeated(got)) => want == got,
        (Goal::GatherAny, ProgressEvent::Gathered(_)) => true,
        (Goal::CraftAny, ProgressEvent::Crafted(_)) => true,
        (Goal::DefeatAny, ProgressEvent::Defeated(_)) => true,
        (Goal::SellAny, ProgressEvent::Sold) => true,
        _ => false,
    }
}

/// Bump a counter; true exactly when this step reaches the target.
fn step(progress: &mut u32, completed: &mut bool, target: u32) -> bool {
    *progress += 1;
    if *progress >= target {
        *completed = true;
        return true;
    }
    false
}

struct Reward {
    label: &'static str,
    gold: u32,
    xp: u32,
}

/// Accept the quest offered by the `index`-th NPC of the current town.
pub fn talk_to_npc(state: &mut AdventureState, index: usize) -> Result<QuestId, ActionError> {
    if state.in_combat() {
        return Err(ActionError::InCombat);
    }
    let npc = town_info(state.world.town)
        .npcs
        .get(index)
        .ok_or(ActionError::NoSuchNpc)?;
    if state.player.quest(npc.quest).is_some() {
        return Err(ActionError::QuestTaken);
    }
    state.player.quests.push(QuestProgress { id: npc.quest, progress: 0, completed: false });
    state.add_log(&format!("{}: \"{}\"", npc.name, npc.dialogue));
    state.add_log(&format!("Quest accepted: {}.", quest_info(npc.quest).description));
    Ok(npc.quest)
}

pub fn record(state: &mut AdventureState, event: ProgressEvent) {
    let mut rewards = Vec::new();

    for quest in state.player.quests.iter_mut().filter(|q| !q.completed) {
        let info = quest_info(quest.id);
        if advances(info.goal, event) && step(&mut quest.progress, &mut quest.completed, info.target) {
            rewards.push(Reward { label: info.description, gold: info.reward_gold, xp: info.reward_xp });
        }
    }

    let player = &mut state.player;
    for task in player
        .daily_tasks
        .iter_mut()
        .chain(player.weekly_tasks.iter_mut())
        .filter(|t| !t.completed)
    {
        let info = task_info(task.id);
        if advances(info.goal, event) && step(&mut task.progress, &mut task.completed, info.target) {
            rewards.push(Reward { label: info.description, gold: info.reward_gold, xp: info.reward_xp });
        }
    }

    for reward in rewards {
        state.player.gold = state.player.gold.saturating_add(reward.gold);
        info!(goal = reward.label, gold = reward.gold, xp = reward.xp, "goal completed");
        state.add_log(&format!(
            "Completed: {}! +{} gold, +{} xp.",
            reward.label, reward.gold, reward.xp
        ));
        gain_xp(state, reward.xp);
    }
}

/// Roll over daily tasks when `day` (days since the Unix epoch) changes,
/// and weekly tasks when `day / 7` changes.
pub fn refresh_day(state: &mut AdventureState, day: u64) {
    let last = state.player.last_login_day;
    if last == Some(day) {
        return;
    }
    state.player.daily_tasks = DAILY_TASKS.iter().map(|&id| TaskProgress::new(id)).collect();
    state.add_log("New daily tasks are available.");
    if last.map(|d| d / 7) != Some(day / 7) {
        state.player.weekly_tasks = WEEKLY_TASKS.iter().map(|&id| TaskProgress::new(id)).collect();
        state.add_log("New weekly tasks are available.");
    }
    state.player.last_login_day = Some(day);
    info!(day, "tasks refreshed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adventure::catalog::{TaskId, TownId};

    #[test]
    fn talk_accepts_quest_once() {
        let mut s = AdventureState::new();
        assert_eq!(talk_to_npc(&mut s, 0), Ok(QuestId::HerbQuest));
        assert_eq!(talk_to_npc(&mut s, 0), Err(ActionError::QuestTaken));
        assert_eq!(talk_to_npc(&mut s, 1), Err(ActionError::NoSuchNpc));
    }

    #[test]
    fn each_town_offers_its_own_quest() {
        let mut s = AdventureState::new();
        s.world.town = TownId::MistHollow;
        assert_eq!(talk_to_npc(&mut s, 0), Ok(QuestId::BanditQuest));
    }

    #[test]
    fn herb_quest_completes_and_pays() {
        let mut s = AdventureState::new();
        talk_to_npc(&mut s, 0).unwrap();
        record(&mut s, ProgressEvent::Gathered(Ingredient::Water));
        for _ in 0..5 {
            record(&mut s, ProgressEvent::Gathered(Ingredient::Herbs));
        }
        let quest = s.player.quest(QuestId::HerbQuest).unwrap();
        assert!(quest.completed);
        assert_eq!(quest.progress, 5);
        assert_eq!(s.player.gold, 65);
        assert_eq!(s.player.xp, 60);
    }

    #[test]
    fn completed_quest_pays_only_once() {
        let mut s = AdventureState::new();
        s.world.town = TownId::IronPort;
        talk_to_npc(&mut s, 0).unwrap();
        record(&mut s, ProgressEvent::Crafted(RecipeId::CombatBlade));
        record(&mut s, ProgressEvent::Crafted(RecipeId::CombatBlade));
        assert_eq!(s.player.gold, 85);
    }

    #[test]
    fn unaccepted_quests_do_not_advance() {
        let mut s = AdventureState::new();
        record(&mut s, ProgressEvent::Defeated(EnemyKind::Bandit));
        assert!(s.player.quests.is_empty());
    }

    #[test]
    fn refresh_day_creates_tasks() {
        let mut s = AdventureState::new();
        refresh_day(&mut s, 100);
        assert_eq!(s.player.daily_tasks.len(), 3);
        assert_eq!(s.player.weekly_tasks.len(), 4);
        assert_eq!(s.player.last_login_day, Some(100));
    }

    #[test]
    fn same_day_keeps_progress() {
        let mut s = AdventureState::new();
        refresh_day(&mut s, 100);
        record(&mut s, ProgressEvent::Sold);
        refresh_day(&mut s, 100);
        let sell = s.player.weekly_tasks.iter().find(|t| t.id == TaskId::WeeklySell).unwrap();
        assert_eq!(sell.progress, 1);
    }

    #[test]
    fn new_day_same_week_keeps_weekly() {
        let mut s = AdventureState::new();
        refresh_day(&mut s, 99);
        record(&mut s, ProgressEvent::Gathered(Ingredient::Wood));
        refresh_day(&mut s, 100);
        assert_eq!(s.player.daily_tasks[0].progress, 0);
        assert_eq!(s.player.weekly_tasks[0].progress, 1);

        refresh_day(&mut s, 105);
        assert_eq!(s.player.weekly_tasks[0].progress, 0);
    }

    #[test]
    fn task_rewards_can_level_up() {
        let mut s = AdventureState::new();
        refresh_day(&mut s, 1);
        for _ in 0..10 {
            record(&mut s, ProgressEvent::Sold);
        }
        let sell = s.player.weekly_tasks.iter().find(|t| t.id == TaskId::WeeklySell).unwrap();
        assert!(sell.completed);
        assert_eq!(s.player.gold, 205);
        assert_eq!(s.player.level, 2);
        assert_eq!(s.player.xp, 50);
    }

    #[test]
    fn one_event_can_finish_quest_and_task() {
        let mut s = AdventureState::new();
        refresh_day(&mut s, 1);
        s.world.town = TownId::MistHollow;
        talk_to_npc(&mut s, 0).unwrap();
        for _ in 0..3 {
            record(&mut s, ProgressEvent::Defeated(EnemyKind::Bandit));
        }
        assert!(s.player.quest(QuestId::BanditQuest).unwrap().completed);
        let daily = s.player.daily_tasks.iter().find(|t| t.id == TaskId::DailyDefeat).unwrap();
        assert!(daily.completed);
        assert_eq!(s.player.gold, 5 + 100 + 50);
    }
}
