//! Kaito's Adventure rendering.
//!
//! Layout: status header + body + message log. The body is the town menu
//! (with the journal beside it on wide screens), an overlay panel, or the
//! fight screen while combat is active.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::catalog::{
    buff_info, enemy_info, quest_info, recipe_info, skill_info, task_info, town_info,
    weather_info, BuffKind, Item, RecipeKind, ALL_INGREDIENTS, ALL_RECIPES, ALL_TOWNS,
    LEARNABLE_SKILLS,
};
use super::combat::{combat_skills, skill_damage, strongest_heal_potion};
use super::logic::{buy_price, craft_chance, gather_cooldown_ticks, has_ingredients, sell_price, xp_to_next};
use super::state::{AdventureState, CombatPhase, Overlay, TaskProgress, MAX_LEVEL};

pub fn render(
    state: &AdventureState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let borders = borders_for(area.width);
    let is_narrow = is_narrow_layout(area.width);
    let log_h: u16 = if is_narrow { 5 } else { 7 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(log_h),
        ])
        .split(area);

    render_header(state, f, chunks[0], borders, is_narrow);

    if state.in_combat() {
        render_combat(state, f, chunks[1], borders, click_state);
    } else if let Some(overlay) = state.overlay {
        let mut cl = ClickableList::new();
        let (title, color) = match overlay {
            Overlay::Craft => {
                craft_lines(state, &mut cl, is_narrow);
                (" Brewing & Crafting ", Color::Magenta)
            }
            Overlay::Inventory => {
                inventory_lines(state, &mut cl);
                (" Inventory ", Color::Green)
            }
            Overlay::Market => {
                market_lines(state, &mut cl);
                (" Market ", Color::Yellow)
            }
            Overlay::Travel => {
                travel_lines(state, &mut cl);
                (" Travel ", Color::Cyan)
            }
            Overlay::Townsfolk => {
                townsfolk_lines(state, &mut cl);
                (" Townsfolk ", Color::Blue)
            }
            Overlay::Skills => {
                skill_lines(state, &mut cl);
                (" Skills ", Color::Red)
            }
        };
        cl.push_clickable(
            Line::from(Span::styled(" [0] Close", Style::default().fg(Color::Yellow))),
            CLOSE_OVERLAY,
        );
        let block = Block::default()
            .borders(borders)
            .border_style(Style::default().fg(color))
            .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)));
        render_list(cl, block, f, chunks[1], click_state);
    } else if is_narrow {
        let mut cl = ClickableList::new();
        town_menu_lines(state, &mut cl);
        cl.push(Line::from(""));
        journal_lines(state, &mut cl);
        let block = Block::default().borders(borders).border_style(Style::default().fg(Color::DarkGray));
        render_list(cl, block, f, chunks[1], click_state);
    } else {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let mut menu = ClickableList::new();
        town_menu_lines(state, &mut menu);
        let block = Block::default().borders(borders).border_style(Style::default().fg(Color::DarkGray));
        render_list(menu, block, f, halves[0], click_state);

        let mut journal = ClickableList::new();
        journal_lines(state, &mut journal);
        let block = Block::default()
            .borders(borders)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(" Journal ", Style::default().fg(Color::DarkGray)));
        f.render_widget(
            Paragraph::new(journal.into_lines()).block(block).wrap(Wrap { trim: false }),
            halves[1],
        );
    }

    render_log(state, f, chunks[2], borders);
}

// ── Helpers ─────────────────────────────────────────────────

fn hp_bar(current: u32, max: u32, width: usize) -> (String, Color) {
    let ratio = if max > 0 { current as f64 / max as f64 } else { 0.0 };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width - filled;
    let bar = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(empty);
    let color = if ratio > 0.5 { Color::Green } else if ratio > 0.25 { Color::Yellow } else { Color::Red };
    (bar, color)
}

fn borders_for(area_width: u16) -> Borders {
    if is_narrow_layout(area_width) { Borders::TOP | Borders::BOTTOM } else { Borders::ALL }
}

/// Whole seconds (rounded up) covering `ticks`.
fn secs_left(state: &AdventureState, ticks: u64) -> u64 {
    ticks.div_ceil(state.config.ticks_per_sec.max(1) as u64)
}

fn clock(secs: u64) -> String {
    if secs >= 60 {
        format!("{}:{:02}", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

fn letter(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

fn buff_name(kind: BuffKind) -> &'static str {
    match kind {
        BuffKind::LuckyGather => "Lucky",
        BuffKind::SwiftGather => "Swift",
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", text),
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    ))
}

fn note(text: String) -> Line<'static> {
    Line::from(Span::styled(format!(" {}", text), Style::default().fg(Color::DarkGray)))
}

fn render_list(
    cl: ClickableList,
    block: Block,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0);
    drop(cs);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ── Header & log ────────────────────────────────────────────

fn render_header(state: &AdventureState, f: &mut Frame, area: Rect, borders: Borders, is_narrow: bool) {
    let p = &state.player;
    let (bar, bar_color) = hp_bar(p.health, p.max_health, if is_narrow { 8 } else { 12 });
    let xp = if p.level >= MAX_LEVEL {
        "MAX".to_string()
    } else {
        format!("{}/{}", p.xp, xp_to_next(state))
    };

    let stats = Line::from(vec![
        Span::styled(
            format!(" Lv.{}", p.level),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" HP", Style::default().fg(Color::Gray)),
        Span::styled(bar, Style::default().fg(bar_color)),
        Span::styled(format!("{}/{}", p.health, p.max_health), Style::default().fg(Color::White)),
        Span::styled(format!(" {}G", p.gold), Style::default().fg(Color::Yellow)),
        Span::styled(format!(" XP {}", xp), Style::default().fg(Color::Cyan)),
    ]);

    let cooldown = state.world.gather_cooldown_left();
    let gather = if cooldown == 0 {
        Span::styled(" Gather: ready", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            format!(" Gather: {}", clock(secs_left(state, cooldown))),
            Style::default().fg(Color::DarkGray),
        )
    };
    let mut place = vec![
        Span::styled(
            format!(" {}", town_info(state.world.town).name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" \u{00b7} {}", weather_info(state.world.weather).name),
            Style::default().fg(Color::Cyan),
        ),
        gather,
    ];
    for buff in &p.buffs {
        let left = buff.expires_at.saturating_sub(state.world.ticks);
        place.push(Span::styled(
            format!(" {} {}", buff_name(buff.kind), clock(secs_left(state, left))),
            Style::default().fg(Color::Magenta),
        ));
    }

    let title = if is_narrow { " Kaito " } else { " Kaito's Adventure " };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
    f.render_widget(
        Paragraph::new(vec![stats, Line::from(place)]).block(block),
        area,
    );
}

/// Message log, kept scrolled to the newest line.
fn render_log(state: &AdventureState, f: &mut Frame, area: Rect, borders: Borders) {
    let lines: Vec<Line> = state
        .log
        .iter()
        .map(|msg| Line::from(Span::styled(format!(" > {}", msg), Style::default().fg(Color::DarkGray))))
        .collect();
    let block = Block::default().borders(borders).border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = paragraph.line_count(inner.width).min(u16::MAX as usize) as u16;
    let scroll = total.saturating_sub(inner.height);
    f.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

// ── Choice helpers ──────────────────────────────────────────

fn push_choice(cl: &mut ClickableList, key: char, label: &str, detail: &str, action_id: u16) {
    cl.push_clickable(
        Line::from(vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label.to_string(), Style::default().fg(Color::White)),
            Span::styled(format!(" {}", detail), Style::default().fg(Color::Gray)),
        ]),
        action_id,
    );
}

/// Still clickable: the engine explains why the action is refused.
fn push_choice_dim(cl: &mut ClickableList, key: char, label: &str, detail: &str, action_id: u16) {
    cl.push_clickable(
        Line::from(vec![
            Span::styled(
                format!(" [{}] ", key),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{} {}", label, detail), Style::default().fg(Color::DarkGray)),
        ]),
        action_id,
    );
}

// ── Town ────────────────────────────────────────────────────

fn town_menu_lines(state: &AdventureState, cl: &mut ClickableList) {
    let town = town_info(state.world.town);
    cl.push(heading(&format!("{} \u{00b7} {}", town.name, weather_info(state.world.weather).name)));
    cl.push(Line::from(""));

    let cooldown = state.world.gather_cooldown_left();
    if cooldown == 0 {
        push_choice(cl, '1', "Gather", "", GATHER);
    } else {
        let wait = format!("({})", clock(secs_left(state, cooldown)));
        push_choice_dim(cl, '1', "Gather", &wait, GATHER);
    }
    push_choice(cl, '2', "Brew & craft", "", OPEN_CRAFT);
    let bag = format!("({}/{})", state.player.inventory.len(), state.player.inventory_slots);
    push_choice(cl, '3', "Inventory", &bag, OPEN_INVENTORY);
    push_choice(cl, '4', "Market", "", OPEN_MARKET);
    push_choice(cl, '5', "Travel", "", OPEN_TRAVEL);
    push_choice(cl, '6', "Townsfolk", "", OPEN_TOWNSFOLK);
    push_choice(cl, '7', "Skills", "", OPEN_SKILLS);
    push_choice(cl, '8', "Seek a fight", "", SEEK_FIGHT);
}

fn task_line(t: &TaskProgress) -> Line<'static> {
    let info = task_info(t.id);
    if t.completed {
        note(format!("\u{2713} {}", info.description))
    } else {
        Line::from(Span::styled(
            format!(" \u{00b7} {} {}/{}", info.description, t.progress, info.target),
            Style::default().fg(Color::White),
        ))
    }
}

fn journal_lines(state: &AdventureState, cl: &mut ClickableList) {
    let p = &state.player;

    cl.push(heading("Quests"));
    let active: Vec<_> = p.quests.iter().filter(|q| !q.completed).collect();
    if active.is_empty() {
        cl.push(note("Ask the townsfolk for work.".to_string()));
    }
    for q in active {
        let info = quest_info(q.id);
        cl.push(Line::from(Span::styled(
            format!(" \u{2605} {} {}/{}", info.description, q.progress, info.target),
            Style::default().fg(Color::Yellow),
        )));
    }

    if !p.daily_tasks.is_empty() {
        cl.push(heading("Daily"));
        for t in &p.daily_tasks {
            cl.push(task_line(t));
        }
    }
    if !p.weekly_tasks.is_empty() {
        cl.push(heading("Weekly"));
        for t in &p.weekly_tasks {
            cl.push(task_line(t));
        }
    }

    let rare_total = ALL_INGREDIENTS.iter().filter(|i| i.is_rare()).count();
    cl.push(Line::from(""));
    cl.push(note(format!("Rare finds {}/{}", p.rare_items.len(), rare_total)));
    cl.push(note(format!(
        "Gathered {} \u{00b7} Crafted {} \u{00b7} Defeated {}",
        p.stats.gathers, p.stats.items_crafted, p.stats.enemies_defeated
    )));
}

// ── Overlays ────────────────────────────────────────────────

fn recipe_effect(kind: RecipeKind) -> String {
    match kind {
        RecipeKind::Sell { base_gold } => format!("sells ~{}G", base_gold),
        RecipeKind::Heal { heal_percent, .. } => format!("heals {:.0}%", heal_percent * 100.0),
        RecipeKind::Gather(buff) => {
            let info = buff_info(buff);
            if info.rare_chance_boost > 0.0 {
                format!("+{:.0}% rare finds", info.rare_chance_boost * 100.0)
            } else {
                format!("-{:.0}% gather time", info.cooldown_reduction * 100.0)
            }
        }
        RecipeKind::Weapon { damage } => format!("+{} damage", damage),
        RecipeKind::Armor { defense } => format!("+{} defense", defense),
    }
}

fn craft_lines(state: &AdventureState, cl: &mut ClickableList, is_narrow: bool) {
    cl.push(note(format!("Success chance {:.0}%", craft_chance(state) * 100.0)));
    for (i, &id) in ALL_RECIPES.iter().enumerate() {
        let info = recipe_info(id);
        let detail = if is_narrow {
            String::new()
        } else {
            let parts: Vec<&str> = info.ingredients.iter().map(|i| i.name()).collect();
            format!("({}) {}", parts.join(" + "), recipe_effect(info.kind))
        };
        let action = CRAFT_BASE + i as u16;
        if state.player.level < info.unlock_level {
            push_choice_dim(cl, letter(i), info.name, &format!("Lv.{}", info.unlock_level), action);
        } else if has_ingredients(&state.player, id) {
            push_choice(cl, letter(i), info.name, &detail, action);
        } else {
            push_choice_dim(cl, letter(i), info.name, &detail, action);
        }
    }
}

fn inventory_lines(state: &AdventureState, cl: &mut ClickableList) {
    let p = &state.player;
    let weapon = p.equipment.weapon.map(|w| recipe_info(w).name).unwrap_or("none");
    let armor = p.equipment.armor.map(|a| recipe_info(a).name).unwrap_or("none");
    cl.push(note(format!("Weapon: {}  Armor: {}", weapon, armor)));
    cl.push(note(format!("Slots {}/{}", p.inventory.len(), p.inventory_slots)));

    for (i, stack) in p.inventory.iter().enumerate() {
        let label = format!("{} x{}", stack.item.name(), stack.quantity);
        let action = USE_ITEM_BASE + i as u16;
        match stack.item {
            Item::Crafted(r) => {
                let verb = match recipe_info(r).kind {
                    RecipeKind::Heal { .. } | RecipeKind::Gather(_) => "use",
                    RecipeKind::Weapon { .. } | RecipeKind::Armor { .. } => "equip",
                    RecipeKind::Sell { .. } => "",
                };
                if verb.is_empty() {
                    push_choice_dim(cl, letter(i), &label, "", action);
                } else {
                    push_choice(cl, letter(i), &label, verb, action);
                }
            }
            Item::Ingredient(ing) if ing.is_rare() => {
                push_choice_dim(cl, letter(i), &label, "\u{2605}", action)
            }
            Item::Ingredient(_) => push_choice_dim(cl, letter(i), &label, "", action),
        }
    }
}

fn market_lines(state: &AdventureState, cl: &mut ClickableList) {
    let town = town_info(state.world.town);
    cl.push(heading(&format!("Buy from {}", town.name)));
    for (i, &(ingredient, base)) in town.npc_offers.iter().enumerate() {
        let key = char::from_digit(i as u32 + 1, 10).unwrap_or('?');
        let price = buy_price(&state.player, base);
        let action = BUY_OFFER_BASE + i as u16;
        if state.player.gold >= price {
            push_choice(cl, key, ingredient.name(), &format!("{}G", price), action);
        } else {
            push_choice_dim(cl, key, ingredient.name(), &format!("{}G", price), action);
        }
    }

    cl.push(heading("Sell"));
    for (i, stack) in state.player.inventory.iter().enumerate() {
        let label = format!("{} x{}", stack.item.name(), stack.quantity);
        let action = SELL_ITEM_BASE + i as u16;
        match sell_price(state, stack.item) {
            Some(price) => push_choice(cl, letter(i), &label, &format!("{}G", price), action),
            None => push_choice_dim(cl, letter(i), &label, "", action),
        }
    }
}

fn travel_lines(state: &AdventureState, cl: &mut ClickableList) {
    for (i, &town) in ALL_TOWNS.iter().enumerate() {
        let info = town_info(town);
        let action = TRAVEL_BASE + i as u16;
        if town == state.world.town {
            push_choice_dim(cl, letter(i), info.name, "(you are here)", action);
            continue;
        }
        let gather = clock(secs_left(state, gather_cooldown_ticks(state, town)));
        let detail = format!("gold x{} \u{00b7} gather {}", info.reward_multiplier, gather);
        push_choice(cl, letter(i), info.name, &detail, action);
    }
}

fn townsfolk_lines(state: &AdventureState, cl: &mut ClickableList) {
    let town = town_info(state.world.town);
    for (i, npc) in town.npcs.iter().enumerate() {
        let quest = quest_info(npc.quest);
        let action = TALK_NPC_BASE + i as u16;
        match state.player.quest(npc.quest) {
            None => push_choice(cl, letter(i), npc.name, "has a request", action),
            Some(q) if q.completed => push_choice_dim(cl, letter(i), npc.name, "thanks you", action),
            Some(q) => {
                let status = format!("{}/{}", q.progress, quest.target);
                push_choice_dim(cl, letter(i), npc.name, &status, action);
            }
        }
        cl.push(note(format!(
            "  {} ({}G, {} XP)",
            quest.description, quest.reward_gold, quest.reward_xp
        )));
    }
}

fn skill_lines(state: &AdventureState, cl: &mut ClickableList) {
    let p = &state.player;
    for (i, &id) in LEARNABLE_SKILLS.iter().enumerate() {
        let info = skill_info(id);
        let action = LEARN_SKILL_BASE + i as u16;
        let label = format!("{} ({})", info.name, info.tree.name());
        if p.knows_skill(id) {
            push_choice_dim(cl, letter(i), &label, "learned", action);
        } else if p.gold >= info.cost_gold {
            push_choice(cl, letter(i), &label, &format!("{}G", info.cost_gold), action);
        } else {
            push_choice_dim(cl, letter(i), &label, &format!("{}G", info.cost_gold), action);
        }
    }
    cl.push(heading("Known"));
    for s in &p.skills {
        cl.push(note(format!("{} Lv.{} ({} uses)", skill_info(s.id).name, s.level, s.uses)));
    }
}

// ── Combat ──────────────────────────────────────────────────

fn render_combat(
    state: &AdventureState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let Some(combat) = &state.combat else {
        return;
    };
    let is_narrow = is_narrow_layout(area.width);
    let enemy = enemy_info(combat.enemy);

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        format!(" \u{00bb} {}", enemy.name),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )));
    let (bar, color) = hp_bar(combat.enemy_health, combat.enemy_max_health, if is_narrow { 10 } else { 16 });
    let mut hp = vec![
        Span::styled(" HP ", Style::default().fg(Color::Gray)),
        Span::styled(bar, Style::default().fg(color)),
        Span::styled(
            format!(" {}/{}", combat.enemy_health, combat.enemy_max_health),
            Style::default().fg(Color::White),
        ),
    ];
    if combat.enemy_stunned {
        hp.push(Span::styled(" stunned", Style::default().fg(Color::Yellow)));
    }
    cl.push(Line::from(hp));
    cl.push(Line::from(""));

    let start = combat.log.len().saturating_sub(4);
    for msg in &combat.log[start..] {
        cl.push(Line::from(Span::styled(format!(" {}", msg), Style::default().fg(Color::White))));
    }
    cl.push(Line::from(""));

    match combat.phase {
        CombatPhase::PlayerTurn => {
            for (i, &id) in combat_skills(&state.player).iter().enumerate() {
                let key = char::from_digit(i as u32 + 1, 10).unwrap_or('?');
                let dmg = format!("{} dmg", skill_damage(state, id));
                push_choice(&mut cl, key, skill_info(id).name, &dmg, ATTACK_BASE + i as u16);
            }
            match strongest_heal_potion(&state.player) {
                Some(potion) => {
                    let count = format!("x{}", state.player.item_count(Item::Crafted(potion)));
                    push_choice(&mut cl, 'p', recipe_info(potion).name, &count, DRINK_POTION);
                }
                None => push_choice_dim(&mut cl, 'p', "Drink a potion", "(none)", DRINK_POTION),
            }
            push_choice(&mut cl, 'f', "Flee", "", FLEE);
        }
        phase => {
            let (text, color) = match phase {
                CombatPhase::Victory => ("Victory!", Color::Yellow),
                CombatPhase::Defeat => ("You were defeated...", Color::Red),
                _ => ("You got away.", Color::Green),
            };
            cl.push(Line::from(Span::styled(
                format!(" {}", text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            push_choice(&mut cl, '0', "Back to town", "", LEAVE_COMBAT);
        }
    }

    let block = Block::default().borders(borders).border_style(Style::default().fg(Color::Red));
    render_list(cl, block, f, area, click_state);
}
