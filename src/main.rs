mod adventure;
mod config;
mod input;
mod logging;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use adventure::AdventureGame;
use input::{key_to_input, ClickState, InputEvent};
use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::GameTime;

/// Ticks between calendar checks for the daily/weekly task rollover.
const DAY_CHECK_TICKS: u64 = 600;

/// Query the grid container's bounding rect and resolve a tap to an action.
fn dom_hit_test(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();
    let hit = cs.hit_test_pixels(click_x, click_y, rect.width(), rect.height());

    tracing::debug!(x = mouse_x, y = mouse_y, ?hit, targets = cs.targets.len(), "tap");
    hit
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init(logging::default_level());

    let config = config::load_config();
    let ticks_per_sec = config.ticks_per_sec;
    let mut game = AdventureGame::new(config);
    game.refresh_day(time::today());
    tracing::info!(ticks_per_sec, "Kaito's Adventure started");

    let game = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let hit = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_hit_test(mouse_event.x, mouse_event.y, &cs)
            };

            if let Some(id) = hit {
                game.borrow_mut().handle_input(&InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(event) = key_to_input(&key_event.code) {
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        let mut clock = GameTime::new(ticks_per_sec);
        let mut next_day_check = DAY_CHECK_TICKS;
        move |f| {
            let ticks = clock.update(now_ms());
            let mut g = game.borrow_mut();
            if ticks > 0 {
                g.tick(ticks);
            }
            if clock.total_ticks >= next_day_check {
                g.refresh_day(time::today());
                next_day_check = clock.total_ticks + DAY_CHECK_TICKS;
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            g.render(f, size, &click_state);
        }
    });

    Ok(())
}
