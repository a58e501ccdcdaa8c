//! Per-frame driver
//!
//! `tick` advances the phase machine by one fixed step and fills the draw
//! list; `render` hands that list to a backend and clears it.

use super::state::{Game, GamePhase};
use crate::platform::{Clock, InputSource, Key};
use crate::renderer::Renderer;
use crate::ui::MenuAction;

/// Advance the game by one step of `dt` seconds. Phase delays are measured
/// on `clock`. Returns `false` once the game has quit.
pub fn tick(game: &mut Game, input: &dyn InputSource, clock: &dyn Clock, dt: f32) -> bool {
    let now = clock.now();
    // Items left over from a frame that was never rendered
    game.draw.flush();

    match game.phase {
        GamePhase::Menu => match game.menu.tick(input) {
            Some(MenuAction::Play) => {
                game.setup_scene();
                game.enter(GamePhase::Playing, now);
            }
            Some(MenuAction::Quit) => game.enter(GamePhase::Quit, now),
            None => {
                let screen = game.screen();
                game.menu.draw(screen, &game.resources, &mut game.draw);
            }
        },
        GamePhase::Playing => {
            if input.is_key_pressed(Key::Back) {
                game.teardown_scene();
                game.menu.reset();
                game.enter(GamePhase::Menu, now);
                return true;
            }

            game.simulate(input, dt);
            game.draw_hud();

            if game.signals.ball_lost {
                game.enter(GamePhase::PendingLose, now);
            } else if game.collision.static_count() == 0 {
                game.enter(GamePhase::PendingWin, now);
            }
        }
        GamePhase::PendingWin | GamePhase::PendingLose => {
            game.simulate(input, dt);
            game.draw_hud();

            if game.phase_elapsed(now) >= game.config.timing.settle_delay {
                game.frozen = game.draw.record();
                let next = if game.phase == GamePhase::PendingWin {
                    GamePhase::Win
                } else {
                    GamePhase::Lose
                };
                game.enter(next, now);
            }
        }
        GamePhase::Win | GamePhase::Lose => {
            if game.phase_elapsed(now) >= game.config.timing.display_delay {
                game.reset_scene();
                game.enter(GamePhase::Playing, now);
            } else {
                game.draw.replay(&game.frozen);
                game.draw_banner();
            }
        }
        GamePhase::Quit => {}
    }

    game.phase != GamePhase::Quit
}

/// Dispatch this frame's draw list, then clear it
pub fn render(game: &mut Game, renderer: &mut dyn Renderer) {
    game.draw.dispatch(renderer);
    game.draw.flush();
}
