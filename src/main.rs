//! Brickbreak - headless runner
//!
//! Plays a few rounds with an autopilot at the fixed step, drawing into a
//! renderer that only counts. Usage: `brickbreak [config.json] [rounds]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brickbreak::consts::TIME_STEP;
    use brickbreak::platform::{InputSource, Key, KeyState, ManualClock};
    use brickbreak::renderer::{DrawItem, Renderer, SpriteInstance};
    use brickbreak::resources::{Font, Resources, Texture, names};
    use brickbreak::sim::render;
    use brickbreak::{Game, GameConfig, GamePhase, tick};

    /// Hard stop: ten simulated minutes
    const MAX_FRAMES: u64 = 90 * 600;
    /// Paddle offset from the ball so hits carry some spin
    const AIM_OFFSET: f32 = 20.0;

    /// Keeps the paddle under the ball and presses through the menus
    struct Autopilot {
        keys: KeyState,
        frame: u64,
        rounds: u32,
        max_rounds: u32,
        wins: u32,
        last_phase: GamePhase,
    }

    impl Autopilot {
        fn new(max_rounds: u32) -> Self {
            Self {
                keys: KeyState::new(),
                frame: 0,
                rounds: 0,
                max_rounds,
                wins: 0,
                last_phase: GamePhase::Menu,
            }
        }

        fn plan(&mut self, game: &Game) {
            self.keys.release_all();
            // Edge-triggered keys need a released frame in between
            let tap = self.frame % 2 == 0;
            let done = self.rounds >= self.max_rounds;

            match game.phase() {
                GamePhase::Menu => {
                    if tap {
                        if done {
                            self.keys.press(Key::Down);
                        }
                        self.keys.press(Key::Confirm);
                    }
                }
                GamePhase::Playing | GamePhase::PendingWin | GamePhase::PendingLose => {
                    if done && game.phase() == GamePhase::Playing {
                        self.keys.set(Key::Back, tap);
                        return;
                    }
                    let launched = game.ball().is_some_and(|b| b.is_launched());
                    if !launched && tap {
                        self.keys.press(Key::Launch);
                    }
                    if let (Some(ball), Some(paddle)) = (game.ball_center(), game.paddle_center()) {
                        let aim = if (self.frame / 240) % 2 == 0 {
                            AIM_OFFSET
                        } else {
                            -AIM_OFFSET
                        };
                        let target = ball.x + aim;
                        self.keys.set(Key::Left, target < paddle.x - 4.0);
                        self.keys.set(Key::Right, target > paddle.x + 4.0);
                        self.keys
                            .set(Key::Boost, (target - paddle.x).abs() > game.config().paddle.size.x);
                    }
                }
                GamePhase::Win | GamePhase::Lose | GamePhase::Quit => {}
            }
        }

        /// Bookkeeping after a tick
        fn observe(&mut self, game: &Game) {
            let phase = game.phase();
            if phase != self.last_phase {
                match phase {
                    GamePhase::Win => {
                        self.rounds += 1;
                        self.wins += 1;
                        log::info!("Round {} won with score {}", self.rounds, game.score());
                    }
                    GamePhase::Lose => {
                        self.rounds += 1;
                        log::info!("Round {} lost with score {}", self.rounds, game.score());
                    }
                    _ => {}
                }
                self.last_phase = phase;
            }
            self.keys.end_frame();
            self.frame += 1;
        }
    }

    impl InputSource for Autopilot {
        fn is_key_down(&self, key: Key) -> bool {
            self.keys.is_key_down(key)
        }

        fn is_key_pressed(&self, key: Key) -> bool {
            self.keys.is_key_pressed(key)
        }
    }

    /// Renderer that only tallies what it is given
    #[derive(Debug, Default)]
    struct CountingRenderer {
        batches: u64,
        sprites: u64,
        texts: u64,
    }

    impl Renderer for CountingRenderer {
        fn draw_sprites(&mut self, sprites: &[SpriteInstance]) {
            self.batches += 1;
            self.sprites += sprites.len() as u64;
        }

        fn draw_text(&mut self, _item: &DrawItem) {
            self.texts += 1;
        }
    }

    /// Descriptors standing in for loaded assets
    fn placeholder_resources() -> Resources {
        let mut resources = Resources::new();
        let textures = [
            (names::PADDLE, 128, 32),
            (names::BALL, 24, 24),
            (names::BLOCK, 192, 64),
        ];
        for (id, (name, width, height)) in textures.into_iter().enumerate() {
            resources.add_texture(
                name,
                Texture {
                    id: id as u32,
                    width,
                    height,
                },
            );
        }
        resources.add_font(names::FONT, Font { id: 0, base_size: 64 });
        resources
    }

    pub fn run() -> Result<(), brickbreak::ConfigError> {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let max_rounds = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

        let mut game = Game::new(config, placeholder_resources())?;
        let mut pilot = Autopilot::new(max_rounds);
        let mut renderer = CountingRenderer::default();
        let clock = ManualClock::new();

        log::info!("Playing {} rounds headless", max_rounds);
        while pilot.frame < MAX_FRAMES {
            pilot.plan(&game);
            if !tick(&mut game, &pilot, &clock, TIME_STEP) {
                break;
            }
            render(&mut game, &mut renderer);
            pilot.observe(&game);
            clock.advance(f64::from(TIME_STEP));
        }

        if pilot.frame >= MAX_FRAMES {
            log::warn!("Stopped after {} frames without quitting", MAX_FRAMES);
        }
        log::info!(
            "Done: {} rounds ({} won) in {} frames, {:.1}s simulated; {} sprites in {} batches, {} texts",
            pilot.rounds,
            pilot.wins,
            pilot.frame,
            pilot.frame as f64 * f64::from(TIME_STEP),
            renderer.sprites,
            renderer.batches,
            renderer.texts
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickbreak (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `brickbreak::tick` directly
}
