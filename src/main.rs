//! si-orange entry point
//!
//! Native builds run a headless session at the nominal frame rate and log what
//! happens. The browser build is driven from JavaScript through
//! `platform::web::WebGame`.
//!
//! Usage: `si-orange [config.json] [seed] [variant]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use si_orange::{Config, Game, GameEvent, SessionPhase, Variant};

    env_logger::init();
    log::info!("si-orange (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().filter(|p| p.as_str() != "-");
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let variant = args
        .get(2)
        .and_then(|s| Variant::from_str(s))
        .unwrap_or_default();
    log::info!("Using {} variant", variant.as_str());

    // File fields override the variant preset
    let mut config = Config::for_variant(variant);
    if let Some(path) = path {
        match config.clone().overlay_file(path) {
            Ok(loaded) => config = loaded,
            Err(err) => log::warn!("Ignoring config {}: {}", path, err),
        }
    }

    let frame_ms = f64::from(config.target_frame_ms);
    let mut game = Game::headless(config, seed);
    game.start_requested();
    while game.phase() == SessionPhase::Countdown && game.fire_timer() {}

    let mut now = 0.0;
    let mut frames = 0u32;
    while game.phase() == SessionPhase::Running && frames < 36_000 {
        if wants_flap(&game) {
            game.flap_input();
        }
        now += frame_ms;
        frames += 1;
        if !game.step_frame(now) {
            break;
        }
        for event in game.drain_events() {
            match event {
                GameEvent::ScoreChanged { score } => log::info!("Score: {}", score),
                GameEvent::GameOver { final_score, cause } => {
                    log::info!("Game over after {} frames: {:?}", frames, cause);
                    println!("Final score: {}", final_score);
                }
                other => log::trace!("{:?}", other),
            }
        }
    }
}

/// Scripted input: flap when the body has sunk below the next gap
#[cfg(not(target_arch = "wasm32"))]
fn wants_flap(game: &si_orange::Game<si_orange::ManualScheduler>) -> bool {
    let session = game.session();
    let target = session
        .obstacles
        .iter()
        .find(|pair| pair.right() > session.body.left())
        .map(|pair| pair.gap_center)
        .unwrap_or(session.area_height / 2.0);
    session.body.y > target + 10.0 && session.body.vel > -1.0
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
