//! Rhythm Strike headless demo
//!
//! Runs one seeded session against the virtual clock with a scripted player,
//! the same way a host event loop would pump frames and forward key presses.

use std::cell::Cell;
use std::rc::Rc;

use rhythm_strike::sim::Autoplayer;
use rhythm_strike::{InputSource, Session, SessionStatus, Settings, Tuning};

/// Host frame length (~60 fps)
const FRAME_MS: u64 = 16;

fn main() {
    env_logger::init();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1);
    log::info!("Rhythm Strike (headless) starting with seed {}", seed);

    let coins = Rc::new(Cell::new(None));
    let earned = Rc::clone(&coins);
    let settings = Settings::default();
    let mut session = match Session::open(Tuning::default(), settings.clone(), seed, move |reward| {
        earned.set(Some(reward));
    }) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Failed to open session: {}", err);
            return;
        }
    };

    if let Err(err) = session.start() {
        log::error!("Failed to start session: {}", err);
        return;
    }

    // Presses via the keyboard path, like a real host would
    let mut player = Autoplayer::new(seed ^ 0x5eed, 0.85);
    while session.status() == SessionStatus::Running {
        session.advance(FRAME_MS);
        if let Some(action) = player.decide(session.targets()) {
            let key = settings.bindings.key_for(action);
            session.handle_input(InputSource::Key(key));
        }
    }

    let state = session.state();
    println!(
        "Session over ({:?}): score {}, hits {}, lives {}, {}s left",
        state.end_reason, state.score, state.hit_count, state.lives, state.remaining_time
    );
    match coins.get() {
        Some(reward) => println!("Earned {} coins", reward),
        None => println!("No reward earned"),
    }

    session.close();
    debug_assert_eq!(session.active_processes(), 0);
}
