//! Whirljig Demo
//!
//! Plays a level of the built-in catalog with a scripted solver, then
//! verifies the recorded transcript replays to the same state hash.

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use whirljig::{
    Catalog, DeterministicRng, InMemoryProgress, Phase, PuzzleSession,
    SessionConfig, TICK_INTERVAL_SECS, VERSION,
    game::{
        action::{verify_transcript, SessionTranscript},
        board::ShapeId,
        events::SessionEvent,
    },
};

/// Level the demo plays.
const DEMO_LEVEL: u32 = 1;

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Whirljig Engine v{}", VERSION);

    let catalog = Catalog::builtin();
    info!("Catalog: {} levels", catalog.len());

    let transcript = demo_session(&catalog)?;
    verify_demo(&transcript)?;

    Ok(())
}

/// Play one session to the end.
fn demo_session(catalog: &Catalog) -> anyhow::Result<SessionTranscript> {
    info!("=== Starting Demo Session ===");

    let session_id = *Uuid::new_v4().as_bytes();
    let rng = DeterministicRng::for_session(&session_id, DEMO_LEVEL);

    let mut session = PuzzleSession::from_catalog(
        catalog,
        DEMO_LEVEL,
        SessionConfig::default(),
        InMemoryProgress::new(),
        rng,
        session_id,
    )
    .context("opening demo level")?;

    let level = &session.state().level;
    info!("Session ID: {}", hex::encode(session_id));
    info!("RNG Seed: {}", session.state().rng_seed);
    info!(
        "Level {} \"{}\": {}x{} grid, {}s, target {}",
        level.id, level.name, level.grid_size, level.grid_size,
        level.time_limit_seconds, level.target_score
    );

    session.start();

    while session.state().phase == Phase::Playing {
        let Some((first, second)) = next_pair(&mut session) else {
            break;
        };

        for id in [first, second] {
            align(&mut session, id);
        }
        session.select_shape(first);
        session.select_shape(second);

        // One simulated second per solved pair
        let result = session.tick();
        for event in &result.events {
            match event {
                SessionEvent::MatchMade { award, new_score, .. } => {
                    info!("Matched for {} points (score {})", award.points, new_score);
                }
                SessionEvent::MatchMissed { first, second } => {
                    warn!("Missed {:?} and {:?}", first, second);
                }
                SessionEvent::LevelRecorded { level_id, score, unlocked_next } => {
                    info!("Level {} recorded with {} (unlocked next: {})", level_id, score, unlocked_next);
                }
                _ => {}
            }
        }
    }

    // Out of pairs below target: let the clock run down
    while session.state().phase == Phase::Playing {
        session.tick();
    }

    info!("=== Session Results ===");
    let state = session.state();
    info!("Phase: {:?}", state.phase);
    info!("Score: {} / {}", state.score, state.level.target_score);
    info!("Moves: {}, pairs matched: {}", state.moves_count, state.matched_pairs);
    info!(
        "Time left: {}s (tick interval {}s), hints left: {}",
        state.time_remaining_seconds, TICK_INTERVAL_SECS, state.hints_remaining
    );
    info!("Final State Hash: {}", hex::encode(session.compute_hash()));

    let transcript = session.transcript();
    let progress = session.into_store();
    info!("Progress: {}", progress.snapshot().to_json()?);

    Ok(transcript)
}

/// Pick the next pair, spending hints while they last.
fn next_pair(session: &mut PuzzleSession<InMemoryProgress>) -> Option<(ShapeId, ShapeId)> {
    if session.use_hint() {
        return session.highlight().and_then(|h| h.target);
    }

    let board = &session.state().board;
    let first = board.unmatched().next()?;
    let second = board.unmatched().find(|s| s.id != first.id && s.kind == first.kind)?;
    Some((first.id, second.id))
}

/// Rotate a shape until it wraps to exactly zero.
fn align(session: &mut PuzzleSession<InMemoryProgress>, id: ShapeId) {
    while session
        .state()
        .board
        .get(id)
        .is_some_and(|s| s.rotation_degrees != 0.0)
    {
        if !session.rotate_shape(id) {
            break;
        }
    }
}

/// Round-trip the transcript through bincode and replay it.
fn verify_demo(transcript: &SessionTranscript) -> anyhow::Result<()> {
    info!("=== Verifying Determinism ===");

    let bytes = transcript.to_bytes()?;
    info!("Transcript: {} actions, {} bytes", transcript.actions.len(), bytes.len());

    let decoded = SessionTranscript::from_bytes(&bytes)?;
    if let Err(e) = verify_transcript(&decoded) {
        bail!("DETERMINISM FAILURE: {}", e);
    }

    info!("Replay State Hash: {}", hex::encode(decoded.final_hash));
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}
