//! Integration tests for the timer engine task.
//!
//! These tests drive a spawned engine through its handle with the tokio
//! clock paused, and check the published snapshots and updates:
//! - A complete multi-set session
//! - Stop and restart behavior
//! - Reset and settings changes
//! - Snapshot handoff between engines

use tokio::sync::mpsc;
use tokio::time::Duration;

use zen_pomodoro::engine::{self, EngineError, TimerUpdate};
use zen_pomodoro::{Settings, SoundId, TimerPhase, TimerState};

// ============================================================================
// Test Helpers
// ============================================================================

/// Session of seconds-long phases: 3s work, 2s rest, 2s long break.
fn fast_settings(cycles: u32, sets: u32) -> Settings {
    Settings {
        work_time: 0,
        work_seconds: 3,
        rest_time: 0,
        rest_seconds: 2,
        long_break_time: 0,
        long_break_seconds: 2,
        work_cycles: cycles,
        total_sets: sets,
        ..Settings::default()
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<TimerUpdate>) -> Vec<TimerUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn sounds(updates: &[TimerUpdate]) -> Vec<SoundId> {
    updates.iter().filter_map(|u| u.sound).collect()
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ============================================================================
// Full session
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_session_runs_to_finish() {
    let settings = fast_settings(2, 2);
    let (handle, mut rx, _task) = engine::spawn(settings.clone());

    handle.init(settings.clone(), None).await.unwrap();
    handle.start(settings).await.unwrap();
    sleep_ms(18_500).await;

    let state = handle.snapshot().unwrap();
    assert!(state.is_finished);
    assert!(!state.is_running);
    assert_eq!(state.elapsed_seconds, 18);

    let updates = drain(&mut rx);
    assert_eq!(
        sounds(&updates),
        vec![
            SoundId::RestStart,
            SoundId::WorkStart,
            SoundId::LongBreak,
            SoundId::WorkStart,
            SoundId::RestStart,
            SoundId::WorkStart,
            SoundId::Complete,
        ]
    );
    let notifications = updates.iter().filter(|u| u.notification.is_some()).count();
    assert_eq!(notifications, 7);
}

#[tokio::test(start_paused = true)]
async fn test_finished_session_stays_idle() {
    let settings = fast_settings(1, 1);
    let (handle, mut rx, _task) = engine::spawn(settings.clone());

    handle.start(settings.clone()).await.unwrap();
    sleep_ms(3_500).await;
    drain(&mut rx);

    let state = handle.start(settings).await.unwrap();
    sleep_ms(5_000).await;

    assert!(state.is_finished);
    assert!(!state.is_running);
    assert_eq!(handle.snapshot().unwrap().elapsed_seconds, 3);
    assert!(drain(&mut rx).iter().all(|u| u.sound.is_none()));
}

#[tokio::test(start_paused = true)]
async fn test_transition_from_work_to_rest() {
    let settings = fast_settings(2, 1);
    let (handle, mut rx, _task) = engine::spawn(settings.clone());

    handle.start(settings).await.unwrap();
    sleep_ms(3_500).await;

    let state = handle.snapshot().unwrap();
    assert_eq!(state.phase, TimerPhase::Rest);
    assert_eq!(state.remaining_seconds, 2);
    assert_eq!(state.cycle, 1);

    let updates = drain(&mut rx);
    let transition = updates.last().unwrap();
    assert_eq!(transition.sound, Some(SoundId::RestStart));
    assert_eq!(
        transition.notification.as_ref().unwrap().title,
        "Time to rest!"
    );
}

#[tokio::test(start_paused = true)]
async fn test_warning_cue_in_long_phase() {
    let settings = Settings {
        work_time: 0,
        work_seconds: 8,
        ..fast_settings(2, 1)
    };
    let (handle, mut rx, _task) = engine::spawn(settings.clone());

    handle.start(settings).await.unwrap();
    sleep_ms(3_500).await;

    let updates = drain(&mut rx);
    assert_eq!(sounds(&updates), vec![SoundId::WorkWarning]);
    assert_eq!(updates.last().unwrap().state.remaining_seconds, 5);
}

// ============================================================================
// Stop / Reset
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_keeps_position() {
    let settings = fast_settings(2, 1);
    let (handle, _rx, _task) = engine::spawn(settings.clone());

    handle.start(settings.clone()).await.unwrap();
    sleep_ms(2_500).await;
    let stopped = handle.stop().await.unwrap().unwrap();
    sleep_ms(10_000).await;

    assert_eq!(stopped.remaining_seconds, 1);
    assert_eq!(handle.snapshot(), Some(stopped.clone()));

    handle.start(settings).await.unwrap();
    sleep_ms(1_500).await;
    assert_eq!(handle.snapshot().unwrap().phase, TimerPhase::Rest);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_state_returns_none() {
    let (handle, mut rx, _task) = engine::spawn(Settings::default());

    assert_eq!(handle.stop().await.unwrap(), None);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reset_applies_new_settings() {
    let settings = fast_settings(2, 1);
    let (handle, _rx, _task) = engine::spawn(settings.clone());

    handle.start(settings).await.unwrap();
    sleep_ms(4_500).await;

    let changed = fast_settings(3, 2);
    let state = handle.reset(changed.clone()).await.unwrap();
    sleep_ms(3_000).await;

    assert_eq!(state, TimerState::new(&changed));
    assert_eq!(handle.snapshot(), Some(state));
}

// ============================================================================
// Handoff
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_snapshot_handoff_between_engines() {
    let settings = fast_settings(2, 1);
    let (first, _rx1, _task1) = engine::spawn(settings.clone());

    first.start(settings.clone()).await.unwrap();
    sleep_ms(4_500).await;
    let snapshot = first.stop().await.unwrap();
    drop(first);

    let (second, _rx2, _task2) = engine::spawn(settings.clone());
    let restored = second.init(settings, snapshot.clone()).await.unwrap();

    let snapshot = snapshot.unwrap();
    assert_eq!(restored.phase, snapshot.phase);
    assert_eq!(restored.remaining_seconds, snapshot.remaining_seconds);
    assert_eq!(restored.elapsed_seconds, 4);
    assert!(!restored.is_running);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_stops_the_task() {
    let (handle, _rx, task) = engine::spawn(Settings::default());
    let other = handle.clone();

    drop(handle);
    assert!(!other.is_closed());
    drop(other);

    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropped_update_stream_is_reported() {
    let (handle, rx, _task) = engine::spawn(Settings::default());
    drop(rx);

    assert_eq!(
        handle.init(Settings::default(), None).await,
        Err(EngineError::UpdatesClosed)
    );
}
