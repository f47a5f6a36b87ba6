// SPDX-License-Identifier: MPL-2.0
//! Integration tests across the wired shell: bus, shared state, controllers
//! and the engine notification queue.

mod common;

use approx::assert_abs_diff_eq;
use common::{Fixture, ScriptedEngine, MEDIA_LENGTH_MS};
use media_shell::bus::{MessageKind, SeekTo, StopPlayback};
use media_shell::config::{self, Config, CONTROLS_OPACITY_HIDDEN, CONTROLS_OPACITY_VISIBLE};
use media_shell::controllers::{ControlVisibility, SurfaceStyle, TransportHost};
use media_shell::engine::EngineNotification;
use media_shell::playback::Volume;
use media_shell::presentation::{HeadlessHost, HostEvent};
use media_shell::Shell;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

#[test]
fn test_open_selects_first_entry_and_plays() {
    let fixture = Fixture::new();
    let state = fixture.shell.state().read();

    assert_eq!(state.window_title(), "first - MediaShell");
    assert_eq!(state.total_duration_ms(), MEDIA_LENGTH_MS);
    assert!(state.is_playing());
    assert!(fixture.shell.transport().is_playing());
    assert_eq!(fixture.shell.application().current_index(), Some(0));
    assert_eq!(fixture.record.borrow().toggles, 1);
}

#[test]
fn test_change_volume_is_reflected_in_state() {
    let mut fixture = Fixture::new();

    for level in (0..=100).step_by(7).chain([100]) {
        fixture
            .shell
            .with_transport(|t, out| t.set_volume(Volume::new(level), out));
        fixture.pump();

        let state = fixture.shell.state().read();
        assert_eq!(state.volume().value(), level);
        if level > 0 {
            assert!(!state.is_muted());
        }
        assert_eq!(fixture.shell.transport().volume().value(), level);
    }
}

#[test]
fn test_mute_keeps_volume_and_silences_engine() {
    let mut fixture = Fixture::new();
    assert_eq!(fixture.shell.state().read().volume().value(), 80);

    fixture.shell.with_transport(|t, out| t.toggle_mute(out));
    fixture.pump();
    {
        let state = fixture.shell.state().read();
        assert!(state.is_muted());
        assert_eq!(state.volume().value(), 80);
        let record = fixture.record.borrow();
        assert_eq!(record.output_volume, Some(Volume::ZERO));
        assert!(record.muted);
    }

    fixture.shell.with_transport(|t, out| t.toggle_mute(out));
    fixture.pump();
    let state = fixture.shell.state().read();
    assert!(!state.is_muted());
    assert_eq!(state.volume().value(), 80);
    assert_eq!(fixture.record.borrow().output_volume, Some(Volume::new(80)));
}

#[test]
fn test_mute_round_trip_survives_repeated_cycles() {
    let mut fixture = Fixture::new();
    fixture
        .shell
        .with_transport(|t, out| t.set_volume(Volume::new(37), out));
    fixture.pump();

    for _ in 0..4 {
        fixture.shell.with_transport(|t, out| t.toggle_mute(out));
        fixture.pump();
        fixture.shell.with_transport(|t, out| t.toggle_mute(out));
        fixture.pump();
        assert_eq!(fixture.shell.state().read().volume().value(), 37);
        assert!(!fixture.shell.state().read().is_muted());
    }
}

#[test]
fn test_drag_ignores_progress_and_seeks_on_release() {
    let mut fixture = Fixture::new();

    fixture.shell.with_transport(|t, out| t.begin_drag(out));
    fixture.shell.with_transport(|t, _| t.drag_to(30.0));

    for (step, time_ms) in [10_000_u64, 45_000, 90_000].into_iter().enumerate() {
        fixture.now += Duration::from_secs(1 + u64::try_from(step).unwrap());
        fixture.record.borrow().emit(EngineNotification::TimeChanged(time_ms));
        fixture.pump();
        assert_abs_diff_eq!(fixture.shell.transport().display_progress(), 30.0);
    }
    assert!(!fixture.shell.state().read().is_playing());

    fixture.shell.with_transport(|t, out| t.end_drag(50.0, out));
    fixture.pump();

    assert_eq!(fixture.record.borrow().seeks, vec![60_000]);
    assert!(fixture.shell.state().read().is_playing());
    assert!(!fixture.shell.transport().is_dragging());
    assert_abs_diff_eq!(fixture.shell.transport().display_progress(), 50.0);
}

#[test]
fn test_end_drag_publishes_absolute_seek_target() {
    let fixture = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let id = fixture.shell.bus().register();
    let sink = Rc::clone(&seen);
    assert!(fixture.shell.bus().subscribe::<SeekTo, _>(id, move |m, _| {
        sink.borrow_mut().push(m.position_ms);
        Ok(())
    }));

    fixture.shell.with_transport(|t, out| t.end_drag(50.0, out));
    assert_eq!(*seen.borrow(), vec![60_000]);
}

#[test]
fn test_progress_is_zero_without_duration() {
    let (engine, record) = ScriptedEngine::new();
    let mut shell = Shell::new(
        &Config::default(),
        Box::new(engine),
        Box::new(HeadlessHost::new()),
    );
    shell.start();

    record.borrow().emit(EngineNotification::TimeChanged(5_000));
    shell.pump(Instant::now());

    assert_eq!(shell.state().read().current_time_ms(), 5_000);
    assert_abs_diff_eq!(shell.transport().display_progress(), 0.0);
}

#[test]
fn test_time_updates_are_throttled() {
    let mut fixture = Fixture::new();
    let base = fixture.now + Duration::from_secs(1);

    fixture.record.borrow().emit(EngineNotification::TimeChanged(1_000));
    fixture.shell.pump(base);
    assert_eq!(fixture.shell.state().read().current_time_ms(), 1_000);

    fixture.record.borrow().emit(EngineNotification::TimeChanged(1_100));
    fixture.shell.pump(base + Duration::from_millis(100));
    assert_eq!(fixture.shell.state().read().current_time_ms(), 1_000);

    fixture.record.borrow().emit(EngineNotification::TimeChanged(1_500));
    fixture.shell.pump(base + Duration::from_millis(500));
    assert_eq!(fixture.shell.state().read().current_time_ms(), 1_500);
}

#[test]
fn test_fullscreen_round_trip_restores_presentation() {
    let mut fixture = Fixture::new();
    let before = (
        fixture.shell.video_surface().surface_style(),
        fixture.shell.video_surface().controls_opacity(),
        fixture.shell.application().transport_host(),
        fixture.host.windowed_visible(),
    );
    assert_eq!(before.0, SurfaceStyle::WINDOWED);

    fixture
        .shell
        .with_application(|app, out| app.toggle_fullscreen(out));
    assert!(fixture.shell.state().read().is_fullscreen());
    assert!(fixture.shell.transport().is_fullscreen());
    assert_eq!(
        fixture.shell.video_surface().surface_style(),
        SurfaceStyle::FULL_BLEED
    );
    assert_eq!(
        fixture.shell.application().transport_host(),
        TransportHost::Fullscreen
    );

    fixture
        .shell
        .with_application(|app, out| app.exit_fullscreen(out));
    let after = (
        fixture.shell.video_surface().surface_style(),
        fixture.shell.video_surface().controls_opacity(),
        fixture.shell.application().transport_host(),
        fixture.host.windowed_visible(),
    );
    assert_eq!(before, after);
    assert!(!fixture.shell.state().read().is_fullscreen());
    assert!(!fixture.host.gap_observed());
    assert_eq!(
        fixture.host.events(),
        vec![
            HostEvent::FullscreenAttached,
            HostEvent::WindowedHidden,
            HostEvent::FullscreenCleared,
            HostEvent::WindowedShown,
        ]
    );
    fixture.pump();
}

#[test]
fn test_fullscreen_controls_hide_after_timeout() {
    let fixture = Fixture::new();
    let mut shell = fixture.shell;
    shell.with_transport(|t, out| t.toggle_fullscreen(out));

    let base = fixture.now + Duration::from_secs(10);
    shell.pointer_moved(base);

    shell.tick(base + Duration::from_millis(2_900));
    assert_abs_diff_eq!(
        shell.video_surface().controls_opacity(),
        CONTROLS_OPACITY_VISIBLE
    );

    shell.tick(base + Duration::from_millis(3_000));
    assert_eq!(
        shell.video_surface().controls_visibility(),
        ControlVisibility::Hidden
    );
    assert_abs_diff_eq!(
        shell.video_surface().controls_opacity(),
        CONTROLS_OPACITY_HIDDEN
    );

    shell.pointer_moved(base + Duration::from_millis(3_100));
    assert_abs_diff_eq!(
        shell.video_surface().controls_opacity(),
        CONTROLS_OPACITY_VISIBLE
    );
}

#[test]
fn test_fullscreen_entry_without_pointer_activity_hides_after_timeout() {
    let fixture = Fixture::new();
    let mut shell = fixture.shell;
    let entered = fixture.now + Duration::from_secs(10);
    shell.with_application_at(entered, |app, out| app.toggle_fullscreen(out));

    shell.tick(entered + Duration::from_millis(2_900));
    assert_eq!(
        shell.video_surface().controls_visibility(),
        ControlVisibility::Visible
    );

    shell.tick(entered + Duration::from_millis(3_000));
    assert_eq!(
        shell.video_surface().controls_visibility(),
        ControlVisibility::Hidden
    );
}

#[test]
fn test_pointer_activity_over_controls_restarts_hide_timer() {
    let fixture = Fixture::new();
    let mut shell = fixture.shell;
    shell.with_transport(|t, out| t.toggle_fullscreen(out));

    let base = fixture.now + Duration::from_secs(10);
    shell.pointer_entered_controls(base);
    shell.pointer_entered_controls(base + Duration::from_secs(2));
    shell.tick(base + Duration::from_millis(4_000));
    assert_eq!(
        shell.video_surface().controls_visibility(),
        ControlVisibility::Visible
    );

    shell.pointer_left_controls(base + Duration::from_secs(5));
    shell.tick(base + Duration::from_secs(8));
    assert_eq!(
        shell.video_surface().controls_visibility(),
        ControlVisibility::Hidden
    );
}

#[test]
fn test_failed_fullscreen_attach_keeps_windowed_bar() {
    let fixture = Fixture::new();
    fixture.host.set_fail_attach(true);
    fixture
        .shell
        .with_application(|app, out| app.toggle_fullscreen(out));

    assert_eq!(
        fixture.shell.application().transport_host(),
        TransportHost::Windowed
    );
    assert!(fixture.host.windowed_visible());
    assert!(!fixture.host.gap_observed());
}

#[test]
fn test_media_end_advances_to_next_entry() {
    let mut fixture = Fixture::new();

    fixture.record.borrow().emit(EngineNotification::EndReached);
    fixture.pump();

    assert_eq!(fixture.shell.application().current_index(), Some(1));
    assert_eq!(
        fixture.record.borrow().loaded.as_deref(),
        Some(Path::new("/media/second.mkv"))
    );
    assert_eq!(
        fixture.shell.state().read().window_title(),
        "second - MediaShell"
    );
    assert!(fixture.shell.state().read().is_playing());

    fixture.record.borrow().emit(EngineNotification::EndReached);
    fixture.pump();
    assert_eq!(fixture.shell.application().current_index(), Some(1));
    assert!(!fixture.shell.state().read().is_playing());
}

#[test]
fn test_media_end_without_auto_advance_stays_put() {
    let mut config = Config::default();
    config.playback.auto_advance = Some(false);
    let mut fixture = Fixture::with_config(&config);

    fixture.record.borrow().emit(EngineNotification::EndReached);
    fixture.pump();

    assert_eq!(fixture.shell.application().current_index(), Some(0));
    let state = fixture.shell.state().read();
    assert_eq!(state.current_time_ms(), state.total_duration_ms());
}

#[test]
fn test_stop_resets_time() {
    let mut fixture = Fixture::new();
    fixture.now += Duration::from_secs(1);
    fixture.record.borrow().emit(EngineNotification::TimeChanged(42_000));
    fixture.pump();
    assert_eq!(fixture.shell.state().read().current_time_ms(), 42_000);

    fixture.shell.bus().publish(StopPlayback);
    fixture.pump();

    let state = fixture.shell.state().read();
    assert_eq!(state.current_time_ms(), 0);
    assert!(!state.is_playing());
}

#[test]
fn test_speed_selection_reaches_engine() {
    let fixture = Fixture::new();
    fixture.shell.with_transport(|t, out| t.select_speed(3, out));

    assert_abs_diff_eq!(fixture.record.borrow().rate, 2.0);
    assert_eq!(fixture.shell.state().read().playback_rate().index(), 3);
    assert_eq!(fixture.shell.transport().speed_label(), "2.00x");
}

#[test]
fn test_refused_speed_leaves_label_unchanged() {
    let fixture = Fixture::new();
    fixture.record.borrow_mut().refuse_rate = true;
    fixture.shell.with_transport(|t, out| t.select_speed(3, out));

    assert_eq!(fixture.shell.transport().speed_label(), "1.00x");
    assert_eq!(fixture.shell.state().read().playback_rate().index(), 1);
}

#[test]
fn test_speed_selected_before_start_is_not_shown() {
    let (engine, _record) = ScriptedEngine::new();
    let shell = Shell::new(
        &Config::default(),
        Box::new(engine),
        Box::new(HeadlessHost::new()),
    );
    shell.with_transport(|t, out| t.select_speed(3, out));

    assert_eq!(shell.transport().speed_label(), "1.00x");
    assert_eq!(shell.state().read().playback_rate().index(), 1);
}

#[test]
fn test_selecting_missing_media_keeps_current_playback() {
    let mut fixture = Fixture::new();
    fixture.now += Duration::from_secs(1);
    fixture.record.borrow().emit(EngineNotification::TimeChanged(42_000));
    fixture.pump();
    fixture
        .record
        .borrow_mut()
        .missing
        .push(PathBuf::from("/media/second.mkv"));
    let before = fixture.shell.state().snapshot();
    let toggles = fixture.record.borrow().toggles;

    assert!(fixture.shell.with_application(|app, out| app.next(out)));
    fixture.now += Duration::from_secs(1);
    fixture.record.borrow().emit(EngineNotification::TimeChanged(43_000));
    fixture.pump();

    let state = fixture.shell.state().read();
    assert_eq!(state.media_path(), before.media_path());
    assert_eq!(state.window_title(), before.window_title());
    assert_eq!(state.total_duration_ms(), MEDIA_LENGTH_MS);
    assert_eq!(state.current_time_ms(), 43_000);
    assert!(state.is_playing());
    assert_eq!(fixture.shell.application().current_index(), Some(0));
    assert_eq!(fixture.record.borrow().toggles, toggles);
    assert_eq!(
        fixture.record.borrow().loaded.as_deref(),
        Some(Path::new("/media/first.mkv"))
    );
}

#[test]
fn test_late_engine_callbacks_after_shutdown_are_dropped() {
    let mut fixture = Fixture::new();
    let before = fixture.shell.state().snapshot();

    fixture.shell.shutdown();
    assert!(fixture.record.borrow().shut_down);
    assert_eq!(fixture.shell.bus().subscriber_count(MessageKind::SeekTo), 0);

    fixture.record.borrow().emit(EngineNotification::TimeChanged(90_000));
    fixture.record.borrow().emit(EngineNotification::Paused);
    assert_eq!(fixture.pump(), 0);
    assert_eq!(fixture.shell.state().snapshot(), before);

    fixture.shell.shutdown();
}

#[test]
fn test_startup_settings_come_from_config_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut saved = Config::default();
    saved.playback.volume = Some(25);
    saved.playback.rate_index = Some(2);
    config::save_to_path(&saved, &path).expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config");
    let (engine, record) = ScriptedEngine::new();
    let mut shell = Shell::new(&loaded, Box::new(engine), Box::new(HeadlessHost::new()));
    shell.start();

    assert_eq!(shell.state().read().volume().value(), 25);
    assert_eq!(shell.transport().selected_speed().index(), 2);
    assert_eq!(record.borrow().output_volume, Some(Volume::new(25)));
    assert_abs_diff_eq!(record.borrow().rate, 1.5);
}
