mod common;

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use common::{Host, buttons, neutral, stick, with_buttons};
use inputlab::console::ConsoleLog;
use inputlab::display;
use inputlab::pad::button;
use inputlab::player::state;
use inputlab::{SessionTrace, TraceError};

fn unique_temp_json_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("inputlab_{name}_{nanos}.json"))
}

fn recorded_session() -> Host {
    let mut host = Host::fox(state::FALL);
    host.player.airborne = true;

    host.hold(neutral());
    host.player.airborne = false;
    host.enter_state(state::CLIFF_CATCH, false);
    host.finish(Some(state::CLIFF_CATCH));

    host.player.action_state = state::CLIFF_WAIT;
    host.frame(neutral(), None);

    host.hold(stick(0, -80));
    host.player.airborne = true;
    host.finish(Some(state::FALL));

    host.frame(with_buttons(stick(40, 0), button::X), Some(state::JUMP_AERIAL_F));
    host.player.airborne = false;
    host.frame(neutral(), Some(state::WAIT));
    host.frame(buttons(button::Y), Some(state::KNEE_BEND));
    host
}

#[test]
fn saved_trace_replays_to_the_same_history() {
    let host = recorded_session();
    let path = unique_temp_json_path("replay");
    host.trace.save(&path).expect("save trace");

    let loaded = SessionTrace::load(&path).expect("load trace");
    assert_eq!(loaded, host.trace);

    let mut tracker = loaded.tracker();
    let mut console = ConsoleLog::new();
    let summary = loaded.replay(&mut tracker, &mut console);
    assert_eq!(summary.frames, host.trace.frames.len());
    assert_eq!(summary.detected + 1, host.tracker.history().len());

    let live = display::render_text(&host.tracker.display_rows());
    let replayed = display::render_text(&tracker.display_rows());
    assert_eq!(replayed, live);

    // X for the double jump, then Y for the jump.
    let presses: Vec<&str> = console.lines().collect();
    assert_eq!(presses, vec!["      X 3.0f", "      Y 2.0f"]);

    let _ = fs::remove_file(path);
}

#[test]
fn load_reports_missing_and_malformed_files() {
    let missing = unique_temp_json_path("missing");
    assert!(matches!(SessionTrace::load(&missing), Err(TraceError::Io { .. })));

    let malformed = unique_temp_json_path("malformed");
    fs::write(&malformed, "{\"frames\": 3}").expect("write malformed trace");
    assert!(matches!(SessionTrace::load(&malformed), Err(TraceError::Json(_))));
    let _ = fs::remove_file(malformed);
}

#[test]
fn load_rejects_out_of_range_ports() {
    let mut host = Host::fox(state::WAIT);
    host.frame(neutral(), None);
    host.trace.frames[0].polls[0].port = 7;

    let path = unique_temp_json_path("bad_port");
    host.trace.save(&path).expect("save trace");
    assert!(matches!(
        SessionTrace::load(&path),
        Err(TraceError::InvalidPort { frame: 0, port: 7 })
    ));
    let _ = fs::remove_file(path);
}
