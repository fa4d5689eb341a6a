use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_times-table"))
        .args(["--virtual-time", "--seed", "7"])
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch times-table")
}

#[test]
fn scripted_session_prints_banner_and_summary() {
    let output = run(&["--script", "pause left*2 idle escape"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Welcome to Times Table."));
    let summary = lines.last().expect("summary line");
    assert!(summary.starts_with("frames: 5, rounds: 1"), "{summary}");
    assert!(summary.contains("state: Quit"), "{summary}");
}

#[test]
fn show_frames_prints_a_board_per_frame() {
    let output = run(&["--script", "idle*2", "--show-frames"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("[quit: ").count(), 3);
    assert!(stdout.contains("frame 1\n"));
    assert!(stdout.contains("state: Paused"));
}

#[test]
fn invalid_script_fails_with_context() {
    let output = run(&["--script", "jump"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid --script"), "{stderr}");
    assert!(stderr.contains("unknown script step `jump`"), "{stderr}");
}
