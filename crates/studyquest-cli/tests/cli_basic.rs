//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory and inspects the JSON written to stdout.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde_json::Value;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_studyquest"))
        .env("STUDYQUEST_DATA_DIR", dir)
        .env_remove("STUDYQUEST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Commands may print several pretty JSON documents in a row.
fn json_docs(stdout: &str) -> Vec<Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .expect("stdout is not a JSON stream")
}

fn last_doc(stdout: &str) -> Value {
    json_docs(stdout).pop().expect("no JSON output")
}

#[test]
fn test_timer_status_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snap = last_doc(&stdout);
    assert_eq!(snap["type"], "timer_snapshot");
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["remaining_secs"], 1500);
}

#[test]
fn test_timer_start_opens_session() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "start", "--subject", "math"]);
    assert_eq!(code, 0);
    let types: Vec<_> = json_docs(&stdout)
        .iter()
        .map(|d| d["type"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(types, ["session_started", "timer_started"]);

    let (_, stdout, _) = run_cli(dir.path(), &["session", "status"]);
    assert_eq!(last_doc(&stdout)["current"]["subject_id"], "math");
}

#[test]
fn test_timer_tick_persists_between_invocations() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["timer", "start", "--minutes", "1"]);
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "tick", "--count", "20"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["remaining_secs"], 40);

    let (_, stdout, _) = run_cli(dir.path(), &["timer", "tick", "--count", "40"]);
    let docs = json_docs(&stdout);
    let completed = docs
        .iter()
        .find(|d| d["type"] == "phase_completed")
        .expect("phase did not complete");
    assert_eq!(completed["to"], "break");
    let snap = docs.last().unwrap();
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["remaining_secs"], 300);
}

#[test]
fn test_timer_pause_while_idle_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "pause"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["type"], "timer_snapshot");
}

#[test]
fn test_timer_start_zero_minutes_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["timer", "start", "--minutes", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, stdout, _) = run_cli(dir.path(), &["session", "status"]);
    assert!(last_doc(&stdout)["current"].is_null());
}

#[test]
fn test_timer_stop_rewards_and_archives() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "rewards.min_xp", "30"]);
    run_cli(dir.path(), &["config", "set", "rewards.max_xp", "30"]);
    run_cli(dir.path(), &["timer", "start", "--subject", "math"]);

    let (code, stdout, _) = run_cli(dir.path(), &["timer", "stop"]);
    assert_eq!(code, 0);
    let docs = json_docs(&stdout);
    let awarded = docs.iter().find(|d| d["type"] == "xp_awarded").unwrap();
    assert_eq!(awarded["amount"], 30);

    let (_, stdout, _) = run_cli(dir.path(), &["session", "history", "--archive"]);
    let archived = last_doc(&stdout);
    assert_eq!(archived.as_array().unwrap().len(), 1);
    assert_eq!(archived[0]["xp_earned"], 30);

    let (_, stdout, _) = run_cli(dir.path(), &["xp", "status"]);
    let summary = last_doc(&stdout);
    assert_eq!(summary["today_xp"], 30);
    assert_eq!(summary["study_streak"], 1);
}

#[test]
fn test_session_double_start_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["session", "start", "math"]);
    assert_eq!(code, 0);
    let (code, _, stderr) = run_cli(dir.path(), &["session", "start", "physics"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_session_counters_require_open_session() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["session", "lesson"]);
    assert_eq!(code, 1);

    run_cli(dir.path(), &["session", "start", "math"]);
    run_cli(dir.path(), &["session", "lesson"]);
    let (code, stdout, _) = run_cli(dir.path(), &["session", "add-xp", "15"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["xp_earned"], 15);

    let (code, stdout, _) = run_cli(dir.path(), &["session", "end"]);
    assert_eq!(code, 0);
    let ended = last_doc(&stdout);
    assert_eq!(ended["type"], "session_ended");
    assert_eq!(ended["lessons_completed"], 1);
    assert_eq!(ended["xp_earned"], 15);
}

#[test]
fn test_quest_list_and_claim() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["quest", "list", "--kind", "weekly"]);
    assert_eq!(code, 0);
    let quests = last_doc(&stdout);
    let ids: Vec<_> = quests
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["quiz-master", "math-wizard"]);
    assert!(quests.as_array().unwrap().iter().all(|q| q["kind"] == "weekly"));

    let (code, _, _) = run_cli(dir.path(), &["quest", "claim", "quiz-master"]);
    assert_eq!(code, 1);

    let (_, stdout, _) = run_cli(dir.path(), &["quest", "progress", "quiz-master", "9"]);
    let progressed = last_doc(&stdout);
    assert_eq!(progressed["type"], "quest_completed");
    assert_eq!(progressed["progress"], 5);
    assert_eq!(progressed["max_progress"], 5);
    assert_eq!(progressed["status"], "completed");

    let (code, stdout, _) = run_cli(dir.path(), &["quest", "claim", "quiz-master"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["today_xp"], 100);

    let (code, _, _) = run_cli(dir.path(), &["quest", "claim", "quiz-master"]);
    assert_eq!(code, 1);
}

#[test]
fn test_quest_negative_progress_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["quest", "progress", "daily-streak", "-3"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["progress"], 0);
}

#[test]
fn test_quest_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["quest", "complete", "no-such-quest"]);
    assert_eq!(code, 1);
}

#[test]
fn test_achievement_unlock_once() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["achievement", "unlock", "first-steps"]);
    assert_eq!(last_doc(&stdout)["type"], "achievement_unlocked");

    let (code, stdout, _) = run_cli(dir.path(), &["achievement", "unlock", "first-steps"]);
    assert_eq!(code, 0);
    let view = last_doc(&stdout);
    assert!(view.get("type").is_none());
    assert_eq!(view["is_unlocked"], true);
}

#[test]
fn test_achievement_list_reports_unlock_flag() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["achievement", "unlock", "week-warrior"]);
    let (code, stdout, _) = run_cli(dir.path(), &["achievement", "list"]);
    assert_eq!(code, 0);
    let list = last_doc(&stdout);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 3);
    for a in list {
        let unlocked = a["id"] == "week-warrior";
        assert_eq!(a["is_unlocked"], unlocked, "{}", a["id"]);
        assert_eq!(a["unlocked_at"].is_null(), !unlocked);
    }
}

#[test]
fn test_xp_add_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["xp", "add", "-5"]);
    assert_eq!(code, 1);

    run_cli(dir.path(), &["xp", "add", "120"]);
    let (_, stdout, _) = run_cli(dir.path(), &["xp", "reset", "daily"]);
    let summary = last_doc(&stdout);
    assert_eq!(summary["today_xp"], 0);
    assert_eq!(summary["weekly_xp"], 120);
    assert_eq!(summary["total_xp"], 120);
    assert_eq!(summary["level"], 2);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "study.pomodoro_length"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "study.pomodoro_length", "50"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "study.pomodoro_length"]);
    assert_eq!(stdout.trim(), "50");

    let (_, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(last_doc(&stdout)["remaining_secs"], 3000);
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "study.pomodoro_length", "0"]);
    assert_eq!(code, 1);
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "no.such.key", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_stats_all_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["stats", "all"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["total_sessions"], 0);
}

#[test]
fn test_reward_policy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "rewards.policy", "fixed"]);
    assert_eq!(code, 0);
    assert_eq!(last_doc(&stdout)["value"], "fixed");
    run_cli(dir.path(), &["config", "set", "rewards.max_xp", "60"]);
    run_cli(dir.path(), &["session", "start", "math"]);

    let (_, stdout, _) = run_cli(dir.path(), &["timer", "stop"]);
    let docs = json_docs(&stdout);
    let awarded = docs.iter().find(|d| d["type"] == "xp_awarded").unwrap();
    assert_eq!(awarded["amount"], 60);

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "rewards.policy", "jackpot"]);
    assert_eq!(code, 1);
}

#[cfg(unix)]
#[test]
fn test_timer_run_interrupt_pauses_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["timer", "start", "--minutes", "1"]);

    let mut child = Command::new(env!("CARGO_BIN_EXE_studyquest"))
        .env("STUDYQUEST_DATA_DIR", dir.path())
        .args(["timer", "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn timer run");
    std::thread::sleep(Duration::from_millis(2500));
    let killed = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("Failed to send SIGINT");
    assert!(killed.success());
    let status = child.wait().unwrap();
    assert!(status.success(), "timer run exited with {status}");

    let (_, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    let snap = last_doc(&stdout);
    assert_eq!(snap["state"], "paused");
    let remaining = snap["remaining_secs"].as_u64().unwrap();
    assert!(remaining < 60 && remaining > 0, "remaining {remaining}");
}
