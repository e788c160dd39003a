use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FRIDAY_EVENING: &str = "2026-01-30T19:00:00";

/// `datables` pinned to a fixed clock and run inside `dir`, so no stray config is picked up.
fn datables(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("datables").expect("binary built");
    cmd.current_dir(dir)
        .env_remove("DATABLES_LOCATION")
        .env_remove("RUST_LOG")
        .args(["--now", FRIDAY_EVENING]);
    cmd
}

fn workdir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[test]
fn lists_both_demo_locations() {
    let dir = workdir();
    datables(dir.path())
        .arg("locations")
        .assert()
        .success()
        .stdout(predicate::str::contains("* tustin"))
        .stdout(predicate::str::contains("Santa Ana"));
}

#[test]
fn recommends_the_booth_first() {
    let dir = workdir();
    datables(dir.path())
        .args(["recommend", "1", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Table 6"));
}

#[test]
fn analytics_json_is_clean_on_stdout() {
    let dir = workdir();
    let output = datables(dir.path())
        .args(["--verbose", "analytics", "--json"])
        .output()
        .expect("ran");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(report["today"]["totalReservations"], 4);
    assert_eq!(report["today"]["waitlistDepth"], 3);
}

#[test]
fn compare_writes_a_csv_into_a_directory() {
    let dir = workdir();
    datables(dir.path())
        .args(["compare", "--days", "7", "--output", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = dir
        .path()
        .join("analytics-comparison-2026-01-24-to-2026-01-30.csv");
    let csv = fs::read_to_string(written).expect("report written");
    assert!(csv.starts_with("Cross-Location Comparison Report"));
    assert!(csv.contains("Santa Ana,"));
    assert!(csv.contains("Tustin,"));
}

#[test]
fn compare_rejects_unknown_formats() {
    let dir = workdir();
    datables(dir.path())
        .args(["compare", "--format", "pdf"])
        .assert()
        .failure();
}

#[test]
fn notifies_the_first_party_in_line() {
    let dir = workdir();
    datables(dir.path())
        .args(["notify", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("delivered"))
        .stdout(predicate::str::contains("Hi Emily Wilson! Your table for 3 is ready"));
}

#[test]
fn searches_guests_by_name() {
    let dir = workdir();
    datables(dir.path())
        .args(["guests", "garcia"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria Garcia"))
        .stdout(predicate::str::contains("John Smith").not());
}

#[test]
fn bookings_persist_to_the_configured_snapshot() {
    let dir = workdir();
    with_snapshot(dir.path());

    datables(dir.path())
        .args([
            "book",
            "--name",
            "Lisa Park",
            "--phone",
            "+17145552222",
            "--party",
            "5",
            "--at",
            "2026-01-30T20:15:00",
            "--preference",
            "patio",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Booked Lisa Park for 5"));

    let snapshot = fs::read_to_string(dir.path().join("floor.json")).expect("snapshot saved");
    assert!(snapshot.contains("Lisa Park"));

    // The next run reads the snapshot instead of the demo data.
    datables(dir.path())
        .args(["analytics", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalReservations\": 5"));
}

#[test]
fn invalid_bookings_are_refused() {
    let dir = workdir();
    datables(dir.path())
        .args(["book", "--name", "", "--phone", "123", "--party", "2"])
        .assert()
        .failure();
}

#[test]
fn unknown_location_fails() {
    let dir = workdir();
    datables(dir.path())
        .args(["--location", "costa-mesa", "analytics"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("costa-mesa"));
}

#[test]
fn oversized_comparison_ranges_are_refused() {
    let dir = workdir();
    datables(dir.path())
        .args(["compare", "--days", "200000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 3660"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn rust_log_sets_the_level_without_verbose() {
    let dir = workdir();
    datables(dir.path())
        .env("RUST_LOG", "debug")
        .arg("locations")
        .assert()
        .success()
        .stderr(predicate::str::contains("using demo data"));

    datables(dir.path())
        .arg("locations")
        .assert()
        .success()
        .stderr(predicate::str::contains("using demo data").not());
}

fn with_snapshot(dir: &Path) {
    fs::write(dir.join("datables.toml"), "snapshot = \"floor.json\"\n").expect("config written");
}

#[test]
fn status_changes_are_kept_between_runs() {
    let dir = workdir();
    with_snapshot(dir.path());

    datables(dir.path())
        .args(["status", "2", "no-show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reservation 2 (Sarah Jones) is now no-show"));

    datables(dir.path())
        .args(["status", "2", "cancel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be cancelled"));
}

#[test]
fn blocked_tables_drop_out_of_recommendations() {
    let dir = workdir();
    with_snapshot(dir.path());

    datables(dir.path())
        .args(["table", "6", "block"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Table 6 is now blocked"));

    datables(dir.path())
        .args(["recommend", "1", "--limit", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Table 6 ").not());

    datables(dir.path())
        .args(["table", "6", "unblock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Table 6 is now available"));
}

#[test]
fn walk_ins_join_and_leave_the_waitlist() {
    let dir = workdir();
    with_snapshot(dir.path());

    datables(dir.path())
        .args(["join", "--name", "Kim Tran", "--phone", "+17145550001", "--party", "2", "--quote", "20"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Added Kim Tran (party of 2) to the waitlist, quoted 20 min",
        ));
    let snapshot = fs::read_to_string(dir.path().join("floor.json")).expect("snapshot saved");
    assert!(snapshot.contains("Kim Tran"));

    datables(dir.path())
        .args(["waitlist", "2", "expire"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Waitlist entry 2 (Robert Brown) is now expired"));

    datables(dir.path())
        .args(["join", "--name", "Kim Tran", "--phone", "+17145550001", "--party", "0"])
        .assert()
        .failure();
}

#[test]
fn guest_tags_are_added_and_removed() {
    let dir = workdir();
    datables(dir.path())
        .args(["tag", "5", "VIP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emily Chen: [Regular, VIP]"));

    datables(dir.path())
        .args(["tag", "5", "Regular", "--remove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emily Chen: []"));
}
