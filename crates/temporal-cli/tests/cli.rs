use assert_cmd::Command;
use predicates::prelude::*;

fn temporal() -> Command {
    let mut cmd = Command::cargo_bin("temporal").unwrap();
    cmd.env_remove("TEMPORAL_TZ").env_remove("TEMPORAL_LOG");
    cmd
}

#[test]
fn test_parse_prints_canonical_form() {
    temporal()
        .args(["parse", "duration", "p1y2m3dt4h5m6s"])
        .assert()
        .success()
        .stdout("P1Y2M3DT4H5M6S\n");

    temporal()
        .args(["parse", "date-time", "2024-02-29 13:05:00,250"])
        .assert()
        .success()
        .stdout("2024-02-29T13:05:00.25\n");
}

#[test]
fn test_parse_error_exits_one() {
    temporal()
        .args(["parse", "date", "2023-02-29"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("RangeError:"));

    temporal()
        .args(["parse", "instant", "2024-01-01T00:00"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("TypeError:"));
}

#[test]
fn test_usage_error_exits_two() {
    temporal().args(["parse", "weekday", "x"]).assert().code(2);
    temporal().assert().code(2);
}

#[test]
fn test_arithmetic() {
    temporal()
        .args(["add", "date", "2024-01-31", "P1M"])
        .assert()
        .success()
        .stdout("2024-02-29\n");

    temporal()
        .args(["subtract", "time", "00:15", "PT45M"])
        .assert()
        .success()
        .stdout("23:30:00\n");

    temporal()
        .args(["add", "instant", "2024-01-01T00:00Z", "P1Y"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("RangeError"));
}

#[test]
fn test_until_since_with_largest_unit() {
    temporal()
        .args(["until", "date", "2024-01-01", "2024-03-15"])
        .assert()
        .success()
        .stdout("P2M14D\n");

    temporal()
        .args(["until", "date", "2024-01-01", "2024-03-15", "--largest-unit", "days"])
        .assert()
        .success()
        .stdout("P74D\n");

    temporal()
        .args(["since", "year-month", "2024-01", "2022-11"])
        .assert()
        .success()
        .stdout("P1Y2M\n");
}

#[test]
fn test_duration_has_no_difference() {
    temporal()
        .args(["until", "duration", "PT1H", "PT3H"])
        .assert()
        .code(2)
        .stdout("");

    temporal()
        .args(["since", "duration", "PT1H", "PT3H", "--largest-unit", "minutes"])
        .assert()
        .code(2)
        .stdout("");
}

#[test]
fn test_compare() {
    temporal()
        .args(["compare", "date", "2024-12-31", "2025-01-01"])
        .assert()
        .success()
        .stdout("-1\n");

    temporal()
        .args(["compare", "duration", "P1Y", "P400D"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("TypeError:"));
}

#[test]
fn test_json_outcome() {
    let output = temporal()
        .args(["--json", "parse", "month-day", "--", "--02-29"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["value"], "02-29");
    assert_eq!(json["error_kind"], "None");

    let output = temporal()
        .args(["--json", "parse", "time", "25:00"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["value"].is_null());
    assert_eq!(json["error_kind"], "RangeError");
}

#[test]
fn test_fields() {
    let output = temporal()
        .args(["fields", "date", "2024-12-31"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["week_of_year"], 1);
    assert_eq!(json["year_of_week"], 2025);

    temporal()
        .args(["fields", "duration", "P1Y-2M"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("TypeError:"));
}

#[test]
fn test_now_respects_zone() {
    temporal()
        .args(["now", "date", "--zone", "+05:30"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{4}-\d{2}-\d{2}\n$").unwrap());

    temporal()
        .args(["now", "time"])
        .env("TEMPORAL_TZ", "Not/AZone")
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("RangeError:"));

    temporal()
        .arg("now")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Z\n"));
}
