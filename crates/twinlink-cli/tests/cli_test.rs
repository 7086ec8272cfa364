//! CLI tests for the twinlink command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;

fn twinlink() -> Command {
    Command::cargo_bin("twinlink").unwrap()
}

/// Test that the CLI binary exists and shows help.
#[test]
fn test_cli_help() {
    twinlink()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("enforce"))
        .stdout(predicate::str::contains("functions"));
}

/// Test that the CLI shows version information.
#[test]
fn test_cli_version() {
    twinlink()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("twinlink"));
}

#[test]
fn test_no_subcommand_shows_error() {
    twinlink().assert().failure();
}

#[test]
fn test_resolve_template() {
    twinlink()
        .args([
            "resolve",
            "{{ thing:namespace }}/{{ header:device_id | fn:upper() }}",
            "--thing-id",
            "org.acme:lamp-1",
            "--header",
            "device_id=lamp-1",
        ])
        .assert()
        .success()
        .stdout("org.acme/LAMP-1\n");
}

#[test]
fn test_resolve_topic() {
    twinlink()
        .args([
            "resolve",
            "{{ topic:entityName }}:{{ topic:action }}",
            "--topic",
            "org.acme/lamp-1/things/twin/commands/modify",
        ])
        .assert()
        .success()
        .stdout("lamp-1:modify\n");
}

#[test]
fn test_resolve_unresolved_fails_unless_allowed() {
    twinlink()
        .args(["resolve", "{{ thing:id }}/{{ header:missing }}", "--thing-id", "ns:foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("header:missing"));

    twinlink()
        .args([
            "resolve",
            "{{ thing:id }}/{{ header:missing }}",
            "--thing-id",
            "ns:foo",
            "--allow-unresolved",
        ])
        .assert()
        .success()
        .stdout("ns:foo/{{ header:missing }}\n");
}

#[test]
fn test_resolve_chain_bound() {
    twinlink()
        .args([
            "resolve",
            "{{ thing:name | fn:upper() | fn:lower() }}",
            "--thing-id",
            "ns:foo",
            "--max-chained-functions",
            "1",
            "--json",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("placeholder:placeholder.function.toocomplex"));
}

#[test]
fn test_zero_chain_bound_is_rejected() {
    twinlink()
        .args(["resolve", "x", "--max-chained-functions", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-chained-functions"));
}

#[test]
fn test_chain_bound_applies_to_validate_and_enforce() {
    twinlink()
        .args([
            "validate",
            "{{ thing:id | fn:upper() | fn:lower() }}",
            "--max-chained-functions",
            "1",
            "--json",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("placeholder:placeholder.function.toocomplex"));

    twinlink()
        .args([
            "enforce",
            "--input",
            "{{ header:device_id | fn:upper() | fn:lower() }}",
            "--filter",
            "{{ thing:name }}",
            "--thing-id",
            "ns:foo",
            "-H",
            "device_id=foo",
            "--max-chained-functions",
            "1",
            "--json",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("placeholder:placeholder.function.toocomplex"));
}

#[test]
fn test_enforce_input_with_substring() {
    twinlink()
        .args([
            "enforce",
            "--input",
            "{{ header:device_id | fn:substring-after(':') }}",
            "--filter",
            "{{ thing:name }}",
            "--thing-id",
            "ns:foo",
            "-H",
            "device_id=ns:foo",
        ])
        .assert()
        .success()
        .stdout("match: foo\n");
}

#[test]
fn test_validate_contexts() {
    twinlink()
        .args(["validate", "{{ thing:id }}/{{ header:reply-to }}"])
        .assert()
        .success()
        .stdout("valid\n");

    twinlink()
        .args(["validate", "{{ connection:id }}", "--context", "policy"])
        .assert()
        .failure();
}

#[test]
fn test_validate_and_replace() {
    twinlink()
        .args(["validate", "{{ thing:id }}/cmd", "--placeholders", "thing", "--replace", "X"])
        .assert()
        .success()
        .stdout("X/cmd\n");
}

#[test]
fn test_validate_unknown_function_as_json() {
    twinlink()
        .args(["validate", "{{ thing:id | fn:nope() }}", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("placeholder:placeholder.function.unknown"))
        .stdout(predicate::str::contains("\"status\": 400"));
}

#[test]
fn test_enforce_match_and_mismatch() {
    twinlink()
        .args([
            "enforce",
            "--input",
            "{{ header:device_id }}",
            "--filter",
            "{{ thing:name }}",
            "--thing-id",
            "ns:foo",
            "-H",
            "device_id=foo",
        ])
        .assert()
        .success()
        .stdout("match: foo\n");

    twinlink()
        .args([
            "enforce",
            "--input",
            "{{ header:device_id }}",
            "--filter",
            "{{ thing:name }}",
            "--thing-id",
            "ns:foo",
            "-H",
            "device_id=bar",
            "-H",
            "correlation-id=c-9",
            "--json",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": 403"))
        .stdout(predicate::str::contains("c-9"));
}

#[test]
fn test_functions_lists_catalog() {
    twinlink()
        .arg("functions")
        .assert()
        .success()
        .stdout(predicate::str::contains("fn:substring-after(givenString: String)"))
        .stdout(predicate::str::contains("fn:default(defaultValue: String)"))
        .stdout(predicate::str::contains("fn:upper()"));
}

#[test]
fn test_invalid_header_argument() {
    twinlink()
        .args(["resolve", "x", "-H", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}
