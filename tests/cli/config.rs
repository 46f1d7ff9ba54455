use crate::sirius;
use predicates::prelude::*;

#[test]
fn config_set_creates_file() {
    let home = tempfile::tempdir().unwrap();

    sirius(home.path())
        .args(["config", "set", "api_endpoint", "http://sirius.local:9000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Set api_endpoint for profile \"default\""));

    let written = std::fs::read_to_string(home.path().join(".config/sirius.yaml")).unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(&written).unwrap();
    assert_eq!(
        parsed["profiles"]["default"]["api_endpoint"].as_str(),
        Some("http://sirius.local:9000")
    );

    let out = sirius(home.path())
        .args(["-O", "json", "config", "get"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let profile: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(profile["name"], "default");
    assert_eq!(profile["api_endpoint"], "http://sirius.local:9000/");
}

#[test]
fn config_set_keeps_comments_and_profiles() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("sirius.yaml"),
        "\
# lab machines
profiles:
  default:
    api_endpoint: http://localhost:8080
  remote:
    # shared instance
    api_endpoint: http://10.0.0.2:8080
",
    )
    .unwrap();

    sirius(home.path())
        .args(["-P", "remote", "config", "set", "api_key", "abc"])
        .assert()
        .success();

    let written = std::fs::read_to_string(config_dir.join("sirius.yaml")).unwrap();
    assert!(written.contains("# lab machines"));
    assert!(written.contains("# shared instance"));
    assert!(written.contains("api_key: abc"));

    sirius(home.path())
        .args(["config", "get", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile \"default\""))
        .stdout(predicate::str::contains("Profile \"remote\""))
        .stdout(predicate::str::contains("*********"))
        .stdout(predicate::str::contains("abc").not());
}

#[test]
fn config_set_new_profile() {
    let home = tempfile::tempdir().unwrap();

    sirius(home.path())
        .args(["-P", "staging", "config", "set", "api_endpoint", "http://staging:8080"])
        .assert()
        .success();

    sirius(home.path())
        .args(["-P", "staging", "config", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://staging:8080"));
}

#[test]
fn config_set_rejects_bad_endpoint() {
    let home = tempfile::tempdir().unwrap();

    sirius(home.path())
        .args(["config", "set", "api_endpoint", "not a uri"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid endpoint"));

    assert!(!home.path().join(".config/sirius.yaml").exists());
}
