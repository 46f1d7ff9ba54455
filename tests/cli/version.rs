use crate::sirius;
use predicates::prelude::*;

#[test]
fn cli_version() {
    let home = tempfile::tempdir().unwrap();

    sirius(home.path())
        .args(["version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "sirius-client ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn version_needs_no_config() {
    let home = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(home.path().join(".config")).unwrap();
    std::fs::write(home.path().join(".config/sirius.yaml"), "not: [valid").unwrap();

    sirius(home.path()).args(["version"]).assert().success();
}
