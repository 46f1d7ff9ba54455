use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

fn projects() -> Route {
    Route::json(
        "GET",
        "/api/projects",
        json!([
            {"projectId": "alpha", "location": "/data/alpha.sirius", "type": "ALIGNED_RUNS"},
            {"projectId": "beta", "location": "/data/beta.sirius"},
        ]),
    )
}

#[test]
fn project_ls() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![projects()]);

    sirius_at(home.path(), &server)
        .args(["project", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"ID\s+TYPE\s+LOCATION").unwrap())
        .stdout(predicate::str::is_match(r"alpha\s+ALIGNED_RUNS\s+/data/alpha.sirius").unwrap())
        .stdout(predicate::str::contains("beta"));
}

#[test]
fn project_ls_json() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![projects()]);

    let out = sirius_at(home.path(), &server)
        .args(["-O", "json", "project", "ls"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let projects: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(projects[0]["projectId"], "alpha");
    assert_eq!(projects[1]["location"], "/data/beta.sirius");
}

#[test]
fn project_create() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "POST",
        "/api/projects/gamma",
        json!({"projectId": "gamma", "location": "/tmp/gamma.sirius"}),
    )]);

    sirius_at(home.path(), &server)
        .args(["project", "create", "gamma", "--path", "/tmp/gamma.sirius"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created project \"gamma\" at /tmp/gamma.sirius"));

    let reqs = server.requests();
    assert_eq!(reqs[0].method, "POST");
    assert_eq!(reqs[0].query(), "pathToProject=%2Ftmp%2Fgamma.sirius");
}

#[test]
fn project_close_if_exists() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![]);

    sirius_at(home.path(), &server)
        .args(["project", "close", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404 Not Found"));

    sirius_at(home.path(), &server)
        .args(["project", "close", "missing", "--if-exists"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Project \"missing\" is not open"));
}
