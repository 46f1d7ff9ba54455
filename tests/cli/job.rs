use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

fn job(state: &str, error: Option<&str>) -> serde_json::Value {
    json!({
        "id": "7",
        "command": "formulas",
        "progress": {
            "indeterminate": false,
            "state": state,
            "currentProgress": 10,
            "maxProgress": 10,
            "errorMessage": error,
        },
    })
}

#[test]
fn job_ls() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/jobs/page",
        json!({
            "content": [job("DONE", None)],
            "page": {"size": 100, "number": 0, "totalElements": 1, "totalPages": 1},
        }),
    )]);

    sirius_at(home.path(), &server)
        .args(["job", "ls", "-p", "p"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"7\s+DONE\s+10/10 \(100%\)\s+formulas").unwrap());

    let reqs = server.requests();
    assert_eq!(
        reqs[0].query(),
        "optFields=command&optFields=progress&page=0&size=100"
    );
}

#[test]
fn job_wait_done() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/jobs/7",
        job("DONE", None),
    )]);

    let out = sirius_at(home.path(), &server)
        .args(["-O", "json", "job", "wait", "-p", "p", "7", "--interval", "10ms"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let job: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(job["progress"]["state"], "DONE");
}

#[test]
fn job_wait_failed() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/jobs/7",
        job("FAILED", Some("out of memory")),
    )]);

    sirius_at(home.path(), &server)
        .args(["job", "wait", "-p", "p", "7", "--interval", "10ms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("job 7 ended in state FAILED: out of memory"));
}

#[test]
fn job_wait_timeout() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/jobs/7",
        job("RUNNING", None),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "job", "wait", "-p", "p", "7", "--interval", "10ms", "--timeout", "50ms",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timed out waiting for job 7"));

    assert!(server.requests().len() > 1);
}

#[test]
fn job_rm() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::empty("DELETE", "/api/projects/p/jobs/7")]);

    sirius_at(home.path(), &server)
        .args(["job", "rm", "-p", "p", "7", "--no-cancel"])
        .assert()
        .success();

    let reqs = server.requests();
    assert_eq!(reqs[0].query(), "cancelIfRunning=false&awaitDeletion=true");
}

#[test]
fn job_wait_without_progress() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/jobs/7",
        json!({"id": "7", "command": "formulas"}),
    )]);

    sirius_at(home.path(), &server)
        .args(["job", "wait", "-p", "p", "7", "--interval", "10ms"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("job 7 has no progress information"));

    assert_eq!(server.requests().len(), 1);
}
