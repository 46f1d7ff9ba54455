use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn run_tag_parses_values() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "PUT",
        "/api/projects/p/runs/tags/3",
        json!([
            {"tagName": "sample_type", "value": "blank"},
            {"tagName": "dilution", "value": 0.5},
        ]),
    )]);

    sirius_at(home.path(), &server)
        .args(["run", "tag", "-p", "p", "3", "sample_type=blank", "dilution=0.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Tagged run \"3\" with 2 tag(s)"));

    let reqs = server.requests();
    let body: serde_json::Value = serde_json::from_str(&reqs[0].body).unwrap();
    assert_eq!(
        body,
        json!([
            {"tagName": "sample_type", "value": "blank"},
            {"tagName": "dilution", "value": 0.5},
        ])
    );
}

#[test]
fn run_ls_by_group() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/runs/grouped",
        json!({
            "content": [{
                "runId": "1",
                "name": "blank_01",
                "chromatography": "LC",
                "tags": {"sample_type": {"tagName": "sample_type", "value": "blank"}},
            }],
            "page": {"size": 100, "number": 0, "totalElements": 1, "totalPages": 1},
        }),
    )]);

    sirius_at(home.path(), &server)
        .args(["run", "ls", "-p", "p", "--group", "blanks"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"1\s+blank_01\s+LC\s+sample_type=blank").unwrap());

    let reqs = server.requests();
    assert!(reqs[0].query().starts_with("group=blanks&optFields=tags&page=0"));
}

#[test]
fn run_ls_filter_conflicts_with_group() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![]);

    sirius_at(home.path(), &server)
        .args(["run", "ls", "-p", "p", "--group", "a", "--filter", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));

    assert!(server.requests().is_empty());
}
