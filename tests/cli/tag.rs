use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn tag_create_parses_possible_values() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "PUT",
        "/api/projects/p/tags",
        json!([{
            "tagName": "sample_type",
            "valueType": "TEXT",
            "possibleValues": ["blank", 1, true, "1"],
            "editable": true,
        }]),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "tag",
            "create",
            "-p",
            "p",
            "sample_type",
            "--value-type",
            "text",
            "--possible-value",
            "blank",
            "--possible-value",
            "1",
            "--possible-value",
            "true",
            "--possible-value",
            r#""1""#,
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created tag \"sample_type\""));

    let reqs = server.requests();
    assert_eq!(reqs[0].method, "PUT");
    assert_eq!(reqs[0].path(), "/api/projects/p/tags");

    let body: serde_json::Value = serde_json::from_str(&reqs[0].body).unwrap();
    assert_eq!(
        body,
        json!([{
            "tagName": "sample_type",
            "valueType": "TEXT",
            "possibleValues": ["blank", 1, true, "1"],
        }])
    );
}

#[test]
fn tag_create_defaults() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "PUT",
        "/api/projects/p/tags",
        json!([{"tagName": "comment", "valueType": "NONE"}]),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "tag",
            "create",
            "-p",
            "p",
            "comment",
            "--description",
            "Free text",
            "--type",
            "run",
        ])
        .assert()
        .success();

    let body: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
    assert_eq!(
        body,
        json!([{
            "tagName": "comment",
            "description": "Free text",
            "tagType": "run",
            "valueType": "NONE",
        }])
    );
}

#[test]
fn tag_ls() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/tags",
        json!([{
            "tagName": "sample_type",
            "tagType": "run",
            "valueType": "TEXT",
            "possibleValues": ["blank", 1],
        }]),
    )]);

    sirius_at(home.path(), &server)
        .args(["tag", "ls", "-p", "p", "--type", "run"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#"sample_type\s+TEXT\s+run\s+"blank",1"#).unwrap());

    assert_eq!(server.requests()[0].query(), "tagType=run");
}

#[test]
fn tag_rm_if_exists() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![]);

    sirius_at(home.path(), &server)
        .args(["tag", "rm", "-p", "p", "sample type", "--if-exists"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Tag \"sample type\" does not exist"));

    let reqs = server.requests();
    assert_eq!(reqs[0].method, "DELETE");
    assert_eq!(reqs[0].path(), "/api/projects/p/tags/sample%20type");
}

#[test]
fn group_create() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "POST",
        "/api/projects/p/groups/blanks",
        json!({
            "groupName": "blanks",
            "luceneQuery": "tags.sample_type:blank",
            "groupType": "run",
        }),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "group",
            "create",
            "-p",
            "p",
            "blanks",
            "--filter",
            "tags.sample_type:blank",
            "--type",
            "run",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created group \"blanks\""));

    let reqs = server.requests();
    assert_eq!(reqs[0].method, "POST");
    assert_eq!(reqs[0].query(), "filter=tags.sample_type%3Ablank&type=run");
}

#[test]
fn group_ls_and_rm() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![
        Route::json(
            "GET",
            "/api/projects/p/groups",
            json!([{
                "groupName": "blanks",
                "luceneQuery": "tags.sample_type:blank",
                "groupType": "run",
            }]),
        ),
        Route::empty("DELETE", "/api/projects/p/groups/blanks"),
    ]);

    sirius_at(home.path(), &server)
        .args(["group", "ls", "-p", "p"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"blanks\s+run\s+tags\.sample_type:blank").unwrap());

    sirius_at(home.path(), &server)
        .args(["group", "rm", "-p", "p", "blanks"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted group \"blanks\""));

    sirius_at(home.path(), &server)
        .args(["group", "rm", "-p", "p", "controls", "--if-exists"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Group \"controls\" does not exist"));

    let reqs = server.requests();
    assert_eq!(reqs[0].query(), "");
    assert_eq!(reqs[1].method, "DELETE");
    assert_eq!(reqs[2].path(), "/api/projects/p/groups/controls");
}
