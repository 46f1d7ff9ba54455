use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

fn my_db() -> serde_json::Value {
    json!({
        "databaseId": "my-db",
        "displayName": "My Standards",
        "location": "/data/my-db.siriusdb",
        "customDb": true,
        "searchable": true,
        "dbVersion": 3,
        "numberOfStructures": 120,
    })
}

#[test]
fn db_ls_custom() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/databases/custom",
        json!([
            my_db(),
            {"databaseId": "broken", "customDb": true, "errorMessage": "cannot open"},
        ]),
    )]);

    sirius_at(home.path(), &server)
        .args(["db", "ls", "--custom"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"my-db\s+My Standards\s+true\s+120\s+ok").unwrap())
        .stdout(predicate::str::is_match(r"broken\s+true\s+error").unwrap());

    assert_eq!(
        server.requests()[0].query(),
        "includeStats=false&includeWithErrors=true"
    );
}

#[test]
fn db_ls_all_and_included() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![
        Route::json("GET", "/api/databases", json!([my_db()])),
        Route::json(
            "GET",
            "/api/databases/included",
            json!([{"databaseId": "BIO", "searchable": true}]),
        ),
    ]);

    sirius_at(home.path(), &server)
        .args(["db", "ls", "--stats"])
        .assert()
        .success();

    sirius_at(home.path(), &server)
        .args(["db", "ls", "--included"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"BIO\s+false\s+ok").unwrap());

    let reqs = server.requests();
    assert_eq!(reqs[0].query(), "includeStats=true&includeWithErrors=true");
    assert_eq!(reqs[1].path(), "/api/databases/included");
    assert_eq!(reqs[1].query(), "includeStats=false");
}

#[test]
fn db_get() {
    let home = tempfile::tempdir().unwrap();
    let mut db = my_db();
    db["updateNeeded"] = json!(true);
    let server = MockServer::start(vec![Route::json("GET", "/api/databases/my-db", db)]);

    sirius_at(home.path(), &server)
        .args(["db", "get", "my-db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database \"my-db\""))
        .stdout(predicate::str::is_match(r"Status\s+needs update").unwrap())
        .stdout(predicate::str::is_match(r"Structures\s+120").unwrap());

    assert_eq!(server.requests()[0].query(), "includeStats=true");
}

#[test]
fn db_create() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json("POST", "/api/databases/my-db", my_db())]);

    sirius_at(home.path(), &server)
        .args([
            "db",
            "create",
            "my-db",
            "--display-name",
            "My Standards",
            "--location",
            "/data/my-db.siriusdb",
            "--match-rt",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Created database \"my-db\" at /data/my-db.siriusdb",
        ));

    let body: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "displayName": "My Standards",
            "location": "/data/my-db.siriusdb",
            "matchRtOfReferenceSpectra": true,
        })
    );
}

#[test]
fn db_rm() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::empty("DELETE", "/api/databases/my-db")]);

    sirius_at(home.path(), &server)
        .args(["db", "rm", "my-db", "--delete"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed database \"my-db\""));

    sirius_at(home.path(), &server)
        .args(["db", "rm", "gone", "--if-exists"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Database \"gone\" does not exist"));

    let reqs = server.requests();
    assert_eq!(reqs[0].query(), "delete=true");
    assert_eq!(reqs[1].query(), "delete=false");
}
