use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn info_logged_out() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/account/isLoggedIn",
        json!(false),
    )]);

    sirius_at(home.path(), &server)
        .args(["info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile"))
        .stdout(predicate::str::contains(&server.url))
        .stdout(predicate::str::contains("Client Version"))
        .stdout(predicate::str::is_match(r"Logged In\s+false").unwrap())
        .stdout(predicate::str::contains("Account").not());

    let reqs = server.requests();
    assert!(
        reqs[0]
            .header("user-agent")
            .is_some_and(|ua| ua.starts_with("sirius-client-cli/"))
    );
}

#[test]
fn info_logged_in() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![
        Route::json("GET", "/api/account/isLoggedIn", json!(true)),
        Route::json(
            "GET",
            "/api/account/",
            json!({
                "userID": "u1",
                "username": "ada",
                "userEmail": "ada@example.com",
                "activeSubscriptionId": "sub-2",
                "subscriptions": [
                    {"sid": "sub-1", "name": "Trial"},
                    {"sid": "sub-2", "name": "Academic"},
                ],
            }),
        )
        .with_query("includeSubs=true"),
    ]);

    sirius_at(home.path(), &server)
        .args(["info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"))
        .stdout(predicate::str::contains("* sub-2 Academic"))
        .stdout(predicate::str::contains("  sub-1 Trial"));
}

#[test]
fn info_unreachable() {
    let home = tempfile::tempdir().unwrap();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    crate::sirius(home.path())
        .env("SIRIUS_API_ENDPOINT", format!("http://127.0.0.1:{port}"))
        .args(["info"])
        .assert()
        .failure();
}
