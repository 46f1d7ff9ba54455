use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

fn job(state: &str) -> serde_json::Value {
    json!({
        "id": "12",
        "progress": {
            "indeterminate": false,
            "state": state,
            "currentProgress": 1,
            "maxProgress": 1,
        },
    })
}

#[test]
fn foldchange_compute_features() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "PUT",
        "/api/projects/p/aligned-features/statistics/foldchange/compute",
        job("RUNNING"),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "foldchange",
            "compute",
            "-p",
            "p",
            "--target",
            "features",
            "--left",
            "treated",
            "--right",
            "control",
            "--aggregation",
            "max",
            "--quantification",
            "area-under-curve",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Started fold change job 12"));

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].method, "PUT");
    assert_eq!(
        reqs[0].path(),
        "/api/projects/p/aligned-features/statistics/foldchange/compute"
    );
    assert_eq!(
        reqs[0].query(),
        "leftGroupName=treated&rightGroupName=control&aggregation=MAX\
         &quantification=AREA_UNDER_CURVE&optFields=progress"
    );
}

#[test]
fn foldchange_compute_defaults_to_compounds() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "PUT",
        "/api/projects/p/compounds/statistics/foldchange/compute",
        job("WAITING"),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "foldchange", "compute", "-p", "p", "--left", "a", "--right", "b",
        ])
        .assert()
        .success();

    let reqs = server.requests();
    assert_eq!(
        reqs[0].path(),
        "/api/projects/p/compounds/statistics/foldchange/compute"
    );
    assert_eq!(
        reqs[0].query(),
        "leftGroupName=a&rightGroupName=b&optFields=progress"
    );
}

#[test]
fn foldchange_compute_wait() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![
        Route::json(
            "PUT",
            "/api/projects/p/compounds/statistics/foldchange/compute",
            job("RUNNING"),
        ),
        Route::json("GET", "/api/projects/p/jobs/12", job("DONE")),
    ]);

    let out = sirius_at(home.path(), &server)
        .args([
            "-O",
            "json",
            "foldchange",
            "compute",
            "-p",
            "p",
            "--left",
            "treated",
            "--right",
            "control",
            "--wait",
            "--interval",
            "10ms",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let job: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(job["progress"]["state"], "DONE");

    let reqs = server.requests();
    assert_eq!(reqs[1].path(), "/api/projects/p/jobs/12");
}

#[test]
fn foldchange_table() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/aligned-features/statistics/foldchanges/stats-table",
        json!({
            "statisticsType": "FOLD_CHANGE",
            "aggregationType": "AVG",
            "rowIds": [3, 4],
            "rowNames": ["caffeine", "theobromine"],
            "columnNames": ["treated/control"],
            "columnLeftGroups": ["treated"],
            "columnRightGroups": ["control"],
            "values": [[2.5], [0.25]],
        }),
    )]);

    sirius_at(home.path(), &server)
        .args([
            "foldchange", "table", "-p", "p", "--target", "features", "--aggregation", "avg",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"ID\s+NAME\s+treated/control").unwrap())
        .stdout(predicate::str::is_match(r"3\s+caffeine\s+2\.500").unwrap())
        .stdout(predicate::str::is_match(r"4\s+theobromine\s+0\.250").unwrap());

    let reqs = server.requests();
    assert_eq!(reqs[0].query(), "aggregation=AVG");
}

#[test]
fn foldchange_table_empty() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/compounds/statistics/foldchanges/stats-table",
        json!({}),
    )]);

    sirius_at(home.path(), &server)
        .args(["foldchange", "table", "-p", "p"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No fold changes"));

    assert_eq!(server.requests()[0].query(), "");
}

#[test]
fn foldchange_rm() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::empty(
        "DELETE",
        "/api/projects/p/compounds/statistics/foldchanges",
    )]);

    sirius_at(home.path(), &server)
        .args([
            "foldchange", "rm", "-p", "p", "--left", "treated", "--right", "control",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted fold changes treated / control"));

    let reqs = server.requests();
    assert_eq!(reqs[0].method, "DELETE");
    assert_eq!(
        reqs[0].query(),
        "leftGroupName=treated&rightGroupName=control"
    );
}
