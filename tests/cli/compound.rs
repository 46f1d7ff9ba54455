use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

fn caffeine() -> serde_json::Value {
    json!({
        "compoundId": "5",
        "name": "caffeine",
        "neutralMass": 194.080376,
        "rtStartSeconds": 301.0,
        "rtEndSeconds": 324.5,
        "features": [{
            "alignedFeatureId": "51",
            "compoundId": "5",
            "ionMass": 195.087652,
            "charge": 1,
            "rtApexSeconds": 312.4,
            "topAnnotations": {
                "formulaAnnotation": {
                    "formulaId": "9",
                    "molecularFormula": "C8H10N4O2",
                    "adduct": "[M+H]+",
                },
            },
        }],
    })
}

#[test]
fn compound_ls() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/compounds/page",
        json!({
            "content": [caffeine()],
            "page": {"size": 100, "number": 0, "totalElements": 1, "totalPages": 1},
        }),
    )]);

    sirius_at(home.path(), &server)
        .args(["compound", "ls", "-p", "p"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"ID\s+NAME\s+NEUTRAL MASS\s+FEATURES").unwrap())
        .stdout(predicate::str::is_match(r"5\s+caffeine\s+194\.0804\s+1").unwrap());

    let reqs = server.requests();
    assert_eq!(
        reqs[0].query(),
        "optFields=none&optFieldsFeatures=none&page=0&size=100"
    );
}

#[test]
fn compound_get() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/compounds/5",
        caffeine(),
    )]);

    sirius_at(home.path(), &server)
        .args(["compound", "get", "-p", "p", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compound 5"))
        .stdout(predicate::str::is_match(r"Neutral Mass\s+194\.0804").unwrap())
        .stdout(predicate::str::is_match(r"51\s+195\.0877\s+1\s+312\.4s\s+C8H10N4O2").unwrap());

    let reqs = server.requests();
    assert_eq!(
        reqs[0].query(),
        "optFields=consensusAnnotations&optFieldsFeatures=topAnnotations"
    );
}

#[test]
fn compound_rm() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::empty("DELETE", "/api/projects/p/compounds/5")]);

    sirius_at(home.path(), &server)
        .args(["compound", "rm", "-p", "p", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted compound \"5\""));

    sirius_at(home.path(), &server)
        .args(["compound", "rm", "-p", "p", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404 Not Found"));

    sirius_at(home.path(), &server)
        .args(["compound", "rm", "-p", "p", "6", "--if-exists"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Compound \"6\" does not exist"));

    let reqs = server.requests();
    assert_eq!(reqs.len(), 3);
    assert!(reqs.iter().all(|r| r.method == "DELETE"));
}
