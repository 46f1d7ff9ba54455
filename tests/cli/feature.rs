use crate::{
    common::{MockServer, Route},
    sirius_at,
};
use predicates::prelude::*;
use serde_json::json;

fn feature() -> serde_json::Value {
    json!({
        "alignedFeatureId": "51",
        "compoundId": "5",
        "ionMass": 195.087652,
        "charge": 1,
        "detectedAdducts": ["[M+H]+", "[M+Na]+"],
        "rtApexSeconds": 312.4,
        "quality": "GOOD",
        "computedTools": {"formulaSearch": true, "zodiac": true},
        "topAnnotations": {
            "formulaAnnotation": {
                "formulaId": "9",
                "molecularFormula": "C8H10N4O2",
                "adduct": "[M+H]+",
            },
            "structureAnnotation": {
                "inchiKey": "RYYVLZVUVIJVGH",
                "structureName": "caffeine",
            },
            "confidenceExactMatch": 0.912,
        },
    })
}

#[test]
fn feature_ls() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/aligned-features/page",
        json!({
            "content": [feature()],
            "page": {"size": 100, "number": 0, "totalElements": 1, "totalPages": 1},
        }),
    )]);

    sirius_at(home.path(), &server)
        .args(["feature", "ls", "-p", "p"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"51\s+5\s+195\.0877\s+1\s+312\.4s\s+GOOD").unwrap());

    assert_eq!(
        server.requests()[0].query(),
        "optFields=none&page=0&size=100"
    );
}

#[test]
fn feature_get() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/aligned-features/51",
        feature(),
    )]);

    sirius_at(home.path(), &server)
        .args(["feature", "get", "-p", "p", "51"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feature 51"))
        .stdout(predicate::str::is_match(r"Adducts\s+\[M\+H\]\+, \[M\+Na\]\+").unwrap())
        .stdout(predicate::str::is_match(r"Computed\s+formula, zodiac").unwrap())
        .stdout(predicate::str::is_match(r"Formula\s+C8H10N4O2 \[M\+H\]\+").unwrap())
        .stdout(predicate::str::is_match(r"Structure\s+RYYVLZVUVIJVGH caffeine").unwrap())
        .stdout(predicate::str::is_match(r"Confidence\s+0\.912").unwrap());

    assert_eq!(
        server.requests()[0].query(),
        "optFields=topAnnotations&optFields=computedTools"
    );
}

#[test]
fn feature_rm_one_and_many() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![
        Route::empty("DELETE", "/api/projects/p/aligned-features/1"),
        Route::empty("PUT", "/api/projects/p/aligned-features/delete"),
    ]);

    sirius_at(home.path(), &server)
        .args(["feature", "rm", "-p", "p", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted 1 feature(s)"));

    sirius_at(home.path(), &server)
        .args(["feature", "rm", "-p", "p", "1", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted 2 feature(s)"));

    let reqs = server.requests();
    assert_eq!(reqs[0].method, "DELETE");
    assert_eq!(reqs[1].method, "PUT");
    assert_eq!(reqs[1].body, r#"["1","2"]"#);
}

#[test]
fn feature_formulas() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start(vec![Route::json(
        "GET",
        "/api/projects/p/aligned-features/51/formulas/page",
        json!({
            "content": [{
                "formulaId": "9",
                "molecularFormula": "C8H10N4O2",
                "adduct": "[M+H]+",
                "rank": 1,
                "siriusScore": 41.25,
            }],
            "page": {"size": 100, "number": 0, "totalElements": 1, "totalPages": 1},
        }),
    )]);

    sirius_at(home.path(), &server)
        .args(["feature", "formulas", "-p", "p", "51"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"RANK\s+FORMULA\s+ADDUCT").unwrap())
        .stdout(predicate::str::is_match(r"1\s+C8H10N4O2\s+\[M\+H\]\+\s+41\.250\s+9").unwrap());

    assert_eq!(
        server.requests()[0].query(),
        "optFields=none&page=0&size=100"
    );
}
