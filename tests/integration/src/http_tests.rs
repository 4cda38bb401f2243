//! Engine over the HTTP client against a mock perspective API

use httpmock::prelude::*;
use perspective_client::{ClientSettings, HttpClient};
use perspective_core::{ErrorKind, PerspectiveEngine, plan};
use perspective_test_utils::fixtures::environments_config;
use pretty_assertions::assert_eq;
use serde_json::json;

fn engine(server: &MockServer) -> PerspectiveEngine<HttpClient> {
    let settings = ClientSettings::new("secret").with_endpoint(server.url("/v1"));
    PerspectiveEngine::new(HttpClient::new(settings).unwrap())
}

#[test]
fn create_then_read_back() {
    let server = MockServer::start();
    let planned = plan(&environments_config(), &[]).unwrap();
    let wire = serde_json::to_value(&planned.perspective).unwrap();

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/perspective_schemas")
            .query_param("api_key", "secret")
            .json_body(wire.clone());
        then.status(201).body("Perspective 2199023255 created");
    });
    let get = server.mock(|when, then| {
        when.method(GET).path("/v1/perspective_schemas/2199023255");
        then.status(200).json_body(wire.clone());
    });

    let observed = engine(&server)
        .create(&environments_config(), &[])
        .unwrap();

    create.assert();
    get.assert();
    assert_eq!(observed.id, "2199023255");
    assert_eq!(observed.config(), planned.config);
}

#[test]
fn empty_sentinel_reads_as_missing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/perspective_schemas/404404");
        then.status(200).json_body(json!({
            "schema": {
                "name": "Empty",
                "include_in_reports": "false",
                "rules": [],
                "constants": [],
                "merges": []
            }
        }));
    });

    assert_eq!(engine(&server).read("404404").unwrap(), None);
}

#[test]
fn name_conflict_on_update_is_a_remote_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/v1/perspective_schemas/5");
        then.status(422).body("Name already in use");
    });

    let err = engine(&server)
        .update("5", &environments_config(), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn broken_read_back_surfaces_reference_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/perspective_schemas/9");
        then.status(200).json_body(json!({
            "schema": {
                "name": "Broken",
                "include_in_reports": "true",
                "rules": [{"type": "filter", "asset": "AwsAsset", "to": "3"}],
                "constants": [],
                "merges": []
            }
        }));
    });

    let err = engine(&server).fetch("9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Reference);
}

#[test]
fn delete_is_hard() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE)
            .path("/v1/perspective_schemas/5")
            .query_param("hard_delete", "true");
        then.status(200);
    });

    engine(&server).delete("5").unwrap();
    delete.assert();
}
