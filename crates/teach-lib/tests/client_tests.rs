//! Client and end-to-end teach tests against a mock classification service

use mockito::{Matcher, Server};
use serde_json::json;
use std::io::Write;
use teach_lib::{
    workflow, ClassificationClient, Feature, FeatureType, Model, ServiceError, StructuredLogger,
    TeachError, TeachPipeline,
};

fn examples_file(classes: &[&str]) -> tempfile::NamedTempFile {
    let examples: Vec<_> = classes
        .iter()
        .map(|class| {
            json!({
                "class": class,
                "inputs": [
                    {"key": "user.age", "type": "number", "value": "56"},
                    {"key": "user.location", "type": "keyword", "value": "Aruba"}
                ]
            })
        })
        .collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(&examples).unwrap().as_bytes())
        .unwrap();
    file
}

#[tokio::test]
async fn test_teach_model_posts_each_example() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for class in ["class1", "class2", "class3"] {
        mocks.push(
            server
                .mock("POST", "/classificationbox/models/sentiment1/teach")
                .match_body(Matcher::PartialJson(json!({ "class": class })))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"success":true}"#)
                .expect(1)
                .create_async()
                .await,
        );
    }

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let file = examples_file(&["class1", "class2", "class3"]);

    let summary = TeachPipeline::new(&client)
        .teach_model("sentiment1", file.path())
        .await
        .unwrap();

    assert_eq!(summary.submitted, 3);
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_teach_model_stops_at_rejected_example() {
    let mut server = Server::new_async().await;
    let accepted = server
        .mock("POST", "/classificationbox/models/sentiment1/teach")
        .match_body(Matcher::PartialJson(json!({ "class": "class1" })))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .expect(1)
        .create_async()
        .await;
    let rejected = server
        .mock("POST", "/classificationbox/models/sentiment1/teach")
        .match_body(Matcher::PartialJson(json!({ "class": "unknown" })))
        .with_status(400)
        .with_body(r#"{"success":false,"error":"class not in model"}"#)
        .expect(1)
        .create_async()
        .await;
    let never = server
        .mock("POST", "/classificationbox/models/sentiment1/teach")
        .match_body(Matcher::PartialJson(json!({ "class": "class2" })))
        .expect(0)
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let file = examples_file(&["class1", "unknown", "class2"]);

    let err = TeachPipeline::new(&client)
        .teach_model("sentiment1", file.path())
        .await
        .unwrap_err();

    match err {
        TeachError::Submission {
            position,
            source: ServiceError::Api { status, message },
        } => {
            assert_eq!(position, 1);
            assert_eq!(status, 400);
            assert_eq!(message, "class not in model");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    accepted.assert_async().await;
    rejected.assert_async().await;
    never.assert_async().await;
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/classificationbox/models/m1/teach")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"model is busy"}"#)
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let example = serde_json::from_value(json!({"class": "a", "inputs": []})).unwrap();

    let err = client.teach("m1", &example).await.unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 200, ref message } if message == "model is busy"));
}

#[tokio::test]
async fn test_reset_deletes_every_model() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/classificationbox/models")
        .with_status(200)
        .with_body(
            r#"{"success":true,"models":[{"id":"m1","name":"first"},{"id":"m2","name":"second"}]}"#,
        )
        .create_async()
        .await;
    let delete_m1 = server
        .mock("DELETE", "/classificationbox/models/m1")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;
    let delete_m2 = server
        .mock("DELETE", "/classificationbox/models/m2")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let logger = StructuredLogger::new(server.url());

    let deleted = workflow::reset_service(&client, &logger).await.unwrap();

    assert_eq!(deleted, 2);
    list.assert_async().await;
    delete_m1.assert_async().await;
    delete_m2.assert_async().await;
}

#[tokio::test]
async fn test_provision_creates_then_fetches() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/classificationbox/models")
        .match_body(Matcher::Json(json!({
            "id": "sentiment1",
            "name": "sentimentModel",
            "classes": ["class1", "class2", "class3"]
        })))
        .with_status(200)
        .with_body(r#"{"success":true,"id":"sentiment1","name":"sentimentModel","classes":["class1","class2","class3"]}"#)
        .create_async()
        .await;
    let get = server
        .mock("GET", "/classificationbox/models/sentiment1")
        .with_status(200)
        .with_body(r#"{"success":true,"id":"sentiment1","name":"sentimentModel","options":{"ngrams":1,"skipgrams":1},"classes":["class1","class2","class3"]}"#)
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let logger = StructuredLogger::new(server.url());
    let spec = Model::new("sentiment1", "sentimentModel", ["class1", "class2", "class3"]);

    let model = workflow::provision_model(&client, &spec, &logger)
        .await
        .unwrap();

    assert_eq!(model.id, "sentiment1");
    assert_eq!(model.options.unwrap().ngrams, Some(1));
    create.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn test_predict_sends_typed_features() {
    let mut server = Server::new_async().await;
    let predict = server
        .mock("POST", "/classificationbox/models/sentiment1/predict")
        .match_body(Matcher::Json(json!({
            "limit": 2,
            "inputs": [
                {"key": "user.age", "type": "number", "value": "56"},
                {"key": "user.interests", "type": "list", "value": "reading,coding,sailing"},
                {"key": "user.location", "type": "keyword", "value": "Aruba"}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"success":true,"classes":[{"id":"class2","score":0.71},{"id":"class1","score":0.2}]}"#)
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let inputs = vec![
        Feature::new("user.age", FeatureType::Number, "56"),
        Feature::new("user.interests", FeatureType::List, "reading,coding,sailing"),
        Feature::new("user.location", FeatureType::Keyword, "Aruba"),
    ];

    let response = workflow::predict(&client, "sentiment1", inputs, 2)
        .await
        .unwrap();

    assert_eq!(response.classes.len(), 2);
    assert_eq!(response.classes[0].id, "class2");
    predict.assert_async().await;
}

#[tokio::test]
async fn test_stats_and_info() {
    let mut server = Server::new_async().await;
    let _stats = server
        .mock("GET", "/classificationbox/models/sentiment1/stats")
        .with_status(200)
        .with_body(r#"{"success":true,"predictions":4,"examples":30,"classes":[{"name":"class1","examples":10}]}"#)
        .create_async()
        .await;
    let _info = server
        .mock("GET", "/info")
        .with_status(200)
        .with_body(r#"{"success":true,"name":"classificationbox","version":1,"build":"abc123","status":"ready"}"#)
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();

    let stats = client.model_stats("sentiment1").await.unwrap();
    assert_eq!(stats.examples, 30);
    assert_eq!(stats.classes[0].name, "class1");

    let info = client.info().await.unwrap();
    assert_eq!(info.status, "ready");
}

#[tokio::test]
async fn test_missing_model_maps_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/classificationbox/models/nope")
        .with_status(404)
        .with_body("")
        .create_async()
        .await;

    let client = ClassificationClient::with_base_url(&server.url()).unwrap();
    let err = client.get_model("nope").await.unwrap_err();

    assert!(matches!(err, ServiceError::Api { status: 404, ref message } if message == "Not Found"));
}
