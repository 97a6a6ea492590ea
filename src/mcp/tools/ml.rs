//! Einstein Studio configured model and model artifact tools.

use serde_json::{json, Value};

use super::common::{forward, parse_json_param, tool_error, ToolResult};
use crate::api::{encode_segment, ApiRequest};
use crate::mcp::hub::Services;
use crate::mcp::types::{
    ArtifactNameArgs, ArtifactUpdateArgs, ModelNameArgs, ModelUpdateArgs, PredictionArgs,
};

fn model_path(services: &Services, name: &str) -> String {
    services.connect(&format!(
        "/machine-learning/configured-models/{}",
        encode_segment(name)
    ))
}

fn artifact_path(services: &Services, name: &str) -> String {
    services.connect(&format!("/machine-learning/model-artifacts/{}", encode_segment(name)))
}

pub async fn list_ml_models(services: &Services) -> ToolResult {
    let path = services.connect("/machine-learning/configured-models");
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_ml_model(services: &Services, args: ModelNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(model_path(services, &args.model_name))).await
}

pub async fn update_ml_model(services: &Services, args: ModelUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    forward(services, ApiRequest::patch(model_path(services, &args.model_name)).json(updates)).await
}

pub async fn delete_ml_model(services: &Services, args: ModelNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(model_path(services, &args.model_name))).await
}

/// Score input against a configured model. Input fields sit beside `configuredModelId`.
pub async fn get_prediction(services: &Services, args: PredictionArgs) -> ToolResult {
    let mut body = json!({ "configuredModelId": args.model_name });

    if let Some(input) = args.input_data {
        match parse_json_param(input, "input_data") {
            Ok(Value::Object(fields)) => {
                if let Some(target) = body.as_object_mut() {
                    target.extend(fields);
                }
            }
            Ok(_) => return Ok(tool_error("Error: input_data must be a JSON object")),
            Err(result) => return Ok(result),
        }
    }

    let path = services.connect("/machine-learning/predict");
    forward(services, ApiRequest::post(path).json(body)).await
}

pub async fn list_model_artifacts(services: &Services) -> ToolResult {
    let path = services.connect("/machine-learning/model-artifacts");
    forward(services, ApiRequest::get(path)).await
}

pub async fn get_model_artifact(services: &Services, args: ArtifactNameArgs) -> ToolResult {
    forward(services, ApiRequest::get(artifact_path(services, &args.artifact_name))).await
}

pub async fn update_model_artifact(services: &Services, args: ArtifactUpdateArgs) -> ToolResult {
    let updates = match parse_json_param(args.updates, "updates") {
        Ok(v) => v,
        Err(result) => return Ok(result),
    };
    let path = artifact_path(services, &args.artifact_name);
    forward(services, ApiRequest::patch(path).json(updates)).await
}

pub async fn delete_model_artifact(services: &Services, args: ArtifactNameArgs) -> ToolResult {
    forward(services, ApiRequest::delete(artifact_path(services, &args.artifact_name))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::hub::tests::hub_for;
    use crate::mcp::tools::common::tests::body_of;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_prediction_merges_input_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/data/v63.0/ssot/machine-learning/predict"))
            .and(body_json(json!({
                "configuredModelId": "Churn_Model",
                "predictionType": "Regression",
                "rows": [{ "tenure": 12 }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [0.31] })))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = get_prediction(
            &*hub.services().await,
            PredictionArgs {
                model_name: "Churn_Model".into(),
                input_data: Some(json!(
                    r#"{"predictionType":"Regression","rows":[{"tenure":12}]}"#
                )),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["predictions"][0], 0.31);
    }

    #[tokio::test]
    async fn test_prediction_rejects_non_object_input() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = get_prediction(
            &*hub.services().await,
            PredictionArgs {
                model_name: "Churn_Model".into(),
                input_data: Some(json!([1, 2])),
            },
        )
        .await
        .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_model_artifact() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/services/data/v63.0/ssot/machine-learning/model-artifacts/churn_v2"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let hub = hub_for(dir.path(), &server.uri());

        let result = delete_model_artifact(
            &*hub.services().await,
            ArtifactNameArgs {
                artifact_name: "churn_v2".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(body_of(&result)["success"], true);
    }
}
