//! GraphQL transport.
//!
//! Executes a document against `{base}/api/graphql` and turns the response
//! envelope into either the `data` object or a `CoreError`.

use nannyml_cloud_core_types::{GraphqlRequest, GraphqlResponse};
use serde_json::Value;

use crate::errors::{CoreError, CoreResult};
use crate::http::HttpClient;

/// Path of the GraphQL endpoint relative to the instance base URL.
pub const GRAPHQL_PATH: &str = "/api/graphql";

/// GraphQL client over the shared [`HttpClient`].
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: HttpClient,
}

impl GraphqlClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Execute a query or mutation and return its `data` object.
    ///
    /// Errors:
    /// - a non-empty `errors` array becomes `CoreError::Api` carrying the
    ///   first message and its `extensions.code`,
    /// - a 403 `LicenseError` body becomes `CoreError::License`,
    /// - any other non-2xx status becomes `CoreError::Api` with the status.
    pub async fn execute(
        &self,
        document: &str,
        variables: Value,
        operation_name: Option<&str>,
    ) -> CoreResult<Value> {
        let request = GraphqlRequest {
            query: document.to_string(),
            variables,
            operation_name: operation_name.map(String::from),
        };
        let op = operation_name.unwrap_or("anonymous");
        tracing::debug!(operation = op, base_url = self.http.base_url(), "executing graphql operation");

        let response: GraphqlResponse = self
            .http
            .post_json(GRAPHQL_PATH, &request)
            .await
            .map_err(|e| {
                let err = CoreError::from(e);
                if err.is_license_error() {
                    tracing::warn!(operation = op, error = %err, "graphql request denied by license");
                }
                err
            })?;

        if let Some(first) = response.errors.as_ref().and_then(|errors| errors.first()) {
            let count = response.errors.as_ref().map_or(0, Vec::len);
            tracing::warn!(
                operation = op,
                errors = count,
                message = %first.message,
                "graphql response carried errors"
            );
            return Err(CoreError::api(first.message.clone(), first.code()));
        }

        response
            .data
            .ok_or_else(|| CoreError::Protocol(format!("graphql response for {} had no data", op)))
    }
}

/// Fetch a nested field from a `data` object, failing with `Protocol` when
/// any segment is missing.
pub(crate) fn field<'v>(data: &'v Value, path: &[&str]) -> CoreResult<&'v Value> {
    let mut current = data;
    for segment in path {
        current = current.get(segment).ok_or_else(|| {
            CoreError::Protocol(format!("missing field `{}` in graphql response", path.join(".")))
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> GraphqlClient {
        GraphqlClient::new(HttpClient::new(&server.base_url(), "token", 5, "test").unwrap())
    }

    #[tokio::test]
    async fn test_execute_returns_data() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/graphql")
                    .json_body_partial(r#"{"operationName": "ping", "variables": {"x": 1}}"#);
                then.status(200).json_body(json!({"data": {"pong": true}}));
            })
            .await;

        let data = client_for(&server)
            .execute("query ping { pong }", json!({"x": 1}), Some("ping"))
            .await
            .unwrap();
        assert_eq!(data, json!({"pong": true}));
        m.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_graphql_errors_become_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(200).json_body(json!({
                    "data": null,
                    "errors": [
                        {"message": "invalid threshold", "extensions": {"code": "BAD_USER_INPUT"}},
                        {"message": "second"}
                    ]
                }));
            })
            .await;

        let err = client_for(&server)
            .execute("mutation m { x }", json!({}), None)
            .await
            .unwrap_err();
        match err {
            CoreError::Api(info) => {
                assert_eq!(info.message, "invalid threshold");
                assert_eq!(info.code.as_deref(), Some("BAD_USER_INPUT"));
                assert_eq!(info.status, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_license_denial_becomes_license_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(403)
                    .json_body(json!({"type": "LicenseError", "detail": "license expired"}));
            })
            .await;

        let err = client_for(&server)
            .execute("query q { x }", json!({}), None)
            .await
            .unwrap_err();
        assert!(err.is_license_error());
        assert!(err.is_api_error());
    }

    #[tokio::test]
    async fn test_other_status_becomes_api_error_with_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/graphql");
                then.status(500).body("internal error");
            })
            .await;

        let err = client_for(&server)
            .execute("query q { x }", json!({}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Api(_)));
        assert_eq!(err.http_status(), Some(500));
    }

    #[test]
    fn test_field_path() {
        let data = json!({"monitoring_model": {"runtimeConfig": {"a": 1}}});
        assert_eq!(field(&data, &["monitoring_model", "runtimeConfig", "a"]).unwrap(), &json!(1));
        assert!(matches!(
            field(&data, &["monitoring_model", "nope"]),
            Err(CoreError::Protocol(_))
        ));
    }
}
