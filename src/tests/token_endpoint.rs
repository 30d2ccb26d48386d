#[cfg(test)]
mod test {

    use http::StatusCode;
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::{json, Value};

    use crate::tests::common::{build_reqwest_client, iam_credentials, legacy_credentials, spawn_broker};

    #[tokio::test]
    async fn iam_token_is_served_as_access_token() {
        let upstream = MockServer::start_async().await;
        upstream.mock(|when, then| {
            when.method(POST)
                .path("/identity/token")
                .form_urlencoded_tuple("apikey", "speech-key");
            then.status(200).json_body(json!({"access_token": "iam-abc", "expires_in": 3600}));
        });
        let (handle, base_url) = spawn_broker(&upstream, iam_credentials(&upstream)).await;

        let response = build_reqwest_client()
            .post(format!("{}/api/token", base_url))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"accessToken": "iam-abc", "serviceUrl": upstream.url("/speech-to-text/api")})
        );

        handle.abort();
    }

    #[tokio::test]
    async fn legacy_token_is_served_as_token() {
        let upstream = MockServer::start_async().await;
        upstream.mock(|when, then| {
            when.method(GET)
                .path("/authorization/api/v1/token")
                .query_param("url", upstream.url("/speech-to-text/api"));
            then.status(200).body("cf-token");
        });
        let (handle, base_url) = spawn_broker(&upstream, legacy_credentials(&upstream)).await;

        let body: Value = build_reqwest_client()
            .post(format!("{}/api/token", base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["token"], "cf-token");
        assert_eq!(body["serviceUrl"], upstream.url("/speech-to-text/api"));
        assert!(body.get("accessToken").is_none());

        handle.abort();
    }

    #[tokio::test]
    async fn failed_token_fetch_is_a_server_error() {
        let upstream = MockServer::start_async().await;
        upstream.mock(|when, then| {
            when.method(GET).path("/authorization/api/v1/token");
            then.status(401).body("Not Authorized");
        });
        let (handle, base_url) = spawn_broker(&upstream, legacy_credentials(&upstream)).await;

        let response = build_reqwest_client()
            .post(format!("{}/api/token", base_url))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], 500);
        assert!(body["error"].as_str().unwrap().contains("Not Authorized"));

        handle.abort();
    }

    #[tokio::test]
    async fn token_route_only_accepts_post() {
        let upstream = MockServer::start_async().await;
        let (handle, base_url) = spawn_broker(&upstream, legacy_credentials(&upstream)).await;

        let response = build_reqwest_client()
            .get(format!("{}/api/token", base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        handle.abort();
    }

    #[tokio::test]
    async fn metrics_count_token_fetches() {
        let upstream = MockServer::start_async().await;
        upstream.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(200).json_body(json!({"access_token": "iam-abc"}));
        });
        let (handle, base_url) = spawn_broker(&upstream, iam_credentials(&upstream)).await;
        let client = build_reqwest_client();

        client.post(format!("{}/api/token", base_url)).send().await.unwrap();
        let metrics = client
            .get(format!("{}/metrics", base_url))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert!(metrics.contains("speechtone_upstream_requests_total"));
        assert!(metrics.contains("mode=\"iam\""));

        handle.abort();
    }
}
