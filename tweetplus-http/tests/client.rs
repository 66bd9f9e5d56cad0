use tweetplus_http::{Auth, HttpClient, HttpError, RequestOpts};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn post_json_sends_bearer_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/echo"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let got: serde_json::Value = client
        .post_json(
            "v1/echo",
            &serde_json::json!({"text": "hi"}),
            RequestOpts {
                auth: Some(Auth::Bearer("secret")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(got["ok"], true);
}

#[tokio::test]
async fn api_error_keeps_body_and_skips_retry_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/fail"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({"errors": [{"message": "Over capacity"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json::<_, serde_json::Value>(
            "v1/fail",
            &serde_json::json!({}),
            RequestOpts {
                retries: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        HttpError::Api {
            status,
            message,
            body,
            ..
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "Over capacity");
            assert!(body.contains("Over capacity"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_bytes_follows_absolute_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(vec![1u8, 2, 3]),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new("https://unused.example.com/").unwrap();
    let resp = client
        .get_bytes(
            &format!("{}/img.png", server.uri()),
            RequestOpts {
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.body, vec![1, 2, 3]);
    assert_eq!(resp.content_type(), Some("image/png"));
}
