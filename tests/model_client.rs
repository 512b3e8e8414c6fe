// HTTP-level tests for the Gemini backend against a mock server.
use futures::StreamExt;
use mockito::{Matcher, Server};
use teamsync::client::{GeminiClient, ModelBackend};
use teamsync::config::Config;

fn config_for(url: &str) -> Config {
    Config {
        api_base_url: url.to_string(),
        model: "gemini-test".into(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_invoke_returns_candidate_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-test:generateContent")
        .match_header("x-goog-api-key", "secret")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"=== TODOS ===\n"},{"text":"- a"}]}}]}"#)
        .create_async()
        .await;

    let client = GeminiClient::new("secret", &config_for(&server.url())).unwrap();
    let reply = client.invoke("hello").await.unwrap();
    assert_eq!(reply, "=== TODOS ===\n- a");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_is_surfaced() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/gemini-test:generateContent")
        .with_status(403)
        .with_body(r#"{"error":{"code":403,"message":"API key not valid"}}"#)
        .create_async()
        .await;

    let client = GeminiClient::new("bad", &config_for(&server.url())).unwrap();
    let err = client.invoke("hello").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("403"), "{msg}");
    assert!(msg.contains("API key not valid"), "{msg}");
}

#[tokio::test]
async fn test_stream_yields_fragments_in_order() {
    let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n\
                data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\r\n\r\n\
                data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"\"}]}}]}\r\n\r\n";
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "POST",
            Matcher::Regex(r"^/models/gemini-test:streamGenerateContent".to_string()),
        )
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = GeminiClient::new("secret", &config_for(&server.url())).unwrap();
    let fragments: Vec<String> = client
        .stream("hi")
        .await
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
        .await;
    assert_eq!(fragments, vec!["Hel", "lo"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_an_error() {
    let client = GeminiClient::new("secret", &config_for("http://127.0.0.1:9")).unwrap();
    assert!(client.invoke("hello").await.is_err());
}
