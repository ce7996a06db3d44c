use httpmock::{Method::DELETE, Method::GET, Method::POST, Method::PUT, MockServer};
use shipstation_client::{Client, Config, Error, RequestBody};

async fn client_for(server: &MockServer) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();
    let cfg = Config::new("A", "B").with_api_url(format!("{}/", server.base_url()));
    Client::new(cfg).unwrap()
}

#[tokio::test]
async fn sends_basic_auth_and_json_content_type() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/orders")
                .header("Authorization", "Basic QTpC")
                .header("Content-Type", "application/json");
            then.status(200).json_body(serde_json::json!({"orders": []}));
        })
        .await;

    let mut client = client_for(&server).await;
    let body = client.get("orders").await?;
    mock.assert_async().await;
    assert_eq!(body["orders"], serde_json::json!([]));
    assert_eq!(client.http_code(), 200);
    Ok(())
}

#[tokio::test]
async fn caller_headers_are_sent_and_suppressed_ones_are_not() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    // Matched only if the request still carries the suppressed header.
    let suppressed = server
        .mock_async(|when, then| {
            when.method(GET).path("/stores").header_exists("X-Partner");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;
    let plain = server
        .mock_async(|when, then| {
            when.method(GET).path("/stores");
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let mut client = client_for(&server).await;
    client.set_header("X-Partner", "v");
    client.set_header("X-Partner", "");
    client.get("stores").await?;
    suppressed.assert_hits_async(0).await;
    plain.assert_hits_async(1).await;
    Ok(())
}

#[tokio::test]
async fn post_body_uses_the_verbatim_fragment_encoding() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/orders/createorder")
                .body("{ \"orderId\" : \"123\" }");
            then.status(200)
                .json_body(serde_json::json!({"orderId": 123}));
        })
        .await;

    let mut client = client_for(&server).await;
    let body = RequestBody::new().raw("orderId", "\"123\"");
    client.post("orders/createorder", body).await?;
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn put_transmits_its_body_and_delete_does_not() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let put_mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/orders/1")
                .body("{ \"hold\" : true }");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        })
        .await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/orders/1").body("");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        })
        .await;

    let mut client = client_for(&server).await;
    client
        .put("orders/1", RequestBody::new().boolean("hold", true))
        .await?;
    client
        .delete("orders/1", RequestBody::new().raw("ignored", "1"))
        .await?;
    put_mock.assert_async().await;
    delete_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn http_error_statuses_return_the_body_instead_of_failing() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/orders/missing");
            then.status(404)
                .json_body(serde_json::json!({"message": "not found"}));
        })
        .await;

    let mut client = client_for(&server).await;
    let body = client.get("orders/missing").await?;
    assert_eq!(body["message"], "not found");
    assert_eq!(client.http_code(), 404);
    Ok(())
}

#[tokio::test]
async fn big_integer_ids_are_preserved_as_strings() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/shipments");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"shipmentId": 9223372036854775807, "orderId": 42}"#);
        })
        .await;

    let mut client = client_for(&server).await;
    let body = client.get("shipments").await?;
    assert_eq!(body["shipmentId"], serde_json::json!("9223372036854775807"));
    assert_eq!(body["orderId"], serde_json::json!(42));
    Ok(())
}

#[tokio::test]
async fn non_json_body_decodes_to_null() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/weird");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let mut client = client_for(&server).await;
    let body = client.get("weird").await?;
    assert!(body.is_null());
    Ok(())
}

#[tokio::test]
async fn rate_headers_refresh_the_quota_state() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/orders");
            then.status(200)
                .header("X-Rate-Limit-Remaining", "0")
                .header("X-Rate-Limit-Reset", "40")
                .json_body(serde_json::json!({"orders": []}));
        })
        .await;

    let mut client = client_for(&server).await;
    client.get("orders").await?;
    let rate = client.rate_limit();
    assert_eq!(rate.remaining, 0);
    assert_eq!(rate.reset_secs, 40);
    assert!(rate.last_request_at.is_some());
    Ok(())
}

#[tokio::test]
async fn connection_failure_raises_a_transport_error() {
    // Nothing listens on port 1.
    let cfg = Config::new("A", "B").with_api_url("http://127.0.0.1:1/");
    let mut client = Client::new(cfg).unwrap();
    let err = client.get("orders").await.unwrap_err();
    let Error::Transport { message, http_code } = err;
    assert!(!message.is_empty());
    assert_eq!(http_code, 0);
    assert_eq!(client.http_code(), 0);
}
