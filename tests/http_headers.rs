use restline::{RequestOutcome, RestClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

async fn run_blocking<F>(configure: F) -> RequestOutcome
where
    F: FnOnce(&mut RestClient) -> restline::Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut client = RestClient::new();
        configure(&mut client)?;
        client.request()
    })
    .await
    .expect("blocking task should finish")
    .expect("request should run")
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_custom_header_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("X-Test-Header", "restline"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let url = format!("{}/headers", server.uri());
    let outcome = run_blocking(move |client| {
        client.set_url(url).add_header("X-Test-Header", "restline");
        client.set_method("get")?;
        Ok(())
    })
    .await;
    assert_eq!(outcome.info.http_code, 200);

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_default_headers_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/defaults"))
        .and(header("Cache-Control", "max-age=0"))
        .and(header("Keep-Alive", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let url = format!("{}/defaults", server.uri());
    let outcome = run_blocking(move |client| {
        client.set_url(url);
        client.set_method("get")?;
        Ok(())
    })
    .await;
    assert_eq!(outcome.info.http_code, 200);
    assert_eq!(outcome.response, "ok");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_accept_type_sets_content_type() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .mount(&server)
        .await;

    let url = format!("{}/json", server.uri());
    let outcome = run_blocking(move |client| {
        client.set_url(url).set_data("{}");
        client.set_accept_types(&["json", "xml"])?;
        client.set_method("post")?;
        Ok(())
    })
    .await;
    assert_eq!(outcome.info.http_code, 200);
    assert_eq!(outcome.response, "{\"ok\":true}");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cleared_headers_not_sent() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/bare", server.uri());
    run_blocking(move |client| {
        client.set_url(url).clear_headers();
        client.set_method("get")?;
        Ok(())
    })
    .await;

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("keep-alive"));
    assert!(!requests[0].headers.contains_key("cache-control"));
}
