use httpmock::Method::GET;
use httpmock::MockServer;
use restline::{Config, RestClient, TransferOption};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn redirecting_server() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/start");
        then.status(302).header("Location", "/final");
    });
    server.mock(|when, then| {
        when.method(GET).path("/final");
        then.status(200).body("arrived");
    });
    server
}

#[test]
fn test_redirects_not_followed_by_default() {
    if !can_bind_localhost() {
        return;
    }

    let server = redirecting_server();
    let mut client = RestClient::new();
    client.set_url(server.url("/start"));
    client.set_method("get").expect("method should be valid");
    let outcome = client.request().expect("request should run");

    assert_eq!(outcome.info.http_code, 302);
    assert_eq!(outcome.info.header("location"), Some("/final"));
}

#[test]
fn test_follow_redirects_option() {
    if !can_bind_localhost() {
        return;
    }

    let server = redirecting_server();
    let mut client = RestClient::new();
    client
        .set_url(server.url("/start"))
        .set_option(TransferOption::FollowRedirects(true));
    client.set_method("get").expect("method should be valid");
    let outcome = client.request().expect("request should run");

    assert_eq!(outcome.info.http_code, 200);
    assert_eq!(outcome.info.url, server.url("/final"));
    assert_eq!(outcome.response, "arrived");
}

#[test]
fn test_include_headers_prefixes_status_line() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/head");
        then.status(200).header("X-Served-By", "mock").body("body");
    });

    let mut client = RestClient::new();
    client
        .set_url(server.url("/head"))
        .set_option(TransferOption::IncludeHeaders(true));
    client.set_method("get").expect("method should be valid");
    let outcome = client.request().expect("request should run");

    assert!(outcome.response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(outcome.response.contains("x-served-by: mock\r\n"));
    assert!(outcome.response.ends_with("\r\n\r\nbody"));
}

#[test]
fn test_user_agent_from_config() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/agent")
            .header("User-Agent", "restline-test/1.0");
        then.status(200);
    });

    let mut config = Config::default();
    config.options.user_agent = Some("restline-test/1.0".to_string());
    config.options.fresh_connect = false;

    let mut client = RestClient::with_config(config);
    client.set_url(server.url("/agent"));
    client.set_method("get").expect("method should be valid");
    client.request().expect("request should run");
    client.request().expect("request should run again");

    mock.assert_hits(2);
}
