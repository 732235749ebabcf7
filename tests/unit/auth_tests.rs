use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use hyper::StatusCode;
use nc_dav_rs::{Authenticator, Credentials, Exchange, NextcloudAuthenticator};

fn basic() -> HeaderValue {
    Credentials::new("alice", "secret").to_header_value().unwrap()
}

fn challenge(headers: HeaderMap) -> Exchange {
    Exchange::new(headers, StatusCode::UNAUTHORIZED)
}

#[test]
fn test_first_challenge_adds_authorization() {
    let auth = NextcloudAuthenticator::new(basic());
    let mut sent = HeaderMap::new();
    sent.insert(header::USER_AGENT, HeaderValue::from_static("test"));

    let retry = auth.authenticate(&challenge(sent)).expect("should retry");
    assert_eq!(retry.get(header::AUTHORIZATION), Some(&basic()));
    assert_eq!(retry.get(header::USER_AGENT).unwrap(), "test");
}

#[test]
fn test_refuses_when_authorization_already_sent() {
    let auth = NextcloudAuthenticator::new(basic());
    let mut sent = HeaderMap::new();
    sent.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer other"));

    assert!(auth.authenticate(&challenge(sent)).is_none());
}

#[test]
fn test_gives_up_after_three_prior_responses() {
    let auth = NextcloudAuthenticator::new(basic());

    let mut exchange = challenge(HeaderMap::new());
    for _ in 0..3 {
        exchange = challenge(HeaderMap::new()).with_prior(exchange);
    }
    // three priors behind the current response
    assert!(auth.authenticate(&exchange).is_none());
}

#[test]
fn test_retries_with_two_prior_responses() {
    let auth = NextcloudAuthenticator::new(basic());

    let exchange = challenge(HeaderMap::new())
        .with_prior(challenge(HeaderMap::new()).with_prior(challenge(HeaderMap::new())));
    assert!(auth.authenticate(&exchange).is_some());
}

#[test]
fn test_custom_header_name() {
    let name = HeaderName::from_static("x-nc-auth");
    let auth = NextcloudAuthenticator::with_header(HeaderValue::from_static("token"), name.clone());

    let retry = auth.authenticate(&challenge(HeaderMap::new())).unwrap();
    assert_eq!(retry.get(&name).unwrap(), "token");
    assert!(retry.get(header::AUTHORIZATION).is_none());

    let mut sent = HeaderMap::new();
    sent.insert(name, HeaderValue::from_static("token"));
    assert!(auth.authenticate(&challenge(sent)).is_none());
}

#[test]
fn test_basic_header_value() {
    let value = Credentials::new("alice", "secret").to_header_value().unwrap();
    // base64("alice:secret")
    assert_eq!(value.to_str().unwrap(), "Basic YWxpY2U6c2VjcmV0");
    assert!(value.is_sensitive());
}

#[test]
fn test_credentials_debug_hides_password() {
    let debug = format!("{:?}", Credentials::new("alice", "secret"));
    assert!(debug.contains("alice"));
    assert!(!debug.contains("secret"));
}
