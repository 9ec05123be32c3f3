mod common;

use std::net::TcpListener;

use actix_web::{rt, HttpServer};
use bookshelf_api::build_app;
use common::{test_config, test_state};
use serde_json::json;

#[actix_rt::test]
async fn test_cookie_session_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _store) = test_state(test_config(dir.path()));

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || build_app(state.clone()))
        .workers(1)
        .listen(listener)
        .expect("Failed to listen")
        .run();
    let handle = server.handle();
    rt::spawn(server);

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    let resp = client
        .get(format!("{}/api/auth/me", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    let credentials = json!({ "username": "gina", "password": "pw" });
    let resp = client
        .post(format!("{}/register", base))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let resp = client
        .post(format!("{}/api/auth/login", base))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    // The cookie jar now carries the session.
    let resp = client
        .get(format!("{}/api/auth/me", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let me: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(me["username"], "gina");

    let resp = client
        .post(format!("{}/api/auth/logout", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let resp = client
        .get(format!("{}/api/auth/me", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    handle.stop(true).await;
}
