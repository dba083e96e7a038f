use std::time::{Duration, Instant};

use instagraph::auth::{AuthError, CallbackServer};

async fn get(url: String) -> reqwest::Response {
    reqwest::get(url).await.expect("request")
}

#[tokio::test]
async fn callback_with_code_responds_200_and_captures() {
    let server = CallbackServer::bind(0).await.expect("bind");
    let base = format!("http://{}", server.local_addr());

    let resp = get(format!("{base}/callback?code=ABC")).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(server.code().as_deref(), Some("ABC"));
    server.shutdown().await;
}

#[tokio::test]
async fn callback_without_code_responds_400_and_captures_nothing() {
    let server = CallbackServer::bind(0).await.expect("bind");
    let base = format!("http://{}", server.local_addr());

    let resp = get(format!("{base}/callback")).await;

    assert_eq!(resp.status().as_u16(), 400);
    assert!(server.code().is_none());
    server.shutdown().await;
}

#[tokio::test]
async fn other_paths_respond_404_without_touching_the_slot() {
    let server = CallbackServer::bind(0).await.expect("bind");
    let base = format!("http://{}", server.local_addr());

    let resp = get(format!("{base}/other?code=NOPE")).await;
    assert_eq!(resp.status().as_u16(), 404);
    assert!(server.code().is_none());

    // A captured code survives later stray requests.
    get(format!("{base}/callback?code=ABC")).await;
    let resp = get(format!("{base}/other")).await;
    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(server.code().as_deref(), Some("ABC"));
    server.shutdown().await;
}

#[tokio::test]
async fn first_captured_code_wins() {
    let server = CallbackServer::bind(0).await.expect("bind");
    let base = format!("http://{}", server.local_addr());

    let first = get(format!("{base}/callback?code=FIRST")).await;
    let second = get(format!("{base}/callback?code=SECOND")).await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(server.code().as_deref(), Some("FIRST"));
    server.shutdown().await;
}

#[tokio::test]
async fn wait_for_code_returns_soon_after_the_redirect() {
    let server = CallbackServer::bind(0).await.expect("bind");
    let base = format!("http://{}", server.local_addr());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = reqwest::get(format!("{base}/callback?code=ABC")).await;
    });

    let started = Instant::now();
    let code = server
        .wait_for_code(Duration::from_secs(5))
        .await
        .expect("code");

    assert_eq!(code, "ABC");
    // One poll interval after the redirect, well under the ceiling.
    assert!(started.elapsed() < Duration::from_secs(3));
    server.shutdown().await;
}

#[tokio::test]
async fn wait_for_code_reports_timeout_when_nothing_arrives() {
    let server = CallbackServer::bind(0).await.expect("bind");

    let started = Instant::now();
    let result = server.wait_for_code(Duration::from_secs(2)).await;

    assert!(matches!(
        result,
        Err(AuthError::Timeout { waited_secs: 2 })
    ));
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(started.elapsed() < Duration::from_secs(4));
    server.shutdown().await;
}

#[tokio::test]
async fn wait_for_code_reports_timeout_when_the_code_arrives_late() {
    let server = CallbackServer::bind(0).await.expect("bind");
    let base = format!("http://{}", server.local_addr());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        let _ = reqwest::get(format!("{base}/callback?code=LATE")).await;
    });

    let result = server.wait_for_code(Duration::from_secs(2)).await;

    assert!(matches!(result, Err(AuthError::Timeout { .. })));
    server.shutdown().await;
}
