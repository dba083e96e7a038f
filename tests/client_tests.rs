use instagraph::client::AccountClient;
use instagraph::error::GraphError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AccountClient {
    AccountClient::new("TOKEN", "IG1").with_graph_url(server.uri())
}

#[tokio::test]
async fn profile_requests_documented_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/IG1"))
        .and(query_param(
            "fields",
            "id,username,profile_picture_url,followers_count,media_count",
        ))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "IG1",
            "username": "my_shop",
            "followers_count": 4521,
            "media_count": 87
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).profile().await.expect("profile");

    assert_eq!(profile.id, "IG1");
    assert_eq!(profile.username.as_deref(), Some("my_shop"));
    assert_eq!(profile.followers_count, Some(4521));
    assert_eq!(profile.media_count, Some(87));
    assert_eq!(profile.profile_picture_url, None);
}

#[tokio::test]
async fn recent_media_passes_the_limit_and_preserves_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/IG1/media"))
        .and(query_param("limit", "5"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "M2",
                    "caption": "Newest",
                    "media_type": "IMAGE",
                    "permalink": "https://www.instagram.com/p/M2/",
                    "timestamp": "2024-05-01T12:00:00+0000",
                    "like_count": 10,
                    "comments_count": 2
                },
                {"id": "M1", "media_type": "VIDEO"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let media = client(&server).recent_media(5).await.expect("media");

    assert_eq!(media.len(), 2);
    assert_eq!(media[0].id, "M2");
    assert_eq!(media[0].caption.as_deref(), Some("Newest"));
    assert_eq!(media[0].like_count, Some(10));
    assert_eq!(media[1].id, "M1");
    assert_eq!(media[1].caption, None);
}

#[tokio::test]
async fn recent_media_with_no_posts_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/IG1/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let media = client(&server).recent_media(10).await.expect("media");
    assert!(media.is_empty());
}

#[tokio::test]
async fn create_media_posts_query_parameters_and_returns_container_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/IG1/media"))
        .and(query_param("image_url", "https://example.com/cat.jpg"))
        .and(query_param("caption", "A cat"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "CREATION1"})))
        .expect(1)
        .mount(&server)
        .await;

    let creation_id = client(&server)
        .create_media("https://example.com/cat.jpg", "A cat")
        .await
        .expect("creation id");

    assert_eq!(creation_id, "CREATION1");
}

#[tokio::test]
async fn publish_media_sends_the_creation_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/IG1/media_publish"))
        .and(query_param("creation_id", "CREATION1"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "MEDIA9"})))
        .expect(1)
        .mount(&server)
        .await;

    let media_id = client(&server)
        .publish_media("CREATION1")
        .await
        .expect("media id");

    assert_eq!(media_id, "MEDIA9");
}

#[tokio::test]
async fn insights_maps_metric_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/IG1/insights"))
        .and(query_param("metric", "impressions"))
        .and(query_param("period", "day"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "name": "impressions",
                "period": "day",
                "title": "Impressions",
                "values": [
                    {"value": 1234, "end_time": "2024-05-01T07:00:00+0000"},
                    {"value": 1401, "end_time": "2024-05-02T07:00:00+0000"}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let insights = client(&server)
        .insights("impressions", "day")
        .await
        .expect("insights");

    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].name, "impressions");
    assert_eq!(insights[0].period.as_deref(), Some("day"));
    assert_eq!(insights[0].values.len(), 2);
    assert_eq!(insights[0].values[0].value, Some(json!(1234)));
}

#[tokio::test]
async fn comments_requests_documented_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/M1/comments"))
        .and(query_param("fields", "id,text,username,timestamp,like_count"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "C1", "text": "Nice!", "username": "fan_one", "like_count": 3},
                {"id": "C2", "text": "🔥"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comments = client(&server).comments("M1").await.expect("comments");

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, "C1");
    assert_eq!(comments[0].username.as_deref(), Some("fan_one"));
    assert_eq!(comments[1].text.as_deref(), Some("🔥"));
}

#[tokio::test]
async fn reply_to_comment_returns_the_reply_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/C1/replies"))
        .and(query_param("message", "Thanks!"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "R1"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply_id = client(&server)
        .reply_to_comment("C1", "Thanks!")
        .await
        .expect("reply id");

    assert_eq!(reply_id, "R1");
}

#[tokio::test]
async fn non_success_status_becomes_a_typed_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/IG1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"type": "OAuthException", "message": "Permissions error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).profile().await;

    assert!(matches!(
        result,
        Err(GraphError::Api { status: 403, ref body }) if body.contains("OAuthException")
    ));
}

#[tokio::test]
async fn for_page_resolves_the_connected_business_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/PAGE1"))
        .and(query_param("fields", "instagram_business_account"))
        .and(query_param("access_token", "TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "PAGE1",
            "instagram_business_account": {"id": "IG9"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AccountClient::for_page_with_graph_url(&server.uri(), "TOKEN", "PAGE1")
        .await
        .expect("client");

    assert_eq!(client.account_id(), "IG9");
}

#[tokio::test]
async fn for_page_without_a_linked_account_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/PAGE1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "PAGE1"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = AccountClient::for_page_with_graph_url(&server.uri(), "TOKEN", "PAGE1").await;

    assert!(matches!(
        result,
        Err(GraphError::NoLinkedAccount(page)) if page == "PAGE1"
    ));
}
