//! Remote generation client against a mock HTTP service.

use std::time::Duration;

use foobi_generation::{
    canned_concepts, ConceptGenerator, GenerateConceptsResponse, GenerationClient,
    GenerationClientConfig, GenerationError, RenderedVideo, VideoRenderer,
};
use foobi_models::CreativeBrief;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn brief() -> CreativeBrief {
    CreativeBrief {
        title: "春の新作コスメ".to_string(),
        description: "新作リップのプロモーション".to_string(),
        target_audience: "20代女性".to_string(),
        length_secs: 30,
        model: "pro".to_string(),
    }
}

fn client(server: &MockServer, max_retries: u32) -> GenerationClient {
    GenerationClient::new(GenerationClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        max_retries,
    })
    .unwrap()
}

#[tokio::test]
async fn generates_concepts_from_service() {
    let server = MockServer::start().await;
    let response = GenerateConceptsResponse {
        concepts: canned_concepts(&brief()),
    };

    Mock::given(method("POST"))
        .and(path("/v1/concepts"))
        .and(body_partial_json(json!({ "title": "春の新作コスメ", "model": "pro" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let concepts = client(&server, 0).generate_concepts(&brief()).await.unwrap();
    assert_eq!(concepts.len(), 3);
    assert_eq!(concepts[0].scenes.last().unwrap().end_time, 30);
}

#[tokio::test]
async fn rejects_broken_timeline() {
    let server = MockServer::start().await;
    let body = json!({
        "concepts": [{
            "id": 7,
            "title": "gap",
            "description": "",
            "script": "",
            "bgm": "",
            "scenes": [
                { "id": 1, "title": "a", "description": "", "startTime": 0, "endTime": 5, "content": "" },
                { "id": 2, "title": "b", "description": "", "startTime": 6, "endTime": 10, "content": "" }
            ]
        }]
    });

    Mock::given(method("POST"))
        .and(path("/v1/concepts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client(&server, 0)
        .generate_concepts(&brief())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidTimeline { concept_id: 7, .. }));
}

#[tokio::test]
async fn retries_server_errors_then_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/concepts"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server, 1)
        .generate_concepts(&brief())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/renders"))
        .respond_with(ResponseTemplate::new(422).set_body_string("unknown model"))
        .expect(1)
        .mount(&server)
        .await;

    let concept = canned_concepts(&brief()).remove(0);
    let err = client(&server, 3)
        .render_video(&brief(), &concept)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::RequestFailed(_)));
}

#[tokio::test]
async fn renders_video() {
    let server = MockServer::start().await;
    let video = RenderedVideo {
        video_url: "https://cdn.example.com/out.mp4".to_string(),
        thumbnail_url: "https://cdn.example.com/out.jpg".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/v1/renders"))
        .and(body_partial_json(json!({ "concept": { "id": 2 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&video))
        .mount(&server)
        .await;

    let concept = canned_concepts(&brief()).remove(1);
    let rendered = client(&server, 0).render_video(&brief(), &concept).await.unwrap();
    assert_eq!(rendered, video);
}

#[tokio::test]
async fn health_check_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    assert!(client(&server, 0).health_check().await.unwrap());
}
