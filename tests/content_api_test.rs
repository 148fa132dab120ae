//! Catalog API integration tests
//!
//! Uploads, browsing, deletion and watch progress through the router.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_bytes, body_json, multipart_request, sample_bytes, Part, TestHarness};
use serde_json::{json, Value};

async fn upload_movie(harness: &TestHarness, title: &str, video: &[u8]) -> Value {
    let response = harness
        .send(multipart_request(
            "POST",
            "/api/content",
            &[
                Part::Text("title", title),
                Part::Text("type", "movie"),
                Part::Text("year", "2008"),
                Part::File {
                    name: "video",
                    file_name: "Movie.MP4",
                    data: video,
                },
                Part::File {
                    name: "thumbnail",
                    file_name: "poster.jpg",
                    data: b"jpeg",
                },
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn create_series(harness: &TestHarness, title: &str) -> String {
    let response = harness
        .send(multipart_request(
            "POST",
            "/api/content",
            &[Part::Text("title", title), Part::Text("type", "series")],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

fn stored_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn test_health_endpoint() {
    let harness = TestHarness::new().await;
    let response = harness.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_then_stream_back() {
    let harness = TestHarness::new().await;
    let video = sample_bytes(50_000);

    let created = upload_movie(&harness, "Big Buck Bunny", &video).await;
    assert_eq!(created["message"], "Content uploaded successfully");

    let video_path = created["video_path"].as_str().unwrap();
    assert!(video_path.starts_with("/media/videos/"));
    assert!(video_path.ends_with(".mp4"));
    assert!(created["thumbnail"]
        .as_str()
        .unwrap()
        .starts_with("/media/thumbnails/"));

    // By bare file name through the range streamer
    let file_name = video_path.rsplit('/').next().unwrap();
    let response = harness
        .get_range(&format!("/stream/{}", file_name), "bytes=100-199")
        .await;
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(body_bytes(response).await, &video[100..200]);

    // By public path through the static media route
    let response = harness.get(video_path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, video);
}

#[tokio::test]
async fn test_get_content_by_id() {
    let harness = TestHarness::new().await;
    let created = upload_movie(&harness, "Sintel", b"video").await;
    let id = created["id"].as_str().unwrap();

    let response = harness.get(&format!("/api/content/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["title"], "Sintel");
    assert_eq!(body["type"], "movie");
    assert_eq!(body["year"], 2008);
    assert!(body.get("episodes").is_none());
}

#[tokio::test]
async fn test_get_missing_content() {
    let harness = TestHarness::new().await;

    for id in ["2b1c3f9e-0000-4000-8000-000000000000", "not-a-uuid"] {
        let response = harness.get(&format!("/api/content/{}", id)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Content not found");
    }
}

#[tokio::test]
async fn test_upload_requires_title_and_cleans_up() {
    let harness = TestHarness::new().await;

    let response = harness
        .send(multipart_request(
            "POST",
            "/api/content",
            &[Part::File {
                name: "video",
                file_name: "a.mp4",
                data: b"orphan",
            }],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stored_files(harness.ctx.store.videos_dir()), 0);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let mut config = homestream::config::Config::default();
    config.media.max_upload_bytes = 1024;
    let harness = TestHarness::with_config(config).await;

    let response = harness
        .send(multipart_request(
            "POST",
            "/api/content",
            &[
                Part::Text("title", "Too big"),
                Part::File {
                    name: "video",
                    file_name: "big.mp4",
                    data: &sample_bytes(4096),
                },
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(stored_files(harness.ctx.store.videos_dir()), 0);
}

#[tokio::test]
async fn test_list_filter_recent_and_search() {
    let harness = TestHarness::new().await;
    upload_movie(&harness, "Elephants Dream", b"a").await;
    create_series(&harness, "Tears of Steel").await;
    upload_movie(&harness, "Cosmos Laundromat", b"b").await;

    let all = body_json(harness.get("/api/content").await).await;
    let titles: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Cosmos Laundromat", "Tears of Steel", "Elephants Dream"]);

    let series = body_json(harness.get("/api/content/type/series").await).await;
    assert_eq!(series.as_array().unwrap().len(), 1);
    let movies = body_json(harness.get("/api/content/type/movies").await).await;
    assert_eq!(movies.as_array().unwrap().len(), 2);

    let response = harness.get("/api/content/type/documentary").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let recent = body_json(harness.get("/api/content/recent/1").await).await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
    assert_eq!(recent[0]["title"], "Cosmos Laundromat");

    let found = body_json(harness.get("/api/content/search?q=dream").await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Elephants Dream");
}

#[tokio::test]
async fn test_add_episodes_to_series() {
    let harness = TestHarness::new().await;
    let series_id = create_series(&harness, "Show").await;

    for (season, episode) in [("2", "1"), ("1", "2"), ("1", "1")] {
        let response = harness
            .send(multipart_request(
                "POST",
                &format!("/api/content/{}/episodes", series_id),
                &[
                    Part::Text("season", season),
                    Part::Text("episode", episode),
                    Part::Text("title", &format!("S{}E{}", season, episode)),
                    Part::File {
                        name: "video",
                        file_name: "ep.webm",
                        data: b"episode",
                    },
                ],
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["message"], "Episode added successfully");
    }

    let detail = body_json(harness.get(&format!("/api/content/{}", series_id)).await).await;
    assert_eq!(detail["type"], "series");
    let titles: Vec<_> = detail["episodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["S1E1", "S1E2", "S2E1"]);
    assert!(detail["episodes"][0]["video_path"]
        .as_str()
        .unwrap()
        .ends_with(".webm"));
}

#[tokio::test]
async fn test_add_episode_errors() {
    let harness = TestHarness::new().await;
    let movie = upload_movie(&harness, "Film", b"v").await;
    let movie_id = movie["id"].as_str().unwrap();

    let response = harness
        .send(multipart_request(
            "POST",
            &format!("/api/content/{}/episodes", movie_id),
            &[Part::Text("title", "Nope")],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Can only add episodes to series"
    );

    let response = harness
        .send(multipart_request(
            "POST",
            "/api/content/2b1c3f9e-0000-4000-8000-000000000000/episodes",
            &[Part::Text("title", "Nope")],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Series not found");
}

#[tokio::test]
async fn test_delete_removes_record_and_files() {
    let harness = TestHarness::new().await;
    let created = upload_movie(&harness, "Doomed", b"bytes").await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(stored_files(harness.ctx.store.videos_dir()), 1);
    assert_eq!(stored_files(harness.ctx.store.thumbnails_dir()), 1);

    let delete = |uri: String| Request::delete(uri).body(Body::empty()).unwrap();

    let response = harness.send(delete(format!("/api/content/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Content deleted successfully");

    assert_eq!(stored_files(harness.ctx.store.videos_dir()), 0);
    assert_eq!(stored_files(harness.ctx.store.thumbnails_dir()), 0);

    let response = harness.get(&format!("/api/content/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = harness.send(delete(format!("/api/content/{}", id))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_watch_progress_round_trip() {
    let harness = TestHarness::new().await;
    let created = upload_movie(&harness, "Film", b"v").await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/content/{}/progress", id);

    let response = harness.get(&uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let put = Request::put(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "position_secs": 93.5, "duration_secs": 600.0 }).to_string(),
        ))
        .unwrap();
    let response = harness.send(put).await;
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(harness.get(&uri).await).await;
    assert_eq!(saved["position_secs"], 93.5);
    assert_eq!(saved["duration_secs"], 600.0);

    let list = body_json(harness.get("/api/progress").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["content_id"], id);
}

#[tokio::test]
async fn test_progress_rejects_unknown_episode_and_negative_position() {
    let harness = TestHarness::new().await;
    let series_id = create_series(&harness, "Show").await;
    let uri = format!("/api/content/{}/progress", series_id);

    let put = |body: Value| {
        Request::put(&uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = harness
        .send(put(json!({
            "episode_id": "2b1c3f9e-0000-4000-8000-000000000000",
            "position_secs": 1.0
        })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = harness.send(put(json!({ "position_secs": -5.0 }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
