//! End-to-end serving: emit a site, then fetch its artifacts over the router.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use imprint_emitter::{EmitOptions, emit};
use imprint_search::SearchIndex;
use imprint_site::{CompileOptions, compile};
use imprint_storage::MemoryStore;

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_emitted_site_round_trips_through_the_server() {
    let store = MemoryStore::new()
        .with_file("index.md", "# Home\n\nWelcome.")
        .with_file(
            "01-guide/01-install.md",
            "---\ntitle: Install\n---\n\nDownload the binary.",
        );
    let site = compile(&store, &CompileOptions::default()).unwrap();
    let pages = site
        .pages
        .iter()
        .map(|page| (page.route.as_str(), page.sections.as_slice()));
    let index = SearchIndex::build(&site.manifest.generation, pages);
    let out = tempfile::tempdir().unwrap();
    let options = EmitOptions::new(out.path().join("dist"));
    emit(&site, &index, &store, &options).unwrap();

    let router = imprint_server::router(&options.output_dir);

    // Payload by its emitted path.
    let (status, body) = get(router.clone(), "/payloads/guide/install.json").await;
    assert_eq!(status, StatusCode::OK);
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["title"], "Install");
    assert_eq!(
        payload["generation"].as_str().unwrap(),
        site.manifest.generation
    );

    // Search index and manifest resolve as files.
    let (status, body) = get(router.clone(), "/search-index.json").await;
    assert_eq!(status, StatusCode::OK);
    let search: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(search["entries"].get("download").is_some());

    // Deep link into a client route serves the shell.
    let (status, body) = get(router, "/guide/install").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("imprint:generation"));
    assert!(html.contains("id=\"content\""));
}
