//! REST surface tests driven through `warp::test`

use crate::integration::test_utils::{page_widths, pdf_with_widths, Desk};
use scandesk::server;
use scandesk::types::{DocumentEntry, DocumentId, Location, DOCUMENT_ID_LEN};
use serde_json::{json, Value};
use std::fs;
use warp::http::StatusCode;

fn body_json(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

fn unknown_id() -> String {
    DocumentId::from_bytes([9; DOCUMENT_ID_LEN]).to_hex()
}

#[tokio::test]
async fn test_list_returns_names_and_ids() {
    let desk = Desk::concat();
    let a = desk.put("a.pdf", b"a");
    let routes = server::routes(desk.store.clone(), None);

    let response = warp::test::request()
        .method("GET")
        .path("/api/documents/list")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let entries: Vec<DocumentEntry> = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(entries, vec![DocumentEntry { name: "a.pdf".into(), id: a }]);
    assert_eq!(entries[0].id.to_hex().len(), 2 * DOCUMENT_ID_LEN);
}

#[tokio::test]
async fn test_list_outdir() {
    let desk = Desk::concat();
    fs::write(desk.output.join("done.pdf"), b"d").unwrap();
    let routes = server::routes(desk.store.clone(), None);

    let response = warp::test::request()
        .path("/api/documents/list_outdir")
        .reply(&routes)
        .await;

    let body = body_json(&response);
    assert_eq!(body[0]["name"], "done.pdf");
    assert_eq!(
        body[0]["id"],
        desk.id_of(Location::Output, "done.pdf").to_hex()
    );
}

#[tokio::test]
async fn test_fetch_inline_and_download() {
    let desk = Desk::concat();
    let a = desk.put("scan.pdf", b"%PDF-bytes");
    let routes = server::routes(desk.store.clone(), None);

    let inline = warp::test::request()
        .path(&format!("/api/documents/{}", a))
        .reply(&routes)
        .await;
    assert_eq!(inline.status(), StatusCode::OK);
    assert_eq!(inline.body().as_ref(), b"%PDF-bytes");
    assert_eq!(inline.headers()["content-type"], "application/pdf");
    assert_eq!(
        inline.headers()["content-disposition"],
        "inline; filename=\"scan.pdf\""
    );

    let download = warp::test::request()
        .path(&format!("/api/documents/{}/download", a))
        .reply(&routes)
        .await;
    assert_eq!(
        download.headers()["content-disposition"],
        "attachment; filename=\"scan.pdf\""
    );
}

#[tokio::test]
async fn test_unresolved_and_malformed_ids_answer_false() {
    let desk = Desk::concat();
    let routes = server::routes(desk.store.clone(), None);

    for path in [
        format!("/api/documents/{}", unknown_id()),
        "/api/documents/not-hex".to_string(),
    ] {
        let response = warp::test::request().path(&path).reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(&response), json!(false));
    }

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/documents/{}", unknown_id()))
        .reply(&routes)
        .await;
    assert_eq!(body_json(&response), json!(false));
}

#[tokio::test]
async fn test_rename_success_and_conflict() {
    let desk = Desk::concat();
    let a = desk.put("a.pdf", b"a");
    desk.put("taken.pdf", b"t");
    let routes = server::routes(desk.store.clone(), None);

    let conflict = warp::test::request()
        .method("POST")
        .path(&format!("/api/documents/{}", a))
        .json(&json!({ "name": "taken.pdf" }))
        .reply(&routes)
        .await;
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(&conflict)["error"], "conflict");

    let renamed = warp::test::request()
        .method("POST")
        .path(&format!("/api/documents/{}", a))
        .json(&json!({ "name": "invoice.pdf" }))
        .reply(&routes)
        .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    assert_eq!(body_json(&renamed), json!(true));
    assert_eq!(desk.names(Location::Inbox), vec!["invoice.pdf", "taken.pdf"]);
}

#[tokio::test]
async fn test_rename_with_bad_body_is_rejected() {
    let desk = Desk::concat();
    let a = desk.put("a.pdf", b"a");
    let routes = server::routes(desk.store.clone(), None);

    let response = warp::test::request()
        .method("POST")
        .path(&format!("/api/documents/{}", a))
        .body("{\"nom\": 1}")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(desk.names(Location::Inbox), vec!["a.pdf"]);
}

#[tokio::test]
async fn test_delete_and_move() {
    let desk = Desk::concat();
    let a = desk.put("a.pdf", b"a");
    let b = desk.put("b.pdf", b"b");
    let routes = server::routes(desk.store.clone(), None);

    let deleted = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/documents/{}", a))
        .reply(&routes)
        .await;
    assert_eq!(body_json(&deleted), json!(true));

    let moved = warp::test::request()
        .method("POST")
        .path(&format!("/api/documents/{}/move_to_outdir", b))
        .reply(&routes)
        .await;
    assert_eq!(body_json(&moved), json!(true));

    assert!(desk.names(Location::Inbox).is_empty());
    assert_eq!(desk.names(Location::Output), vec!["b.pdf"]);
}

#[tokio::test]
async fn test_merge_in_request_order() {
    let desk = Desk::pdf();
    let a = desk.put("a.pdf", &pdf_with_widths(&[100]));
    let b = desk.put("b.pdf", &pdf_with_widths(&[200, 201]));
    let routes = server::routes(desk.store.clone(), None);

    let response = warp::test::request()
        .method("POST")
        .path("/api/documents/merge")
        .json(&json!({ "ids": [b.to_hex(), a.to_hex()], "name": "c.pdf" }))
        .reply(&routes)
        .await;
    assert_eq!(body_json(&response), json!(true));
    assert_eq!(page_widths(&desk.inbox.join("c.pdf")), vec![200, 201, 100]);
}

#[tokio::test]
async fn test_merge_of_stale_ids_answers_false() {
    let desk = Desk::concat();
    let routes = server::routes(desk.store.clone(), None);

    let response = warp::test::request()
        .method("POST")
        .path("/api/documents/merge")
        .json(&json!({ "ids": [unknown_id()], "name": "c.pdf" }))
        .reply(&routes)
        .await;
    assert_eq!(body_json(&response), json!(false));
    assert!(desk.names(Location::Inbox).is_empty());
}

#[tokio::test]
async fn test_merge_with_invalid_request_is_rejected() {
    let desk = Desk::concat();
    let routes = server::routes(desk.store.clone(), None);

    for body in [
        json!({ "ids": [], "name": "c.pdf" }),
        json!({ "ids": ["zz"], "name": "c.pdf" }),
        json!({ "name": "c.pdf" }),
    ] {
        let response = warp::test::request()
            .method("POST")
            .path("/api/documents/merge")
            .json(&body)
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let desk = Desk::concat();
    let routes = server::routes(desk.store.clone(), None);

    let response = warp::test::request()
        .path("/api/nothing/here")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_files_served_next_to_api() {
    let desk = Desk::concat();
    let site = tempfile::TempDir::new().unwrap();
    fs::write(site.path().join("index.html"), "<html></html>").unwrap();
    let routes = server::routes(desk.store.clone(), Some(site.path().to_path_buf()));

    let page = warp::test::request().path("/index.html").reply(&routes).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert_eq!(page.body().as_ref(), b"<html></html>");

    let api = warp::test::request()
        .path("/api/documents/list")
        .reply(&routes)
        .await;
    assert_eq!(body_json(&api), json!([]));
}
