use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use super::{multipart_request, TestApp};
use crate::db;

fn post_body(title: &str, tags: &[&str]) -> Value {
    json!({
        "title": title,
        "content": format!("{} 본문", title),
        "tagNames": tags,
        "urls": []
    })
}

#[tokio::test]
async fn create_and_get_post_with_trimmed_unique_tags() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let id = app
        .create_post(&session, post_body("첫 글", &[" rust ", "rust", "", "axum"]))
        .await;

    let res = app.get(&format!("/api/post/{}", id)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "첫 글");
    assert_eq!(res.body["username"], "writer");
    assert!(res.body["folder"].is_null());
    assert!(res.body["createdAt"].is_string());

    let mut names: Vec<&str> = res.body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["axum", "rust"]);
}

#[tokio::test]
async fn tags_are_shared_between_posts() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let first = app.create_post(&session, post_body("하나", &["rust"])).await;
    let second = app.create_post(&session, post_body("둘", &["rust"])).await;

    let a = app.get(&format!("/api/post/{}", first)).await;
    let b = app.get(&format!("/api/post/{}", second)).await;
    assert_eq!(a.body["tags"][0]["id"], b.body["tags"][0]["id"]);

    let res = app.get("/api/tag/writer").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn only_owner_can_update_or_delete() {
    let app = TestApp::new().await;
    let owner = app.signup_and_login("owner@diglog.com").await;
    let other = app.signup_and_login("other@diglog.com").await;
    let id = app.create_post(&owner, post_body("내 글", &[])).await;

    let res = app
        .request(
            Method::PATCH,
            "/api/post",
            Some(&other.access_token),
            Some(json!({ "id": id, "title": "바꿈", "content": "바꿈", "tagNames": [], "urls": [] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error_code(), "POST_NO_PERMISSION");

    let res = app
        .request(
            Method::PATCH,
            &format!("/api/post/delete/{}", id),
            Some(&other.access_token),
            None,
        )
        .await;
    assert_eq!(res.error_code(), "POST_DELETE_FAILED");

    let res = app
        .request(
            Method::PATCH,
            "/api/post",
            Some(&owner.access_token),
            Some(json!({ "id": id, "title": "고친 글", "content": "고침", "tagNames": ["새태그"], "urls": [] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get(&format!("/api/post/{}", id)).await;
    assert_eq!(res.body["title"], "고친 글");
    assert_eq!(res.body["tags"][0]["name"], "새태그");
}

#[tokio::test]
async fn deleted_post_is_not_found() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;
    let id = app.create_post(&session, post_body("지울 글", &[])).await;

    let res = app
        .request(
            Method::PATCH,
            &format!("/api/post/delete/{}", id),
            Some(&session.access_token),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get(&format!("/api/post/{}", id)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error_code(), "POST_NOT_FOUND");

    let res = app
        .request(
            Method::PATCH,
            &format!("/api/post/delete/{}", id),
            Some(&session.access_token),
            None,
        )
        .await;
    assert_eq!(res.error_code(), "POST_DELETE_FAILED");
}

#[tokio::test]
async fn list_sorts_and_pages() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;
    for title in ["b", "c", "a"] {
        app.create_post(&session, post_body(title, &[])).await;
    }

    let res = app.get("/api/post?sorts=title&isDescending=false&size=2").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["content"][0]["title"], "a");
    assert_eq!(res.body["content"][1]["title"], "b");
    assert_eq!(res.body["page"]["totalElements"], 3);
    assert_eq!(res.body["page"]["totalPages"], 2);

    // 기본은 작성일 내림차순
    let res = app.get("/api/post").await;
    assert_eq!(res.body["content"][0]["title"], "a");

    let res = app.get("/api/post?sorts=views").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "POST_INVALID_SORT");
}

#[tokio::test]
async fn search_by_title_tag_or_both() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;
    app.create_post(&session, post_body("Rust 입문", &["lang"])).await;
    app.create_post(&session, post_body("일상", &["rustacean"])).await;
    app.create_post(&session, post_body("100% 완료", &[])).await;

    let res = app.get("/api/post/search?keyword=rust&option=TITLE").await;
    assert_eq!(res.body["page"]["totalElements"], 1);

    let res = app.get("/api/post/search?keyword=RUST&option=TAG").await;
    assert_eq!(res.body["page"]["totalElements"], 1);
    assert_eq!(res.body["content"][0]["title"], "일상");

    let res = app.get("/api/post/search?keyword=rust&option=ALL").await;
    assert_eq!(res.body["page"]["totalElements"], 2);

    // LIKE 와일드카드는 글자 그대로 찾습니다.
    let res = app.get("/api/post/search?keyword=%25&option=TITLE").await;
    assert_eq!(res.body["page"]["totalElements"], 1);

    let res = app.get("/api/post/search?keyword=rust&option=all").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "POST_INVALID_SEARCH_OPTION");
}

#[tokio::test]
async fn member_posts_by_folder_and_tag() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;

    let res = app
        .request(
            Method::PUT,
            "/api/folders",
            Some(&session.access_token),
            Some(json!([{ "title": "개발", "depth": 0, "orderIndex": 0 }])),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let folder_id = res.body[0]["folderId"].as_str().unwrap().to_string();

    let filed = app.create_post(&session, post_body("폴더 글", &["rust"])).await;
    app.create_post(&session, post_body("그냥 글", &[])).await;

    let res = app
        .request(
            Method::PATCH,
            "/api/post/folder",
            Some(&session.access_token),
            Some(json!({ "postIds": [filed], "folderId": folder_id })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app
        .get(&format!("/api/post/member?username=writer&folderIds={}", folder_id))
        .await;
    assert_eq!(res.body["page"]["totalElements"], 1);
    assert_eq!(res.body["content"][0]["folder"]["title"], "개발");

    let res = app.get("/api/post/member?username=writer").await;
    assert_eq!(res.body["page"]["totalElements"], 2);

    let res = app.get("/api/post/member?username=ghost").await;
    assert_eq!(res.error_code(), "MEMBER_USERNAME_NOT_FOUND");

    let post = app.get(&format!("/api/post/{}", filed)).await;
    let tag_id = post.body["tags"][0]["id"].as_str().unwrap().to_string();
    let res = app
        .get(&format!("/api/post/member/tag?username=writer&tagId={}", tag_id))
        .await;
    assert_eq!(res.body["page"]["totalElements"], 1);

    let res = app.get("/api/post/member/tag?username=writer&tagId=missing").await;
    assert_eq!(res.body["page"]["totalElements"], 0);
}

#[tokio::test]
async fn cannot_file_post_into_someone_elses_folder() {
    let app = TestApp::new().await;
    let owner = app.signup_and_login("owner@diglog.com").await;
    let other = app.signup_and_login("other@diglog.com").await;

    let res = app
        .request(
            Method::PUT,
            "/api/folders",
            Some(&owner.access_token),
            Some(json!([{ "title": "비밀", "depth": 0, "orderIndex": 0 }])),
        )
        .await;
    let folder_id = res.body[0]["folderId"].as_str().unwrap().to_string();

    let res = app
        .request(
            Method::POST,
            "/api/post",
            Some(&other.access_token),
            Some(json!({ "title": "t", "content": "c", "folderId": folder_id, "tagNames": [], "urls": [] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error_code(), "FOLDER_MEMBER_MISMATCH");
}

#[tokio::test]
async fn huge_page_number_returns_empty_page() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;
    app.create_post(&session, post_body("하나뿐인 글", &[])).await;

    let res = app.get("/api/post?page=9223372036854775807&size=10").await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["content"], json!([]));
    assert_eq!(res.body["page"]["totalElements"], 1);
}

#[tokio::test]
async fn update_diffs_post_images() {
    let app = TestApp::new().await;
    let session = app.signup_and_login("writer@diglog.com").await;
    let kept = app.upload_image(&session, b"kept").await;
    let dropped = app.upload_image(&session, b"dropped").await;
    let added = app.upload_image(&session, b"added").await;

    let mut body = post_body("사진 글", &[]);
    body["urls"] = json!([kept, dropped]);
    let id = app.create_post(&session, body).await;

    let res = app
        .request(
            Method::PATCH,
            "/api/post",
            Some(&session.access_token),
            Some(json!({ "id": id, "title": "사진 글", "content": "본문", "tagNames": [], "urls": [kept, added] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

    let mut urls = db::images::find_urls_by_ref(&app.state.pool, &id).await.unwrap();
    urls.sort();
    let mut expected = vec![kept.clone(), added.clone()];
    expected.sort();
    assert_eq!(urls, expected);

    assert!(app.stored_path(&kept).exists());
    assert!(app.stored_path(&added).exists());
    assert!(!app.stored_path(&dropped).exists());
}

#[tokio::test]
async fn dropping_someone_elses_image_keeps_their_file() {
    let app = TestApp::new().await;
    let owner = app.signup_and_login("owner@diglog.com").await;
    let other = app.signup_and_login("other@diglog.com").await;

    let res = app
        .send(multipart_request("/api/member/image", &owner.access_token, "image/png", b"me"))
        .await;
    let profile_url = res.body["url"].as_str().unwrap().to_string();

    let mut body = post_body("남의 사진", &[]);
    body["urls"] = json!([profile_url]);
    let id = app.create_post(&other, body).await;

    // 다른 회원이 가진 URL은 이 게시글의 이미지로 기록되지 않습니다.
    let urls = db::images::find_urls_by_ref(&app.state.pool, &id).await.unwrap();
    assert!(urls.is_empty());

    let res = app
        .request(
            Method::PATCH,
            "/api/post",
            Some(&other.access_token),
            Some(json!({ "id": id, "title": "남의 사진", "content": "본문", "tagNames": [], "urls": [] })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert!(app.stored_path(&profile_url).exists());
    let res = app.get(&profile_url.replace("http://localhost:8080", "")).await;
    assert_eq!(res.status, StatusCode::OK);
}
