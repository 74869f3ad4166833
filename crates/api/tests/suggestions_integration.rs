//! Integration tests for suggestions, likes, comments and suggestion invitations.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, TestUser};
use serde_json::json;
use uuid::Uuid;

async fn join_group(app: &TestApp, user: &TestUser, code: &str) {
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/groups/join",
            Some(&user.token),
            Some(json!({ "invitation_code": code })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_suggestion_increments_counters() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;

    let (suggestion_id, code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    assert!(code.starts_with("sug"));
    assert!(code.ends_with("S0s"));

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/suggestions/{}", suggestion_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dark mode");
    assert_eq!(body["has_liked"], false);
    assert_eq!(body["likes_count"], 0);

    let (_, me) = app
        .call(Method::GET, "/api/v1/users/me", Some(&owner.token), None)
        .await;
    assert_eq!(me["suggestions_count"], 1);
}

#[tokio::test]
async fn test_stranger_cannot_post_in_group() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let stranger = app.register("stranger").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/suggestions",
            Some(&stranger.token),
            Some(json!({
                "group_id": group_id,
                "title": "Spam",
                "description": "",
                "end_goal": 10,
                "status": "open",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.store.snapshot().await.suggestions.is_empty());
}

#[tokio::test]
async fn test_create_suggestion_in_missing_group_is_not_found() {
    let app = TestApp::new();
    let owner = app.register("owner").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/suggestions",
            Some(&owner.token),
            Some(json!({
                "group_id": Uuid::new_v4(),
                "title": "Dark mode",
                "description": "",
                "end_goal": 10,
                "status": "open",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_group_member_sees_all_suggestions() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let member = app.register("member").await;
    let (group_id, code) = app.create_group(&owner, "Roadmap").await;
    app.create_suggestion(&owner, &group_id, "Dark mode").await;
    app.create_suggestion(&owner, &group_id, "Offline sync").await;
    join_group(&app, &member, &code).await;

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/groups/{}/suggestions", group_id),
            Some(&member.token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_suggestion_invitee_sees_only_joined_suggestion() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let guest = app.register("guest").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;
    let (visible_id, visible_code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    let (hidden_id, _) = app.create_suggestion(&owner, &group_id, "Offline sync").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/join",
            Some(&guest.token),
            Some(json!({ "invitation_code": visible_code })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["invitation_id"].is_string());

    let (_, listed) = app
        .call(
            Method::GET,
            &format!("/api/v1/groups/{}/suggestions", group_id),
            Some(&guest.token),
            None,
        )
        .await;
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["data"][0]["id"], visible_id.as_str());

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/api/v1/suggestions/{}", hidden_id),
            Some(&guest.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/suggestions",
            Some(&guest.token),
            Some(json!({
                "group_id": group_id,
                "title": "Not allowed",
                "description": "",
                "end_goal": 5,
                "status": "open",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_join_suggestion_twice_is_conflict() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let guest = app.register("guest").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;
    let (_, code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;

    let join = json!({ "invitation_code": code });
    let (first, _) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/join",
            Some(&guest.token),
            Some(join.clone()),
        )
        .await;
    let (second, body) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/join",
            Some(&guest.token),
            Some(join),
        )
        .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(app.store.snapshot().await.suggestion_invitations.len(), 1);
}

#[tokio::test]
async fn test_join_unknown_suggestion_is_not_found() {
    let app = TestApp::new();
    let guest = app.register("guest").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/join",
            Some(&guest.token),
            Some(json!({ "invitation_code": "sugAAAAA0000BBBBBS0s" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_masks_suggestion_for_non_owner() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let stranger = app.register("stranger").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    app.call(
        Method::POST,
        &format!("/api/v1/suggestions/{}/like", suggestion_id),
        Some(&owner.token),
        None,
    )
    .await;

    let search = json!({ "invitation_code": code });
    let (status, masked) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/search",
            Some(&stranger.token),
            Some(search.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(masked["view"], "masked");
    assert_eq!(masked["title"], "Dark mode");
    assert_eq!(masked["likes_count"], 0);
    assert_eq!(masked["end_goal"], 0);
    assert_eq!(masked["status"], "private");
    assert!(masked.get("description").is_none());

    let (_, full) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/search",
            Some(&owner.token),
            Some(search),
        )
        .await;
    assert_eq!(full["view"], "full");
    assert_eq!(full["likes_count"], 1);
    assert_eq!(full["end_goal"], 50);
}

#[tokio::test]
async fn test_search_unknown_code_is_null() {
    let app = TestApp::new();
    let user = app.register("someone").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/search",
            Some(&user.token),
            Some(json!({ "invitation_code": "sugAAAAA0000BBBBBS0s" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_toggle_like_flips_state_and_count() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let member = app.register("member").await;
    let (group_id, code) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, _) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    join_group(&app, &member, &code).await;

    let like_uri = format!("/api/v1/suggestions/{}/like", suggestion_id);
    let detail_uri = format!("/api/v1/suggestions/{}", suggestion_id);

    let (status, body) = app
        .call(Method::POST, &like_uri, Some(&member.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["liked"], true);

    let (_, details) = app
        .call(Method::GET, &detail_uri, Some(&member.token), None)
        .await;
    assert_eq!(details["likes_count"], 1);
    assert_eq!(details["has_liked"], true);

    let (_, owner_view) = app
        .call(Method::GET, &detail_uri, Some(&owner.token), None)
        .await;
    assert_eq!(owner_view["has_liked"], false);

    let (_, body) = app
        .call(Method::POST, &like_uri, Some(&member.token), None)
        .await;
    assert_eq!(body["liked"], false);

    let (_, details) = app
        .call(Method::GET, &detail_uri, Some(&member.token), None)
        .await;
    assert_eq!(details["likes_count"], 0);
    assert!(app.store.snapshot().await.likes.is_empty());
}

#[tokio::test]
async fn test_stranger_cannot_like() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let stranger = app.register("stranger").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, _) = app.create_suggestion(&owner, &group_id, "Dark mode").await;

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/suggestions/{}/like", suggestion_id),
            Some(&stranger.token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_comments_flow() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let member = app.register("member").await;
    let (group_id, code) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, _) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    join_group(&app, &member, &code).await;

    let comments_uri = format!("/api/v1/suggestions/{}/comments", suggestion_id);

    let (status, created) = app
        .call(
            Method::POST,
            &comments_uri,
            Some(&member.token),
            Some(json!({ "content": "Yes please" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = app
        .call(Method::GET, &comments_uri, Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["data"][0]["content"], "Yes please");
    assert_eq!(listed["data"][0]["username"], "member");

    let (_, details) = app
        .call(
            Method::GET,
            &format!("/api/v1/suggestions/{}", suggestion_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(details["comments_count"], 1);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/comments/{}", comment_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/comments/{}", comment_id),
            Some(&member.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (_, me) = app
        .call(Method::GET, "/api/v1/users/me", Some(&member.token), None)
        .await;
    assert_eq!(me["comments_count"], 0);
}

#[tokio::test]
async fn test_blank_comment_is_rejected() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, _) = app.create_suggestion(&owner, &group_id, "Dark mode").await;

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/suggestions/{}/comments", suggestion_id),
            Some(&owner.token),
            Some(json!({ "content": "   " })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_suggestion_requires_owner() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let member = app.register("member").await;
    let (group_id, group_code) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    join_group(&app, &member, &group_code).await;

    let edit = json!({
        "invitation_code": code,
        "status": "rejected",
        "end_goal": 75,
    });
    let uri = format!("/api/v1/suggestions/{}", suggestion_id);

    let (status, _) = app
        .call(Method::PATCH, &uri, Some(&member.token), Some(edit.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&owner.token), Some(edit))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["end_goal"], 75);
}

#[tokio::test]
async fn test_regenerate_suggestion_code() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let guest = app.register("guest").await;
    let (group_id, _) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, old_code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/suggestions/{}/invitation-code", suggestion_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["invitation_code"], old_code.as_str());

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/suggestions/join",
            Some(&guest.token),
            Some(json!({ "invitation_code": old_code })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_suggestion_cascades() {
    let app = TestApp::new();
    let owner = app.register("owner").await;
    let member = app.register("member").await;
    let (group_id, group_code) = app.create_group(&owner, "Roadmap").await;
    let (suggestion_id, code) = app.create_suggestion(&owner, &group_id, "Dark mode").await;
    let (kept_id, _) = app.create_suggestion(&owner, &group_id, "Offline sync").await;
    join_group(&app, &member, &group_code).await;

    app.call(
        Method::POST,
        "/api/v1/suggestions/join",
        Some(&member.token),
        Some(json!({ "invitation_code": code })),
    )
    .await;
    app.call(
        Method::POST,
        &format!("/api/v1/suggestions/{}/like", suggestion_id),
        Some(&member.token),
        None,
    )
    .await;
    app.call(
        Method::POST,
        &format!("/api/v1/suggestions/{}/comments", suggestion_id),
        Some(&member.token),
        Some(json!({ "content": "Yes please" })),
    )
    .await;
    app.blobs.put("suggestion-img");
    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/v1/suggestions/{}", suggestion_id),
            Some(&owner.token),
            Some(json!({
                "invitation_code": code,
                "status": "open",
                "end_goal": 50,
                "storage_id": "suggestion-img",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/suggestions/{}", suggestion_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let state = app.store.snapshot().await;
    assert_eq!(state.suggestions.len(), 1);
    assert_eq!(state.suggestions[0].id.to_string(), kept_id);
    assert!(state.likes.is_empty());
    assert!(state.comments.is_empty());
    assert!(state.suggestion_invitations.is_empty());
    assert_eq!(state.groups[0].suggestions_count, 1);
    assert!(!app.blobs.contains("suggestion-img"));

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/suggestions/{}", suggestion_id),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_upload_url_for_registered_user() {
    let app = TestApp::new();
    let user = app.register("uploader").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/storage/upload-url",
            Some(&user.token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["upload_url"]
        .as_str()
        .unwrap()
        .starts_with("memory://upload/"));
}
