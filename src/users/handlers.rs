use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{PublicUser, UpdateUserRequest, UpdateUserResponse, UserListResponse};
use super::repo_types::UserChanges;
use crate::{
    auth::services::{is_valid_email, normalize_email},
    error::AppError,
    extract::{parse_id, ApiJson, ApiQuery},
    pagination::{PageQuery, PageRequest},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users))
        .route("/user/:id", put(update_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    let req = PageRequest::from(query);
    let page = state.users.list(&req).await?;
    let total_pages = page.total_pages();

    Ok(Json(UserListResponse {
        total_users: page.total,
        total_pages,
        current_page: page.page,
        limit: page.limit,
        data: page.items,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    let id = parse_id(&raw_id, "user")?;

    let changes = UserChanges {
        name: non_blank(payload.name),
        email: non_blank(payload.email).map(|e| normalize_email(&e)),
        phone: non_blank(payload.phone),
    };
    if changes.is_empty() {
        return Err(AppError::Validation("No fields to update".into()));
    }
    if let Some(email) = &changes.email {
        if !is_valid_email(email) {
            warn!(%email, "invalid email in user update");
            return Err(AppError::Validation("Invalid email".into()));
        }
    }

    let user = state
        .users
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!(user_id = user.id, "user updated");
    Ok(Json(UpdateUserResponse {
        message: "User updated successfully".into(),
        user: PublicUser::from(user),
    }))
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::testing::TestApp;
    use crate::users::repo::UserStore;

    #[tokio::test]
    async fn lists_newest_first_with_pagination_metadata() {
        let app = TestApp::new();
        for i in 0..12 {
            app.seed_user(&format!("User {i}"), &format!("u{i}@shop.test"), None, "pw-123456")
                .await;
        }

        let (status, _, body) = app.request(Method::GET, "/user?page=2&limit=5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalUsers"], 12);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["limit"], 5);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 5);
        // newest first: page 2 starts at the 6th most recent user
        assert_eq!(data[0]["email"], "u6@shop.test");
        assert!(data[0].get("passwordHash").is_none());
        assert_eq!(data[0]["orderCount"], 0);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_stable_totals() {
        let app = TestApp::new();
        for i in 0..3 {
            app.seed_user(&format!("User {i}"), &format!("u{i}@shop.test"), None, "pw-123456")
                .await;
        }
        let (status, _, body) = app.request(Method::GET, "/user?page=9&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert_eq!(body["totalUsers"], 3);
        assert_eq!(body["totalPages"], 2);
    }

    #[tokio::test]
    async fn search_matches_name_email_or_phone_case_insensitively() {
        let app = TestApp::new();
        app.seed_user("Alice Smith", "alice@shop.test", Some("555-0100"), "pw-123456")
            .await;
        app.seed_user("Bob", "bob@shop.test", Some("555-0199"), "pw-123456")
            .await;
        app.seed_user("Carol", "carol@elsewhere.test", None, "pw-123456")
            .await;

        let (_, _, body) = app.request(Method::GET, "/user?search=ALICE", None).await;
        assert_eq!(body["totalUsers"], 1);

        let (_, _, body) = app.request(Method::GET, "/user?search=shop.test", None).await;
        assert_eq!(body["totalUsers"], 2);

        let (_, _, body) = app.request(Method::GET, "/user?search=0199", None).await;
        assert_eq!(body["totalUsers"], 1);
        assert_eq!(body["data"][0]["name"], "Bob");
    }

    #[tokio::test]
    async fn non_numeric_page_is_a_validation_error() {
        let app = TestApp::new();
        let (status, _, body) = app.request(Method::GET, "/user?page=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn blank_page_params_fall_back_to_defaults() {
        let app = TestApp::new();
        app.seed_user("Fay", "fay@shop.test", None, "pw-123456").await;

        let (status, _, body) = app
            .request(Method::GET, "/user?page=&limit=&search=", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["limit"], 10);
        assert_eq!(body["totalUsers"], 1);
    }

    #[tokio::test]
    async fn update_user_applies_partial_changes() {
        let app = TestApp::new();
        let user = app.seed_user("Dana", "dana@shop.test", None, "pw-123456").await;

        let (status, _, body) = app
            .request(
                Method::PUT,
                &format!("/user/{}", user.id),
                Some(json!({ "phone": "555-0142" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["phone"], "555-0142");
        assert_eq!(body["user"]["name"], "Dana");

        let stored = app.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.updated_at > user.updated_at);
    }

    #[tokio::test]
    async fn update_user_error_cases() {
        let app = TestApp::new();
        let dana = app.seed_user("Dana", "dana@shop.test", None, "pw-123456").await;
        app.seed_user("Eve", "eve@shop.test", None, "pw-123456").await;

        let (status, _, _) = app
            .request(Method::PUT, &format!("/user/{}", dana.id), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app
            .request(Method::PUT, "/user/nope", Some(json!({ "name": "X" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = app
            .request(Method::PUT, "/user/999", Some(json!({ "name": "X" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = app
            .request(
                Method::PUT,
                &format!("/user/{}", dana.id),
                Some(json!({ "email": "EVE@shop.test" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
