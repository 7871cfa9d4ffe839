use actix_web::{web, HttpResponse};
use userstash::{document, StashError};

use crate::AppState;

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::get().to(list_users))
        .route("/users", web::post().to(create_user))
        .route("/users/{id}", web::get().to(get_user))
        .route("/users/{id}", web::put().to(replace_user))
        .route("/users/{id}", web::delete().to(delete_user));
}

// ── Helpers ─────────────────────────────────────────────────────────

fn ok_json(value: impl serde::Serialize) -> HttpResponse {
    HttpResponse::Ok().json(value)
}

fn err_response(e: StashError) -> HttpResponse {
    match &e {
        StashError::NotFound { .. } => HttpResponse::NotFound().json(serde_json::json!({
            "error": e.to_string()
        })),
        StashError::InvalidId(_) | StashError::InvalidBody(_) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        _ => {
            log::error!("Storage error: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

/// Require a JSON object request body. The extractor hands over `None`
/// when the body is absent or unparseable.
fn require_body(body: Option<web::Json<serde_json::Value>>) -> Result<serde_json::Value, StashError> {
    body.map(web::Json::into_inner)
        .ok_or_else(|| StashError::InvalidBody("missing or malformed JSON body".to_string()))
}

// ── Users ───────────────────────────────────────────────────────────

async fn list_users(state: web::Data<AppState>) -> HttpResponse {
    let store = state.store.lock().unwrap();
    match store.list() {
        Ok(users) => ok_json(users),
        Err(e) => err_response(e),
    }
}

async fn get_user(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let store = state.store.lock().unwrap();
    match document::parse_id(&path).and_then(|id| store.get(id)) {
        Ok(user) => ok_json(user),
        Err(e) => err_response(e),
    }
}

async fn create_user(
    state: web::Data<AppState>,
    body: Option<web::Json<serde_json::Value>>,
) -> HttpResponse {
    let store = state.store.lock().unwrap();
    match require_body(body).and_then(|body| store.create(body)) {
        // The response is just the assigned id, not the full record
        Ok(id) => ok_json(id),
        Err(e) => err_response(e),
    }
}

async fn replace_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<serde_json::Value>>,
) -> HttpResponse {
    let store = state.store.lock().unwrap();
    let result = document::parse_id(&path)
        .and_then(|id| require_body(body).map(|body| (id, body)))
        .and_then(|(id, body)| store.replace(id, body));
    match result {
        Ok(users) => ok_json(users),
        Err(e) => err_response(e),
    }
}

async fn delete_user(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let store = state.store.lock().unwrap();
    match document::parse_id(&path).and_then(|id| store.remove(id)) {
        Ok(users) => ok_json(users),
        Err(e) => err_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use userstash::UserStore;

    fn seeded_state(tmp: &TempDir) -> web::Data<AppState> {
        let path = tmp.path().join("users.json");
        let doc = json!({ "users": [
            { "id": 1, "name": "Alice", "email": "alice@test.com" },
            { "id": 2, "name": "Bob", "email": "bob@test.com" },
        ]});
        std::fs::write(&path, doc.to_string()).unwrap();
        web::Data::new(AppState {
            store: Mutex::new(UserStore::new(path)),
        })
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn list_returns_the_full_collection() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::get().uri("/users").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["name"], "Alice");
    }

    #[actix_web::test]
    async fn get_returns_the_matching_record() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::get().uri("/users/2").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], 2);
        assert_eq!(body["name"], "Bob");
    }

    #[actix_web::test]
    async fn get_unknown_id_is_404() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::get().uri("/users/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn get_non_integer_id_is_400() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::get().uri("/users/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn post_returns_the_bare_assigned_id() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "name": "Carol" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(3));
    }

    #[actix_web::test]
    async fn post_without_body_is_400() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::post().uri("/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn put_replaces_fields_and_preserves_id() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::put()
            .uri("/users/1")
            .set_json(json!({ "name": "Yvonne" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        // Full collection comes back; record 1 is wholly replaced
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[0]["name"], "Yvonne");
        assert!(body[0].get("email").is_none());
    }

    #[actix_web::test]
    async fn put_unknown_id_is_404() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::put()
            .uri("/users/99")
            .set_json(json!({ "name": "ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn delete_returns_the_remaining_collection() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::delete().uri("/users/1").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Bob");
    }

    #[actix_web::test]
    async fn repeated_delete_of_same_id_is_404() {
        let tmp = TempDir::new().unwrap();
        let app = test_app!(seeded_state(&tmp));

        let req = test::TestRequest::delete().uri("/users/1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::delete().uri("/users/1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn missing_document_file_is_500() {
        let tmp = TempDir::new().unwrap();
        let state = web::Data::new(AppState {
            store: Mutex::new(UserStore::new(tmp.path().join("absent.json"))),
        });
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
    }
}
