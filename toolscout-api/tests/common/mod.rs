//! Shared setup for the API integration tests
//!
//! Each test builds the real router over a fresh in-memory store, so no
//! database is needed. Users are inserted straight into the store and get
//! tokens minted with the test signing secret.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use toolscout_api::{
    app::{build_router, AppState},
    config::Config,
};
use toolscout_shared::{
    auth::{
        jwt::{create_token, Claims},
        password::{Argon2Scheme, CredentialScheme},
    },
    models::user::{CreateUser, User, UserRole},
    store::{InMemoryStore, UserStore},
};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Argon2id at minimum cost keeps the tests fast
pub fn cheap_scheme() -> Argon2Scheme {
    Argon2Scheme::new(1024, 1, 1)
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("DATABASE_URL", "postgresql://localhost/unused"),
        ("JWT_SECRET", TEST_SECRET),
        ("CORS_ORIGINS", "*"),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test configuration is valid")
}

/// A status, headers and parsed JSON body (`Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub admin: User,
    pub admin_token: String,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(store.clone(), test_config()).with_credentials(cheap_scheme());
        let app = build_router(state.clone());

        let admin = insert_user(&store, "Root", UserRole::Admin).await;
        let admin_token = mint_token(&state, &admin);

        Self {
            app,
            state,
            store,
            admin,
            admin_token,
        }
    }

    /// Inserts a user with [`TEST_PASSWORD`] and returns it with a valid token
    pub async fn create_user(&self, name: &str, role: UserRole) -> (User, String) {
        let user = insert_user(&self.store, name, role).await;
        let token = mint_token(&self.state, &user);
        (user, token)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    /// Creates a tool through the admin endpoint and returns its id
    pub async fn create_tool(&self, name: &str) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/admin/tools",
                Some(&self.admin_token),
                Some(tool_payload(name)),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        id_of(&response.body)
    }

    /// Submits a review and returns its id
    pub async fn submit_review(&self, token: &str, tool_id: Uuid, rating: i32) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/reviews",
                Some(token),
                Some(json!({ "toolId": tool_id, "rating": rating, "comment": "Tried it" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        id_of(&response.body)
    }

    pub async fn moderate(&self, review_id: Uuid, status: &str) -> TestResponse {
        self.request(
            Method::PATCH,
            &format!("/admin/reviews/{}", review_id),
            Some(&self.admin_token),
            Some(json!({ "status": status })),
        )
        .await
    }

    /// Current `(avgRating, reviewCount)` as served by the public endpoint
    pub async fn rating_of(&self, tool_id: Uuid) -> (f64, i64) {
        let response = self.get(&format!("/tools/{}", tool_id), None).await;
        assert_eq!(response.status, StatusCode::OK);

        (
            response.body["avgRating"].as_f64().unwrap(),
            response.body["reviewCount"].as_i64().unwrap(),
        )
    }
}

pub fn tool_payload(name: &str) -> Value {
    json!({
        "name": name,
        "shortDescription": format!("{} does things", name),
        "category": "Productivity",
        "pricingDisplay": "Free + Paid",
        "pricingModel": "free_plus_paid",
        "sourceUrl": "https://source.example/tools",
        "releasedAgo": "2 days ago",
        "votes": 10
    })
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn insert_user(store: &InMemoryStore, name: &str, role: UserRole) -> User {
    store
        .create_user(CreateUser {
            name: name.to_string(),
            email: format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4()),
            password_hash: cheap_scheme().hash(TEST_PASSWORD).unwrap(),
            role,
        })
        .await
        .unwrap()
}

pub fn mint_token(state: &AppState, user: &User) -> String {
    let claims = Claims::new(user.id, &user.email, user.role, state.jwt());
    create_token(&claims, state.jwt()).unwrap()
}
