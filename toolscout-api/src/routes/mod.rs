//! API route handlers, grouped by resource
//!
//! - `health`: banner and health check
//! - `auth`: signup and login
//! - `tools`: public tool detail and approved reviews
//! - `reviews`: review submission and the caller's own reviews
//! - `admin`: moderation queue, moderation, and catalog administration

pub mod admin;
pub mod auth;
pub mod health;
pub mod reviews;
pub mod tools;

use serde::Deserialize;
use toolscout_shared::models::pagination::{PageRequest, DEFAULT_PAGE_SIZE};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Parses a path identifier; a malformed id is a 400, never a 404
pub(crate) fn parse_id(raw: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {} id", what)))
}

/// `?page=&pageSize=` query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParams {
    pub fn to_request(&self) -> ApiResult<PageRequest> {
        Ok(PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?)
    }
}
