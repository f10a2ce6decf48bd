//! Tool model
//!
//! A tool is a catalog entry. Besides its descriptive fields it carries two
//! derived fields, `avg_rating` and `review_count`, which are written only by
//! the rating aggregator (see [`crate::reviews::aggregator`]). Neither
//! [`CreateTool`] nor [`UpdateTool`] can set them.
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE pricing_model AS ENUM (
//!     'free', 'paid', 'subscription', 'free_plus_paid', 'no_pricing'
//! );
//!
//! CREATE TABLE tools (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     short_description TEXT NOT NULL,
//!     category VARCHAR(100) NOT NULL,
//!     pricing_display VARCHAR(100) NOT NULL,
//!     pricing_model pricing_model NOT NULL,
//!     official_url VARCHAR(512),
//!     source_url VARCHAR(512) NOT NULL,
//!     released_ago VARCHAR(100) NOT NULL,
//!     votes INTEGER,
//!     rating_seed DOUBLE PRECISION,
//!     logo_url VARCHAR(512),
//!     avg_rating DOUBLE PRECISION NOT NULL DEFAULT 0,
//!     review_count BIGINT NOT NULL DEFAULT 0,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How a tool is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pricing_model", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Free,
    Paid,
    Subscription,
    FreePlusPaid,
    NoPricing,
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: Uuid,
    pub name: String,
    pub short_description: String,
    pub category: String,
    pub pricing_display: String,
    pub pricing_model: PricingModel,
    pub official_url: Option<String>,
    pub source_url: String,
    pub released_ago: String,
    pub votes: Option<i32>,
    pub rating_seed: Option<f64>,
    pub logo_url: Option<String>,

    /// Mean of approved review ratings, rounded to 2 decimals (0.0 if none)
    pub avg_rating: f64,

    /// Number of approved reviews
    pub review_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a tool
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTool {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Short description is required"))]
    pub short_description: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    pub pricing_display: String,
    pub pricing_model: PricingModel,

    #[serde(default)]
    pub official_url: Option<String>,

    pub source_url: String,
    pub released_ago: String,

    #[serde(default)]
    pub votes: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating seed must be between 0 and 5"))]
    pub rating_seed: Option<f64>,

    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial update of a tool's descriptive fields
///
/// Only `Some` fields are written. An update with every field `None` is a no-op
/// and is rejected by the catalog service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTool {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub short_description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,
    pub pricing_display: Option<String>,
    pub pricing_model: Option<PricingModel>,
    pub official_url: Option<String>,
    pub source_url: Option<String>,
    pub released_ago: Option<String>,
    pub votes: Option<i32>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating seed must be between 0 and 5"))]
    pub rating_seed: Option<f64>,
    pub logo_url: Option<String>,
}

impl UpdateTool {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.short_description.is_none()
            && self.category.is_none()
            && self.pricing_display.is_none()
            && self.pricing_model.is_none()
            && self.official_url.is_none()
            && self.source_url.is_none()
            && self.released_ago.is_none()
            && self.votes.is_none()
            && self.rating_seed.is_none()
            && self.logo_url.is_none()
    }

    /// Applies the present fields to `tool` and bumps `updated_at`
    pub fn apply_to(self, tool: &mut Tool) {
        if let Some(name) = self.name {
            tool.name = name;
        }
        if let Some(short_description) = self.short_description {
            tool.short_description = short_description;
        }
        if let Some(category) = self.category {
            tool.category = category;
        }
        if let Some(pricing_display) = self.pricing_display {
            tool.pricing_display = pricing_display;
        }
        if let Some(pricing_model) = self.pricing_model {
            tool.pricing_model = pricing_model;
        }
        if self.official_url.is_some() {
            tool.official_url = self.official_url;
        }
        if let Some(source_url) = self.source_url {
            tool.source_url = source_url;
        }
        if let Some(released_ago) = self.released_ago {
            tool.released_ago = released_ago;
        }
        if self.votes.is_some() {
            tool.votes = self.votes;
        }
        if self.rating_seed.is_some() {
            tool.rating_seed = self.rating_seed;
        }
        if self.logo_url.is_some() {
            tool.logo_url = self.logo_url;
        }
        tool.updated_at = Utc::now();
    }
}

/// The derived rating pair written onto a tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
    pub avg_rating: f64,
    pub review_count: i64,
}

impl RatingAggregate {
    /// Aggregate of a tool with no approved reviews
    pub const EMPTY: RatingAggregate = RatingAggregate {
        avg_rating: 0.0,
        review_count: 0,
    };

    /// Builds the aggregate from the sum and count of approved ratings
    ///
    /// The mean is rounded to 2 decimal places by its exact binary value, ties
    /// to even. A decimal tie that a double cannot hold rounds the way the
    /// stored value lies: 223/200 is stored just below 1.115 and gives 1.11.
    pub fn from_totals(rating_sum: i64, review_count: i64) -> Self {
        if review_count <= 0 {
            return Self::EMPTY;
        }

        let mean = rating_sum as f64 / review_count as f64;

        Self {
            avg_rating: round_to_cents(mean),
            review_count,
        }
    }
}

/// Rounds the exact value of `x` to 2 decimal places, ties to even
///
/// Scaling by 100 in floating point would round twice, so the scaling is done
/// on the integer mantissa instead.
fn round_to_cents(x: f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }

    let bits = x.abs().to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);

    // |x| = mantissa * 2^power
    let (mantissa, power) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    };

    if power >= 0 {
        // Already an integer
        return x;
    }

    let shift = power.unsigned_abs();
    let cents = if shift >= 128 {
        0
    } else {
        let scaled = u128::from(mantissa) * 100;
        let quotient = scaled >> shift;
        let remainder = scaled & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);

        if remainder > half || (remainder == half && quotient & 1 == 1) {
            quotient + 1
        } else {
            quotient
        }
    };

    (cents as f64 / 100.0).copysign(x)
}
