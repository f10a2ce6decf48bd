/// Middleware for the API server
///
/// - `security`: security response headers (HSTS in production)

pub mod security;
