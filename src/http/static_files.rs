//! Static file serving for page assets.

use tower_http::services::ServeDir;

/// Create a static file service rooted at `dir`.
pub fn create_static_service(dir: &str) -> ServeDir {
    ServeDir::new(dir)
}
