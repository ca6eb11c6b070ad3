//! Static page hosting.
//!
//! The camera pages, their assets and the favicon are plain files under the
//! configured static directory.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::server::GatewayState;

/// Page routes and the HTML file each one serves.
pub const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/chooser", "chooser.html"),
    ("/experience", "experience.html"),
    ("/food", "food.html"),
];

/// Router serving the pages, `/static/*` and `/favicon.ico` from `static_dir`.
pub fn ui_router(static_dir: &Path) -> Router<GatewayState> {
    let mut router = Router::new();
    for (route, file) in PAGES {
        router = router.route_service(route, ServeFile::new(static_dir.join(file)));
    }
    router
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .nest_service("/static", ServeDir::new(static_dir))
}
