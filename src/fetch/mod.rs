//! Fetch strategy selection and the two fetch paths
//!
//! Domains are configured as either plain-HTML or JS-heavy; the directive
//! type packages that decision with everything the chosen path needs. The
//! static path is a reqwest client with rotating user agents, the render
//! path a shared headless browser with resource filtering and bounded
//! scrolling.

mod directive;
mod render;
mod static_fetch;

pub use directive::{FetchDirective, ResourceFilter, ScrollPolicy};
pub use render::RenderSession;
pub use static_fetch::{build_http_client, fetch_static, FetchOutcome};
