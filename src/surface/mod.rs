//! API-surface extraction: HTTP endpoints from routing patterns, UI
//! components from JSX/component conventions. Both run after
//! classification so endpoint records can name their framework.

pub mod components;
pub mod endpoints;

pub use components::extract_components;
pub use endpoints::extract_endpoints;

use crate::model::ProjectModel;

pub fn extract_surface(model: &mut ProjectModel) {
    extract_endpoints(model);
    extract_components(model);
}
