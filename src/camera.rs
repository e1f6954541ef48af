/// Camera placement and view basis.
pub mod model;
/// Perspective projection and near-plane clipping.
pub mod projection;
