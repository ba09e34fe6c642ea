//! Per-resource request helpers, obtained from [`crate::Client`].

pub mod builds;
pub mod deployments;
pub mod processes;

pub use builds::BuildClient;
pub use deployments::DeploymentClient;
pub use processes::ProcessClient;
