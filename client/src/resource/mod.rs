//! Request and response bodies for the V3 API.

pub mod build;
pub mod common;
pub mod deployment;
pub mod process;

pub use build::*;
pub use common::*;
pub use deployment::*;
pub use process::*;
