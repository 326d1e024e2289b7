//! Application services for service registration and discovery.

mod registry;

pub use registry::{DirectoryError, DirectoryResult, RegisterServiceRequest, ServiceDirectory};
