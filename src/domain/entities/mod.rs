pub mod location;
pub mod operation;
pub mod service_config;

pub use location::RepositoryLocation;
pub use operation::{Operation, OperationKind, OperationRequest, RequestOptions};
pub use service_config::{RemovalPolicy, ResolvedRequest, ServiceConfig};
