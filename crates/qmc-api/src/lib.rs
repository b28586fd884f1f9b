// qmc-api: async Rust client for the broker REST management API

pub mod client;
pub mod error;
pub mod metadata;
pub mod model;
pub mod transport;

pub use client::{LoadOptions, ManagementClient};
pub use error::Error;
pub use metadata::Metadata;
pub use model::ModelObject;
pub use transport::{Credentials, TransportConfig};
