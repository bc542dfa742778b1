pub mod models;

pub use models::config::Config;
pub use models::errors::{ConversionError, ConversionResult, SchemaError};
pub use models::message::Message;
pub use models::registry::MessageRegistry;
pub use models::schema::{EnvelopeDescriptor, ResolutionCache, SchemaResource, SchemaWalker};
