mod cache;
mod resource;
mod walker;

pub use self::cache::ResolutionCache;
pub use self::resource::{SchemaResource, StorageType};
pub use self::walker::{EnvelopeDescriptor, SchemaWalker};
