pub mod clock;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod iso20022;
pub mod message;
pub mod registry;
pub mod schema;
