pub mod assistant;
pub mod catalog;
pub mod chat;
pub mod formatter;
pub mod gateway;
pub mod intent;
pub mod providers;

pub use gateway::{CacheTtls, MetadataGateway};
pub use intent::Intent;
