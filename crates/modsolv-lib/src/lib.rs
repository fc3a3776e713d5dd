pub mod error;
pub use error::Result;
pub use error::Error;

pub mod moddb;
pub use moddb::ModDb;

pub mod config;
pub use config::ModsolvOptions;

pub mod resolver;
