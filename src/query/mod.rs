pub mod builder;
pub mod error;
pub mod params;
pub mod types;

pub use builder::ListQuery;
pub use error::QueryError;
pub use params::ListParams;
pub use types::*;
