pub mod bootstrap;
pub mod health;
pub mod registry;

pub use crate::domain::model::{ConfigPair, Record, ServiceHandles};
pub use crate::domain::ports::{DocumentStore, Reporter, TextGenerator};
pub use crate::utils::error::Result;
