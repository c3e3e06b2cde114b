pub mod artifact;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod traits;

pub use artifact::*;
pub use config::*;
pub use config_loader::*;
pub use error::*;
pub use traits::*;
