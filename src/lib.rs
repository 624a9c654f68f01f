pub mod api;
pub mod config;
pub mod error;
pub mod evolution;
pub mod forms;
pub mod lookup;
pub mod matchup;
pub mod name_index;
pub mod pokemon;

pub use api::*;
pub use config::*;
pub use error::*;
pub use evolution::*;
pub use forms::*;
pub use lookup::*;
pub use matchup::*;
pub use name_index::*;
pub use pokemon::*;
