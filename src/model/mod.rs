pub mod auth;
pub mod config;
pub mod task;
pub mod view;

pub use auth::*;
pub use config::*;
pub use task::*;
pub use view::*;
