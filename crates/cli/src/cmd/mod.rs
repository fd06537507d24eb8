mod build;
mod resolve;
mod status;

pub use build::cmd_build;
pub use resolve::cmd_resolve;
pub use status::cmd_status;
