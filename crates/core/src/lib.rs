pub mod config;
pub mod context;
pub mod defaults;
pub mod merge;
pub mod render;
pub mod template;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
