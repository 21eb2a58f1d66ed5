pub mod config;
pub mod error;
pub mod logger;
pub mod plugin;
pub mod plugins;
pub mod push;
pub mod server;
pub mod utils;

pub use config::Config;

pub mod prelude {
    pub use crate::config::{Config, PushConfig};
    pub use crate::plugin::{MediaHandler, Plugin, ResponseHook};
    pub use crate::plugins::{FilePlugin, PushPlugin};
    pub use crate::push::{apply_push_header, build_push_header, PushHintBuilder};
    pub use crate::server::SegmentServer;
}
