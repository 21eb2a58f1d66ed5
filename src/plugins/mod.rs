pub mod files;
pub mod push;

pub use files::FilePlugin;
pub use push::PushPlugin;
