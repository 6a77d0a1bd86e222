// https://openjdk.org/jeps/282

mod error;
mod plugin;
mod pool;
mod string_table;

pub use error::PluginError;
pub use plugin::StripDebugPlugin;
pub use pool::{ByteOrder, Resource, ResourcePool, Resources};
pub use string_table::{InternTable, StringTable};

pub type Result<T, E = PluginError> = std::result::Result<T, E>;
