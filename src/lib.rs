pub mod algo;
pub mod error;
pub mod ops;

#[cfg(feature = "plugin")]
pub mod commands;

pub use error::{Result, SymNmfError};

#[cfg(feature = "plugin")]
use nu_plugin::{Plugin, PluginCommand};

#[cfg(feature = "plugin")]
pub struct SymNmfPlugin;

#[cfg(feature = "plugin")]
impl Plugin for SymNmfPlugin {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").into()
    }

    fn commands(&self) -> Vec<Box<dyn PluginCommand<Plugin = Self>>> {
        vec![
            Box::new(commands::Sym),
            Box::new(commands::Ddg),
            Box::new(commands::Norm),
            Box::new(commands::Factor),
            Box::new(commands::Optimize),
            Box::new(commands::Analyze),
        ]
    }
}
