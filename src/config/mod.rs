//! Persistent user configuration: bind mappings and input settings.

pub mod binds;
pub mod settings;

pub use binds::BindsConfig;
pub use settings::InputSettings;
