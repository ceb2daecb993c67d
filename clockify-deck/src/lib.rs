pub mod adapters;
pub mod context;
pub mod display;
pub mod domain;
pub mod reconciler;
pub mod resolver;
pub mod settings;
pub mod tags;

pub use context::TrackerContext;
pub use display::KeyStatus;
pub use domain::models::Toggle;
pub use settings::PluginSettings;
