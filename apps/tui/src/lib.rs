// Export our modules for use in binaries and tests
pub mod config;
pub mod logging;
pub mod view;

pub use view::MapView;
