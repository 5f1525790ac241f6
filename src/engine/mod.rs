pub mod events;
pub mod registry;

pub use events::GameEvent;
pub use registry::SessionRegistry;
