//! Live subscriptions and the view models built on them.

pub mod registry;
pub mod subscription;
pub mod view;

pub use registry::LiveRegistry;
pub use subscription::{CancelHandle, Subscription};
pub use view::{CustomRoutinesView, ListView, ProgressView, RoutinesView};
