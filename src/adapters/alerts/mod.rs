//! Operator alert adapters.

mod tracing_notifier;

pub use tracing_notifier::TracingOperatorNotifier;
