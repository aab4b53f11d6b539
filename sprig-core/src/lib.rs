pub mod schedule;
pub mod signal;
pub mod watch;

pub use schedule::{defer, flush_deferred};
pub use signal::{Source, Subscription, effect};
pub use watch::watch;
