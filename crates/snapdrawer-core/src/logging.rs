#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported so
//! the rest of the crate can write `crate::logging::debug!(..)`. Without it
//! the same names expand to nothing, keeping call sites unconditional.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop {
    #[macro_export]
    #[doc(hidden)]
    macro_rules! __snapdrawer_noop_log {
        ($($arg:tt)*) => {{}};
    }

    pub use crate::__snapdrawer_noop_log as debug;
    pub use crate::__snapdrawer_noop_log as info;
    pub use crate::__snapdrawer_noop_log as trace;
    pub use crate::__snapdrawer_noop_log as warn;
}

#[cfg(not(feature = "tracing"))]
pub use noop::{debug, info, trace, warn};

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Intended for native hosts and harnesses. Returns `false` if a global
/// subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{debug, trace};

    #[test]
    fn macros_expand_in_expression_position() {
        for value in [Some(3), None] {
            match value {
                Some(_) => debug!("value present"),
                None => trace!("value absent"),
            }
        }
    }
}
