// Log macros that call tracing underneath but compile away unless the matching
// feature is enabled. See similar: https://doc.rust-lang.org/src/std/macros.rs.html#138-145.

macro_rules! debug {
    ($($t:tt)*) => {
        if cfg!(feature = "log_debug") {
            tracing::debug!($($t)*);
        }
    };
}

macro_rules! trace {
    ($($t:tt)*) => {
        if cfg!(feature = "log_trace") {
            tracing::trace!($($t)*);
        }
    };
}
