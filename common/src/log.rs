//! Thin wrappers around `tracing` so every crate reports status the same way.
//!
//! `success!` is an INFO event under the [`SUCCESS_TARGET`] target; terminal front ends
//! render it with its own marker.

pub const SUCCESS_TARGET: &str = "chanman::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "chanman::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
