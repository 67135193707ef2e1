//! Leveled logging macros
//!
//! Each macro formats its arguments, captures the call site of the enclosing
//! function at compile time and dispatches through [`Dispatcher::log_at`].
//! They evaluate to the dispatch `Result`.
//!
//! ```ignore
//! log_info!(dispatcher, "listening on {}", addr)?;
//! log_event!(dispatcher, Severity::Warning, "retry {attempt}")?;
//! ```
//!
//! [`Dispatcher::log_at`]: crate::Dispatcher::log_at

#[macro_export]
macro_rules! log_event {
    ($dispatcher:expr, $severity:expr, $($arg:tt)+) => {
        $dispatcher.log_at(
            ::std::format!($($arg)+),
            $severity,
            ::std::option::Option::Some($crate::call_site!()),
        )
    };
}

#[macro_export]
macro_rules! log_error {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::log_event!($dispatcher, $crate::Severity::Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::log_event!($dispatcher, $crate::Severity::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::log_event!($dispatcher, $crate::Severity::Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::log_event!($dispatcher, $crate::Severity::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_trace {
    ($dispatcher:expr, $($arg:tt)+) => { $crate::log_event!($dispatcher, $crate::Severity::Trace, $($arg)+) };
}
