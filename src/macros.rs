//! Call-site front-end: level macros that capture the origin location and
//! skip argument formatting when the severity would be rejected, plus
//! scope and timer guards.

use std::time::Instant;

use crate::levels::Level;
use crate::logger::logger;

/// Name of the enclosing function, without the trailing turbofish noise.
#[macro_export]
macro_rules! zlog_function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Log through the process-wide service at `level`, formatting the message
/// only after the severity check passes.
#[macro_export]
macro_rules! zlog {
    ($level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $crate::logger().should_log(level) {
            $crate::logger().log_direct(
                level,
                ::std::format!($($arg)+),
                ::std::file!(),
                $crate::zlog_function_name!(),
                ::std::line!(),
            );
        }
    }};
}

#[macro_export]
macro_rules! ztrace {
    ($($arg:tt)+) => { $crate::zlog!($crate::Level::Trace, $($arg)+) };
}

#[macro_export]
macro_rules! zdebug {
    ($($arg:tt)+) => { $crate::zlog!($crate::Level::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! zinfo {
    ($($arg:tt)+) => { $crate::zlog!($crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! zwarning {
    ($($arg:tt)+) => { $crate::zlog!($crate::Level::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! zerror {
    ($($arg:tt)+) => { $crate::zlog!($crate::Level::Error, $($arg)+) };
}

#[macro_export]
macro_rules! zfatal {
    ($($arg:tt)+) => { $crate::zlog!($crate::Level::Fatal, $($arg)+) };
}

/// Logs `>>> Enter` on construction and `<<< Exit` on drop, both at DEBUG,
/// through the process-wide service. Silent unless the service is up.
pub struct ScopeGuard {
    scope_name: &'static str,
    file_path: &'static str,
    line_number: u32,
}

impl ScopeGuard {
    pub fn new(scope_name: &'static str, file_path: &'static str, line_number: u32) -> Self {
        if logger().is_initialized() {
            logger().log_direct(Level::Debug, ">>> Enter", file_path, scope_name, line_number);
        }
        ScopeGuard { scope_name, file_path, line_number }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if logger().is_initialized() {
            logger().log_direct(
                Level::Debug,
                "<<< Exit",
                self.file_path,
                self.scope_name,
                self.line_number,
            );
        }
    }
}

/// Logs `Performance [<name>]: <elapsed> us` at INFO on drop.
pub struct TimerGuard {
    timer_name: String,
    file_path: &'static str,
    line_number: u32,
    started: Instant,
}

impl TimerGuard {
    pub fn new(timer_name: impl Into<String>, file_path: &'static str, line_number: u32) -> Self {
        TimerGuard {
            timer_name: timer_name.into(),
            file_path,
            line_number,
            started: Instant::now(),
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if logger().is_initialized() {
            let elapsed = self.started.elapsed().as_micros();
            logger().log_direct(
                Level::Info,
                format!("Performance [{}]: {} us", self.timer_name, elapsed),
                self.file_path,
                "",
                self.line_number,
            );
        }
    }
}

/// Bracket the enclosing scope with Enter/Exit DEBUG records.
#[macro_export]
macro_rules! zlog_scope {
    () => {
        let _zlog_scope_guard = $crate::ScopeGuard::new(
            $crate::zlog_function_name!(),
            ::std::file!(),
            ::std::line!(),
        );
    };
    ($name:expr) => {
        let _zlog_scope_guard =
            $crate::ScopeGuard::new($name, ::std::file!(), ::std::line!());
    };
}

/// Log how long the enclosing scope took, in microseconds.
#[macro_export]
macro_rules! zlog_timer {
    ($name:expr) => {
        let _zlog_timer_guard =
            $crate::TimerGuard::new($name, ::std::file!(), ::std::line!());
    };
}
