use std::fmt;

use crate::engine::types::Cycle;

#[derive(PartialEq, PartialOrd, Debug, Default, Clone, Copy)]
pub enum LogLevel {
    #[default]
    NONE,
    INFO,
    DEBUG,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::NONE => "NONE",
            LogLevel::INFO => "INFO",
            LogLevel::DEBUG => "DEBUG",
        };
        f.write_str(name)
    }
}

pub fn to_loglevel(ulevel: u64) -> LogLevel {
    match ulevel {
        0 => LogLevel::NONE,
        1 => LogLevel::INFO,
        _ => LogLevel::DEBUG,
    }
}

/// Cycle-verbosity logger owned by each engine instance, distinct from the
/// process-level `log` crate output.
#[derive(Debug, Default)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    pub fn new(ulevel: u64) -> Self {
        Logger {
            level: to_loglevel(ulevel),
        }
    }

    pub fn silent() -> Self {
        Logger {
            level: LogLevel::NONE,
        }
    }

    pub fn log(&self, level: LogLevel, now: Cycle, args: std::fmt::Arguments<'_>) {
        if level > self.level {
            return;
        }
        println!("{}", render(level, now, args));
    }
}

fn render(level: LogLevel, now: Cycle, args: std::fmt::Arguments<'_>) -> String {
    format!("[{}][{}] {}", level, now, args)
}

#[macro_export]
macro_rules! log {
    // usage: log!(logger, now, "a {} event", "clock")
    ($logger:expr, $level:expr, $now:expr, $($arg:tt)+) => {{
        $logger.log($level, $now, format_args!($($arg)+));
    }};
}
#[macro_export]
macro_rules! info {
    ($logger:expr, $now:expr, $($arg:tt)+) => ( $crate::log!($logger, $crate::sim::log::LogLevel::INFO, $now, $($arg)+); )
}
#[macro_export]
macro_rules! debug {
    ($logger:expr, $now:expr, $($arg:tt)+) => ( $crate::log!($logger, $crate::sim::log::LogLevel::DEBUG, $now, $($arg)+); )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_carries_level_and_cycle() {
        assert_eq!(
            render(LogLevel::INFO, 42, format_args!("issued {} ops", 3)),
            "[INFO][42] issued 3 ops"
        );
        assert_eq!(
            render(LogLevel::DEBUG, 0, format_args!("drained")),
            "[DEBUG][0] drained"
        );
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(to_loglevel(0), LogLevel::NONE);
        assert_eq!(to_loglevel(1), LogLevel::INFO);
        assert_eq!(to_loglevel(7), LogLevel::DEBUG);
        assert!(LogLevel::DEBUG > LogLevel::INFO);
    }
}
