//! Console logging: a process-global verbosity level set once at startup,
//! and the `[v]`/`[vv]` log macros used throughout.

use std::sync::atomic::{AtomicU8, Ordering};

static VERBOSITY: AtomicU8 = AtomicU8::new(0);

pub fn init(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

pub fn verbose() -> bool {
    VERBOSITY.load(Ordering::Relaxed) >= 1
}

pub fn extra_verbose() -> bool {
    VERBOSITY.load(Ordering::Relaxed) >= 2
}

/// Builds a fatal error, annotated with its call site in verbose mode.
pub fn fatal_error(site: &str, line: u32, msg: String) -> anyhow::Error {
    if verbose() {
        anyhow::anyhow!("{}:{}: {}", site, line, msg)
    } else {
        anyhow::anyhow!(msg)
    }
}

#[macro_export]
macro_rules! logv {
    ($($arg:tt)*) => {
        if $crate::log::verbose() {
            println!("[v] {}:{}: {}", module_path!(), line!(), format_args!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! logvv {
    ($($arg:tt)*) => {
        if $crate::log::extra_verbose() {
            println!("[vv] {}:{}: {}", module_path!(), line!(), format_args!($($arg)*));
        }
    };
}

/// Bails out of the surrounding function with a fatal error.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        return Err($crate::log::fatal_error(module_path!(), line!(), format!($($arg)*)).into())
    };
}
