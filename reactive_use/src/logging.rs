use std::fmt::Arguments;

/// Reports a recoverable problem, such as a listener that could not be
/// registered on the host window.
pub(crate) fn log_warning(text: Arguments) {
    #[cfg(feature = "tracing")]
    {
        tracing::warn!("{}", text);
    }
    #[cfg(all(
        not(feature = "tracing"),
        target_arch = "wasm32",
        target_os = "unknown"
    ))]
    {
        web_sys::console::warn_1(&text.to_string().into());
    }
    #[cfg(all(
        not(feature = "tracing"),
        not(all(target_arch = "wasm32", target_os = "unknown"))
    ))]
    {
        eprintln!("{}", text);
    }
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log_warning(format_args!($($arg)*))
    };
}

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
    }};
}

pub(crate) use {log_warn, trace};
