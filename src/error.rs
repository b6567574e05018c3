use std::ffi::NulError;

/// Errors raised locally by the binding layer.
///
/// Failures reported by the native SDK itself (a `false` return, a property
/// error code, a zero count) are passed back as values and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum VrError {
    #[error("{interface} pointer not configured")]
    NotConfigured { interface: &'static str },

    #[error("native entry point {symbol} is not bound")]
    Unbound { symbol: &'static str },

    #[error("callback record is null")]
    NullCallback,

    #[error("string argument contains an interior NUL: {0}")]
    InteriorNul(#[from] NulError),

    #[error("SteamAPI runtime already initialized for this library")]
    AlreadyInitialized,

    #[error("Failed to load native library: {0}")]
    Library(#[from] libloading::Error),

    #[error("Native library is missing {} entry point(s): {}", .missing.len(), .missing.join(", "))]
    MissingSymbols { missing: Vec<&'static str> },
}

impl VrError {
    /// True for errors caused by calling through a null handle or record.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            VrError::NotConfigured { .. } | VrError::NullCallback | VrError::InteriorNul(_)
        )
    }
}
