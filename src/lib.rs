//! # steamvr - Rust bindings for the SteamVR flat C API
//!
//! Loads the SteamAPI shared library at runtime and exposes:
//! - `#[repr(C)]` mirrors of the tracking, rendering and chaperone records
//! - Thin wrappers over native `IVRSystem`, `IVRChaperone`, `IVRCompositor`
//!   and `IVRControlPanel` handles
//! - Process bootstrap: init/shutdown, the callback pump and callback registration
//!
//! ## Quick Start
//! ```no_run
//! use steamvr::{NativeApi, Runtime, SteamInterface};
//!
//! let api = NativeApi::load_from_env().unwrap();
//! let runtime = Runtime::init(&api, 480).unwrap();
//! if runtime.restart_requested() {
//!     return;
//! }
//!
//! let user = runtime.interface(SteamInterface::User).unwrap();
//! println!("SteamUser: {:?}", user);
//!
//! for _ in 0..10 {
//!     runtime.run_callbacks().unwrap();
//! }
//! runtime.shutdown();
//! ```

pub mod api;
mod buffer;
pub mod chaperone;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod control_panel;
pub mod enums;
pub mod error;
pub mod ffi;
pub mod runtime;
pub mod system;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::NativeApi;
pub use chaperone::{HardBounds, VrChaperone};
pub use compositor::{FadeColor, VrCompositor};
pub use config::LoaderConfig;
pub use control_panel::VrControlPanel;
pub use enums::*;
pub use error::VrError;
pub use runtime::{CallbackCategory, Runtime, SteamInterface};
pub use system::{PropertyResult, VrSystem};
pub use types::*;

/// Result type alias for SteamVR operations.
pub type Result<T> = std::result::Result<T, VrError>;
