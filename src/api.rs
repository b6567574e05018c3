use crate::chaperone::VrChaperone;
use crate::compositor::VrCompositor;
use crate::config::LoaderConfig;
use crate::control_panel::VrControlPanel;
use crate::ffi::NativeTable;
use crate::system::VrSystem;
use crate::types::NativeHandle;
use crate::{Result, VrError};
use libloading::Library;
use std::path::Path;

/// A resolved SteamAPI function table, plus the library that backs it.
///
/// Wrappers and the [`crate::Runtime`] borrow a `NativeApi`, so the library
/// stays mapped for as long as anything can call into it.
pub struct NativeApi {
    table: NativeTable,
    // Dropped last: the table's function pointers point into it.
    _library: Option<Library>,
}

impl NativeApi {
    /// Load the library named by `LoaderConfig::from_env()`.
    pub fn load_from_env() -> Result<NativeApi> {
        Self::load_with(&LoaderConfig::from_env())
    }

    /// Load a SteamAPI library from `path` without strict symbol checking.
    pub fn load(path: impl AsRef<Path>) -> Result<NativeApi> {
        Self::load_with(&LoaderConfig {
            library_path: path.as_ref().to_path_buf(),
            strict_symbols: false,
        })
    }

    pub fn load_with(config: &LoaderConfig) -> Result<NativeApi> {
        // SAFETY: loading runs the library's initialisers; SteamAPI has none
        // with preconditions beyond being the genuine library.
        let library = unsafe { Library::new(&config.library_path)? };

        // SAFETY: the exports resolved here are the SteamAPI flat functions
        // whose signatures `NativeTable` declares.
        let (table, missing) = unsafe { NativeTable::resolve(&library) };

        if !missing.is_empty() {
            if config.strict_symbols {
                return Err(VrError::MissingSymbols { missing });
            }
            for symbol in &missing {
                log::warn!("{} not exported by {}", symbol, config.library_path.display());
            }
        }

        log::info!(
            "Loaded {} ({} of {} entry points unresolved)",
            config.library_path.display(),
            missing.len(),
            NativeTable::SYMBOLS.len() + table.interfaces.len()
        );

        Ok(NativeApi {
            table,
            _library: Some(library),
        })
    }

    /// Wrap a table whose entry points come from elsewhere, e.g. a statically
    /// linked SDK.
    pub fn from_table(table: NativeTable) -> NativeApi {
        NativeApi {
            table,
            _library: None,
        }
    }

    pub fn table(&self) -> &NativeTable {
        &self.table
    }

    pub fn system(&self, handle: NativeHandle) -> VrSystem<'_> {
        VrSystem::new(self, handle)
    }

    pub fn chaperone(&self, handle: NativeHandle) -> VrChaperone<'_> {
        VrChaperone::new(self, handle)
    }

    pub fn compositor(&self, handle: NativeHandle) -> VrCompositor<'_> {
        VrCompositor::new(self, handle)
    }

    pub fn control_panel(&self, handle: NativeHandle) -> VrControlPanel<'_> {
        VrControlPanel::new(self, handle)
    }

}

impl std::fmt::Debug for NativeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeApi")
            .field("dynamic", &self._library.is_some())
            .field("unbound", &self.table.unbound_symbols().len())
            .finish()
    }
}
