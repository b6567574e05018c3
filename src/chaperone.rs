//! `IVRChaperone`: play-area calibration state and boundary geometry.

use crate::api::NativeApi;
use crate::buffer;
use crate::enums::ChaperoneCalibrationState;
use crate::ffi::NativeTable;
use crate::types::{ChaperoneSeatedBoundsInfo, ChaperoneSoftBoundsInfo, HmdQuad, NativeHandle};
use crate::{Result, VrError};

/// Result of a hard-bounds query: the native status and the quads it filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardBounds {
    pub ok: bool,
    pub quads: Vec<HmdQuad>,
}

/// Borrowed view of a native `IVRChaperone` instance.
#[derive(Debug, Clone, Copy)]
pub struct VrChaperone<'a> {
    api: &'a NativeApi,
    handle: NativeHandle,
}

impl<'a> VrChaperone<'a> {
    pub const INTERFACE: &'static str = "IVRChaperone";

    pub fn new(api: &'a NativeApi, handle: NativeHandle) -> Self {
        Self { api, handle }
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    fn usable(&self) -> Result<&'a NativeTable> {
        if self.handle.is_null() {
            return Err(VrError::NotConfigured {
                interface: Self::INTERFACE,
            });
        }
        Ok(self.api.table())
    }

    pub fn calibration_state(&self) -> Result<ChaperoneCalibrationState> {
        let pfn = self.usable()?.chaperone_get_calibration_state.get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    pub fn soft_bounds_info(&self, info: &mut ChaperoneSoftBoundsInfo) -> Result<bool> {
        let pfn = self.usable()?.chaperone_get_soft_bounds_info.get()?;
        buffer::clear(info);
        Ok(unsafe { pfn(self.handle, info) })
    }

    /// Hard boundary quads, fetched with a count probe followed by a fill.
    pub fn hard_bounds_info(&self) -> Result<HardBounds> {
        let pfn = self.usable()?.chaperone_get_hard_bounds_info.get()?;
        let (ok, quads) =
            buffer::query_array(|buf, count: &mut u32| unsafe { pfn(self.handle, buf, count) });
        log::debug!("chaperone hard bounds: {} quad(s), ok={}", quads.len(), ok);
        Ok(HardBounds { ok, quads })
    }

    pub fn seated_bounds_info(&self, info: &mut ChaperoneSeatedBoundsInfo) -> Result<bool> {
        let pfn = self.usable()?.chaperone_get_seated_bounds_info.get()?;
        buffer::clear(info);
        Ok(unsafe { pfn(self.handle, info) })
    }
}
