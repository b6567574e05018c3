//! `IVRSystem`: display geometry, tracking poses, device properties and events.

use crate::api::NativeApi;
use crate::buffer;
use crate::constants::MAX_TRACKED_DEVICE_COUNT;
use crate::enums::{
    Eye, GraphicsApiConvention, TrackedDeviceClass, TrackedDeviceProperty, TrackedPropertyError,
    TrackingUniverseOrigin, VrEventType,
};
use crate::ffi::NativeTable;
use crate::types::*;
use crate::{Result, VrError};
use std::ffi::c_void;

/// Value of a tracked-device property together with the error code native
/// code wrote for it. `value` is only meaningful when `error` is `SUCCESS`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyResult<T> {
    pub value: T,
    pub error: TrackedPropertyError,
}

impl<T> PropertyResult<T> {
    /// The value, if the query succeeded.
    pub fn ok(self) -> Option<T> {
        if self.error.is_success() {
            Some(self.value)
        } else {
            None
        }
    }
}

/// Desktop window rectangle for extended-mode displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderTargetSize {
    pub width: u32,
    pub height: u32,
}

/// Region of the output window an eye is drawn into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tangents of the half-angles of an eye's view frustum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionRaw {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VsyncTiming {
    pub seconds_since_last_vsync: f32,
    pub frame_counter: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DxgiOutputInfo {
    pub adapter_index: i32,
    pub adapter_output_index: i32,
}

/// Borrowed view of a native `IVRSystem` instance.
#[derive(Debug, Clone, Copy)]
pub struct VrSystem<'a> {
    api: &'a NativeApi,
    handle: NativeHandle,
}

impl<'a> VrSystem<'a> {
    pub const INTERFACE: &'static str = "IVRSystem";

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

    pub fn window_bounds(&self) -> Result<WindowBounds> {
        let pfn = self.usable()?.system_get_window_bounds.get()?;
        let mut out = WindowBounds::default();
        unsafe {
            pfn(
                self.handle,
                &mut out.x,
                &mut out.y,
                &mut out.width,
                &mut out.height,
            )
        };
        Ok(out)
    }

    pub fn recommended_render_target_size(&self) -> Result<RenderTargetSize> {
        let pfn = self.usable()?.system_get_recommended_render_target_size.get()?;
        let mut out = RenderTargetSize::default();
        unsafe { pfn(self.handle, &mut out.width, &mut out.height) };
        Ok(out)
    }

    pub fn eye_output_viewport(&self, eye: Eye) -> Result<Viewport> {
        let pfn = self.usable()?.system_get_eye_output_viewport.get()?;
        let mut out = Viewport::default();
        unsafe {
            pfn(
                self.handle,
                eye,
                &mut out.x,
                &mut out.y,
                &mut out.width,
                &mut out.height,
            )
        };
        Ok(out)
    }

    pub fn projection_matrix(
        &self,
        eye: Eye,
        near_z: f32,
        far_z: f32,
        convention: GraphicsApiConvention,
    ) -> Result<HmdMatrix44> {
        let pfn = self.usable()?.system_get_projection_matrix.get()?;
        Ok(unsafe { pfn(self.handle, eye, near_z, far_z, convention) })
    }

    pub fn projection_raw(&self, eye: Eye) -> Result<ProjectionRaw> {
        let pfn = self.usable()?.system_get_projection_raw.get()?;
        let mut out = ProjectionRaw::default();
        unsafe {
            pfn(
                self.handle,
                eye,
                &mut out.left,
                &mut out.right,
                &mut out.top,
                &mut out.bottom,
            )
        };
        Ok(out)
    }

    pub fn compute_distortion(&self, eye: Eye, u: f32, v: f32) -> Result<DistortionCoordinates> {
        let pfn = self.usable()?.system_compute_distortion.get()?;
        Ok(unsafe { pfn(self.handle, eye, u, v) })
    }

    pub fn eye_to_head_transform(&self, eye: Eye) -> Result<HmdMatrix34> {
        let pfn = self.usable()?.system_get_eye_to_head_transform.get()?;
        Ok(unsafe { pfn(self.handle, eye) })
    }

    /// Fills `timing` and returns the native status. `timing` is zeroed first,
    /// so it stays zero when native code reports failure without writing.
    pub fn time_since_last_vsync(&self, timing: &mut VsyncTiming) -> Result<bool> {
        let pfn = self.usable()?.system_get_time_since_last_vsync.get()?;
        buffer::clear(timing);
        Ok(unsafe {
            pfn(
                self.handle,
                &mut timing.seconds_since_last_vsync,
                &mut timing.frame_counter,
            )
        })
    }

    pub fn d3d9_adapter_index(&self) -> Result<i32> {
        let pfn = self.usable()?.system_get_d3d9_adapter_index.get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    pub fn dxgi_output_info(&self) -> Result<DxgiOutputInfo> {
        let pfn = self.usable()?.system_get_dxgi_output_info.get()?;
        let mut out = DxgiOutputInfo::default();
        unsafe {
            pfn(
                self.handle,
                &mut out.adapter_index,
                &mut out.adapter_output_index,
            )
        };
        Ok(out)
    }

    /// # Safety
    /// `window` must be a valid native window handle (an `HWND` on Windows).
    pub unsafe fn attach_to_window(&self, window: *mut c_void) -> Result<()> {
        let pfn = self.usable()?.system_attach_to_window.get()?;
        pfn(self.handle, window);
        Ok(())
    }

    /// Fill `poses` with one pose per device index. Native code decides how
    /// many entries it writes; the rest stay zeroed.
    pub fn device_to_absolute_tracking_pose(
        &self,
        origin: TrackingUniverseOrigin,
        predicted_seconds_to_photons: f32,
        poses: &mut [TrackedDevicePose],
    ) -> Result<()> {
        let pfn = self
            .usable()?
            .system_get_device_to_absolute_tracking_pose
            .get()?;
        buffer::clear_slice(poses);
        unsafe {
            pfn(
                self.handle,
                origin,
                predicted_seconds_to_photons,
                poses.as_mut_ptr(),
                poses.len() as u32,
            )
        };
        Ok(())
    }

    /// Poses for every possible device index.
    pub fn device_to_absolute_tracking_poses(
        &self,
        origin: TrackingUniverseOrigin,
        predicted_seconds_to_photons: f32,
    ) -> Result<Vec<TrackedDevicePose>> {
        let mut poses = vec![TrackedDevicePose::default(); MAX_TRACKED_DEVICE_COUNT as usize];
        self.device_to_absolute_tracking_pose(origin, predicted_seconds_to_photons, &mut poses)?;
        Ok(poses)
    }

    pub fn reset_seated_zero_pose(&self) -> Result<()> {
        let pfn = self.usable()?.system_reset_seated_zero_pose.get()?;
        unsafe { pfn(self.handle) };
        Ok(())
    }

    pub fn seated_zero_pose_to_standing_absolute_tracking_pose(&self) -> Result<HmdMatrix34> {
        let pfn = self
            .usable()?
            .system_get_seated_zero_pose_to_standing_absolute_tracking_pose
            .get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    /// Load `name` into `model`. On success the model's buffers belong to
    /// native code until [`VrSystem::free_render_model`] is called.
    pub fn load_render_model(&self, name: &str, model: &mut RenderModel) -> Result<bool> {
        let table = self.usable()?;
        let name = buffer::c_string(name)?;
        let pfn = table.system_load_render_model.get()?;
        buffer::clear(model);
        Ok(unsafe { pfn(self.handle, name.as_ptr(), model) })
    }

    pub fn free_render_model(&self, model: &mut RenderModel) -> Result<()> {
        let pfn = self.usable()?.system_free_render_model.get()?;
        unsafe { pfn(self.handle, model) };
        Ok(())
    }

    pub fn tracked_device_class(&self, device: TrackedDeviceIndex) -> Result<TrackedDeviceClass> {
        let pfn = self.usable()?.system_get_tracked_device_class.get()?;
        Ok(unsafe { pfn(self.handle, device) })
    }

    pub fn is_tracked_device_connected(&self, device: TrackedDeviceIndex) -> Result<bool> {
        let pfn = self.usable()?.system_is_tracked_device_connected.get()?;
        Ok(unsafe { pfn(self.handle, device) })
    }

    pub fn bool_tracked_device_property(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
    ) -> Result<PropertyResult<bool>> {
        let pfn = self.usable()?.system_get_bool_tracked_device_property.get()?;
        let mut error = TrackedPropertyError::default();
        let value = unsafe { pfn(self.handle, device, prop, &mut error) };
        Ok(PropertyResult { value, error })
    }

    pub fn float_tracked_device_property(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
    ) -> Result<PropertyResult<f32>> {
        let pfn = self.usable()?.system_get_float_tracked_device_property.get()?;
        let mut error = TrackedPropertyError::default();
        let value = unsafe { pfn(self.handle, device, prop, &mut error) };
        Ok(PropertyResult { value, error })
    }

    pub fn int32_tracked_device_property(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
    ) -> Result<PropertyResult<i32>> {
        let pfn = self.usable()?.system_get_int32_tracked_device_property.get()?;
        let mut error = TrackedPropertyError::default();
        let value = unsafe { pfn(self.handle, device, prop, &mut error) };
        Ok(PropertyResult { value, error })
    }

    pub fn uint64_tracked_device_property(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
    ) -> Result<PropertyResult<u64>> {
        let pfn = self.usable()?.system_get_uint64_tracked_device_property.get()?;
        let mut error = TrackedPropertyError::default();
        let value = unsafe { pfn(self.handle, device, prop, &mut error) };
        Ok(PropertyResult { value, error })
    }

    pub fn matrix34_tracked_device_property(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
    ) -> Result<PropertyResult<HmdMatrix34>> {
        let pfn = self
            .usable()?
            .system_get_matrix34_tracked_device_property
            .get()?;
        let mut error = TrackedPropertyError::default();
        let value = unsafe { pfn(self.handle, device, prop, &mut error) };
        Ok(PropertyResult { value, error })
    }

    /// String property via the two-call idiom. `error` is the code from the
    /// last native call made.
    pub fn string_tracked_device_property(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
    ) -> Result<PropertyResult<String>> {
        let pfn = self
            .usable()?
            .system_get_string_tracked_device_property
            .get()?;
        let mut error = TrackedPropertyError::default();
        let value = buffer::query_string(|buf, len| {
            error = TrackedPropertyError::default();
            unsafe { pfn(self.handle, device, prop, buf, len, &mut error) }
        });
        Ok(PropertyResult { value, error })
    }

    /// String property into a caller buffer. `value` is the size native code
    /// reported, which exceeds `buf.len()` when the buffer is too small.
    pub fn string_tracked_device_property_into(
        &self,
        device: TrackedDeviceIndex,
        prop: TrackedDeviceProperty,
        buf: &mut [u8],
    ) -> Result<PropertyResult<u32>> {
        let pfn = self
            .usable()?
            .system_get_string_tracked_device_property
            .get()?;
        buffer::clear_slice(buf);
        let mut error = TrackedPropertyError::default();
        let capacity = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let value = unsafe {
            pfn(
                self.handle,
                device,
                prop,
                buf.as_mut_ptr() as *mut std::ffi::c_char,
                capacity,
                &mut error,
            )
        };
        Ok(PropertyResult { value, error })
    }

    pub fn prop_error_name(&self, error: TrackedPropertyError) -> Result<String> {
        let pfn = self.usable()?.system_get_prop_error_name_from_enum.get()?;
        Ok(unsafe { buffer::string_from_ptr(pfn(self.handle, error)) })
    }

    /// Pop the next queued event into `event`. Returns false when the queue is
    /// empty, leaving `event` zeroed.
    pub fn poll_next_event(&self, event: &mut VrEvent) -> Result<bool> {
        let pfn = self.usable()?.system_poll_next_event.get()?;
        buffer::clear(event);
        Ok(unsafe { pfn(self.handle, event) })
    }

    pub fn event_type_name(&self, event_type: VrEventType) -> Result<String> {
        let pfn = self.usable()?.system_get_event_type_name_from_enum.get()?;
        Ok(unsafe { buffer::string_from_ptr(pfn(self.handle, event_type)) })
    }

    pub fn hidden_area_mesh(&self, eye: Eye) -> Result<HiddenAreaMesh> {
        let pfn = self.usable()?.system_get_hidden_area_mesh.get()?;
        Ok(unsafe { pfn(self.handle, eye) })
    }
}
