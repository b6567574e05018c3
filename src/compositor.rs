//! `IVRCompositor`: frame submission, overlays, fades and compositor window
//! control.

use crate::api::NativeApi;
use crate::buffer;
use crate::constants::MAX_TRACKED_DEVICE_COUNT;
use crate::enums::{CompositorDeviceType, Eye};
use crate::ffi::NativeTable;
use crate::types::{
    CompositorFrameTiming, CompositorOverlaySettings, NativeHandle, TextureBounds,
    TrackedDevicePose,
};
use crate::{Result, VrError};
use std::ffi::c_void;
use std::mem::size_of;

/// RGBA fade target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FadeColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// Borrowed view of a native `IVRCompositor` instance.
#[derive(Debug, Clone, Copy)]
pub struct VrCompositor<'a> {
    api: &'a NativeApi,
    handle: NativeHandle,
}

impl<'a> VrCompositor<'a> {
    pub const INTERFACE: &'static str = "IVRCompositor";

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

    /// Last compositor error message; empty when there is none.
    pub fn last_error(&self) -> Result<String> {
        let pfn = self.usable()?.compositor_get_last_error.get()?;
        Ok(buffer::query_string(|buf, len| unsafe {
            pfn(self.handle, buf, len)
        }))
    }

    pub fn set_vsync(&self, vsync: bool) -> Result<()> {
        let pfn = self.usable()?.compositor_set_vsync.get()?;
        unsafe { pfn(self.handle, vsync) };
        Ok(())
    }

    pub fn vsync(&self) -> Result<bool> {
        let pfn = self.usable()?.compositor_get_vsync.get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    pub fn set_gamma(&self, gamma: f32) -> Result<()> {
        let pfn = self.usable()?.compositor_set_gamma.get()?;
        unsafe { pfn(self.handle, gamma) };
        Ok(())
    }

    pub fn gamma(&self) -> Result<f32> {
        let pfn = self.usable()?.compositor_get_gamma.get()?;
        Ok(unsafe { pfn(self.handle) })
    }

    /// # Safety
    /// `device` must be a live graphics device of kind `device_type`
    /// (for OpenGL, null with a current context).
    pub unsafe fn set_graphics_device(
        &self,
        device_type: CompositorDeviceType,
        device: *mut c_void,
    ) -> Result<()> {
        let pfn = self.usable()?.compositor_set_graphics_device.get()?;
        pfn(self.handle, device_type, device);
        Ok(())
    }

    /// Block until the compositor is ready for a new frame, then fill `poses`
    /// with the poses to render it with.
    pub fn wait_get_poses(&self, poses: &mut [TrackedDevicePose]) -> Result<()> {
        let pfn = self.usable()?.compositor_wait_get_poses.get()?;
        buffer::clear_slice(poses);
        unsafe { pfn(self.handle, poses.as_mut_ptr(), poses.len() as u32) };
        Ok(())
    }

    /// [`VrCompositor::wait_get_poses`] into a buffer sized for every device
    /// index.
    pub fn wait_get_all_poses(&self) -> Result<Vec<TrackedDevicePose>> {
        let mut poses = vec![TrackedDevicePose::default(); MAX_TRACKED_DEVICE_COUNT as usize];
        self.wait_get_poses(&mut poses)?;
        Ok(poses)
    }

    /// # Safety
    /// `texture` must be a texture belonging to the device passed to
    /// [`VrCompositor::set_graphics_device`].
    pub unsafe fn submit(
        &self,
        eye: Eye,
        texture: *mut c_void,
        bounds: &TextureBounds,
    ) -> Result<()> {
        let pfn = self.usable()?.compositor_submit.get()?;
        pfn(self.handle, eye, texture, bounds);
        Ok(())
    }

    pub fn clear_last_submitted_frame(&self) -> Result<()> {
        let pfn = self.usable()?.compositor_clear_last_submitted_frame.get()?;
        unsafe { pfn(self.handle) };
        Ok(())
    }

    /// Fill `settings` with the compositor's defaults. The record is zeroed and
    /// its `size` header stamped before the call.
    pub fn overlay_defaults(&self, settings: &mut CompositorOverlaySettings) -> Result<()> {
        let pfn = self.usable()?.compositor_get_overlay_defaults.get()?;
        *settings = CompositorOverlaySettings::new();
        unsafe { pfn(self.handle, settings) };
        Ok(())
    }

    /// # Safety
    /// `texture` must be a texture belonging to the current graphics device.
    pub unsafe fn set_overlay(
        &self,
        texture: *mut c_void,
        settings: &CompositorOverlaySettings,
    ) -> Result<()> {
        let pfn = self.usable()?.compositor_set_overlay.get()?;
        pfn(self.handle, texture, settings);
        Ok(())
    }

    /// # Safety
    /// `pixels` must point at `width * height * depth` readable bytes.
    pub unsafe fn set_overlay_raw(
        &self,
        pixels: *mut c_void,
        width: u32,
        height: u32,
        depth: u32,
        settings: &CompositorOverlaySettings,
    ) -> Result<()> {
        let pfn = self.usable()?.compositor_set_overlay_raw.get()?;
        pfn(self.handle, pixels, width, height, depth, settings);
        Ok(())
    }

    pub fn set_overlay_from_file(
        &self,
        path: &str,
        settings: &CompositorOverlaySettings,
    ) -> Result<()> {
        let table = self.usable()?;
        let path = buffer::c_string(path)?;
        let pfn = table.compositor_set_overlay_from_file.get()?;
        unsafe { pfn(self.handle, path.as_ptr(), settings) };
        Ok(())
    }

    pub fn clear_overlay(&self) -> Result<()> {
        let pfn = self.usable()?.compositor_clear_overlay.get()?;
        unsafe { pfn(self.handle) };
        Ok(())
    }

    /// Timing for the frame `frames_ago` frames back. `timing` is zeroed and
    /// its `size` header stamped before the call.
    pub fn frame_timing(&self, timing: &mut CompositorFrameTiming, frames_ago: u32) -> Result<bool> {
        let pfn = self.usable()?.compositor_get_frame_timing.get()?;
        *timing = CompositorFrameTiming::new();
        debug_assert_eq!(timing.size as usize, size_of::<CompositorFrameTiming>());
        Ok(unsafe { pfn(self.handle, timing, frames_ago) })
    }

    pub fn fade_to_color(&self, seconds: f32, color: FadeColor, background: bool) -> Result<()> {
        let pfn = self.usable()?.compositor_fade_to_color.get()?;
        unsafe {
            pfn(
                self.handle,
                seconds,
                color.red,
                color.green,
                color.blue,
                color.alpha,
                background,
            )
        };
        Ok(())
    }

    pub fn fade_grid(&self, seconds: f32, fade_in: bool) -> Result<()> {
        let pfn = self.usable()?.compositor_fade_grid.get()?;
        unsafe { pfn(self.handle, seconds, fade_in) };
        Ok(())
    }

    pub fn bring_to_front(&self) -> Result<()> {
        let pfn = self.usable()?.compositor_bring_to_front.get()?;
        unsafe { pfn(self.handle) };
        Ok(())
    }

    pub fn go_to_back(&self) -> Result<()> {
        let pfn = self.usable()?.compositor_go_to_back.get()?;
        unsafe { pfn(self.handle) };
        Ok(())
    }

    pub fn quit(&self) -> Result<()> {
        let pfn = self.usable()?.compositor_quit.get()?;
        unsafe { pfn(self.handle) };
        Ok(())
    }

    pub fn is_fullscreen(&self) -> Result<bool> {
        let pfn = self.usable()?.compositor_is_fullscreen.get()?;
        Ok(unsafe { pfn(self.handle) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_handle, native_calls, record_call};
    use std::cell::Cell;
    use std::ffi::c_char;

    thread_local! {
        static LAST_GAMMA: Cell<f32> = const { Cell::new(0.0) };
        static LAST_TIMING_SIZE: Cell<u32> = const { Cell::new(0) };
        static LAST_FADE: Cell<[f32; 5]> = const { Cell::new([0.0; 5]) };
        static LAST_POSE_COUNT: Cell<u32> = const { Cell::new(0) };
    }

    unsafe extern "C" fn stub_set_gamma(_h: NativeHandle, gamma: f32) {
        record_call();
        LAST_GAMMA.with(|g| g.set(gamma));
    }

    unsafe extern "C" fn stub_get_gamma(_h: NativeHandle) -> f32 {
        record_call();
        LAST_GAMMA.with(|g| g.get())
    }

    unsafe extern "C" fn stub_last_error(_h: NativeHandle, buf: *mut c_char, len: u32) -> u32 {
        record_call();
        let message = b"Compositor not ready\0";
        if !buf.is_null() && len as usize >= message.len() {
            std::ptr::copy_nonoverlapping(message.as_ptr() as *const c_char, buf, message.len());
        }
        message.len() as u32
    }

    unsafe extern "C" fn stub_no_error(_h: NativeHandle, _buf: *mut c_char, _len: u32) -> u32 {
        record_call();
        0
    }

    unsafe extern "C" fn stub_frame_timing(
        _h: NativeHandle,
        timing: *mut CompositorFrameTiming,
        frames_ago: u32,
    ) -> bool {
        record_call();
        LAST_TIMING_SIZE.with(|s| s.set((*timing).size));
        if frames_ago > 0 {
            return false;
        }
        (*timing).frame_index = 42;
        (*timing).frame_start = 1.5;
        true
    }

    unsafe extern "C" fn stub_overlay_defaults(
        _h: NativeHandle,
        settings: *mut CompositorOverlaySettings,
    ) {
        record_call();
        (*settings).scale = 1.0;
        (*settings).alpha = 0.8;
    }

    unsafe extern "C" fn stub_fade_to_color(
        _h: NativeHandle,
        seconds: f32,
        r: f32,
        g: f32,
        b: f32,
        a: f32,
        _background: bool,
    ) {
        record_call();
        LAST_FADE.with(|f| f.set([seconds, r, g, b, a]));
    }

    unsafe extern "C" fn stub_wait_get_poses(
        _h: NativeHandle,
        poses: *mut TrackedDevicePose,
        count: u32,
    ) {
        record_call();
        LAST_POSE_COUNT.with(|c| c.set(count));
        if count > 0 {
            (*poses).pose_is_valid = true;
        }
    }

    fn bound_table() -> NativeTable {
        let mut table = NativeTable::default();
        table.compositor_set_gamma.bind(stub_set_gamma);
        table.compositor_get_gamma.bind(stub_get_gamma);
        table.compositor_get_last_error.bind(stub_last_error);
        table.compositor_get_frame_timing.bind(stub_frame_timing);
        table.compositor_get_overlay_defaults.bind(stub_overlay_defaults);
        table.compositor_fade_to_color.bind(stub_fade_to_color);
        table.compositor_wait_get_poses.bind(stub_wait_get_poses);
        table
    }

    fn assert_not_configured<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(VrError::NotConfigured { interface }) => assert_eq!(interface, "IVRCompositor"),
            other => panic!("expected NotConfigured, got {:?}", other),
        }
    }

    #[test]
    fn test_null_handle_rejects_every_operation() {
        let api = NativeApi::from_table(bound_table());
        let compositor = api.compositor(NativeHandle::null());
        let settings = CompositorOverlaySettings::new();

        assert_not_configured(compositor.last_error());
        assert_not_configured(compositor.set_vsync(true));
        assert_not_configured(compositor.vsync());
        assert_not_configured(compositor.set_gamma(2.2));
        assert_not_configured(compositor.gamma());
        assert_not_configured(unsafe {
            compositor.set_graphics_device(CompositorDeviceType::OPENGL, std::ptr::null_mut())
        });
        assert_not_configured(compositor.wait_get_poses(&mut []));
        assert_not_configured(compositor.wait_get_all_poses());
        assert_not_configured(unsafe {
            compositor.submit(Eye::LEFT, std::ptr::null_mut(), &TextureBounds::FULL)
        });
        assert_not_configured(compositor.clear_last_submitted_frame());
        assert_not_configured(compositor.overlay_defaults(&mut CompositorOverlaySettings::default()));
        assert_not_configured(unsafe { compositor.set_overlay(std::ptr::null_mut(), &settings) });
        assert_not_configured(unsafe {
            compositor.set_overlay_raw(std::ptr::null_mut(), 1, 1, 4, &settings)
        });
        assert_not_configured(compositor.set_overlay_from_file("overlay.png", &settings));
        assert_not_configured(compositor.clear_overlay());
        assert_not_configured(compositor.frame_timing(&mut CompositorFrameTiming::default(), 0));
        assert_not_configured(compositor.fade_to_color(1.0, FadeColor::default(), false));
        assert_not_configured(compositor.fade_grid(1.0, true));
        assert_not_configured(compositor.bring_to_front());
        assert_not_configured(compositor.go_to_back());
        assert_not_configured(compositor.quit());
        assert_not_configured(compositor.is_fullscreen());

        assert_eq!(native_calls(), 0);
    }

    #[test]
    fn test_gamma_round_trips_through_native() {
        let api = NativeApi::from_table(bound_table());
        let compositor = api.compositor(fake_handle());
        compositor.set_gamma(1.8).unwrap();
        assert_eq!(compositor.gamma().unwrap(), 1.8);
        assert_eq!(native_calls(), 2);
    }

    #[test]
    fn test_last_error_two_call() {
        let api = NativeApi::from_table(bound_table());
        assert_eq!(
            api.compositor(fake_handle()).last_error().unwrap(),
            "Compositor not ready"
        );
        assert_eq!(native_calls(), 2);

        let mut table = NativeTable::default();
        table.compositor_get_last_error.bind(stub_no_error);
        let api = NativeApi::from_table(table);
        assert_eq!(api.compositor(fake_handle()).last_error().unwrap(), "");
        assert_eq!(native_calls(), 3);
    }

    #[test]
    fn test_frame_timing_stamps_size_and_zeroes() {
        let api = NativeApi::from_table(bound_table());
        let compositor = api.compositor(fake_handle());

        let mut timing = CompositorFrameTiming::default();
        assert!(compositor.frame_timing(&mut timing, 0).unwrap());
        assert_eq!(timing.frame_index, 42);
        assert_eq!(
            LAST_TIMING_SIZE.with(|s| s.get()) as usize,
            size_of::<CompositorFrameTiming>()
        );

        assert!(!compositor.frame_timing(&mut timing, 3).unwrap());
        assert_eq!(timing, CompositorFrameTiming::new());
    }

    #[test]
    fn test_overlay_defaults_start_from_stamped_record() {
        let api = NativeApi::from_table(bound_table());
        let mut settings = CompositorOverlaySettings::default();
        settings.curved = true;
        api.compositor(fake_handle())
            .overlay_defaults(&mut settings)
            .unwrap();
        assert!(!settings.curved);
        assert_eq!(settings.size as usize, size_of::<CompositorOverlaySettings>());
        assert_eq!(settings.alpha, 0.8);
    }

    #[test]
    fn test_fade_to_color_passes_components_in_order() {
        let api = NativeApi::from_table(bound_table());
        let color = FadeColor {
            red: 0.1,
            green: 0.2,
            blue: 0.3,
            alpha: 1.0,
        };
        api.compositor(fake_handle())
            .fade_to_color(0.5, color, false)
            .unwrap();
        assert_eq!(LAST_FADE.with(|f| f.get()), [0.5, 0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_wait_get_all_poses() {
        let api = NativeApi::from_table(bound_table());
        let poses = api.compositor(fake_handle()).wait_get_all_poses().unwrap();
        assert_eq!(poses.len(), MAX_TRACKED_DEVICE_COUNT as usize);
        assert!(poses[0].pose_is_valid);
        assert!(!poses[1].pose_is_valid);
    }

    #[test]
    fn test_wait_get_poses_short_slice_is_forwarded_as_is() {
        let api = NativeApi::from_table(bound_table());
        let mut poses = [TrackedDevicePose::default(); 2];
        poses[1].device_is_valid = true;

        api.compositor(fake_handle())
            .wait_get_poses(&mut poses)
            .unwrap();

        assert_eq!(LAST_POSE_COUNT.with(|c| c.get()), 2);
        assert!(poses[0].pose_is_valid);
        assert!(!poses[1].device_is_valid);
    }

    #[test]
    fn test_overlay_from_file_rejects_interior_nul() {
        let api = NativeApi::from_table(bound_table());
        let err = api
            .compositor(fake_handle())
            .set_overlay_from_file("a\0b.png", &CompositorOverlaySettings::new())
            .unwrap_err();
        assert!(matches!(err, VrError::InteriorNul(_)));
        assert_eq!(native_calls(), 0);
    }
}
