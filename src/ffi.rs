//! Native function table for the SteamVR flat C API.
//!
//! Every exported entry point has a `Pfn*` signature and a [`Slot`] in
//! [`NativeTable`]. The table is filled from a loaded library by
//! [`crate::api::NativeApi`], or by hand when the entry points come from
//! somewhere else (static linking, test stubs).

use crate::enums::{
    ChaperoneCalibrationState, CompositorDeviceType, Eye, GraphicsApiConvention,
    TrackedDeviceClass, TrackedDeviceProperty, TrackedPropertyError, TrackingUniverseOrigin,
    VrEventType,
};
use crate::runtime::SteamInterface;
use crate::types::*;
use crate::{Result, VrError};
use std::ffi::{c_char, c_void};
use std::fmt;

/// One entry point: its exported name and, once resolved, its address.
#[derive(Clone, Copy)]
pub struct Slot<F> {
    symbol: &'static str,
    pfn: Option<F>,
}

impl<F: Copy> Slot<F> {
    pub const fn unbound(symbol: &'static str) -> Self {
        Self { symbol, pfn: None }
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn bind(&mut self, pfn: F) {
        self.pfn = Some(pfn);
    }

    pub fn is_bound(&self) -> bool {
        self.pfn.is_some()
    }

    /// The resolved entry point, or `VrError::Unbound`.
    pub fn get(&self) -> Result<F> {
        self.pfn.ok_or(VrError::Unbound {
            symbol: self.symbol,
        })
    }
}

impl<F> fmt::Debug for Slot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.pfn.is_some() { "bound" } else { "unbound" };
        write!(f, "{} ({})", self.symbol, state)
    }
}

pub type PfnInterfaceAccessor = unsafe extern "C" fn() -> NativeHandle;

macro_rules! native_table {
    (
        $(
            $field:ident: $symbol:literal => $pfn:ident = fn($($arg:ty),* $(,)?) $(-> $ret:ty)?;
        )*
    ) => {
        $( pub type $pfn = unsafe extern "C" fn($($arg),*) $(-> $ret)?; )*

        /// Resolved native entry points, one slot per exported symbol.
        #[derive(Debug, Clone)]
        pub struct NativeTable {
            $( pub $field: Slot<$pfn>, )*
            /// Interface accessors (`SteamClient`, `SteamUser`, ...), indexed by
            /// [`SteamInterface`].
            pub interfaces: [Slot<PfnInterfaceAccessor>; SteamInterface::COUNT],
        }

        impl Default for NativeTable {
            fn default() -> Self {
                Self {
                    $( $field: Slot::unbound($symbol), )*
                    interfaces: SteamInterface::ALL.map(|iface| Slot::unbound(iface.symbol())),
                }
            }
        }

        impl NativeTable {
            /// Names of the bootstrap and subsystem entry points, excluding
            /// interface accessors.
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol),*];

            /// Look up every entry point in `library`. Returns the table and the
            /// names that could not be found.
            ///
            /// # Safety
            /// Each export present in `library` must have the signature declared
            /// for it here.
            pub(crate) unsafe fn resolve(
                library: &libloading::Library,
            ) -> (Self, Vec<&'static str>) {
                let mut table = Self::default();
                let mut missing = Vec::new();
                $(
                    match library.get::<$pfn>(concat!($symbol, "\0").as_bytes()) {
                        Ok(pfn) => table.$field.bind(*pfn),
                        Err(_) => missing.push($symbol),
                    }
                )*
                for slot in table.interfaces.iter_mut() {
                    let name = format!("{}\0", slot.symbol());
                    match library.get::<PfnInterfaceAccessor>(name.as_bytes()) {
                        Ok(pfn) => slot.bind(*pfn),
                        Err(_) => missing.push(slot.symbol()),
                    }
                }
                (table, missing)
            }

            /// Names of every slot that has no entry point.
            pub fn unbound_symbols(&self) -> Vec<&'static str> {
                let mut unbound = Vec::new();
                $(
                    if !self.$field.is_bound() {
                        unbound.push(self.$field.symbol());
                    }
                )*
                unbound.extend(
                    self.interfaces
                        .iter()
                        .filter(|slot| !slot.is_bound())
                        .map(|slot| slot.symbol()),
                );
                unbound
            }
        }
    };
}

native_table! {
    // -- Process bootstrap --
    restart_app_if_necessary: "SteamAPI_RestartAppIfNecessary" => PfnRestartAppIfNecessary = fn(u32) -> bool;
    init: "SteamAPI_Init" => PfnInit = fn() -> bool;
    shutdown: "SteamAPI_Shutdown" => PfnShutdown = fn();
    run_callbacks: "SteamAPI_RunCallbacks" => PfnRunCallbacks = fn();
    register_callback: "SteamAPI_RegisterCallback" => PfnRegisterCallback = fn(CallbackRecord, i32);
    unregister_callback: "SteamAPI_UnregisterCallback" => PfnUnregisterCallback = fn(CallbackRecord);

    // -- IVRSystem --
    system_get_window_bounds: "SteamAPI_vr_IVRSystem_GetWindowBounds"
        => PfnSystemGetWindowBounds = fn(NativeHandle, *mut i32, *mut i32, *mut u32, *mut u32);
    system_get_recommended_render_target_size: "SteamAPI_vr_IVRSystem_GetRecommendedRenderTargetSize"
        => PfnSystemGetRecommendedRenderTargetSize = fn(NativeHandle, *mut u32, *mut u32);
    system_get_eye_output_viewport: "SteamAPI_vr_IVRSystem_GetEyeOutputViewport"
        => PfnSystemGetEyeOutputViewport = fn(NativeHandle, Eye, *mut u32, *mut u32, *mut u32, *mut u32);
    system_get_projection_matrix: "SteamAPI_vr_IVRSystem_GetProjectionMatrix"
        => PfnSystemGetProjectionMatrix = fn(NativeHandle, Eye, f32, f32, GraphicsApiConvention) -> HmdMatrix44;
    system_get_projection_raw: "SteamAPI_vr_IVRSystem_GetProjectionRaw"
        => PfnSystemGetProjectionRaw = fn(NativeHandle, Eye, *mut f32, *mut f32, *mut f32, *mut f32);
    system_compute_distortion: "SteamAPI_vr_IVRSystem_ComputeDistortion"
        => PfnSystemComputeDistortion = fn(NativeHandle, Eye, f32, f32) -> DistortionCoordinates;
    system_get_eye_to_head_transform: "SteamAPI_vr_IVRSystem_GetEyeToHeadTransform"
        => PfnSystemGetEyeToHeadTransform = fn(NativeHandle, Eye) -> HmdMatrix34;
    system_get_time_since_last_vsync: "SteamAPI_vr_IVRSystem_GetTimeSinceLastVsync"
        => PfnSystemGetTimeSinceLastVsync = fn(NativeHandle, *mut f32, *mut u64) -> bool;
    system_get_d3d9_adapter_index: "SteamAPI_vr_IVRSystem_GetD3D9AdapterIndex"
        => PfnSystemGetD3D9AdapterIndex = fn(NativeHandle) -> i32;
    system_get_dxgi_output_info: "SteamAPI_vr_IVRSystem_GetDXGIOutputInfo"
        => PfnSystemGetDxgiOutputInfo = fn(NativeHandle, *mut i32, *mut i32);
    system_attach_to_window: "SteamAPI_vr_IVRSystem_AttachToWindow"
        => PfnSystemAttachToWindow = fn(NativeHandle, *mut c_void);
    system_get_device_to_absolute_tracking_pose: "SteamAPI_vr_IVRSystem_GetDeviceToAbsoluteTrackingPose"
        => PfnSystemGetDeviceToAbsoluteTrackingPose = fn(NativeHandle, TrackingUniverseOrigin, f32, *mut TrackedDevicePose, u32);
    system_reset_seated_zero_pose: "SteamAPI_vr_IVRSystem_ResetSeatedZeroPose"
        => PfnSystemResetSeatedZeroPose = fn(NativeHandle);
    system_get_seated_zero_pose_to_standing_absolute_tracking_pose: "SteamAPI_vr_IVRSystem_GetSeatedZeroPoseToStandingAbsoluteTrackingPose"
        => PfnSystemGetSeatedZeroPoseToStandingAbsoluteTrackingPose = fn(NativeHandle) -> HmdMatrix34;
    system_load_render_model: "SteamAPI_vr_IVRSystem_LoadRenderModel"
        => PfnSystemLoadRenderModel = fn(NativeHandle, *const c_char, *mut RenderModel) -> bool;
    system_free_render_model: "SteamAPI_vr_IVRSystem_FreeRenderModel"
        => PfnSystemFreeRenderModel = fn(NativeHandle, *mut RenderModel);
    system_get_tracked_device_class: "SteamAPI_vr_IVRSystem_GetTrackedDeviceClass"
        => PfnSystemGetTrackedDeviceClass = fn(NativeHandle, TrackedDeviceIndex) -> TrackedDeviceClass;
    system_is_tracked_device_connected: "SteamAPI_vr_IVRSystem_IsTrackedDeviceConnected"
        => PfnSystemIsTrackedDeviceConnected = fn(NativeHandle, TrackedDeviceIndex) -> bool;
    system_get_bool_tracked_device_property: "SteamAPI_vr_IVRSystem_GetBoolTrackedDeviceProperty"
        => PfnSystemGetBoolTrackedDeviceProperty = fn(NativeHandle, TrackedDeviceIndex, TrackedDeviceProperty, *mut TrackedPropertyError) -> bool;
    system_get_float_tracked_device_property: "SteamAPI_vr_IVRSystem_GetFloatTrackedDeviceProperty"
        => PfnSystemGetFloatTrackedDeviceProperty = fn(NativeHandle, TrackedDeviceIndex, TrackedDeviceProperty, *mut TrackedPropertyError) -> f32;
    system_get_int32_tracked_device_property: "SteamAPI_vr_IVRSystem_GetInt32TrackedDeviceProperty"
        => PfnSystemGetInt32TrackedDeviceProperty = fn(NativeHandle, TrackedDeviceIndex, TrackedDeviceProperty, *mut TrackedPropertyError) -> i32;
    system_get_uint64_tracked_device_property: "SteamAPI_vr_IVRSystem_GetUint64TrackedDeviceProperty"
        => PfnSystemGetUint64TrackedDeviceProperty = fn(NativeHandle, TrackedDeviceIndex, TrackedDeviceProperty, *mut TrackedPropertyError) -> u64;
    system_get_matrix34_tracked_device_property: "SteamAPI_vr_IVRSystem_GetMatrix34TrackedDeviceProperty"
        => PfnSystemGetMatrix34TrackedDeviceProperty = fn(NativeHandle, TrackedDeviceIndex, TrackedDeviceProperty, *mut TrackedPropertyError) -> HmdMatrix34;
    system_get_string_tracked_device_property: "SteamAPI_vr_IVRSystem_GetStringTrackedDeviceProperty"
        => PfnSystemGetStringTrackedDeviceProperty = fn(NativeHandle, TrackedDeviceIndex, TrackedDeviceProperty, *mut c_char, u32, *mut TrackedPropertyError) -> u32;
    system_get_prop_error_name_from_enum: "SteamAPI_vr_IVRSystem_GetPropErrorNameFromEnum"
        => PfnSystemGetPropErrorNameFromEnum = fn(NativeHandle, TrackedPropertyError) -> *const c_char;
    system_poll_next_event: "SteamAPI_vr_IVRSystem_PollNextEvent"
        => PfnSystemPollNextEvent = fn(NativeHandle, *mut VrEvent) -> bool;
    system_get_event_type_name_from_enum: "SteamAPI_vr_IVRSystem_GetEventTypeNameFromEnum"
        => PfnSystemGetEventTypeNameFromEnum = fn(NativeHandle, VrEventType) -> *const c_char;
    system_get_hidden_area_mesh: "SteamAPI_vr_IVRSystem_GetHiddenAreaMesh"
        => PfnSystemGetHiddenAreaMesh = fn(NativeHandle, Eye) -> HiddenAreaMesh;

    // -- IVRChaperone --
    chaperone_get_calibration_state: "SteamAPI_vr_IVRChaperone_GetCalibrationState"
        => PfnChaperoneGetCalibrationState = fn(NativeHandle) -> ChaperoneCalibrationState;
    chaperone_get_soft_bounds_info: "SteamAPI_vr_IVRChaperone_GetSoftBoundsInfo"
        => PfnChaperoneGetSoftBoundsInfo = fn(NativeHandle, *mut ChaperoneSoftBoundsInfo) -> bool;
    chaperone_get_hard_bounds_info: "SteamAPI_vr_IVRChaperone_GetHardBoundsInfo"
        => PfnChaperoneGetHardBoundsInfo = fn(NativeHandle, *mut HmdQuad, *mut u32) -> bool;
    chaperone_get_seated_bounds_info: "SteamAPI_vr_IVRChaperone_GetSeatedBoundsInfo"
        => PfnChaperoneGetSeatedBoundsInfo = fn(NativeHandle, *mut ChaperoneSeatedBoundsInfo) -> bool;

    // -- IVRCompositor --
    compositor_get_last_error: "SteamAPI_vr_IVRCompositor_GetLastError"
        => PfnCompositorGetLastError = fn(NativeHandle, *mut c_char, u32) -> u32;
    compositor_set_vsync: "SteamAPI_vr_IVRCompositor_SetVSync"
        => PfnCompositorSetVSync = fn(NativeHandle, bool);
    compositor_get_vsync: "SteamAPI_vr_IVRCompositor_GetVSync"
        => PfnCompositorGetVSync = fn(NativeHandle) -> bool;
    compositor_set_gamma: "SteamAPI_vr_IVRCompositor_SetGamma"
        => PfnCompositorSetGamma = fn(NativeHandle, f32);
    compositor_get_gamma: "SteamAPI_vr_IVRCompositor_GetGamma"
        => PfnCompositorGetGamma = fn(NativeHandle) -> f32;
    compositor_set_graphics_device: "SteamAPI_vr_IVRCompositor_SetGraphicsDevice"
        => PfnCompositorSetGraphicsDevice = fn(NativeHandle, CompositorDeviceType, *mut c_void);
    compositor_wait_get_poses: "SteamAPI_vr_IVRCompositor_WaitGetPoses"
        => PfnCompositorWaitGetPoses = fn(NativeHandle, *mut TrackedDevicePose, u32);
    compositor_submit: "SteamAPI_vr_IVRCompositor_Submit"
        => PfnCompositorSubmit = fn(NativeHandle, Eye, *mut c_void, *const TextureBounds);
    compositor_clear_last_submitted_frame: "SteamAPI_vr_IVRCompositor_ClearLastSubmittedFrame"
        => PfnCompositorClearLastSubmittedFrame = fn(NativeHandle);
    compositor_get_overlay_defaults: "SteamAPI_vr_IVRCompositor_GetOverlayDefaults"
        => PfnCompositorGetOverlayDefaults = fn(NativeHandle, *mut CompositorOverlaySettings);
    compositor_set_overlay: "SteamAPI_vr_IVRCompositor_SetOverlay"
        => PfnCompositorSetOverlay = fn(NativeHandle, *mut c_void, *const CompositorOverlaySettings);
    compositor_set_overlay_raw: "SteamAPI_vr_IVRCompositor_SetOverlayRaw"
        => PfnCompositorSetOverlayRaw = fn(NativeHandle, *mut c_void, u32, u32, u32, *const CompositorOverlaySettings);
    compositor_set_overlay_from_file: "SteamAPI_vr_IVRCompositor_SetOverlayFromFile"
        => PfnCompositorSetOverlayFromFile = fn(NativeHandle, *const c_char, *const CompositorOverlaySettings);
    compositor_clear_overlay: "SteamAPI_vr_IVRCompositor_ClearOverlay"
        => PfnCompositorClearOverlay = fn(NativeHandle);
    compositor_get_frame_timing: "SteamAPI_vr_IVRCompositor_GetFrameTiming"
        => PfnCompositorGetFrameTiming = fn(NativeHandle, *mut CompositorFrameTiming, u32) -> bool;
    compositor_fade_to_color: "SteamAPI_vr_IVRCompositor_FadeToColor"
        => PfnCompositorFadeToColor = fn(NativeHandle, f32, f32, f32, f32, f32, bool);
    compositor_fade_grid: "SteamAPI_vr_IVRCompositor_FadeGrid"
        => PfnCompositorFadeGrid = fn(NativeHandle, f32, bool);
    compositor_bring_to_front: "SteamAPI_vr_IVRCompositor_CompositorBringToFront"
        => PfnCompositorBringToFront = fn(NativeHandle);
    compositor_go_to_back: "SteamAPI_vr_IVRCompositor_CompositorGoToBack"
        => PfnCompositorGoToBack = fn(NativeHandle);
    compositor_quit: "SteamAPI_vr_IVRCompositor_CompositorQuit"
        => PfnCompositorQuit = fn(NativeHandle);
    compositor_is_fullscreen: "SteamAPI_vr_IVRCompositor_IsFullscreen"
        => PfnCompositorIsFullscreen = fn(NativeHandle) -> bool;

    // -- IVRControlPanel --
    control_panel_get_driver_count: "SteamAPI_vr_IVRControlPanel_GetDriverCount"
        => PfnControlPanelGetDriverCount = fn(NativeHandle) -> u32;
    control_panel_get_driver_id: "SteamAPI_vr_IVRControlPanel_GetDriverId"
        => PfnControlPanelGetDriverId = fn(NativeHandle, u32, *mut c_char, u32) -> u32;
    control_panel_get_driver_display_count: "SteamAPI_vr_IVRControlPanel_GetDriverDisplayCount"
        => PfnControlPanelGetDriverDisplayCount = fn(NativeHandle, *const c_char) -> u32;
    control_panel_get_driver_display_id: "SteamAPI_vr_IVRControlPanel_GetDriverDisplayId"
        => PfnControlPanelGetDriverDisplayId = fn(NativeHandle, *const c_char, u32, *mut c_char, u32) -> u32;
    control_panel_get_driver_display_model_number: "SteamAPI_vr_IVRControlPanel_GetDriverDisplayModelNumber"
        => PfnControlPanelGetDriverDisplayModelNumber = fn(NativeHandle, *const c_char, *const c_char, *mut c_char, u32) -> u32;
    control_panel_get_driver_display_serial_number: "SteamAPI_vr_IVRControlPanel_GetDriverDisplaySerialNumber"
        => PfnControlPanelGetDriverDisplaySerialNumber = fn(NativeHandle, *const c_char, *const c_char, *mut c_char, u32) -> u32;
    control_panel_load_shared_resource: "SteamAPI_vr_IVRControlPanel_LoadSharedResource"
        => PfnControlPanelLoadSharedResource = fn(NativeHandle, *const c_char, *mut c_char, u32) -> u32;
    control_panel_get_ipd: "SteamAPI_vr_IVRControlPanel_GetIPD"
        => PfnControlPanelGetIpd = fn(NativeHandle) -> f32;
    control_panel_set_ipd: "SteamAPI_vr_IVRControlPanel_SetIPD"
        => PfnControlPanelSetIpd = fn(NativeHandle, f32);
}
