//! Value-type mirrors of the native SDK structs.
//!
//! Every struct here is `#[repr(C)]` with fields in native declaration order.
//! For every record native code writes, `Default` is the all-zero bit pattern;
//! wrappers rely on it to clear outputs before a native call. The one
//! input-only record, [`TextureBounds`], defaults to the whole texture instead.

use crate::enums::TrackingResult;
use std::ffi::c_void;
use std::mem::{align_of, size_of};

/// Index of a tracked device, `0..MAX_TRACKED_DEVICE_COUNT`.
pub type TrackedDeviceIndex = u32;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(*mut c_void);

        impl $name {
            pub const fn null() -> Self {
                Self(std::ptr::null_mut())
            }

            pub const fn from_raw(ptr: *mut c_void) -> Self {
                Self(ptr)
            }

            pub const fn as_raw(self) -> *mut c_void {
                self.0
            }

            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::null()
            }
        }
    };
}

opaque_handle! {
    /// Opaque token for a native interface instance.
    ///
    /// Only ever passed back to native code; never dereferenced here.
    NativeHandle
}

opaque_handle! {
    /// Address of a native callback object registered with the callback pump.
    CallbackRecord
}

/// Row-major 3x4 rigid transform.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdMatrix34 {
    pub m: [[f32; 4]; 3],
}

impl HmdMatrix34 {
    pub const IDENTITY: HmdMatrix34 = HmdMatrix34 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };
}

/// Row-major 4x4 matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdMatrix44 {
    pub m: [[f32; 4]; 4],
}

impl HmdMatrix44 {
    pub const IDENTITY: HmdMatrix44 = HmdMatrix44 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdVector3 {
    pub v: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdVector3d {
    pub v: [f64; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdVector2 {
    pub v: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdQuaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Four corners of a boundary quad, in tracking space.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HmdQuad {
    pub corners: [HmdVector3; 4],
}

/// Per-channel UV coordinates produced by lens distortion.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistortionCoordinates {
    pub red: [f32; 2],
    pub green: [f32; 2],
    pub blue: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackedDevicePose {
    pub device_to_absolute_tracking: HmdMatrix34,
    /// Meters per second, tracking space.
    pub velocity: HmdVector3,
    /// Radians per second.
    pub angular_velocity: HmdVector3,
    pub tracking_result: TrackingResult,
    pub pose_is_valid: bool,
    pub device_is_valid: bool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderModelVertex {
    pub position: HmdVector3,
    pub normal: HmdVector3,
    pub texture_coord: [f32; 2],
}

/// RGBA8 diffuse texture owned by the native render model.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RenderModelTextureMap {
    pub width: u16,
    pub height: u16,
    pub texture_map_data: *const u8,
}

impl Default for RenderModelTextureMap {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            texture_map_data: std::ptr::null(),
        }
    }
}

impl RenderModelTextureMap {
    /// Texel bytes, four per pixel.
    ///
    /// # Safety
    /// The owning render model must still be loaded (not yet passed to
    /// `FreeRenderModel`).
    pub unsafe fn data(&self) -> &[u8] {
        let len = self.width as usize * self.height as usize * 4;
        raw_slice(self.texture_map_data, len)
    }
}

/// Render model geometry. All pointers are owned by native code until the
/// model is released with `FreeRenderModel`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RenderModel {
    pub internal_handle: u64,
    pub vertex_data: *const RenderModelVertex,
    pub vertex_count: u32,
    pub index_data: *const u16,
    pub triangle_count: u32,
    pub diffuse_texture: RenderModelTextureMap,
}

impl Default for RenderModel {
    fn default() -> Self {
        Self {
            internal_handle: 0,
            vertex_data: std::ptr::null(),
            vertex_count: 0,
            index_data: std::ptr::null(),
            triangle_count: 0,
            diffuse_texture: RenderModelTextureMap::default(),
        }
    }
}

impl RenderModel {
    /// # Safety
    /// The model must still be loaded.
    pub unsafe fn vertices(&self) -> &[RenderModelVertex] {
        raw_slice(self.vertex_data, self.vertex_count as usize)
    }

    /// Three indices per triangle.
    ///
    /// # Safety
    /// The model must still be loaded.
    pub unsafe fn indices(&self) -> &[u16] {
        raw_slice(self.index_data, self.triangle_count as usize * 3)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VrEvent {
    pub event_type: u32,
    pub tracked_device_index: TrackedDeviceIndex,
    pub param1: u32,
    pub event_age_seconds: f32,
}

/// Triangle list covering the parts of the display the user cannot see.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HiddenAreaMesh {
    pub vertex_data: *const HmdVector2,
    pub triangle_count: u32,
}

impl Default for HiddenAreaMesh {
    fn default() -> Self {
        Self {
            vertex_data: std::ptr::null(),
            triangle_count: 0,
        }
    }
}

impl HiddenAreaMesh {
    /// # Safety
    /// `vertex_data` must still point at the native mesh storage.
    pub unsafe fn vertices(&self) -> &[HmdVector2] {
        raw_slice(self.vertex_data, self.triangle_count as usize * 3)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChaperoneSoftBoundsInfo {
    pub quad_corners: HmdQuad,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChaperoneSeatedBoundsInfo {
    pub seated_head_position: HmdVector3,
    pub desk_edge_positions: [HmdVector3; 2],
}

/// Timing of one compositor frame. `size` must equal `size_of::<Self>()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompositorFrameTiming {
    pub size: u32,
    pub frame_start: f64,
    pub frame_vsync: f32,
    pub dropped_frames: u32,
    pub frame_index: u32,
    pub pose: TrackedDevicePose,
}

impl CompositorFrameTiming {
    /// Zeroed record with its `size` header stamped.
    pub fn new() -> Self {
        Self {
            size: size_of::<Self>() as u32,
            ..Self::default()
        }
    }
}

/// Placement and appearance of the compositor overlay. `size` must equal
/// `size_of::<Self>()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompositorOverlaySettings {
    pub size: u32,
    pub curved: bool,
    pub antialias: bool,
    pub scale: f32,
    pub distance: f32,
    pub alpha: f32,
    pub u_offset: f32,
    pub v_offset: f32,
    pub u_scale: f32,
    pub v_scale: f32,
    pub grid_divs: f32,
    pub grid_width: f32,
    pub grid_scale: f32,
    pub transform: HmdMatrix44,
}

impl CompositorOverlaySettings {
    /// Zeroed record with its `size` header stamped.
    pub fn new() -> Self {
        Self {
            size: size_of::<Self>() as u32,
            ..Self::default()
        }
    }
}

/// Sub-rectangle of a submitted texture, in UV space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBounds {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

impl TextureBounds {
    pub const FULL: TextureBounds = TextureBounds {
        u_min: 0.0,
        v_min: 0.0,
        u_max: 1.0,
        v_max: 1.0,
    };
}

impl Default for TextureBounds {
    fn default() -> Self {
        Self::FULL
    }
}

unsafe fn raw_slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(ptr, len)
    }
}

// Layout checks against the native headers.
const _: () = {
    assert!(size_of::<NativeHandle>() == size_of::<*mut c_void>());
    assert!(size_of::<HmdMatrix34>() == 48);
    assert!(size_of::<HmdMatrix44>() == 64);
    assert!(size_of::<HmdVector3>() == 12);
    assert!(size_of::<HmdVector3d>() == 24);
    assert!(size_of::<HmdVector2>() == 8);
    assert!(size_of::<HmdQuaternion>() == 32);
    assert!(size_of::<HmdQuad>() == 48);
    assert!(size_of::<DistortionCoordinates>() == 24);
    assert!(size_of::<TrackedDevicePose>() == 80);
    assert!(align_of::<TrackedDevicePose>() == 4);
    assert!(size_of::<RenderModelVertex>() == 32);
    assert!(size_of::<VrEvent>() == 16);
    assert!(size_of::<ChaperoneSoftBoundsInfo>() == 48);
    assert!(size_of::<ChaperoneSeatedBoundsInfo>() == 36);
    assert!(size_of::<CompositorOverlaySettings>() == 112);
    assert!(size_of::<TextureBounds>() == 16);
};

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(size_of::<RenderModelTextureMap>() == 16);
    assert!(size_of::<RenderModel>() == 56);
    assert!(size_of::<HiddenAreaMesh>() == 16);
    assert!(size_of::<CompositorFrameTiming>() == 112);
};
