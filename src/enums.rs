//! Native enumerations.
//!
//! The SDK passes enums as 32-bit integers and may hand back values this crate
//! has never heard of, so each one is a transparent newtype over `i32` with
//! associated constants rather than a Rust `enum`.

use std::fmt;

macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub i32);

        impl $name {
            $( $(#[$vmeta])* pub const $variant: $name = $name($value); )*

            /// Every value known to this binding, in declaration order.
            pub const KNOWN: &'static [$name] = &[$( $name::$variant ),*];

            /// Symbolic name of a known value.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $( $value => Some(stringify!($variant)), )*
                    _ => None,
                }
            }

            pub fn is_known(self) -> bool {
                self.name().is_some()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}::{}", stringify!($name), name),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                $name(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.0
            }
        }
    };
}

native_enum! {
    /// Which eye a per-eye query refers to.
    pub struct Eye {
        LEFT = 0,
        RIGHT = 1,
    }
}

native_enum! {
    /// Clip-space convention for projection matrices.
    pub struct GraphicsApiConvention {
        DIRECTX = 0,
        OPENGL = 1,
    }
}

native_enum! {
    pub struct TrackingResult {
        UNINITIALIZED = 1,
        CALIBRATING_IN_PROGRESS = 100,
        CALIBRATING_OUT_OF_RANGE = 101,
        RUNNING_OK = 200,
        RUNNING_OUT_OF_RANGE = 201,
    }
}

native_enum! {
    pub struct TrackedDeviceClass {
        INVALID = 0,
        HMD = 1,
        CONTROLLER = 2,
        TRACKING_REFERENCE = 4,
        OTHER = 1000,
    }
}

native_enum! {
    /// Reference frame for absolute tracking poses.
    pub struct TrackingUniverseOrigin {
        SEATED = 0,
        STANDING = 1,
        RAW_AND_UNCALIBRATED = 2,
    }
}

native_enum! {
    /// Property identifiers. The suffix names the getter that serves them.
    pub struct TrackedDeviceProperty {
        TRACKING_SYSTEM_NAME_STRING = 1000,
        MODEL_NUMBER_STRING = 1001,
        SERIAL_NUMBER_STRING = 1002,
        RENDER_MODEL_NAME_STRING = 1003,
        WILL_DRIFT_IN_YAW_BOOL = 1004,
        MANUFACTURER_NAME_STRING = 1005,
        TRACKING_FIRMWARE_VERSION_STRING = 1006,
        HARDWARE_REVISION_STRING = 1007,
        REPORTS_TIME_SINCE_VSYNC_BOOL = 2000,
        SECONDS_FROM_VSYNC_TO_PHOTONS_FLOAT = 2001,
        DISPLAY_FREQUENCY_FLOAT = 2002,
        USER_IPD_METERS_FLOAT = 2003,
        CURRENT_UNIVERSE_ID_UINT64 = 2004,
        PREVIOUS_UNIVERSE_ID_UINT64 = 2005,
        DISPLAY_FIRMWARE_VERSION_STRING = 2006,
        ATTACHED_DEVICE_ID_STRING = 3000,
        FIELD_OF_VIEW_LEFT_DEGREES_FLOAT = 4000,
        FIELD_OF_VIEW_RIGHT_DEGREES_FLOAT = 4001,
        FIELD_OF_VIEW_TOP_DEGREES_FLOAT = 4002,
        FIELD_OF_VIEW_BOTTOM_DEGREES_FLOAT = 4003,
        TRACKING_RANGE_MINIMUM_METERS_FLOAT = 4004,
        TRACKING_RANGE_MAXIMUM_METERS_FLOAT = 4005,
    }
}

native_enum! {
    /// Error code written by the tracked-device property getters.
    pub struct TrackedPropertyError {
        SUCCESS = 0,
        WRONG_DATA_TYPE = 1,
        WRONG_DEVICE_CLASS = 2,
        BUFFER_TOO_SMALL = 3,
        UNKNOWN_PROPERTY = 4,
        INVALID_DEVICE = 5,
        COULD_NOT_CONTACT_SERVER = 6,
        VALUE_NOT_PROVIDED_BY_DEVICE = 7,
        STRING_EXCEEDS_MAXIMUM_LENGTH = 8,
    }
}

impl TrackedPropertyError {
    pub fn is_success(self) -> bool {
        self == TrackedPropertyError::SUCCESS
    }
}

native_enum! {
    pub struct VrEventType {
        NONE = 0,
        TRACKED_DEVICE_ACTIVATED = 100,
        TRACKED_DEVICE_DEACTIVATED = 101,
        TRACKED_DEVICE_UPDATED = 102,
    }
}

native_enum! {
    pub struct HmdError {
        NONE = 0,
        INIT_INSTALLATION_NOT_FOUND = 100,
        INIT_INSTALLATION_CORRUPT = 101,
        INIT_VR_CLIENT_DLL_NOT_FOUND = 102,
        INIT_FILE_NOT_FOUND = 103,
        INIT_FACTORY_NOT_FOUND = 104,
        INIT_INTERFACE_NOT_FOUND = 105,
        INIT_INVALID_INTERFACE = 106,
        INIT_USER_CONFIG_DIRECTORY_INVALID = 107,
        INIT_HMD_NOT_FOUND = 108,
        INIT_NOT_INITIALIZED = 109,
        INIT_PATH_REGISTRY_NOT_FOUND = 110,
        INIT_NO_CONFIG_PATH = 111,
        INIT_NO_LOG_PATH = 112,
        INIT_PATH_REGISTRY_NOT_WRITABLE = 113,
        DRIVER_FAILED = 200,
        DRIVER_UNKNOWN = 201,
        DRIVER_HMD_UNKNOWN = 202,
        DRIVER_NOT_LOADED = 203,
        DRIVER_RUNTIME_OUT_OF_DATE = 204,
        DRIVER_HMD_IN_USE = 205,
        IPC_SERVER_INIT_FAILED = 300,
        IPC_CONNECT_FAILED = 301,
        IPC_SHARED_STATE_INIT_FAILED = 302,
        IPC_COMPOSITOR_INIT_FAILED = 303,
        IPC_MUTEX_INIT_FAILED = 304,
        VENDOR_SPECIFIC_UNABLE_TO_CONNECT_TO_OCULUS_RUNTIME = 1000,
        STEAM_INSTALLATION_NOT_FOUND = 2000,
    }
}

native_enum! {
    pub struct ChaperoneCalibrationState {
        OK = 1,
        WARNING = 100,
        WARNING_BASE_STATION_MAY_HAVE_MOVED = 101,
        WARNING_BASE_STATION_REMOVED = 102,
        WARNING_SEATED_BOUNDS_INVALID = 103,
        ERROR = 200,
        ERROR_BASE_STATION_UNINITIALIZED = 201,
        ERROR_BASE_STATION_CONFLICT = 202,
        ERROR_SOFT_BOUNDS_INVALID = 203,
        ERROR_HARD_BOUNDS_INVALID = 204,
    }
}

impl ChaperoneCalibrationState {
    /// Warnings occupy 100..200, errors 200..300.
    pub fn is_warning(self) -> bool {
        (100..200).contains(&self.0)
    }

    pub fn is_error(self) -> bool {
        (200..300).contains(&self.0)
    }
}

native_enum! {
    /// Kind of graphics device handed to `SetGraphicsDevice`.
    pub struct CompositorDeviceType {
        NONE = 0,
        D3D9 = 1,
        D3D9_EX = 2,
        D3D10 = 3,
        D3D11 = 4,
        OPENGL = 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value_names() {
        assert_eq!(TrackedDeviceClass::HMD.name(), Some("HMD"));
        assert_eq!(
            format!("{:?}", TrackedPropertyError::BUFFER_TOO_SMALL),
            "TrackedPropertyError::BUFFER_TOO_SMALL"
        );
    }

    #[test]
    fn test_unknown_value_is_preserved() {
        let class = TrackedDeviceClass::from(3);
        assert!(!class.is_known());
        assert_eq!(i32::from(class), 3);
        assert_eq!(format!("{:?}", class), "TrackedDeviceClass(3)");
    }

    #[test]
    fn test_calibration_state_ranges() {
        assert!(ChaperoneCalibrationState::WARNING_BASE_STATION_REMOVED.is_warning());
        assert!(ChaperoneCalibrationState::ERROR_HARD_BOUNDS_INVALID.is_error());
        assert!(!ChaperoneCalibrationState::OK.is_warning());
        assert!(!ChaperoneCalibrationState::OK.is_error());
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(TrackedPropertyError::default(), TrackedPropertyError::SUCCESS);
        assert_eq!(Eye::default(), Eye::LEFT);
        assert_eq!(std::mem::size_of::<HmdError>(), 4);
    }
}
