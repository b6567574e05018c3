use crate::types::TrackedDeviceIndex;

// -- Tracked devices --
pub const MAX_TRACKED_DEVICE_COUNT: u32 = 16;
pub const TRACKED_DEVICE_INDEX_HMD: TrackedDeviceIndex = 0;
pub const TRACKED_DEVICE_INDEX_INVALID: TrackedDeviceIndex = 0xFFFF_FFFF;

// -- SteamAPI string and table limits --
pub const PERSONA_NAME_MAX: usize = 128;
pub const PERSONA_NAME_MAX_WIDE: usize = 32;
pub const MAX_RICH_PRESENCE_KEYS: usize = 20;
pub const MAX_RICH_PRESENCE_KEY_LENGTH: usize = 64;
pub const MAX_RICH_PRESENCE_VALUE_LENGTH: usize = 256;
pub const STAT_NAME_MAX: usize = 128;
pub const LEADERBOARD_NAME_MAX: usize = 128;
pub const LEADERBOARD_DETAILS_MAX: usize = 64;
