//! Process bootstrap: SteamAPI init/shutdown, the callback pump, callback
//! registration, and the per-interface accessors.

use crate::api::NativeApi;
use crate::types::{CallbackRecord, NativeHandle};
use crate::{Result, VrError};
use std::sync::atomic::{AtomicBool, Ordering};

// SteamAPI keeps one session per process, whichever library handle started it.
static RUNTIME_ACTIVE: AtomicBool = AtomicBool::new(false);

/// SteamAPI interfaces reachable through a global accessor export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SteamInterface {
    Client,
    User,
    Friends,
    Utils,
    Matchmaking,
    MatchmakingServerListResponse,
    MatchmakingPingResponse,
    MatchmakingPlayersResponse,
    MatchmakingRulesResponse,
    MatchmakingServers,
    RemoteStorage,
    UserStats,
    Apps,
    Networking,
    Screenshots,
    Music,
    MusicRemote,
    Http,
    UnifiedMessages,
    Controller,
    Ugc,
    AppList,
    HtmlSurface,
    Inventory,
    Video,
    GameServer,
    GameServerStats,
}

impl SteamInterface {
    pub const COUNT: usize = 27;

    pub const ALL: [SteamInterface; Self::COUNT] = [
        SteamInterface::Client,
        SteamInterface::User,
        SteamInterface::Friends,
        SteamInterface::Utils,
        SteamInterface::Matchmaking,
        SteamInterface::MatchmakingServerListResponse,
        SteamInterface::MatchmakingPingResponse,
        SteamInterface::MatchmakingPlayersResponse,
        SteamInterface::MatchmakingRulesResponse,
        SteamInterface::MatchmakingServers,
        SteamInterface::RemoteStorage,
        SteamInterface::UserStats,
        SteamInterface::Apps,
        SteamInterface::Networking,
        SteamInterface::Screenshots,
        SteamInterface::Music,
        SteamInterface::MusicRemote,
        SteamInterface::Http,
        SteamInterface::UnifiedMessages,
        SteamInterface::Controller,
        SteamInterface::Ugc,
        SteamInterface::AppList,
        SteamInterface::HtmlSurface,
        SteamInterface::Inventory,
        SteamInterface::Video,
        SteamInterface::GameServer,
        SteamInterface::GameServerStats,
    ];

    /// Exported accessor name.
    pub const fn symbol(self) -> &'static str {
        match self {
            SteamInterface::Client => "SteamClient",
            SteamInterface::User => "SteamUser",
            SteamInterface::Friends => "SteamFriends",
            SteamInterface::Utils => "SteamUtils",
            SteamInterface::Matchmaking => "SteamMatchmaking",
            SteamInterface::MatchmakingServerListResponse => "SteamMatchmakingServerListResponse",
            SteamInterface::MatchmakingPingResponse => "SteamMatchmakingPingResponse",
            SteamInterface::MatchmakingPlayersResponse => "SteamMatchmakingPlayersResponse",
            SteamInterface::MatchmakingRulesResponse => "SteamMatchmakingRulesResponse",
            SteamInterface::MatchmakingServers => "SteamMatchmakingServers",
            SteamInterface::RemoteStorage => "SteamRemoteStorage",
            SteamInterface::UserStats => "SteamUserStats",
            SteamInterface::Apps => "SteamApps",
            SteamInterface::Networking => "SteamNetworking",
            SteamInterface::Screenshots => "SteamScreenshots",
            SteamInterface::Music => "SteamMusic",
            SteamInterface::MusicRemote => "SteamMusicRemote",
            SteamInterface::Http => "SteamHTTP",
            SteamInterface::UnifiedMessages => "SteamUnifiedMessages",
            SteamInterface::Controller => "SteamController",
            SteamInterface::Ugc => "SteamUGC",
            SteamInterface::AppList => "SteamAppList",
            SteamInterface::HtmlSurface => "SteamHTMLSurface",
            SteamInterface::Inventory => "SteamInventory",
            SteamInterface::Video => "SteamVideo",
            SteamInterface::GameServer => "SteamGameServer",
            SteamInterface::GameServerStats => "SteamGameServerStats",
        }
    }
}

macro_rules! callback_categories {
    ($($variant:ident = $offset:literal,)*) => {
        /// Base offsets that namespace callback ids per subsystem. A callback's
        /// id is its category offset plus its index within the category.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CallbackCategory {
            $($variant,)*
        }

        impl CallbackCategory {
            /// Every category in ascending offset order.
            pub const ALL: &'static [CallbackCategory] = &[$(CallbackCategory::$variant),*];

            pub const fn offset(self) -> i32 {
                match self {
                    $(CallbackCategory::$variant => $offset,)*
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(CallbackCategory::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

callback_categories! {
    SteamUser = 100,
    SteamGameServer = 200,
    SteamFriends = 300,
    SteamBilling = 400,
    SteamMatchmaking = 500,
    SteamContentServer = 600,
    SteamUtils = 700,
    ClientFriends = 800,
    ClientUser = 900,
    SteamApps = 1000,
    SteamUserStats = 1100,
    SteamNetworking = 1200,
    ClientRemoteStorage = 1300,
    ClientDepotBuilder = 1400,
    SteamGameServerItems = 1500,
    ClientUtils = 1600,
    SteamGameCoordinator = 1700,
    SteamGameServerStats = 1800,
    Steam2Async = 1900,
    SteamGameStats = 2000,
    ClientHttp = 2100,
    ClientScreenshots = 2200,
    SteamScreenshots = 2300,
    ClientAudio = 2400,
    ClientUnifiedMessages = 2500,
    SteamStreamLauncher = 2600,
    ClientController = 2700,
    SteamController = 2800,
    ClientParentalSettings = 2900,
    ClientDeviceAuth = 3000,
    ClientNetworkDeviceManager = 3100,
    ClientMusic = 3200,
    ClientRemoteClientManager = 3300,
    ClientUgc = 3400,
    SteamStreamClient = 3500,
    ClientProductBuilder = 3600,
    ClientShortcuts = 3700,
    ClientRemoteControlManager = 3800,
    SteamAppList = 3900,
    SteamMusic = 4000,
    SteamMusicRemote = 4100,
    ClientVr = 4200,
    ClientReserved = 4300,
    SteamReserved = 4400,
    SteamHtmlSurface = 4500,
    ClientVideo = 4600,
    ClientInventory = 4700,
}

impl CallbackCategory {
    /// Id of the `index`-th callback in this category.
    pub const fn callback_id(self, index: i32) -> i32 {
        self.offset() + index
    }

    /// Category whose range `[offset, offset + 100)` contains `id`.
    pub fn of_callback_id(id: i32) -> Option<CallbackCategory> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| (c.offset()..c.offset() + 100).contains(&id))
    }
}

/// Live SteamAPI session.
///
/// Created by [`Runtime::init`]; shut down by [`Runtime::shutdown`] or on
/// drop. Only one `Runtime` may exist in the process at a time, across every
/// [`NativeApi`], and every bootstrap call goes through it, so nothing can
/// reach the bootstrap exports before init or after shutdown.
///
/// Callbacks are dispatched on the thread that calls
/// [`Runtime::run_callbacks`]; the SDK expects that to be the thread that
/// owns its state.
#[derive(Debug)]
pub struct Runtime<'a> {
    api: &'a NativeApi,
    app_id: u32,
    restart_requested: bool,
    initialized: bool,
    shut_down: bool,
}

impl<'a> Runtime<'a> {
    /// Run `SteamAPI_RestartAppIfNecessary(app_id)` then `SteamAPI_Init()`.
    ///
    /// Both native results are kept as-is; see [`Runtime::restart_requested`]
    /// and [`Runtime::initialized`].
    pub fn init(api: &'a NativeApi, app_id: u32) -> Result<Runtime<'a>> {
        let table = api.table();
        let restart = table.restart_app_if_necessary.get()?;
        let init = table.init.get()?;

        if RUNTIME_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(VrError::AlreadyInitialized);
        }

        let restart_requested = unsafe { restart(app_id) };
        let initialized = unsafe { init() };
        log::info!(
            "SteamAPI init: app_id={} restart_requested={} initialized={}",
            app_id,
            restart_requested,
            initialized
        );

        Ok(Runtime {
            api,
            app_id,
            restart_requested,
            initialized,
            shut_down: false,
        })
    }

    /// Whether a `Runtime` is currently alive in this process.
    pub fn is_active() -> bool {
        RUNTIME_ACTIVE.load(Ordering::Acquire)
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    /// What `SteamAPI_RestartAppIfNecessary` returned. When true, Steam is
    /// relaunching the app and this process should exit.
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }

    /// What `SteamAPI_Init` returned.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Dispatch queued callbacks on the calling thread.
    pub fn run_callbacks(&self) -> Result<()> {
        let pfn = self.api.table().run_callbacks.get()?;
        unsafe { pfn() };
        Ok(())
    }

    pub fn register_callback(&self, record: CallbackRecord, callback_id: i32) -> Result<()> {
        if record.is_null() {
            return Err(VrError::NullCallback);
        }
        let pfn = self.api.table().register_callback.get()?;
        log::debug!(
            "register callback {:?} id={} ({:?})",
            record.as_raw(),
            callback_id,
            CallbackCategory::of_callback_id(callback_id)
        );
        unsafe { pfn(record, callback_id) };
        Ok(())
    }

    pub fn unregister_callback(&self, record: CallbackRecord) -> Result<()> {
        if record.is_null() {
            return Err(VrError::NullCallback);
        }
        let pfn = self.api.table().unregister_callback.get()?;
        log::debug!("unregister callback {:?}", record.as_raw());
        unsafe { pfn(record) };
        Ok(())
    }

    /// Handle returned by the interface's global accessor. Null when the
    /// runtime does not provide it.
    pub fn interface(&self, iface: SteamInterface) -> Result<NativeHandle> {
        let pfn = self.api.table().interfaces[iface as usize].get()?;
        Ok(unsafe { pfn() })
    }

    /// Shut the runtime down. Equivalent to dropping it.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if self.initialized {
            match self.api.table().shutdown.get() {
                Ok(pfn) => unsafe { pfn() },
                Err(e) => log::warn!("SteamAPI shutdown skipped: {}", e),
            }
        }
        RUNTIME_ACTIVE.store(false, Ordering::Release);
        log::info!("SteamAPI shut down (app_id={})", self.app_id);
    }
}

impl Drop for Runtime<'_> {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}
