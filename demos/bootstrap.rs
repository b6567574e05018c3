//! Start SteamAPI, pump callbacks for a moment, then shut down.
//!
//! `STEAMVR_API_LIB` selects the library, `STEAMVR_APP_ID` the app (480 if unset).

use std::time::Duration;
use steamvr::{CallbackCategory, NativeApi, Runtime, SteamInterface};

fn main() {
    env_logger::init();

    let app_id = std::env::var("STEAMVR_APP_ID")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(480);

    let api = match NativeApi::load_from_env() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let unbound = api.table().unbound_symbols();
    if !unbound.is_empty() {
        println!("Unresolved: {}", unbound.len());
    }

    let runtime = match Runtime::init(&api, app_id) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("App:         {}", runtime.app_id());
    println!("Restart:     {}", runtime.restart_requested());
    println!("Initialized: {}", runtime.initialized());
    if runtime.restart_requested() || !runtime.initialized() {
        runtime.shutdown();
        return;
    }

    for iface in SteamInterface::ALL {
        match runtime.interface(iface) {
            Ok(handle) => println!("  {:<36} {:?}", iface.symbol(), handle.as_raw()),
            Err(e) => println!("  {:<36} {}", iface.symbol(), e),
        }
    }

    println!("Callback categories:");
    for category in CallbackCategory::ALL {
        println!("  {:>5}  {}", category.offset(), category.name());
    }

    for _ in 0..30 {
        if let Err(e) = runtime.run_callbacks() {
            eprintln!("Error: {}", e);
            break;
        }
        std::thread::sleep(Duration::from_millis(33));
    }

    runtime.shutdown();
}
