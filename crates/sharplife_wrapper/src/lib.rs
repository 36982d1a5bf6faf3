// crates/sharplife_wrapper/src/lib.rs
//! Engine-facing entry points. The engine loads this library as either its client or
//! its server game library; whichever entry point it calls first hands the process
//! over to the managed host, which never returns.

#![allow(non_snake_case)]

mod game_dir;

use std::ffi::c_int;

use sharplife_host::{log, ManagedHost};
use sharplife_shared::{
    ClientDllFuncs, ClientEngineFuncs, EngineFuncs, GlobalVars, CLDLL_INTERFACE_VERSION,
};

/// Client export: the engine asks us to fill in its client function table.
#[no_mangle]
pub extern "C" fn F(funcs: *mut ClientDllFuncs) {
    // SAFETY: the engine passes its own table or nothing
    if let Some(funcs) = unsafe { funcs.as_mut() } {
        funcs.init = Some(Initialize);
    }
}

/// Client init, reached through the table filled by [`F`].
#[no_mangle]
pub extern "C" fn Initialize(funcs: *mut ClientEngineFuncs, version: c_int) -> c_int {
    if version != CLDLL_INTERFACE_VERSION {
        return 0;
    }

    // SAFETY: the engine keeps its function table alive for the whole process
    match unsafe { game_dir::from_client(funcs) } {
        Some(dir) => hand_off(dir, false),
        None => 0,
    }
}

/// Server export: the engine hands over its function table and globals.
#[no_mangle]
pub extern "system" fn GiveFnptrsToDll(funcs: *mut EngineFuncs, _globals: *mut GlobalVars) {
    // SAFETY: as for the client table
    if let Some(dir) = unsafe { game_dir::from_server(funcs) } {
        hand_off(dir, true);
    }
}

fn hand_off(game_dir: String, is_server: bool) -> ! {
    log::init();
    tracing::info!(
        "Starting managed host for {} in '{game_dir}'",
        if is_server { "server" } else { "client" }
    );

    ManagedHost::new(game_dir, is_server).start()
}
