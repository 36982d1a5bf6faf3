// crates/sharplife_wrapper/src/game_dir.rs
use std::ffi::{c_char, CStr};

use sharplife_shared::{ClientEngineFuncs, EngineFuncs, MAX_PATH};

/// Asks the client engine for the game directory.
///
/// # Safety
/// `funcs` must point at a live `cl_enginefunc_t`.
pub unsafe fn from_client(funcs: *const ClientEngineFuncs) -> Option<String> {
    let funcs = funcs.as_ref()?;
    let dir = (funcs.get_game_directory)();

    if dir.is_null() {
        return None;
    }

    Some(CStr::from_ptr(dir).to_string_lossy().into_owned())
}

/// Asks the server engine to write the game directory into a local buffer.
///
/// # Safety
/// `funcs` must point at a live `enginefuncs_t`.
pub unsafe fn from_server(funcs: *const EngineFuncs) -> Option<String> {
    let funcs = funcs.as_ref()?;

    let mut buffer = [0 as c_char; MAX_PATH];
    (funcs.get_game_dir)(buffer.as_mut_ptr());
    buffer[MAX_PATH - 1] = 0;

    Some(CStr::from_ptr(buffer.as_ptr()).to_string_lossy().into_owned())
}
