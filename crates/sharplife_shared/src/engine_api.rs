// crates/sharplife_shared/src/engine_api.rs
use core::ffi::{c_char, c_int, c_void};

// ==================================================================================
// ENGINE FUNCTION TABLES
// ==================================================================================
//
// The engine hands us large tables of function pointers. We only ever call the
// game directory getter, so every slot in front of it is kept as an opaque pointer.
// Slot counts follow the GoldSource SDK headers.

/// Interface version the client entry point accepts.
pub const CLDLL_INTERFACE_VERSION: c_int = 7;

/// Size of the buffer the server engine writes the game directory into.
pub const MAX_PATH: usize = 260;

/// `cl_enginefunc_t`: passed to the client `Initialize` entry point.
#[repr(C)]
pub struct ClientEngineFuncs {
    _preceding: [*const c_void; 63],
    pub get_game_directory: extern "C" fn() -> *const c_char,
}

impl ClientEngineFuncs {
    /// Table with only the game directory getter filled in.
    pub fn with_game_directory(get_game_directory: extern "C" fn() -> *const c_char) -> Self {
        Self {
            _preceding: [core::ptr::null(); 63],
            get_game_directory,
        }
    }
}

/// `enginefuncs_t`: passed to the server `GiveFnptrsToDll` entry point.
#[repr(C)]
pub struct EngineFuncs {
    _preceding: [*const c_void; 99],
    pub get_game_dir: extern "C" fn(game_dir: *mut c_char),
}

impl EngineFuncs {
    /// Table with only the game directory getter filled in.
    pub fn with_game_dir(get_game_dir: extern "C" fn(game_dir: *mut c_char)) -> Self {
        Self {
            _preceding: [core::ptr::null(); 99],
            get_game_dir,
        }
    }
}

/// `globalvars_t`: never read by the wrapper.
#[repr(C)]
pub struct GlobalVars {
    _data: [u8; 0],
    _marker: core::marker::PhantomData<(*mut u8, core::marker::PhantomPinned)>,
}

/// `int Initialize(cl_enginefunc_t*, int)`
pub type ClientInitFn = extern "C" fn(funcs: *mut ClientEngineFuncs, version: c_int) -> c_int;

/// `cldll_func_t`: the client table the engine asks us to fill through `F`.
/// Only the leading init slot is written; the rest of the table is left untouched.
#[repr(C)]
pub struct ClientDllFuncs {
    pub init: Option<ClientInitFn>,
}
