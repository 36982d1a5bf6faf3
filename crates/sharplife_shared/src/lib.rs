// crates/sharplife_shared/src/lib.rs

pub mod clr_api;
pub mod engine_api;

// Re-export the types both sides of the wrapper talk in
pub use clr_api::{
    AppDomainFlags, DomainId, GetClrRuntimeHostFn, Guid, HResult, ICLRRuntimeHost2, StartupFlags,
    GET_CLR_RUNTIME_HOST_SYMBOL, IID_ICLR_RUNTIME_HOST2,
};
pub use engine_api::{
    ClientDllFuncs, ClientEngineFuncs, ClientInitFn, EngineFuncs, GlobalVars, CLDLL_INTERFACE_VERSION,
    MAX_PATH,
};
