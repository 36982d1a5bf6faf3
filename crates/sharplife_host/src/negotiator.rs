// crates/sharplife_host/src/negotiator.rs
use std::ptr::{self, NonNull};

use sharplife_shared::clr_api::GetClrRuntimeHostFn;
use sharplife_shared::{StartupFlags, GET_CLR_RUNTIME_HOST_SYMBOL, IID_ICLR_RUNTIME_HOST2};

use crate::error::{BootstrapError, Result};
use crate::library::RuntimeLibrary;
use crate::runtime_host::{ClrHost, ClrRuntime, RuntimeHost};

/// Startup flags the host always runs with.
///
/// All managed code executes in a single domain, so the runtime is started in
/// single-appdomain mode with domain-neutral loading disabled.
pub const STARTUP_POLICY: StartupFlags = StartupFlags::CONCURRENT_GC
    .union(StartupFlags::SINGLE_APPDOMAIN)
    .union(StartupFlags::LOADER_OPTIMIZATION_SINGLE_DOMAIN);

/// Obtains the host control interface from a loaded runtime library.
///
/// The library is moved into the returned runtime so it stays loaded for as long as
/// the interface is alive.
pub fn acquire_host(library: RuntimeLibrary) -> Result<ClrRuntime> {
    // SAFETY: GetCLRRuntimeHost has this signature in every CoreCLR build.
    let factory: GetClrRuntimeHostFn = unsafe { library.resolve(GET_CLR_RUNTIME_HOST_SYMBOL) }
        .ok_or(BootstrapError::SymbolNotFound {
            symbol: GET_CLR_RUNTIME_HOST_SYMBOL,
        })?;

    let mut raw = ptr::null_mut();
    // SAFETY: `factory` came from the library we still own.
    let hr = unsafe { factory(&IID_ICLR_RUNTIME_HOST2, &mut raw) };
    if !hr.is_success() {
        return Err(BootstrapError::InterfaceUnavailable(Some(hr)));
    }

    let raw = NonNull::new(raw).ok_or(BootstrapError::InterfaceUnavailable(None))?;

    // SAFETY: The factory hands us one reference, which ClrHost releases on drop.
    let host = unsafe { ClrHost::from_raw(raw) };
    Ok(ClrRuntime::new(host, library))
}

/// Applies [`STARTUP_POLICY`] and starts the runtime (JIT, GC, loader).
pub fn start_runtime<H: RuntimeHost + ?Sized>(host: &mut H) -> Result<()> {
    host.set_startup_flags(STARTUP_POLICY)
        .map_err(|hr| BootstrapError::StartFailed(Some(hr)))?;

    host.start().map_err(|hr| BootstrapError::StartFailed(Some(hr)))?;

    tracing::info!("Runtime started");
    Ok(())
}
