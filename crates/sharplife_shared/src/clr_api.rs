// crates/sharplife_shared/src/clr_api.rs
//! Raw hosting interface exported by the CoreCLR shared library.
//!
//! Only the layout lives here. Safe wrappers are in `sharplife_host::runtime_host`.

use core::ffi::c_void;
use core::fmt;

use bitflags::bitflags;

// ==================================================================================
// 1. STATUS CODES
// ==================================================================================

/// A COM-style status code. Negative values are failures.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HResult(pub i32);

impl HResult {
    pub const S_OK: HResult = HResult(0);
    pub const E_FAIL: HResult = HResult(0x8000_4005_u32 as i32);
    pub const E_INVALIDARG: HResult = HResult(0x8007_0057_u32 as i32);
    /// Returned by `CreateDelegate` when the assembly cannot be located.
    pub const COR_E_FILENOTFOUND: HResult = HResult(0x8007_0002_u32 as i32);

    pub fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// Converts the status into a `Result`, keeping the failing code.
    pub fn ok(self) -> Result<(), HResult> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0 as u32)
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HResult({self})")
    }
}

/// Identifier of an execution domain created through the host.
pub type DomainId = u32;

// ==================================================================================
// 2. FLAG SETS
// ==================================================================================

bitflags! {
    /// `STARTUP_FLAGS` from mscoree.h (subset used by this host).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StartupFlags: u32 {
        const CONCURRENT_GC = 0x1;
        const LOADER_OPTIMIZATION_SINGLE_DOMAIN = 0x1 << 1;
        const LOADER_OPTIMIZATION_MULTI_DOMAIN = 0x2 << 1;
        const SERVER_GC = 0x1000;
        const SINGLE_APPDOMAIN = 0x0080_0000;
    }
}

bitflags! {
    /// `APPDOMAIN_*` creation flags from mscoree.h (subset used by this host).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AppDomainFlags: u32 {
        const SECURITY_SANDBOXED = 0x1;
        const FORCE_TRIVIAL_WAIT_OPERATIONS = 0x8;
        const ENABLE_PLATFORM_SPECIFIC_APPS = 0x40;
        const ENABLE_PINVOKE_AND_CLASSIC_COMINTEROP = 0x80;
        const DISABLE_TRANSPARENCY_ENFORCEMENT = 0x100;
    }
}

// ==================================================================================
// 3. INTERFACE IDENTITY
// ==================================================================================

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

/// {712AB73F-2C22-4807-AD7E-F501D7B72C2D}
pub const IID_ICLR_RUNTIME_HOST2: Guid = Guid {
    data1: 0x712A_B73F,
    data2: 0x2C22,
    data3: 0x4807,
    data4: [0xAD, 0x7E, 0xF5, 0x01, 0xD7, 0xB7, 0x2C, 0x2D],
};

/// Name of the factory exported by the runtime library.
pub const GET_CLR_RUNTIME_HOST_SYMBOL: &str = "GetCLRRuntimeHost";

/// `HRESULT GetCLRRuntimeHost(REFIID riid, IUnknown** pUnk)`
pub type GetClrRuntimeHostFn =
    unsafe extern "system" fn(riid: *const Guid, host: *mut *mut ICLRRuntimeHost2) -> HResult;

// ==================================================================================
// 4. ICLRRuntimeHost2
// ==================================================================================

/// Wide string as the runtime host expects it (UTF-16 on every platform).
pub type Lpcwstr = *const u16;

type This = *mut ICLRRuntimeHost2;

#[repr(C)]
pub struct ICLRRuntimeHost2Vtbl {
    // IUnknown
    pub query_interface: unsafe extern "system" fn(This, *const Guid, *mut *mut c_void) -> HResult,
    pub add_ref: unsafe extern "system" fn(This) -> u32,
    pub release: unsafe extern "system" fn(This) -> u32,

    // ICLRRuntimeHost
    pub start: unsafe extern "system" fn(This) -> HResult,
    pub stop: unsafe extern "system" fn(This) -> HResult,
    pub set_host_control: unsafe extern "system" fn(This, *mut c_void) -> HResult,
    pub get_clr_control: unsafe extern "system" fn(This, *mut *mut c_void) -> HResult,
    pub unload_app_domain:
        unsafe extern "system" fn(This, domain_id: DomainId, wait_until_done: i32) -> HResult,
    pub execute_in_app_domain:
        unsafe extern "system" fn(This, DomainId, *mut c_void, *mut c_void) -> HResult,
    pub get_current_app_domain_id: unsafe extern "system" fn(This, *mut DomainId) -> HResult,
    pub execute_application: unsafe extern "system" fn(
        This,
        Lpcwstr,
        u32,
        *const Lpcwstr,
        u32,
        *const Lpcwstr,
        *mut i32,
    ) -> HResult,
    pub execute_in_default_app_domain:
        unsafe extern "system" fn(This, Lpcwstr, Lpcwstr, Lpcwstr, Lpcwstr, *mut u32) -> HResult,

    // ICLRRuntimeHost2
    pub create_app_domain_with_manager: unsafe extern "system" fn(
        This,
        friendly_name: Lpcwstr,
        flags: u32,
        manager_assembly: Lpcwstr,
        manager_type: Lpcwstr,
        property_count: i32,
        property_keys: *const Lpcwstr,
        property_values: *const Lpcwstr,
        domain_id: *mut DomainId,
    ) -> HResult,
    pub create_delegate: unsafe extern "system" fn(
        This,
        domain_id: DomainId,
        assembly_name: Lpcwstr,
        class_name: Lpcwstr,
        method_name: Lpcwstr,
        fn_ptr: *mut isize,
    ) -> HResult,
    pub authenticate: unsafe extern "system" fn(This, u64) -> HResult,
    pub register_mac_eh_port: unsafe extern "system" fn(This) -> HResult,
    pub set_startup_flags: unsafe extern "system" fn(This, flags: u32) -> HResult,
    pub dll_get_activation_factory:
        unsafe extern "system" fn(This, DomainId, Lpcwstr, *mut *mut c_void) -> HResult,
    pub execute_assembly: unsafe extern "system" fn(
        This,
        DomainId,
        Lpcwstr,
        i32,
        *const Lpcwstr,
        *mut u32,
    ) -> HResult,
}

#[repr(C)]
pub struct ICLRRuntimeHost2 {
    pub vtbl: *const ICLRRuntimeHost2Vtbl,
}
