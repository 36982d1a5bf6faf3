// crates/sharplife_host/src/runtime_host.rs
//! Safe face of the runtime host control interface.
//!
//! Everything that touches the raw `ICLRRuntimeHost2` vtable stays in this file. The
//! rest of the crate only sees [`RuntimeHost`] and status codes.

use std::ffi::c_void;
use std::ptr::{self, NonNull};

use sharplife_shared::clr_api::ICLRRuntimeHost2Vtbl;
use sharplife_shared::{AppDomainFlags, DomainId, HResult, ICLRRuntimeHost2, StartupFlags};
use widestring::U16CString;

use crate::library::RuntimeLibrary;

/// Operations the bootstrap needs from a running runtime host.
pub trait RuntimeHost {
    fn set_startup_flags(&mut self, flags: StartupFlags) -> Result<(), HResult>;

    fn start(&mut self) -> Result<(), HResult>;

    /// Creates an execution domain. `properties` keep their order on the wire.
    fn create_app_domain(
        &mut self,
        friendly_name: &str,
        flags: AppDomainFlags,
        properties: &[(&str, &str)],
    ) -> Result<DomainId, HResult>;

    /// Resolves a static managed method to a native-callable pointer.
    fn create_delegate(
        &mut self,
        domain: DomainId,
        assembly_name: &str,
        type_name: &str,
        method_name: &str,
    ) -> Result<NonNull<c_void>, HResult>;

    fn unload_app_domain(&mut self, domain: DomainId, wait_until_done: bool) -> Result<(), HResult>;

    fn stop(&mut self) -> Result<(), HResult>;
}

fn wide(s: &str) -> Result<U16CString, HResult> {
    U16CString::from_str(s).map_err(|_| HResult::E_INVALIDARG)
}

// ==================================================================================
// RAW INTERFACE WRAPPER
// ==================================================================================

/// Owned reference to an `ICLRRuntimeHost2`. Released on drop.
pub struct ClrHost {
    raw: NonNull<ICLRRuntimeHost2>,
}

impl ClrHost {
    /// # Safety
    /// `raw` must be a live interface pointer whose reference this value takes over.
    pub unsafe fn from_raw(raw: NonNull<ICLRRuntimeHost2>) -> Self {
        Self { raw }
    }

    fn this(&self) -> *mut ICLRRuntimeHost2 {
        self.raw.as_ptr()
    }

    fn vtbl(&self) -> &ICLRRuntimeHost2Vtbl {
        // SAFETY: A live COM object always points at its vtable.
        unsafe { &*(*self.raw.as_ptr()).vtbl }
    }
}

impl RuntimeHost for ClrHost {
    fn set_startup_flags(&mut self, flags: StartupFlags) -> Result<(), HResult> {
        unsafe { (self.vtbl().set_startup_flags)(self.this(), flags.bits()) }.ok()
    }

    fn start(&mut self) -> Result<(), HResult> {
        unsafe { (self.vtbl().start)(self.this()) }.ok()
    }

    fn create_app_domain(
        &mut self,
        friendly_name: &str,
        flags: AppDomainFlags,
        properties: &[(&str, &str)],
    ) -> Result<DomainId, HResult> {
        let friendly_name = wide(friendly_name)?;

        let keys = properties
            .iter()
            .map(|(key, _)| wide(key))
            .collect::<Result<Vec<_>, _>>()?;
        let values = properties
            .iter()
            .map(|(_, value)| wide(value))
            .collect::<Result<Vec<_>, _>>()?;

        // The owned strings above outlive the call; only their pointers cross over.
        let key_ptrs: Vec<*const u16> = keys.iter().map(|k| k.as_ptr()).collect();
        let value_ptrs: Vec<*const u16> = values.iter().map(|v| v.as_ptr()).collect();

        let mut domain_id: DomainId = 0;
        let hr = unsafe {
            (self.vtbl().create_app_domain_with_manager)(
                self.this(),
                friendly_name.as_ptr(),
                flags.bits(),
                ptr::null(), // No AppDomain manager assembly
                ptr::null(), // No AppDomain manager type
                properties.len() as i32,
                key_ptrs.as_ptr(),
                value_ptrs.as_ptr(),
                &mut domain_id,
            )
        };

        hr.ok().map(|()| domain_id)
    }

    fn create_delegate(
        &mut self,
        domain: DomainId,
        assembly_name: &str,
        type_name: &str,
        method_name: &str,
    ) -> Result<NonNull<c_void>, HResult> {
        let assembly_name = wide(assembly_name)?;
        let type_name = wide(type_name)?;
        let method_name = wide(method_name)?;

        let mut fn_ptr: isize = 0;
        let hr = unsafe {
            (self.vtbl().create_delegate)(
                self.this(),
                domain,
                assembly_name.as_ptr(),
                type_name.as_ptr(),
                method_name.as_ptr(),
                &mut fn_ptr,
            )
        };

        hr.ok()?;
        NonNull::new(fn_ptr as *mut c_void).ok_or(HResult::E_FAIL)
    }

    fn unload_app_domain(&mut self, domain: DomainId, wait_until_done: bool) -> Result<(), HResult> {
        unsafe { (self.vtbl().unload_app_domain)(self.this(), domain, i32::from(wait_until_done)) }.ok()
    }

    fn stop(&mut self) -> Result<(), HResult> {
        unsafe { (self.vtbl().stop)(self.this()) }.ok()
    }
}

impl Drop for ClrHost {
    fn drop(&mut self) {
        unsafe {
            (self.vtbl().release)(self.this());
        }
    }
}

// ==================================================================================
// HOST + LIBRARY PAIR
// ==================================================================================

/// The host interface together with the library image that implements it.
///
/// Field order matters: the interface is released before the image is unloaded.
pub struct ClrRuntime {
    host: ClrHost,
    library: RuntimeLibrary,
}

impl ClrRuntime {
    pub fn new(host: ClrHost, library: RuntimeLibrary) -> Self {
        Self { host, library }
    }

    pub fn library(&self) -> &RuntimeLibrary {
        &self.library
    }
}

impl RuntimeHost for ClrRuntime {
    fn set_startup_flags(&mut self, flags: StartupFlags) -> Result<(), HResult> {
        self.host.set_startup_flags(flags)
    }

    fn start(&mut self) -> Result<(), HResult> {
        self.host.start()
    }

    fn create_app_domain(
        &mut self,
        friendly_name: &str,
        flags: AppDomainFlags,
        properties: &[(&str, &str)],
    ) -> Result<DomainId, HResult> {
        self.host.create_app_domain(friendly_name, flags, properties)
    }

    fn create_delegate(
        &mut self,
        domain: DomainId,
        assembly_name: &str,
        type_name: &str,
        method_name: &str,
    ) -> Result<NonNull<c_void>, HResult> {
        self.host.create_delegate(domain, assembly_name, type_name, method_name)
    }

    fn unload_app_domain(&mut self, domain: DomainId, wait_until_done: bool) -> Result<(), HResult> {
        self.host.unload_app_domain(domain, wait_until_done)
    }

    fn stop(&mut self) -> Result<(), HResult> {
        self.host.stop()
    }
}
