// crates/sharplife_host/src/entry_point.rs
use std::ffi::c_void;
use std::ptr::NonNull;

use sharplife_shared::DomainId;

use crate::error::{BootstrapError, Result};
use crate::runtime_host::RuntimeHost;

/// `static int Method(bool isServer)` as seen from native code.
pub type ManagedEntryPointFn = unsafe extern "system" fn(is_server: bool) -> i32;

/// Names the managed static method control is handed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointDescriptor {
    pub assembly_name: String,
    pub type_name: String,
    pub method_name: String,
}

/// A resolved entry point. Only valid while the domain it came from is loaded.
#[derive(Debug, Clone, Copy)]
pub struct ManagedEntryPoint {
    ptr: NonNull<c_void>,
}

impl ManagedEntryPoint {
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }

    /// Hands control to managed code and returns its exit code.
    ///
    /// # Safety
    /// The owning domain must still be loaded, and the managed method must really be
    /// `static int M(bool)`. The runtime host does not check the signature when it
    /// creates the delegate; a mismatch is undefined behavior.
    pub unsafe fn invoke(&self, is_server: bool) -> i32 {
        let entry: ManagedEntryPointFn = std::mem::transmute(self.ptr.as_ptr());
        entry(is_server)
    }
}

/// Asks the host for a delegate bound to `descriptor` inside `domain`.
pub fn resolve_entry_point<H: RuntimeHost + ?Sized>(
    host: &mut H,
    domain: DomainId,
    descriptor: &EntryPointDescriptor,
) -> Result<ManagedEntryPoint> {
    let ptr = host
        .create_delegate(
            domain,
            &descriptor.assembly_name,
            &descriptor.type_name,
            &descriptor.method_name,
        )
        .map_err(|hr| BootstrapError::DelegateCreationFailed(Some(hr)))?;

    tracing::debug!(
        assembly = %descriptor.assembly_name,
        class = %descriptor.type_name,
        method = %descriptor.method_name,
        "entry point resolved"
    );

    Ok(ManagedEntryPoint { ptr })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fake_host::FakeRuntimeHost;
    use sharplife_shared::HResult;

    unsafe extern "system" fn fake_main(is_server: bool) -> i32 {
        if is_server {
            42
        } else {
            7
        }
    }

    fn descriptor() -> EntryPointDescriptor {
        EntryPointDescriptor {
            assembly_name: "SharpLife.Engine".into(),
            type_name: "SharpLife.Engine.Host.NativeLauncher".into(),
            method_name: "Start".into(),
        }
    }

    #[test]
    fn resolved_entry_point_forwards_flag_and_exit_code() {
        let mut host = FakeRuntimeHost {
            delegate: NonNull::new(fake_main as ManagedEntryPointFn as *mut c_void),
            ..Default::default()
        };

        let entry = resolve_entry_point(&mut host, 1, &descriptor()).unwrap();

        assert_eq!(unsafe { entry.invoke(true) }, 42);
        assert_eq!(unsafe { entry.invoke(false) }, 7);
        assert_eq!(
            host.delegate_requests,
            vec![(
                1,
                "SharpLife.Engine".to_string(),
                "SharpLife.Engine.Host.NativeLauncher".to_string(),
                "Start".to_string()
            )]
        );
    }

    #[test]
    fn missing_assembly_fails_with_status() {
        let mut host = FakeRuntimeHost {
            fail_delegate: Some(HResult::COR_E_FILENOTFOUND),
            ..Default::default()
        };

        let err = resolve_entry_point(&mut host, 1, &descriptor()).unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::DelegateCreationFailed(Some(HResult::COR_E_FILENOTFOUND))
        ));
    }
}
