// crates/sharplife_host/src/test_support.rs
//! Fakes shared by the unit tests.

pub mod fake_host {
    use std::ffi::c_void;
    use std::ptr::NonNull;

    use sharplife_shared::{AppDomainFlags, DomainId, HResult, StartupFlags};

    use crate::runtime_host::RuntimeHost;

    /// Records every call; each operation can be told to fail.
    #[derive(Debug, Default)]
    pub struct FakeRuntimeHost {
        pub startup_flags: Option<StartupFlags>,
        pub started: bool,
        pub stopped: u32,
        pub domains_created: Vec<(String, AppDomainFlags, Vec<(String, String)>)>,
        pub domains_unloaded: Vec<(DomainId, bool)>,
        pub delegate_requests: Vec<(DomainId, String, String, String)>,

        pub fail_start: Option<HResult>,
        pub fail_create_domain: Option<HResult>,
        pub fail_delegate: Option<HResult>,
        pub delegate: Option<NonNull<c_void>>,
        pub next_domain_id: DomainId,
    }

    impl RuntimeHost for FakeRuntimeHost {
        fn set_startup_flags(&mut self, flags: StartupFlags) -> Result<(), HResult> {
            self.startup_flags = Some(flags);
            Ok(())
        }

        fn start(&mut self) -> Result<(), HResult> {
            if let Some(hr) = self.fail_start {
                return Err(hr);
            }
            self.started = true;
            Ok(())
        }

        fn create_app_domain(
            &mut self,
            friendly_name: &str,
            flags: AppDomainFlags,
            properties: &[(&str, &str)],
        ) -> Result<DomainId, HResult> {
            self.domains_created.push((
                friendly_name.to_string(),
                flags,
                properties
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
            match self.fail_create_domain {
                Some(hr) => Err(hr),
                None => Ok(self.next_domain_id),
            }
        }

        fn create_delegate(
            &mut self,
            domain: DomainId,
            assembly_name: &str,
            type_name: &str,
            method_name: &str,
        ) -> Result<NonNull<c_void>, HResult> {
            self.delegate_requests.push((
                domain,
                assembly_name.to_string(),
                type_name.to_string(),
                method_name.to_string(),
            ));
            if let Some(hr) = self.fail_delegate {
                return Err(hr);
            }
            self.delegate.ok_or(HResult::E_FAIL)
        }

        fn unload_app_domain(&mut self, domain: DomainId, wait_until_done: bool) -> Result<(), HResult> {
            self.domains_unloaded.push((domain, wait_until_done));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), HResult> {
            self.stopped += 1;
            Ok(())
        }
    }
}

pub mod shared_host {
    //! A fake host whose record survives the lifecycle dropping it.

    use std::cell::RefCell;
    use std::ffi::c_void;
    use std::path::{Path, PathBuf};
    use std::ptr::NonNull;
    use std::rc::Rc;

    use sharplife_shared::{AppDomainFlags, DomainId, HResult, StartupFlags};

    use super::fake_host::FakeRuntimeHost;
    use crate::error::{BootstrapError, Result};
    use crate::lifecycle::{LoadedRuntime, RuntimeLoader};
    use crate::runtime_host::RuntimeHost;

    #[derive(Default)]
    pub struct Record {
        pub host: FakeRuntimeHost,
        pub released: u32,
        pub loads: Vec<(PathBuf, Vec<String>)>,
    }

    pub struct SharedFakeHost(pub Rc<RefCell<Record>>);

    impl RuntimeHost for SharedFakeHost {
        fn set_startup_flags(&mut self, flags: StartupFlags) -> Result<(), HResult> {
            self.0.borrow_mut().host.set_startup_flags(flags)
        }

        fn start(&mut self) -> Result<(), HResult> {
            self.0.borrow_mut().host.start()
        }

        fn create_app_domain(
            &mut self,
            friendly_name: &str,
            flags: AppDomainFlags,
            properties: &[(&str, &str)],
        ) -> Result<DomainId, HResult> {
            self.0.borrow_mut().host.create_app_domain(friendly_name, flags, properties)
        }

        fn create_delegate(
            &mut self,
            domain: DomainId,
            assembly_name: &str,
            type_name: &str,
            method_name: &str,
        ) -> Result<NonNull<c_void>, HResult> {
            self.0
                .borrow_mut()
                .host
                .create_delegate(domain, assembly_name, type_name, method_name)
        }

        fn unload_app_domain(&mut self, domain: DomainId, wait_until_done: bool) -> Result<(), HResult> {
            self.0.borrow_mut().host.unload_app_domain(domain, wait_until_done)
        }

        fn stop(&mut self) -> Result<(), HResult> {
            self.0.borrow_mut().host.stop()
        }
    }

    impl Drop for SharedFakeHost {
        fn drop(&mut self) {
            self.0.borrow_mut().released += 1;
        }
    }

    /// Loader that hands out a [`SharedFakeHost`], or fails when `core_root` is `None`.
    pub struct FakeLoader {
        pub record: Rc<RefCell<Record>>,
        pub core_root: Option<PathBuf>,
    }

    impl RuntimeLoader for FakeLoader {
        type Host = SharedFakeHost;

        fn load(&self, target_app_dir: &Path, versions: &[String]) -> Result<LoadedRuntime<SharedFakeHost>> {
            self.record
                .borrow_mut()
                .loads
                .push((target_app_dir.to_path_buf(), versions.to_vec()));

            let core_root = self.core_root.clone().ok_or(BootstrapError::RuntimeNotFound {
                searched: vec![target_app_dir.to_path_buf()],
            })?;

            Ok(LoadedRuntime {
                host: SharedFakeHost(Rc::clone(&self.record)),
                core_root,
            })
        }
    }
}

pub mod fake_com {
    //! A hand-built `ICLRRuntimeHost2` object, so the vtable wrapper can be driven
    //! without a real runtime.

    use std::cell::{Ref, RefCell};
    use std::ffi::c_void;
    use std::ptr::NonNull;

    use sharplife_shared::clr_api::{ICLRRuntimeHost2Vtbl, Lpcwstr};
    use sharplife_shared::{DomainId, Guid, HResult, ICLRRuntimeHost2};
    use widestring::U16CStr;

    #[derive(Debug, Default)]
    pub struct FakeComState {
        pub friendly_name: String,
        pub domain_flags: u32,
        pub properties: Vec<(String, String)>,
        pub startup_flags: u32,
        pub delegate_requests: Vec<(DomainId, String, String, String)>,
        pub delegate_status: Option<HResult>,
        pub released: u32,
    }

    #[repr(C)]
    struct FakeObject {
        iface: ICLRRuntimeHost2,
        state: RefCell<FakeComState>,
    }

    pub struct FakeComHost {
        object: Box<FakeObject>,
    }

    impl FakeComHost {
        pub fn new() -> Self {
            Self {
                object: Box::new(FakeObject {
                    iface: ICLRRuntimeHost2 { vtbl: &VTBL },
                    state: RefCell::new(FakeComState::default()),
                }),
            }
        }

        pub fn as_raw(&self) -> NonNull<ICLRRuntimeHost2> {
            // Whole-object provenance: the stubs reach the sibling `state` field
            NonNull::from(&*self.object).cast()
        }

        pub fn state(&self) -> Ref<'_, FakeComState> {
            self.object.state.borrow()
        }

        pub fn fail_delegates(&self, hr: HResult) {
            self.object.state.borrow_mut().delegate_status = Some(hr);
        }
    }

    type This = *mut ICLRRuntimeHost2;

    unsafe fn state<'a>(this: This) -> &'a RefCell<FakeComState> {
        &(*(this as *const FakeObject)).state
    }

    unsafe fn read(s: Lpcwstr) -> String {
        U16CStr::from_ptr_str(s).to_string_lossy()
    }

    unsafe extern "system" fn query_interface(_: This, _: *const Guid, _: *mut *mut c_void) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn add_ref(_: This) -> u32 {
        1
    }
    unsafe extern "system" fn release(this: This) -> u32 {
        state(this).borrow_mut().released += 1;
        0
    }
    unsafe extern "system" fn no_args(_: This) -> HResult {
        HResult::S_OK
    }
    unsafe extern "system" fn ptr_arg(_: This, _: *mut c_void) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn out_ptr_arg(_: This, _: *mut *mut c_void) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn unload_app_domain(_: This, _: DomainId, _: i32) -> HResult {
        HResult::S_OK
    }
    unsafe extern "system" fn execute_in_app_domain(_: This, _: DomainId, _: *mut c_void, _: *mut c_void) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn get_current_app_domain_id(_: This, _: *mut DomainId) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn execute_application(
        _: This,
        _: Lpcwstr,
        _: u32,
        _: *const Lpcwstr,
        _: u32,
        _: *const Lpcwstr,
        _: *mut i32,
    ) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn execute_in_default_app_domain(
        _: This,
        _: Lpcwstr,
        _: Lpcwstr,
        _: Lpcwstr,
        _: Lpcwstr,
        _: *mut u32,
    ) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn create_app_domain_with_manager(
        this: This,
        friendly_name: Lpcwstr,
        flags: u32,
        _manager_assembly: Lpcwstr,
        _manager_type: Lpcwstr,
        property_count: i32,
        keys: *const Lpcwstr,
        values: *const Lpcwstr,
        domain_id: *mut DomainId,
    ) -> HResult {
        let mut st = state(this).borrow_mut();
        st.friendly_name = read(friendly_name);
        st.domain_flags = flags;
        st.properties = (0..property_count as usize)
            .map(|i| (read(*keys.add(i)), read(*values.add(i))))
            .collect();
        *domain_id = 7;
        HResult::S_OK
    }
    unsafe extern "system" fn create_delegate(
        this: This,
        domain_id: DomainId,
        assembly_name: Lpcwstr,
        class_name: Lpcwstr,
        method_name: Lpcwstr,
        fn_ptr: *mut isize,
    ) -> HResult {
        let mut st = state(this).borrow_mut();
        st.delegate_requests
            .push((domain_id, read(assembly_name), read(class_name), read(method_name)));
        if let Some(hr) = st.delegate_status {
            return hr;
        }
        *fn_ptr = 0x1000;
        HResult::S_OK
    }
    unsafe extern "system" fn authenticate(_: This, _: u64) -> HResult {
        HResult::S_OK
    }
    unsafe extern "system" fn set_startup_flags(this: This, flags: u32) -> HResult {
        state(this).borrow_mut().startup_flags = flags;
        HResult::S_OK
    }
    unsafe extern "system" fn dll_get_activation_factory(
        _: This,
        _: DomainId,
        _: Lpcwstr,
        _: *mut *mut c_void,
    ) -> HResult {
        HResult::E_FAIL
    }
    unsafe extern "system" fn execute_assembly(
        _: This,
        _: DomainId,
        _: Lpcwstr,
        _: i32,
        _: *const Lpcwstr,
        _: *mut u32,
    ) -> HResult {
        HResult::E_FAIL
    }

    static VTBL: ICLRRuntimeHost2Vtbl = ICLRRuntimeHost2Vtbl {
        query_interface,
        add_ref,
        release,
        start: no_args,
        stop: no_args,
        set_host_control: ptr_arg,
        get_clr_control: out_ptr_arg,
        unload_app_domain,
        execute_in_app_domain,
        get_current_app_domain_id,
        execute_application,
        execute_in_default_app_domain,
        create_app_domain_with_manager,
        create_delegate,
        authenticate,
        register_mac_eh_port: no_args,
        set_startup_flags,
        dll_get_activation_factory,
        execute_assembly,
    };
}
