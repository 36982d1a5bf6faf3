// crates/sharplife_host/src/domain.rs
use std::fs;
use std::path::Path;

use sharplife_shared::{AppDomainFlags, DomainId};

use crate::error::{BootstrapError, Result};
use crate::runtime_host::RuntimeHost;

pub const DOMAIN_FRIENDLY_NAME: &str = "SharpLife GoldSource wrapper";

/// Extensions picked up next to the runtime library for the trusted platform assembly list.
pub const TPA_EXTENSIONS: [&str; 3] = ["dll", "exe", "winmd"];

/// Suffix of the second native image probing path.
pub const NATIVE_IMAGE_SUFFIX: &str = "NI";

/// Compatibility quirks to apply to assemblies without a target framework moniker.
pub const COMPAT_SWITCH: &str = "UseLatestBehaviorWhenTFMNotSpecified";

pub const DOMAIN_FLAGS: AppDomainFlags = AppDomainFlags::ENABLE_PLATFORM_SPECIFIC_APPS
    .union(AppDomainFlags::ENABLE_PINVOKE_AND_CLASSIC_COMINTEROP)
    .union(AppDomainFlags::DISABLE_TRANSPARENCY_ENFORCEMENT);

const PATH_SEPARATOR: char = ';';

/// The six properties a domain is created with, in the order the host receives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProperties {
    pub trusted_platform_assemblies: String,
    pub app_paths: String,
    pub app_ni_paths: String,
    pub native_dll_search_directories: String,
    pub platform_resource_roots: String,
    pub compat_switch: String,
}

impl DomainProperties {
    pub fn build(target_app_dir: &Path, core_root: &Path) -> Self {
        let target = target_app_dir.display().to_string();
        let core = core_root.display().to_string();

        let app_paths = target.clone();

        Self {
            trusted_platform_assemblies: scan_trusted_assemblies(core_root),
            app_ni_paths: format!("{target}{PATH_SEPARATOR}{target}{NATIVE_IMAGE_SUFFIX}"),
            native_dll_search_directories: format!("{app_paths}{PATH_SEPARATOR}{core}"),
            platform_resource_roots: app_paths.clone(),
            app_paths,
            compat_switch: COMPAT_SWITCH.to_string(),
        }
    }

    pub fn as_pairs(&self) -> [(&'static str, &str); 6] {
        [
            ("TRUSTED_PLATFORM_ASSEMBLIES", self.trusted_platform_assemblies.as_str()),
            ("APP_PATHS", self.app_paths.as_str()),
            ("APP_NI_PATHS", self.app_ni_paths.as_str()),
            ("NATIVE_DLL_SEARCH_DIRECTORIES", self.native_dll_search_directories.as_str()),
            ("PLATFORM_RESOURCE_ROOTS", self.platform_resource_roots.as_str()),
            ("AppDomainCompatSwitch", self.compat_switch.as_str()),
        ]
    }
}

/// Lists every file in `core_root` (non-recursive) matching [`TPA_EXTENSIONS`], each
/// followed by `;`.
///
/// Files are grouped by extension, in the order the filesystem enumerates them. Nothing
/// is sorted or deduplicated; the runtime decides which copy wins if a name repeats.
pub fn scan_trusted_assemblies(core_root: &Path) -> String {
    let mut list = String::new();

    for extension in TPA_EXTENSIONS {
        let entries = match fs::read_dir(core_root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %core_root.display(), %err, "cannot scan for trusted assemblies");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

            if matches && entry.file_type().is_ok_and(|ty| !ty.is_dir()) {
                list.push_str(&core_root.join(entry.file_name()).display().to_string());
                list.push(PATH_SEPARATOR);
            }
        }
    }

    list
}

/// Builds the domain properties and asks the host to create the domain.
pub fn create_domain<H: RuntimeHost + ?Sized>(
    host: &mut H,
    target_app_dir: &Path,
    core_root: &Path,
) -> Result<DomainId> {
    let properties = DomainProperties::build(target_app_dir, core_root);

    let domain_id = host
        .create_app_domain(DOMAIN_FRIENDLY_NAME, DOMAIN_FLAGS, &properties.as_pairs())
        .map_err(|hr| BootstrapError::DomainCreationFailed(Some(hr)))?;

    tracing::info!(domain_id, "AppDomain {domain_id} created");
    Ok(domain_id)
}
