// crates/sharplife_host/src/locator.rs
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};
use crate::library::RuntimeLibrary;
use crate::paths;

/// Environment variable naming a directory that overrides every other search root.
pub const CORE_ROOT_ENV: &str = "CORE_ROOT";

#[cfg(windows)]
pub const RUNTIME_LIBRARY_NAME: &str = "coreclr.dll";
#[cfg(target_os = "macos")]
pub const RUNTIME_LIBRARY_NAME: &str = "libcoreclr.dylib";
#[cfg(all(unix, not(target_os = "macos")))]
pub const RUNTIME_LIBRARY_NAME: &str = "libcoreclr.so";

/// Shared runtime install directory; the version string is appended to it.
#[cfg(windows)]
pub const SHARED_RUNTIME_INSTALL_DIR: &str = r"%programfiles%\dotnet\shared\Microsoft.NETCore.App\";
#[cfg(target_os = "macos")]
pub const SHARED_RUNTIME_INSTALL_DIR: &str = "/usr/local/share/dotnet/shared/Microsoft.NETCore.App/";
#[cfg(all(unix, not(target_os = "macos")))]
pub const SHARED_RUNTIME_INSTALL_DIR: &str = "/usr/share/dotnet/shared/Microsoft.NETCore.App/";

/// Which search stage produced a candidate directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStage {
    OverrideRoot,
    AppLocal,
    SharedInstall { version: String },
}

/// Decides whether a directory holds a usable runtime library.
///
/// The OS loader is the real implementation; tests substitute a predicate.
pub trait RuntimeProbe {
    type Library;

    fn probe(&self, directory: &Path) -> Option<Self::Library>;
}

/// Loads the runtime library from disk through the OS loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsLoaderProbe;

impl RuntimeProbe for OsLoaderProbe {
    type Library = RuntimeLibrary;

    fn probe(&self, directory: &Path) -> Option<RuntimeLibrary> {
        let lib = RuntimeLibrary::load(&directory.join(RUNTIME_LIBRARY_NAME));
        lib.is_loaded().then_some(lib)
    }
}

/// A runtime library that was found and loaded.
#[derive(Debug)]
pub struct LocatedRuntime<L> {
    pub library: L,
    /// Directory the library was loaded from; the domain needs it for native probing.
    pub core_root: PathBuf,
    pub stage: SearchStage,
}

/// Multi-root fallback search for the runtime library.
#[derive(Debug, Clone)]
pub struct RuntimeLocator<P> {
    probe: P,
    override_root: Option<PathBuf>,
    install_dir_template: String,
}

impl RuntimeLocator<OsLoaderProbe> {
    /// Locator over the real loader, the `CORE_ROOT` override and the platform install directory.
    pub fn from_env() -> Self {
        let override_root = env::var_os(CORE_ROOT_ENV)
            .filter(|root| !root.is_empty())
            .map(PathBuf::from);

        Self::new(OsLoaderProbe, override_root, SHARED_RUNTIME_INSTALL_DIR)
    }
}

impl<P: RuntimeProbe> RuntimeLocator<P> {
    pub fn new(probe: P, override_root: Option<PathBuf>, install_dir_template: impl Into<String>) -> Self {
        Self {
            probe,
            override_root,
            install_dir_template: install_dir_template.into(),
        }
    }

    /// Every directory the search would try, in order.
    pub fn search_roots(&self, target_dir: &Path, versions: &[String]) -> Vec<(SearchStage, PathBuf)> {
        let mut roots = Vec::with_capacity(versions.len() + 2);

        if let Some(root) = &self.override_root {
            roots.push((SearchStage::OverrideRoot, root.clone()));
        }

        roots.push((SearchStage::AppLocal, target_dir.to_path_buf()));

        for version in versions {
            let install_dir = paths::expand_env_vars(&format!("{}{}", self.install_dir_template, version));
            roots.push((
                SearchStage::SharedInstall {
                    version: version.clone(),
                },
                PathBuf::from(install_dir),
            ));
        }

        roots
    }

    /// Returns the first root, in search order, that holds a loadable runtime library.
    pub fn locate(&self, target_dir: &Path, versions: &[String]) -> Result<LocatedRuntime<P::Library>> {
        let roots = self.search_roots(target_dir, versions);

        for (stage, root) in &roots {
            tracing::debug!(?stage, root = %root.display(), "probing for runtime library");

            if let Some(library) = self.probe.probe(root) {
                tracing::info!(root = %root.display(), "CoreCLR loaded from {}", root.display());
                return Ok(LocatedRuntime {
                    library,
                    core_root: root.clone(),
                    stage: stage.clone(),
                });
            }
        }

        Err(BootstrapError::RuntimeNotFound {
            searched: roots.into_iter().map(|(_, root)| root).collect(),
        })
    }
}
