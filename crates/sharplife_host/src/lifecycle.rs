// crates/sharplife_host/src/lifecycle.rs
use std::path::{Path, PathBuf};

use sharplife_shared::DomainId;

use crate::config::{Configuration, CONFIG_FILENAME};
use crate::error::{BootstrapError, Result};
use crate::locator::{OsLoaderProbe, RuntimeLocator};
use crate::runtime_host::{ClrRuntime, RuntimeHost};
use crate::{domain, entry_point, log, negotiator, paths};

/// Exit code for any failure before managed code takes over.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    ConfigurationLoaded,
    HostStarted,
    DomainCreated,
    Running,
    ShuttingDown,
    Terminated,
}

/// A runtime host and the directory its library was loaded from.
pub struct LoadedRuntime<H> {
    pub host: H,
    pub core_root: PathBuf,
}

/// Finds the runtime and produces a host interface for it (not yet started).
pub trait RuntimeLoader {
    type Host: RuntimeHost;

    fn load(&self, target_app_dir: &Path, versions: &[String]) -> Result<LoadedRuntime<Self::Host>>;
}

/// The real loader: search the disk for CoreCLR, then ask it for `ICLRRuntimeHost2`.
pub struct CoreClrLoader {
    locator: RuntimeLocator<OsLoaderProbe>,
}

impl CoreClrLoader {
    pub fn from_env() -> Self {
        Self {
            locator: RuntimeLocator::from_env(),
        }
    }
}

impl RuntimeLoader for CoreClrLoader {
    type Host = ClrRuntime;

    fn load(&self, target_app_dir: &Path, versions: &[String]) -> Result<LoadedRuntime<ClrRuntime>> {
        let located = self.locator.locate(target_app_dir, versions)?;
        let host = negotiator::acquire_host(located.library)?;

        Ok(LoadedRuntime {
            host,
            core_root: located.core_root,
        })
    }
}

/// Drives the bootstrap from configuration to managed entry, and tears it down again.
///
/// Owns the configuration, the host and the domain for the lifetime of the process.
pub struct ManagedHost<L: RuntimeLoader> {
    loader: L,
    game_dir: PathBuf,
    is_server: bool,
    state: LifecycleState,
    has_run: bool,

    config: Option<Configuration>,
    runtime: Option<L::Host>,
    host_started: bool,
    domain: Option<DomainId>,
}

impl ManagedHost<CoreClrLoader> {
    pub fn new(game_dir: impl Into<PathBuf>, is_server: bool) -> Self {
        Self::with_loader(CoreClrLoader::from_env(), game_dir, is_server)
    }
}

impl<L: RuntimeLoader> ManagedHost<L> {
    pub fn with_loader(loader: L, game_dir: impl Into<PathBuf>, is_server: bool) -> Self {
        Self {
            loader,
            game_dir: game_dir.into(),
            is_server,
            state: LifecycleState::Uninitialized,
            has_run: false,
            config: None,
            runtime: None,
            host_started: false,
            domain: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    /// Runs the whole lifecycle and never returns to the caller.
    pub fn start(mut self) -> ! {
        let exit_code = self.run();
        self.terminate(exit_code)
    }

    /// Bootstraps, hands control to managed code, and tears everything down.
    ///
    /// Returns the managed entry point's exit code, or [`EXIT_FAILURE`] if any stage
    /// before it failed. Only the first call bootstraps; later calls return
    /// [`EXIT_FAILURE`] without touching the runtime.
    pub fn run(&mut self) -> i32 {
        if std::mem::replace(&mut self.has_run, true) {
            tracing::error!("ERROR - managed host has already run in this process");
            return EXIT_FAILURE;
        }

        let exit_code = match self.bootstrap() {
            Ok(code) => code,
            Err(err) => {
                report(&err);
                EXIT_FAILURE
            }
        };

        self.shutdown();
        exit_code
    }

    fn bootstrap(&mut self) -> Result<i32> {
        let config_path = self.game_dir.join(CONFIG_FILENAME);
        let config = Configuration::load(&config_path)?;
        log::set_debug_logging_enabled(config.debug_logging_enabled);
        let config = self.config.insert(config);
        self.state = LifecycleState::ConfigurationLoaded;

        let target_app_dir = paths::managed_directory(&self.game_dir, &config.managed.path)
            .unwrap_or_else(|_| self.game_dir.join(&config.managed.path));
        tracing::debug!(dir = %target_app_dir.display(), is_server = self.is_server, "starting managed host");

        let loaded = self
            .loader
            .load(&target_app_dir, &config.supported_runtime_versions)?;
        let host = self.runtime.insert(loaded.host);

        negotiator::start_runtime(host)?;
        self.host_started = true;
        self.state = LifecycleState::HostStarted;

        let domain = domain::create_domain(host, &target_app_dir, &loaded.core_root)?;
        self.domain = Some(domain);
        self.state = LifecycleState::DomainCreated;

        let entry = entry_point::resolve_entry_point(host, domain, &config.managed.entry_point)?;
        self.state = LifecycleState::Running;

        // SAFETY: The domain stays loaded until shutdown, which only runs after this returns.
        Ok(unsafe { entry.invoke(self.is_server) })
    }

    /// Unloads the domain, stops the host and releases it, skipping whatever was never
    /// created. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if matches!(
            self.state,
            LifecycleState::Uninitialized | LifecycleState::ShuttingDown | LifecycleState::Terminated
        ) {
            return;
        }
        self.state = LifecycleState::ShuttingDown;

        if let Some(host) = self.runtime.as_mut() {
            if let Some(domain) = self.domain.take() {
                if let Err(hr) = host.unload_app_domain(domain, true) {
                    tracing::warn!(domain, status = %hr, "failed to unload AppDomain");
                }
            }

            if std::mem::take(&mut self.host_started) {
                if let Err(hr) = host.stop() {
                    tracing::warn!(status = %hr, "failed to stop the runtime");
                }
            }
        }

        // Releases the host interface, then the runtime library behind it
        self.runtime = None;
    }

    fn terminate(mut self, exit_code: i32) -> ! {
        self.state = LifecycleState::Terminated;
        tracing::info!(exit_code, "exiting process");
        std::process::exit(exit_code)
    }
}

fn report(err: &BootstrapError) {
    let cause = std::error::Error::source(err)
        .map(|source| format!(": {source}"))
        .unwrap_or_default();

    match err.status() {
        Some(status) => tracing::error!(%status, "ERROR - {err}{cause}\nError code:{status}"),
        None => tracing::error!("ERROR - {err}{cause}"),
    }
}
