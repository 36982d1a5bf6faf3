// crates/sharplife_host/src/library.rs
use std::path::{Path, PathBuf};

use libloading::Library;

/// Exclusive owner of a loaded shared library image.
///
/// A missing or unloadable file is not an error here: the handle is simply empty and
/// [`is_loaded`](Self::is_loaded) reports `false`. The image is unloaded on drop.
#[derive(Debug, Default)]
pub struct RuntimeLibrary {
    lib: Option<Library>,
    path: PathBuf,
}

impl RuntimeLibrary {
    pub fn load(path: &Path) -> Self {
        // SAFETY: Loading runs the library's initializers. The runtime library is
        // trusted by deployment; this is the same contract every host has with it.
        match unsafe { Library::new(path) } {
            Ok(lib) => Self {
                lib: Some(lib),
                path: path.to_path_buf(),
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "library not loaded");
                Self {
                    lib: None,
                    path: path.to_path_buf(),
                }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lib.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Looks up an exported symbol and copies it out as `T`.
    ///
    /// Returns `None` if the handle is empty or the symbol is absent.
    ///
    /// # Safety
    /// `T` must match the real type of the export, and the returned value must not be
    /// used after this handle is unloaded.
    pub unsafe fn resolve<T: Copy>(&self, symbol: &str) -> Option<T> {
        let lib = self.lib.as_ref()?;
        lib.get::<T>(symbol.as_bytes()).ok().map(|sym| *sym)
    }

    /// Unloads the image now. Unloading an empty handle does nothing.
    pub fn unload(&mut self) {
        if let Some(lib) = self.lib.take() {
            if let Err(err) = lib.close() {
                tracing::warn!(path = %self.path.display(), %err, "failed to unload library");
            }
        }
    }
}

impl Drop for RuntimeLibrary {
    fn drop(&mut self) {
        self.unload();
    }
}
