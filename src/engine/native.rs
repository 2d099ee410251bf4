//! Engine loaded from the packaged native library.
//!
//! The library sits beside the model bundle under `<install root>/native/`
//! and exports a small C ABI:
//!
//! ```text
//! int32_t     nc_device_count(void);
//! const char *nc_device_name(int32_t index);   // owned by the library, valid until the next call
//! int32_t     nc_start(int32_t device_index, const char *model_path);
//! int32_t     nc_stop(void);
//! const char *nc_last_error(void);             // may be NULL
//! ```
//!
//! Negative return codes are failures; `nc_last_error` describes the most
//! recent one. Capture and suppression run on the library's own threads.

use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use super::{EngineError, NoiseEngine};

/// File stem of the engine library; the platform prefix/suffix is added by
/// [`libloading::library_filename`].
pub const LIBRARY_STEM: &str = "noise_engine";

type DeviceCountFn = unsafe extern "C" fn() -> i32;
type DeviceNameFn = unsafe extern "C" fn(i32) -> *const c_char;
type StartFn = unsafe extern "C" fn(i32, *const c_char) -> i32;
type StopFn = unsafe extern "C" fn() -> i32;
type LastErrorFn = unsafe extern "C" fn() -> *const c_char;

struct EngineApi {
    device_count: DeviceCountFn,
    device_name: DeviceNameFn,
    start: StartFn,
    stop: StopFn,
    last_error: LastErrorFn,
}

// ---------------------------------------------------------------------------
// NativeEngine
// ---------------------------------------------------------------------------

pub struct NativeEngine {
    api: EngineApi,
    library_path: PathBuf,
    /// Owns the mapping the pointers in `api` point into.
    _lib: Library,
}

impl std::fmt::Debug for NativeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeEngine")
            .field("library_path", &self.library_path)
            .finish_non_exhaustive()
    }
}

impl NativeEngine {
    /// Where the engine library is expected under `install_root`.
    pub fn library_path(install_root: &Path) -> PathBuf {
        install_root
            .join("native")
            .join(libloading::library_filename(LIBRARY_STEM))
    }

    /// Load the engine library from `install_root` and bind its entry points.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] when the library is missing,
    /// cannot be loaded, or lacks one of the entry points. The caller treats
    /// this as fatal.
    pub fn load(install_root: &Path) -> Result<Self, EngineError> {
        let library_path = Self::library_path(install_root);
        if !library_path.is_file() {
            return Err(EngineError::Unavailable(format!(
                "engine library not found at {}",
                library_path.display()
            )));
        }

        // SAFETY: loading the packaged engine runs its initialisers; the
        // library ships with the install and is trusted like the binary.
        let lib = unsafe { Library::new(&library_path) }.map_err(|e| {
            EngineError::Unavailable(format!(
                "failed to load engine library {}: {e}",
                library_path.display()
            ))
        })?;

        // SAFETY: the type aliases above match the exported C signatures.
        let api = unsafe {
            EngineApi {
                device_count: symbol(&lib, "nc_device_count")?,
                device_name: symbol(&lib, "nc_device_name")?,
                start: symbol(&lib, "nc_start")?,
                stop: symbol(&lib, "nc_stop")?,
                last_error: symbol(&lib, "nc_last_error")?,
            }
        };

        log::info!("Native engine loaded from {}", library_path.display());
        Ok(Self {
            api,
            library_path,
            _lib: lib,
        })
    }

    fn last_error(&self) -> String {
        // SAFETY: entry point bound at load; `_lib` is still alive.
        let ptr = unsafe { (self.api.last_error)() };
        if ptr.is_null() {
            return "no error message".into();
        }
        // SAFETY: non-null pointer to a NUL-terminated string owned by the library.
        unsafe { CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned()
    }

    fn check(&self, operation: &'static str, code: i32) -> Result<i32, EngineError> {
        if code < 0 {
            return Err(EngineError::Rejected {
                operation,
                code,
                message: self.last_error(),
            });
        }
        Ok(code)
    }
}

/// Copy a function pointer out of `lib`.
///
/// # Safety
///
/// `T` must be the exact function-pointer type of the exported symbol.
unsafe fn symbol<T: Copy>(lib: &Library, name: &str) -> Result<T, EngineError> {
    let sym: Symbol<T> = unsafe { lib.get(name.as_bytes()) }
        .map_err(|e| EngineError::Unavailable(format!("missing symbol `{name}`: {e}")))?;
    Ok(*sym)
}

impl NoiseEngine for NativeEngine {
    fn list_devices(&self) -> Result<Vec<String>, EngineError> {
        // SAFETY: entry point bound at load; `_lib` is still alive.
        let count = unsafe { (self.api.device_count)() };
        let count = self
            .check("device_count", count)
            .map_err(|e| EngineError::Enumeration(e.to_string()))?;

        (0..count)
            .map(|index| {
                // SAFETY: as above; the returned string is copied before the next call.
                let ptr = unsafe { (self.api.device_name)(index) };
                if ptr.is_null() {
                    return Err(EngineError::Enumeration(format!(
                        "no name for device {index}: {}",
                        self.last_error()
                    )));
                }
                // SAFETY: non-null pointer to a NUL-terminated string owned by the library.
                Ok(unsafe { CStr::from_ptr(ptr) }
                    .to_string_lossy()
                    .into_owned())
            })
            .collect()
    }

    fn start(&mut self, device_index: usize, model_path: &Path) -> Result<(), EngineError> {
        let index = i32::try_from(device_index).map_err(|_| {
            EngineError::InvalidArgument(format!("device index {device_index} out of range"))
        })?;
        let path = model_path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| {
                EngineError::InvalidArgument(format!(
                    "model path is not a valid C string: {}",
                    model_path.display()
                ))
            })?;

        // SAFETY: entry point bound at load; `path` outlives the call.
        let code = unsafe { (self.api.start)(index, path.as_ptr()) };
        self.check("start", code)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        // SAFETY: entry point bound at load; `_lib` is still alive.
        let code = unsafe { (self.api.stop)() };
        self.check("stop", code)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn library_lives_under_native_dir() {
        let path = NativeEngine::library_path(Path::new("/opt/noise-tray"));
        assert!(path.starts_with("/opt/noise-tray/native"));
        assert_eq!(
            path.file_name().unwrap(),
            libloading::library_filename(LIBRARY_STEM).as_os_str()
        );
    }

    #[test]
    fn missing_library_is_unavailable() {
        let dir = tempdir().expect("temp dir");
        let err = NativeEngine::load(dir.path()).unwrap_err();

        assert!(matches!(err, EngineError::Unavailable(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn non_library_file_is_unavailable() {
        let dir = tempdir().expect("temp dir");
        let path = NativeEngine::library_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).expect("native dir");
        std::fs::write(&path, b"not a shared library").expect("write");

        let err = NativeEngine::load(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(_)));
        assert!(err.to_string().contains("failed to load"));
    }
}
