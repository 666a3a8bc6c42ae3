//! Runtime loader for the `openvr_api` shared library, resolved at init
//! time instead of being linked.

use libloading::{
    library_filename,
    Library,
};
#[cfg(unix)]
use libloading::os::unix::Symbol;
#[cfg(windows)]
use libloading::os::windows::Symbol;

pub use libloading::Error as LoadError;

use std::ffi::OsStr;

use crate::types::{
    EVRApplicationType,
    EVRInitError,
};

// openvr_api entry points
pub type VRInitInternal2Fn =
    unsafe extern "C" fn(*mut EVRInitError, EVRApplicationType, *const libc::c_char) -> u32;
pub type VRShutdownInternalFn = unsafe extern "C" fn();
pub type VRGetGenericInterfaceFn =
    unsafe extern "C" fn(*const libc::c_char, *mut EVRInitError) -> *const libc::c_void;

/// Owns the loaded vendor library together with its resolved entry points.
/// The raw symbols stay valid for as long as `_lib` is alive.
pub struct OpenVrLibrary {
    _lib: Library,
    pub init_internal: Symbol<VRInitInternal2Fn>,
    pub shutdown_internal: Symbol<VRShutdownInternalFn>,
    pub get_generic_interface: Symbol<VRGetGenericInterfaceFn>,
}

impl OpenVrLibrary {
    /// Loads the runtime from `path`, or from the platform's default
    /// `openvr_api` name. Unsafe because loading a library runs its
    /// initializers.
    pub unsafe fn load(path: Option<&OsStr>) -> Result<OpenVrLibrary, libloading::Error> {
        let lib = match path {
            Some(p) => Library::new(p)?,
            None => Library::new(library_filename("openvr_api"))?,
        };
        let init_internal = lib.get::<VRInitInternal2Fn>(b"VR_InitInternal2\0")?.into_raw();
        let shutdown_internal = lib.get::<VRShutdownInternalFn>(b"VR_ShutdownInternal\0")?.into_raw();
        let get_generic_interface = lib.get::<VRGetGenericInterfaceFn>(b"VR_GetGenericInterface\0")?.into_raw();
        Ok(OpenVrLibrary {
            _lib: lib,
            init_internal: init_internal,
            shutdown_internal: shutdown_internal,
            get_generic_interface: get_generic_interface,
        })
    }
}
