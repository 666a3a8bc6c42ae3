#[macro_use] extern crate log;
extern crate libc;
pub extern crate openvr_sys as sys;

pub mod error_ext;
pub mod system;
pub mod overlay;

pub use system::System;
pub use overlay::{
    Overlay,
    OverlayHandle,
};

use error_ext::{
    ErrorType,
    ErrorTypeExt,
};
use thiserror::Error;

use std::{
    ffi::OsStr,
    ptr,
    str,
    sync::atomic::{
        AtomicBool,
        Ordering,
    },
};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Whether a [`Session`] currently exists in this process.
#[inline]
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

fn claim_init_slot() -> bool {
    !INITIALIZED.fetch_or(true, Ordering::SeqCst)
}

fn release_init_slot() {
    INITIALIZED.fetch_and(false, Ordering::SeqCst);
}

fn interface_name(version: &'static [u8]) -> &'static str {
    str::from_utf8(version)
        .ok()
        .map(|s| s.trim_end_matches('\0'))
        .unwrap_or("unknown")
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to load the OpenVR runtime: {0}")]
    Library(#[from] sys::loader::LoadError),
    /// `VR_InitInternal2` refused; the vendor code is carried unmodified.
    #[error("OpenVR initialization failed: {0}")]
    Init(sys::EVRInitError),
    /// The runtime is up but missing a pinned interface version.
    #[error("OpenVR interface {version} unavailable: {code}")]
    Interface {
        version: &'static str,
        code: sys::EVRInitError,
    },
    #[error("OpenVR is already initialized in this process")]
    AlreadyInitialized,
}

/// A live connection to the OpenVR runtime, initialized as an overlay
/// application. At most one per process; dropping it shuts the runtime down.
pub struct Session {
    lib: sys::OpenVrLibrary,
    system: System,
    overlay: Overlay,
}

// The function tables are allocations owned by the runtime and stay valid
// until VR_ShutdownInternal, which only drop runs. Calls through them are
// externally synchronized by the single-writer contract.
unsafe impl Send for Session {}

impl Session {
    /// Connects to the runtime under the platform's `openvr_api` name.
    pub fn init() -> Result<Session, InitError> {
        Session::init_with_runtime(None)
    }

    /// Connects to the runtime at an explicit path.
    pub fn init_with_runtime(runtime: Option<&OsStr>) -> Result<Session, InitError> {
        if !claim_init_slot() {
            return Err(InitError::AlreadyInitialized);
        }
        let session = unsafe { Session::init_inner(runtime) };
        if session.is_err() {
            release_init_slot();
        }
        session
    }

    unsafe fn init_inner(runtime: Option<&OsStr>) -> Result<Session, InitError> {
        let lib = sys::OpenVrLibrary::load(runtime)?;
        let mut e = sys::EVRInitError::non_error();
        (lib.init_internal)(&mut e as *mut _, sys::EVRApplicationType::OVERLAY, ptr::null());
        e.into_empty_result().map_err(InitError::Init)?;
        debug!("VR_InitInternal2 succeeded");
        // The runtime is up from here on; tear it down again on any failure.
        let system = match interface::<sys::SystemFnTable>(&lib, sys::IVRSYSTEM_VERSION) {
            Ok(table) => System::from_table(table),
            Err(code) => {
                (lib.shutdown_internal)();
                return Err(InitError::Interface {
                    version: interface_name(sys::IVRSYSTEM_VERSION),
                    code: code,
                });
            },
        };
        let overlay = match interface::<sys::OverlayFnTable>(&lib, sys::IVROVERLAY_VERSION) {
            Ok(table) => Overlay::from_table(table),
            Err(code) => {
                (lib.shutdown_internal)();
                return Err(InitError::Interface {
                    version: interface_name(sys::IVROVERLAY_VERSION),
                    code: code,
                });
            },
        };
        Ok(Session {
            lib: lib,
            system: system,
            overlay: overlay,
        })
    }

    #[inline(always)]
    pub fn system(&self) -> &System {
        &self.system
    }

    #[inline(always)]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Explicit shutdown; identical to dropping the session.
    pub fn shutdown(self) {}
}

unsafe fn interface<T>(
    lib: &sys::OpenVrLibrary,
    version: &'static [u8],
) -> Result<*const T, sys::EVRInitError> {
    let mut e = sys::EVRInitError::non_error();
    let table = (lib.get_generic_interface)(
        version.as_ptr() as *const libc::c_char,
        &mut e as *mut _,
    ) as *const T;
    if table.is_null() {
        if e.is_error() {
            Err(e)
        } else {
            Err(sys::EVRInitError::INIT_INTERFACE_NOT_FOUND)
        }
    } else {
        Ok(table)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        unsafe { (self.lib.shutdown_internal)() };
        release_init_slot();
        debug!("OpenVR session shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // All slot manipulation lives in this one test; the init slot is
    // process-global and the harness runs tests in parallel.
    #[test]
    fn init_slot_guards_and_failure_paths() {
        assert!(!is_initialized());
        assert!(claim_init_slot());
        assert!(!claim_init_slot());

        // While the slot is claimed, init is refused before any vendor work.
        match Session::init() {
            Err(InitError::AlreadyInitialized) => (),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("init unexpectedly succeeded"),
        }

        release_init_slot();
        assert!(!is_initialized());

        // A load failure reports Library and leaves the slot free.
        let missing = OsStr::new("/nonexistent/not-an-openvr-runtime.so");
        match Session::init_with_runtime(Some(missing)) {
            Err(InitError::Library(_)) => (),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("init unexpectedly succeeded"),
        }
        assert!(!is_initialized());
    }

    #[test]
    fn interface_errors_name_the_pinned_version() {
        assert_eq!(interface_name(sys::IVRSYSTEM_VERSION), "FnTable:IVRSystem_022");
        assert_eq!(interface_name(sys::IVROVERLAY_VERSION), "FnTable:IVROverlay_026");
        let e = InitError::Interface {
            version: interface_name(sys::IVROVERLAY_VERSION),
            code: sys::EVRInitError::INIT_INTERFACE_NOT_FOUND,
        };
        assert_eq!(
            format!("{}", e),
            "OpenVR interface FnTable:IVROverlay_026 unavailable: Init_InterfaceNotFound (105)",
        );
    }
}
