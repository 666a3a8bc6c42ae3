//! The exported C surface. One process-wide session guarded by a mutex, an
//! overlay registry keyed by the raw handles the host holds. Every export is
//! callable before init, after shutdown, and with null or stale arguments;
//! the worst outcome is a failure code.

use crate::{
    logging,
    openvr_sys as sys,
    registry::OverlayRegistry,
    timing,
};
use openvr::{
    InitError,
    OverlayHandle,
    Session,
};

use std::{
    env,
    ffi::CStr,
    slice,
    sync::{
        Mutex,
        MutexGuard,
    },
};

const RUNTIME_ENV: &'static str = "VRSHIM_OPENVR_RUNTIME";

struct ShimState {
    session: Session,
    overlays: OverlayRegistry,
}

static STATE: Mutex<Option<ShimState>> = Mutex::new(None);

fn state() -> MutexGuard<'static, Option<ShimState>> {
    match STATE.lock() {
        Ok(guard) => guard,
        // A panic under the lock cannot leave the state half-written; every
        // mutation is a whole Option swap. Keep serving.
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn init_error_code(e: &InitError) -> libc::c_int {
    match e {
        InitError::Library(_) => sys::EVRInitError::INIT_VR_CLIENT_DLL_NOT_FOUND.0,
        InitError::Init(code) => code.0,
        InitError::Interface { code, .. } => code.0,
        // Some other code in this process went through the wrapper crate
        // directly. Not a supported mix; all we can say is that init failed.
        InitError::AlreadyInitialized => sys::EVRInitError::UNKNOWN.0,
    }
}

/// Loads the vendor runtime and starts an overlay-application session.
/// Returns 0 or an `EVRInitError` code; a repeat call is a success no-op.
#[no_mangle]
pub extern "C" fn vrshim_init() -> libc::c_int {
    logging::init();
    let mut guard = state();
    if guard.is_some() {
        debug!("vrshim_init: already initialized");
        return 0;
    }
    let runtime = env::var_os(RUNTIME_ENV);
    if let Some(ref path) = runtime {
        info!("using OpenVR runtime override {:?}", path);
    }
    let session = match Session::init_with_runtime(runtime.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            error!("initialization failed: {}", e);
            return init_error_code(&e);
        },
    };
    info!("OpenVR session up (overlay application)");
    *guard = Some(ShimState {
        session: session,
        overlays: OverlayRegistry::new(),
    });
    0
}

/// Tears the session down, destroying overlays the host never destroyed
/// first. Safe to call repeatedly and without a prior init.
#[no_mangle]
pub extern "C" fn vrshim_shutdown() {
    let mut guard = state();
    let shim = match guard.take() {
        Some(shim) => shim,
        None => {
            debug!("vrshim_shutdown: nothing to shut down");
            return;
        },
    };
    let ShimState { session, mut overlays } = shim;
    if overlays.len() > 0 {
        warn!("{} overlay(s) still live at shutdown", overlays.len());
    }
    for (key, handle) in overlays.drain() {
        warn!("destroying leaked overlay {:?} (handle {})", key, handle);
        if let Err(e) = session.overlay().destroy(handle) {
            warn!("destroying overlay {:?} failed: {}", key, e);
        }
    }
    session.shutdown();
    info!("OpenVR session shut down");
}

/// Writes poses for device indices `0..count`, always exactly `count`
/// entries. Without a live session every entry is zeroed, hence invalid.
#[no_mangle]
pub extern "C" fn vrshim_get_poses(poses: *mut sys::TrackedDevicePose, count: u32) {
    if poses.is_null() || count == 0 {
        return;
    }
    let poses = unsafe { slice::from_raw_parts_mut(poses, count as usize) };
    let guard = state();
    match guard.as_ref() {
        Some(shim) => shim.session.system().device_poses(poses),
        None => {
            for pose in poses.iter_mut() {
                *pose = sys::TrackedDevicePose::default();
            }
        },
    }
}

/// Latest input state of the device at `index`. `false` covers every
/// failure and leaves `state_out` untouched.
#[no_mangle]
pub extern "C" fn vrshim_get_controller_state(
    index: u32,
    state_out: *mut sys::VRControllerState,
) -> bool {
    if state_out.is_null() {
        return false;
    }
    let guard = state();
    let shim = match guard.as_ref() {
        Some(shim) => shim,
        None => return false,
    };
    match shim.session.system().controller_state(index) {
        Some(controller_state) => {
            unsafe { *state_out = controller_state };
            true
        },
        None => false,
    }
}

/// [`vrshim_get_controller_state`] plus the pose the state was sampled with.
#[no_mangle]
pub extern "C" fn vrshim_get_controller_state_with_pose(
    index: u32,
    state_out: *mut sys::VRControllerState,
    pose_out: *mut sys::TrackedDevicePose,
) -> bool {
    if state_out.is_null() || pose_out.is_null() {
        return false;
    }
    let guard = state();
    let shim = match guard.as_ref() {
        Some(shim) => shim,
        None => return false,
    };
    match shim.session.system().controller_state_with_pose(index) {
        Some((controller_state, pose)) => {
            unsafe {
                *state_out = controller_state;
                *pose_out = pose;
            }
            true
        },
        None => false,
    }
}

/// Device index bound to an `ETrackedControllerRole` value, or `0xffffffff`
/// when nothing holds the role.
#[no_mangle]
pub extern "C" fn vrshim_device_index_for_role(role: i32) -> u32 {
    let guard = state();
    let shim = match guard.as_ref() {
        Some(shim) => shim,
        None => return sys::TRACKED_DEVICE_INDEX_INVALID,
    };
    shim.session.system()
        .device_index_for_role(sys::ETrackedControllerRole(role))
        .unwrap_or(sys::TRACKED_DEVICE_INDEX_INVALID)
}

/// Creates an overlay under a runtime-unique `key` and writes its handle to
/// `out`. Returns the vendor `EVROverlayError` code, 0 on success; on any
/// failure `out` holds the invalid handle value.
#[no_mangle]
pub extern "C" fn vrshim_overlay_create(
    key: *const libc::c_char,
    name: *const libc::c_char,
    out: *mut u64,
) -> libc::c_int {
    if out.is_null() {
        return sys::EVROverlayError::INVALID_PARAMETER.0;
    }
    unsafe { *out = sys::OVERLAY_HANDLE_INVALID };
    if key.is_null() || name.is_null() {
        return sys::EVROverlayError::INVALID_PARAMETER.0;
    }
    let key = unsafe { CStr::from_ptr(key) };
    let name = unsafe { CStr::from_ptr(name) };
    let mut guard = state();
    let shim = match guard.as_mut() {
        Some(shim) => shim,
        None => {
            debug!("overlay create {:?} with no live session", key);
            return sys::EVROverlayError::REQUEST_FAILED.0;
        },
    };
    match shim.session.overlay().create(key, name) {
        Ok(handle) => {
            unsafe { *out = handle.raw() };
            trace!("created overlay {:?} as {}", key, handle);
            shim.overlays.insert(key.to_string_lossy().into_owned(), handle);
            0
        },
        Err(e) => {
            debug!("overlay create {:?} failed: {}", key, e);
            e.0
        },
    }
}

fn with_overlay<F>(handle: u64, f: F) -> bool where
    F: FnOnce(&openvr::Overlay, &OverlayHandle) -> Result<(), sys::EVROverlayError>,
{
    let guard = state();
    let shim = match guard.as_ref() {
        Some(shim) => shim,
        None => return false,
    };
    let owned = match shim.overlays.get(handle) {
        Some(owned) => owned,
        None => {
            debug!("no live overlay with handle {}", handle);
            return false;
        },
    };
    match f(shim.session.overlay(), owned) {
        Ok(()) => true,
        Err(e) => {
            debug!("overlay call on {} failed: {}", handle, e);
            false
        },
    }
}

#[no_mangle]
pub extern "C" fn vrshim_overlay_set_flag(handle: u64, flag: u32, enabled: bool) -> bool {
    with_overlay(handle, |overlay, owned| {
        overlay.set_flag(owned, sys::VROverlayFlags(flag), enabled)
    })
}

/// Zero, negative and NaN widths are rejected, never clamped.
#[no_mangle]
pub extern "C" fn vrshim_overlay_set_width_meters(handle: u64, width: f32) -> bool {
    with_overlay(handle, |overlay, owned| overlay.set_width_in_meters(owned, width))
}

/// Anchors an overlay to tracked device `device` with the given offset in
/// the device's local frame. The matrix is copied out before use.
#[no_mangle]
pub extern "C" fn vrshim_overlay_set_transform_relative_to_device(
    handle: u64,
    device: u32,
    transform: *const sys::HmdMatrix34,
) -> bool {
    if transform.is_null() {
        return false;
    }
    let transform = unsafe { *transform };
    with_overlay(handle, move |overlay, owned| {
        overlay.set_transform_tracked_device_relative(owned, device, &transform)
    })
}

/// Points an overlay at a GL texture object owned by the host. Borrowed,
/// never freed here.
#[no_mangle]
pub extern "C" fn vrshim_overlay_set_texture(handle: u64, gl_texture: libc::size_t) -> bool {
    with_overlay(handle, |overlay, owned| overlay.set_gl_texture(owned, gl_texture))
}

#[no_mangle]
pub extern "C" fn vrshim_overlay_show(handle: u64) -> bool {
    with_overlay(handle, |overlay, owned| overlay.show(owned))
}

#[no_mangle]
pub extern "C" fn vrshim_overlay_hide(handle: u64) -> bool {
    with_overlay(handle, |overlay, owned| overlay.hide(owned))
}

/// Destroys an overlay. The handle is dead afterwards no matter what the
/// vendor answered; repeating the call yields `false`.
#[no_mangle]
pub extern "C" fn vrshim_overlay_destroy(handle: u64) -> bool {
    let mut guard = state();
    let shim = match guard.as_mut() {
        Some(shim) => shim,
        None => return false,
    };
    let owned = match shim.overlays.remove(handle) {
        Some(owned) => owned,
        None => {
            debug!("no live overlay with handle {}", handle);
            return false;
        },
    };
    match shim.session.overlay().destroy(owned) {
        Ok(()) => true,
        Err(e) => {
            debug!("destroying overlay {} failed: {}", handle, e);
            false
        },
    }
}

#[no_mangle]
pub extern "C" fn vrshim_sleep_100ns(t: i64) -> bool {
    timing::sleep_100ns(t)
}

#[no_mangle]
pub extern "C" fn vrshim_raise_timer_resolution() {
    timing::raise_timer_resolution();
}
