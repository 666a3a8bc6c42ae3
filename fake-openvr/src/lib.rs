//! Stub `openvr_api` runtime for tests.
//!
//! Exports the real entry points, serves static function tables for the
//! pinned interface versions, and records what callers asked of it. Tests
//! load it through the same dynamic path a real install uses.

#![allow(non_snake_case)]

use openvr_sys as sys;

use std::{
    ffi::CStr,
    ptr,
    slice,
    sync::atomic::{
        AtomicU32,
        AtomicU64,
        AtomicUsize,
        Ordering,
    },
};

pub const LEFT_INDEX: sys::TrackedDeviceIndex_t = 3;
pub const RIGHT_INDEX: sys::TrackedDeviceIndex_t = 4;

static INIT_CALLS: AtomicU32 = AtomicU32::new(0);
static SHUTDOWN_CALLS: AtomicU32 = AtomicU32::new(0);
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);
static DESTROY_COUNT: AtomicUsize = AtomicUsize::new(0);
static DESTROYS_AT_SHUTDOWN: AtomicUsize = AtomicUsize::new(usize::MAX);

const DESTROYED_INIT: AtomicU64 = AtomicU64::new(0);
static DESTROYED: [AtomicU64; 8] = [DESTROYED_INIT; 8];

fn write_error(error: *mut sys::EVRInitError, code: sys::EVRInitError) {
    if !error.is_null() {
        unsafe { *error = code };
    }
}

// IVRSystem stubs, answering only the standing-universe, zero-prediction
// queries the wrapper pins.

extern "system" fn system_poses(
    origin: sys::ETrackingUniverseOrigin,
    secs: f32,
    poses: *mut sys::TrackedDevicePose,
    count: u32,
) {
    if origin != sys::ETrackingUniverseOrigin::STANDING || secs != 0.0 {
        return;
    }
    let dst = unsafe { slice::from_raw_parts_mut(poses, count as usize) };
    for (i, pose) in dst.iter_mut().enumerate() {
        *pose = sys::TrackedDevicePose::default();
        pose.device_to_absolute_tracking = sys::HmdMatrix34::translation(i as f32, 0.0, 0.0);
        pose.pose_is_valid = true;
        pose.device_is_connected = true;
        pose.tracking_result = sys::TRACKING_RESULT_RUNNING_OK;
    }
}

extern "system" fn system_role(role: sys::ETrackedControllerRole) -> sys::TrackedDeviceIndex_t {
    match role {
        sys::ETrackedControllerRole::LEFT_HAND => LEFT_INDEX,
        sys::ETrackedControllerRole::RIGHT_HAND => RIGHT_INDEX,
        _ => sys::TRACKED_DEVICE_INDEX_INVALID,
    }
}

fn is_controller(index: sys::TrackedDeviceIndex_t) -> bool {
    index == LEFT_INDEX || index == RIGHT_INDEX
}

extern "system" fn system_state(
    index: sys::TrackedDeviceIndex_t,
    state: *mut sys::VRControllerState,
    size: u32,
) -> bool {
    if size != sys::CONTROLLER_STATE_SIZE || !is_controller(index) {
        return false;
    }
    unsafe {
        (*state).packet_num = 7;
        (*state).button_pressed = sys::BUTTON_MASK_TRIGGER;
        (*state).axis[0].x = 0.25;
    }
    true
}

extern "system" fn system_state_with_pose(
    origin: sys::ETrackingUniverseOrigin,
    index: sys::TrackedDeviceIndex_t,
    state: *mut sys::VRControllerState,
    size: u32,
    pose: *mut sys::TrackedDevicePose,
) -> bool {
    if origin != sys::ETrackingUniverseOrigin::STANDING {
        return false;
    }
    if size != sys::CONTROLLER_STATE_SIZE || !is_controller(index) {
        return false;
    }
    unsafe {
        (*state).packet_num = 11;
        (*state).button_pressed = sys::BUTTON_MASK_GRIP;
        (*pose).pose_is_valid = true;
        (*pose).device_is_connected = true;
        (*pose).device_to_absolute_tracking = sys::HmdMatrix34::translation(0.0, 1.5, 0.0);
    }
    true
}

static SYSTEM_TABLE: sys::SystemFnTable = sys::SystemFnTable {
    _dummy_0: [0; 11],
    get_device_to_absolute_tracking_pose: system_poses,
    _dummy_1: [0; 5],
    get_tracked_device_index_for_controller_role: system_role,
    _dummy_2: [0; 15],
    get_controller_state: system_state,
    get_controller_state_with_pose: system_state_with_pose,
};

// IVROverlay stubs: fresh handles out of a counter, destroys recorded in
// order, everything else accepted.

extern "system" fn overlay_create(
    _key: *const libc::c_char,
    _name: *const libc::c_char,
    handle: *mut sys::VROverlayHandle_t,
) -> sys::EVROverlayError {
    if handle.is_null() {
        return sys::EVROverlayError::INVALID_PARAMETER;
    }
    unsafe { *handle = NEXT_HANDLE.fetch_add(1, Ordering::SeqCst) };
    sys::EVROverlayError::NONE
}

extern "system" fn overlay_destroy(handle: sys::VROverlayHandle_t) -> sys::EVROverlayError {
    let i = DESTROY_COUNT.fetch_add(1, Ordering::SeqCst);
    if i < DESTROYED.len() {
        DESTROYED[i].store(handle, Ordering::SeqCst);
    }
    sys::EVROverlayError::NONE
}

extern "system" fn ok_flag(
    _handle: sys::VROverlayHandle_t,
    _flag: sys::VROverlayFlags,
    _enabled: bool,
) -> sys::EVROverlayError {
    sys::EVROverlayError::NONE
}

extern "system" fn ok_width(
    _handle: sys::VROverlayHandle_t,
    _width: f32,
) -> sys::EVROverlayError {
    sys::EVROverlayError::NONE
}

extern "system" fn ok_transform(
    _handle: sys::VROverlayHandle_t,
    _device: sys::TrackedDeviceIndex_t,
    _transform: *const sys::HmdMatrix34,
) -> sys::EVROverlayError {
    sys::EVROverlayError::NONE
}

extern "system" fn ok_texture(
    _handle: sys::VROverlayHandle_t,
    _texture: *const sys::Texture,
) -> sys::EVROverlayError {
    sys::EVROverlayError::NONE
}

extern "system" fn ok_visibility(_handle: sys::VROverlayHandle_t) -> sys::EVROverlayError {
    sys::EVROverlayError::NONE
}

static OVERLAY_TABLE: sys::OverlayFnTable = sys::OverlayFnTable {
    _dummy_0: [0; 1],
    create_overlay: overlay_create,
    destroy_overlay: overlay_destroy,
    _dummy_1: [0; 7],
    set_overlay_flag: ok_flag,
    _dummy_2: [0; 10],
    set_overlay_width_in_meters: ok_width,
    _dummy_3: [0; 12],
    set_overlay_transform_tracked_device_relative: ok_transform,
    _dummy_4: [0; 8],
    show_overlay: ok_visibility,
    hide_overlay: ok_visibility,
    _dummy_5: [0; 15],
    set_overlay_texture: ok_texture,
};

// openvr_api entry points

#[no_mangle]
pub extern "C" fn VR_InitInternal2(
    error: *mut sys::EVRInitError,
    application_type: sys::EVRApplicationType,
    _startup_info: *const libc::c_char,
) -> u32 {
    INIT_CALLS.fetch_add(1, Ordering::SeqCst);
    if application_type != sys::EVRApplicationType::OVERLAY {
        write_error(error, sys::EVRInitError::INIT_INTERNAL);
        return 0;
    }
    write_error(error, sys::EVRInitError::NONE);
    1
}

#[no_mangle]
pub extern "C" fn VR_ShutdownInternal() {
    DESTROYS_AT_SHUTDOWN.store(DESTROY_COUNT.load(Ordering::SeqCst), Ordering::SeqCst);
    SHUTDOWN_CALLS.fetch_add(1, Ordering::SeqCst);
}

#[no_mangle]
pub extern "C" fn VR_GetGenericInterface(
    interface_version: *const libc::c_char,
    error: *mut sys::EVRInitError,
) -> *const libc::c_void {
    if interface_version.is_null() {
        write_error(error, sys::EVRInitError::INIT_INTERFACE_NOT_FOUND);
        return ptr::null();
    }
    let version = unsafe { CStr::from_ptr(interface_version) };
    let table: *const libc::c_void = if version.to_bytes_with_nul() == sys::IVRSYSTEM_VERSION {
        &SYSTEM_TABLE as *const _ as *const _
    } else if version.to_bytes_with_nul() == sys::IVROVERLAY_VERSION {
        &OVERLAY_TABLE as *const _ as *const _
    } else {
        write_error(error, sys::EVRInitError::INIT_INTERFACE_NOT_FOUND);
        return ptr::null();
    };
    write_error(error, sys::EVRInitError::NONE);
    table
}

// Recorder surface. State has to be read back through the loaded library,
// where the counters the facade touched live.

#[no_mangle]
pub extern "C" fn fake_openvr_init_calls() -> u32 {
    INIT_CALLS.load(Ordering::SeqCst)
}

#[no_mangle]
pub extern "C" fn fake_openvr_shutdown_calls() -> u32 {
    SHUTDOWN_CALLS.load(Ordering::SeqCst)
}

#[no_mangle]
pub extern "C" fn fake_openvr_destroy_count() -> u32 {
    DESTROY_COUNT.load(Ordering::SeqCst) as u32
}

#[no_mangle]
pub extern "C" fn fake_openvr_destroyed(i: u32) -> u64 {
    DESTROYED
        .get(i as usize)
        .map(|slot| slot.load(Ordering::SeqCst))
        .unwrap_or(0)
}

#[no_mangle]
pub extern "C" fn fake_openvr_destroys_at_last_shutdown() -> u32 {
    DESTROYS_AT_SHUTDOWN.load(Ordering::SeqCst) as u32
}
