//! `FnTable:` interface layouts.
//!
//! `VR_GetGenericInterface` hands back a C array of function pointers when
//! asked for a `FnTable:`-prefixed interface version. Only the slots this
//! crate calls are typed; everything between them is pinned with filler so
//! the named slots land at the right offsets. The layouts below are for the
//! interface versions named by [`IVRSYSTEM_VERSION`] and
//! [`IVROVERLAY_VERSION`] and must not be used with any other version.

use crate::types::*;

/// Interface version passed to `VR_GetGenericInterface` for [`SystemFnTable`].
pub const IVRSYSTEM_VERSION: &[u8] = b"FnTable:IVRSystem_022\0";
/// Interface version passed to `VR_GetGenericInterface` for [`OverlayFnTable`].
pub const IVROVERLAY_VERSION: &[u8] = b"FnTable:IVROverlay_026\0";

pub const SYSTEM_FN_TABLE_SLOTS: usize = 35;
pub const OVERLAY_FN_TABLE_SLOTS: usize = 61;

#[repr(C)]
pub struct SystemFnTable {
    pub _dummy_0: [usize; 11],
    pub get_device_to_absolute_tracking_pose:
        extern "system" fn(ETrackingUniverseOrigin, f32, *mut TrackedDevicePose, u32),
    pub _dummy_1: [usize; 5],
    pub get_tracked_device_index_for_controller_role:
        extern "system" fn(ETrackedControllerRole) -> TrackedDeviceIndex_t,
    pub _dummy_2: [usize; 15],
    pub get_controller_state:
        extern "system" fn(TrackedDeviceIndex_t, *mut VRControllerState, u32) -> bool,
    pub get_controller_state_with_pose: extern "system" fn(
        ETrackingUniverseOrigin,
        TrackedDeviceIndex_t,
        *mut VRControllerState,
        u32,
        *mut TrackedDevicePose,
    ) -> bool,
}

#[repr(C)]
pub struct OverlayFnTable {
    pub _dummy_0: [usize; 1],
    pub create_overlay: extern "system" fn(
        *const libc::c_char,
        *const libc::c_char,
        *mut VROverlayHandle_t,
    ) -> EVROverlayError,
    pub destroy_overlay: extern "system" fn(VROverlayHandle_t) -> EVROverlayError,
    pub _dummy_1: [usize; 7],
    pub set_overlay_flag:
        extern "system" fn(VROverlayHandle_t, VROverlayFlags, bool) -> EVROverlayError,
    pub _dummy_2: [usize; 10],
    pub set_overlay_width_in_meters:
        extern "system" fn(VROverlayHandle_t, f32) -> EVROverlayError,
    pub _dummy_3: [usize; 12],
    pub set_overlay_transform_tracked_device_relative: extern "system" fn(
        VROverlayHandle_t,
        TrackedDeviceIndex_t,
        *const HmdMatrix34,
    ) -> EVROverlayError,
    pub _dummy_4: [usize; 8],
    pub show_overlay: extern "system" fn(VROverlayHandle_t) -> EVROverlayError,
    pub hide_overlay: extern "system" fn(VROverlayHandle_t) -> EVROverlayError,
    pub _dummy_5: [usize; 15],
    pub set_overlay_texture:
        extern "system" fn(VROverlayHandle_t, *const Texture) -> EVROverlayError,
}
