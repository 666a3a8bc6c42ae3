//! Drives the C surface against the stub vendor runtime, end to end: the
//! dynamic loader, a live session, the overlay lifecycle, and the shutdown
//! sweep of leaked overlays.

use libloading::{
    library_filename,
    Library,
};
use vrshim::ffi::*;
use vrshim::openvr_sys as sys;

use std::{
    env,
    ffi::CString,
};

// The stub's counters live in the dynamically loaded module, the one the
// facade talks to. They have to be read back through a handle to that same
// module; the rlib linked into this binary is a separate instantiation.

fn counter(vendor: &Library, symbol: &[u8]) -> u32 {
    let f = unsafe { vendor.get::<unsafe extern "C" fn() -> u32>(symbol) }.unwrap();
    unsafe { f() }
}

fn destroyed(vendor: &Library, i: u32) -> u64 {
    let f = unsafe { vendor.get::<unsafe extern "C" fn(u32) -> u64>(b"fake_openvr_destroyed\0") }
        .unwrap();
    unsafe { f(i) }
}

fn key(s: &str) -> CString {
    CString::new(s).unwrap()
}

// One test. The session is process-global state, so the phases have to run
// in one sequence rather than as parallel test fns.
#[test]
fn live_session_lifecycle_and_shutdown_sweep() {
    env::set_var("VRSHIM_OPENVR_RUNTIME", library_filename("fake_openvr"));
    let vendor = unsafe { Library::new(library_filename("fake_openvr")) }.unwrap();

    assert_eq!(counter(&vendor, b"fake_openvr_init_calls\0"), 0);
    assert_eq!(vrshim_init(), 0);
    assert_eq!(counter(&vendor, b"fake_openvr_init_calls\0"), 1);

    // Initializing again is a success no-op, nothing reaches the vendor.
    assert_eq!(vrshim_init(), 0);
    assert_eq!(counter(&vendor, b"fake_openvr_init_calls\0"), 1);

    let mut poses = [sys::TrackedDevicePose::default(); 4];
    vrshim_get_poses(poses.as_mut_ptr(), poses.len() as u32);
    for (i, pose) in poses.iter().enumerate() {
        assert!(pose.pose_is_valid);
        assert!(pose.device_is_connected);
        assert_eq!(pose.device_to_absolute_tracking.translation_part()[0], i as f32);
    }

    assert_eq!(vrshim_device_index_for_role(1), fake_openvr::LEFT_INDEX);
    assert_eq!(vrshim_device_index_for_role(2), fake_openvr::RIGHT_INDEX);
    assert_eq!(vrshim_device_index_for_role(3), sys::TRACKED_DEVICE_INDEX_INVALID);

    let mut controller_state = sys::VRControllerState::default();
    assert!(vrshim_get_controller_state(
        fake_openvr::LEFT_INDEX,
        &mut controller_state as *mut _,
    ));
    assert_eq!(controller_state.packet_num, 7);
    assert_eq!(controller_state.button_pressed, sys::BUTTON_MASK_TRIGGER);
    assert_eq!(controller_state.axis[0].x, 0.25);

    let mut pose = sys::TrackedDevicePose::default();
    assert!(vrshim_get_controller_state_with_pose(
        fake_openvr::RIGHT_INDEX,
        &mut controller_state as *mut _,
        &mut pose as *mut _,
    ));
    assert_eq!(controller_state.packet_num, 11);
    assert_eq!(controller_state.button_pressed, sys::BUTTON_MASK_GRIP);
    assert!(pose.pose_is_valid);
    assert_eq!(pose.device_to_absolute_tracking.translation_part()[1], 1.5);

    assert!(!vrshim_get_controller_state_with_pose(
        255,
        &mut controller_state as *mut _,
        &mut pose as *mut _,
    ));

    let key_a = key("vrshim.live.a");
    let key_b = key("vrshim.live.b");
    let mut a = 0u64;
    let mut b = 0u64;
    assert_eq!(vrshim_overlay_create(key_a.as_ptr(), key_a.as_ptr(), &mut a as *mut _), 0);
    assert_eq!(vrshim_overlay_create(key_b.as_ptr(), key_b.as_ptr(), &mut b as *mut _), 0);
    assert_ne!(a, sys::OVERLAY_HANDLE_INVALID);
    assert_ne!(b, sys::OVERLAY_HANDLE_INVALID);
    assert_ne!(a, b);

    assert!(vrshim_overlay_set_flag(a, sys::VROverlayFlags::IS_PREMULTIPLIED.0, true));
    assert!(vrshim_overlay_set_width_meters(a, 1.25));
    assert!(!vrshim_overlay_set_width_meters(a, -1.0));
    let anchor = sys::HmdMatrix34::translation(0.0, 0.0, -2.0);
    assert!(vrshim_overlay_set_transform_relative_to_device(a, 0, &anchor as *const _));
    assert!(vrshim_overlay_set_texture(a, 7));
    assert!(vrshim_overlay_show(a));
    assert!(vrshim_overlay_hide(a));

    assert!(vrshim_overlay_destroy(a));
    assert_eq!(counter(&vendor, b"fake_openvr_destroy_count\0"), 1);
    assert_eq!(destroyed(&vendor, 0), a);

    // The handle died with the overlay; repeating reaches no vendor call.
    assert!(!vrshim_overlay_destroy(a));
    assert_eq!(counter(&vendor, b"fake_openvr_destroy_count\0"), 1);

    // b is still live here. Shutdown destroys it before the session goes.
    vrshim_shutdown();
    assert_eq!(counter(&vendor, b"fake_openvr_destroy_count\0"), 2);
    assert_eq!(destroyed(&vendor, 1), b);
    assert_eq!(counter(&vendor, b"fake_openvr_shutdown_calls\0"), 1);
    assert_eq!(counter(&vendor, b"fake_openvr_destroys_at_last_shutdown\0"), 2);

    // Dead session: surface calls fail, pose queries zero their output.
    assert!(!vrshim_overlay_show(b));
    poses[0].pose_is_valid = true;
    vrshim_get_poses(poses.as_mut_ptr(), 1);
    assert!(!poses[0].pose_is_valid);

    // Shutting down again is a no-op all the way down.
    vrshim_shutdown();
    assert_eq!(counter(&vendor, b"fake_openvr_shutdown_calls\0"), 1);

    // The init slot was released; a fresh session comes up.
    assert_eq!(vrshim_init(), 0);
    assert_eq!(counter(&vendor, b"fake_openvr_init_calls\0"), 2);
    vrshim_shutdown();
    assert_eq!(counter(&vendor, b"fake_openvr_shutdown_calls\0"), 2);
}
