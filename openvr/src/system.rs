use openvr_sys as sys;

/// Tracking queries against `IVRSystem`. Every pose this type hands out is
/// in the standing tracking frame, predicted for "now".
pub struct System {
    table: *const sys::SystemFnTable,
}

impl System {
    /// Adopts a vendor function table, which must stay valid for the
    /// lifetime of the returned value.
    pub unsafe fn from_table(table: *const sys::SystemFnTable) -> System {
        System {
            table: table,
        }
    }

    #[inline(always)]
    fn table(&self) -> &sys::SystemFnTable {
        unsafe { &*self.table }
    }

    /// Fills one entry per device index starting at 0. There is no
    /// call-level status; `pose_is_valid` per entry is the only signal.
    pub fn device_poses(&self, poses: &mut [sys::TrackedDevicePose]) {
        (self.table().get_device_to_absolute_tracking_pose)(
            sys::ETrackingUniverseOrigin::STANDING,
            0.0,
            poses.as_mut_ptr(),
            poses.len() as u32,
        );
    }

    /// Device index currently bound to `role`, or `None` while nothing
    /// holds it. Bindings move at runtime, so resolve again each frame.
    pub fn device_index_for_role(
        &self,
        role: sys::ETrackedControllerRole,
    ) -> Option<sys::TrackedDeviceIndex_t> {
        let index = (self.table().get_tracked_device_index_for_controller_role)(role);
        if index == sys::TRACKED_DEVICE_INDEX_INVALID {
            None
        } else {
            Some(index)
        }
    }

    /// Latest input state of the controller at `index`; `None` covers every
    /// failure.
    pub fn controller_state(
        &self,
        index: sys::TrackedDeviceIndex_t,
    ) -> Option<sys::VRControllerState> {
        let mut state = sys::VRControllerState::default();
        let ok = (self.table().get_controller_state)(
            index,
            &mut state as *mut _,
            sys::CONTROLLER_STATE_SIZE,
        );
        if ok {
            Some(state)
        } else {
            None
        }
    }

    /// Input state and the pose it was sampled with, from a single vendor
    /// call so the two cannot disagree.
    pub fn controller_state_with_pose(
        &self,
        index: sys::TrackedDeviceIndex_t,
    ) -> Option<(sys::VRControllerState, sys::TrackedDevicePose)> {
        let mut state = sys::VRControllerState::default();
        let mut pose = sys::TrackedDevicePose::default();
        let ok = (self.table().get_controller_state_with_pose)(
            sys::ETrackingUniverseOrigin::STANDING,
            index,
            &mut state as *mut _,
            sys::CONTROLLER_STATE_SIZE,
            &mut pose as *mut _,
        );
        if ok {
            Some((state, pose))
        } else {
            None
        }
    }
}
