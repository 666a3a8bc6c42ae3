use crate::openvr_sys as sys;
use openvr::OverlayHandle;

/// Book-keeping for the overlay handles the facade owns on behalf of the
/// host. The host only holds raw `u64` values; every call resolves the raw
/// value here first, so a stale value misses cleanly.
pub(crate) struct OverlayRegistry {
    entries: Vec<Entry>,
}

struct Entry {
    key: String,
    handle: OverlayHandle,
}

impl OverlayRegistry {
    pub fn new() -> OverlayRegistry {
        OverlayRegistry {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: String, handle: OverlayHandle) {
        self.entries.push(Entry {
            key: key,
            handle: handle,
        });
    }

    pub fn get(&self, raw: sys::VROverlayHandle_t) -> Option<&OverlayHandle> {
        self.entries.iter()
            .find(|entry| entry.handle.raw() == raw)
            .map(|entry| &entry.handle)
    }

    pub fn remove(&mut self, raw: sys::VROverlayHandle_t) -> Option<OverlayHandle> {
        let index = self.entries.iter().position(|entry| entry.handle.raw() == raw)?;
        Some(self.entries.swap_remove(index).handle)
    }

    /// Empties the registry, handing every still-live overlay back with its
    /// key.
    pub fn drain(&mut self) -> Vec<(String, OverlayHandle)> {
        self.entries.drain(..)
            .map(|entry| (entry.key, entry.handle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
