//! Selected mesh input and the display handle the scene reads it through.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use aero_client::MeshUpload;
use aero_core::HandleId;

/// Ephemeral reference to mesh bytes for the display path.
///
/// Clones share one slot. Once [`invalidate`](Self::invalidate) runs, every
/// clone stops handing out bytes; readers that acquired earlier keep their own
/// `Arc` until they finish.
#[derive(Clone)]
pub struct DisplayHandle {
    id: HandleId,
    slot: Arc<Mutex<Option<Arc<[u8]>>>>,
}

impl DisplayHandle {
    pub(crate) fn create(id: HandleId, bytes: Arc<[u8]>) -> Self {
        Self {
            id,
            slot: Arc::new(Mutex::new(Some(bytes))),
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Bytes behind the handle, or `None` once released.
    pub fn acquire(&self) -> Option<Arc<[u8]>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_live(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn invalidate(&self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayHandle")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}

/// The mesh file the user picked.
#[derive(Debug, Clone)]
pub struct InputAsset {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub handle: DisplayHandle,
}

impl InputAsset {
    pub fn upload(&self) -> MeshUpload {
        MeshUpload {
            file_name: self.name.clone(),
            bytes: Arc::clone(&self.bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_outlives_invalidation() {
        let handle = DisplayHandle::create(HandleId::FIRST, Arc::from(&b"mesh"[..]));
        let reader = handle.clone();

        let held = reader.acquire().expect("live handle");
        handle.invalidate();

        assert!(!reader.is_live());
        assert!(reader.acquire().is_none());
        assert_eq!(&*held, b"mesh");
    }
}
