//! Session slot keys.

/// Keys of the local persistence slots.
pub mod keys {
    /// Slot holding the serialized current user.
    pub const CURRENT_USER: &str = "hos_user";
}
