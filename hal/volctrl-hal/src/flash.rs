//! Flash storage abstractions
//!
//! Provides the key/value persistence interface used for the key-binding
//! table and the user settings. Chip HALs implement it on top of their
//! flash memory; tests implement it in RAM.

/// Number of key-binding slots backed by a description record
pub const MAX_KEY_SLOTS: u8 = 13;

/// Base key byte for per-slot description records
const DESCRIPTION_BASE: u8 = 0x10;

/// Storage keys for persisted records
///
/// Each key identifies one logical record. The storage implementation
/// handles wear leveling and data integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageKey {
    /// Number of registered key bindings (single byte)
    KeysetLen,
    /// The key-binding list (binary postcard format)
    Keyset,
    /// Human-readable description for one binding slot
    KeyDescription(u8),
    /// 5V supply indicator state
    Led5v,
    /// 3.3V supply indicator state
    Led3v3,
    /// Run-timer duration in milliseconds
    IncDuration,
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        match self {
            StorageKey::KeysetLen => 0,
            StorageKey::Keyset => 1,
            StorageKey::Led5v => 2,
            StorageKey::Led3v3 => 3,
            StorageKey::IncDuration => 4,
            StorageKey::KeyDescription(slot) => DESCRIPTION_BASE + slot,
        }
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::KeysetLen),
            1 => Some(StorageKey::Keyset),
            2 => Some(StorageKey::Led5v),
            3 => Some(StorageKey::Led3v3),
            4 => Some(StorageKey::IncDuration),
            v if (DESCRIPTION_BASE..DESCRIPTION_BASE + MAX_KEY_SLOTS).contains(&v) => {
                Some(StorageKey::KeyDescription(v - DESCRIPTION_BASE))
            }
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Flash storage trait
///
/// Provides wear-leveled key-value storage for persisted records.
/// All calls block until the flash operation has completed; they are
/// only issued from the control loop, never from interrupt context.
///
/// Implementations should handle:
/// - Wear leveling across flash sectors
/// - Data integrity (CRC or similar)
/// - Atomic replacement of a single record
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError>;

    /// Write a value by key, replacing any previous record
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> bool;

    /// Erase all stored data
    ///
    /// This erases the entire record partition. Use with caution!
    fn erase_all(&mut self) -> Result<(), FlashError>;
}

impl<T: FlashStorage + ?Sized> FlashStorage for &mut T {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        (**self).read(key, buffer)
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        (**self).write(key, data)
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        (**self).exists(key)
    }

    fn erase_all(&mut self) -> Result<(), FlashError> {
        (**self).erase_all()
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys_roundtrip() {
        for key in [
            StorageKey::KeysetLen,
            StorageKey::Keyset,
            StorageKey::Led5v,
            StorageKey::Led3v3,
            StorageKey::IncDuration,
        ] {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
    }

    #[test]
    fn test_description_slots_are_distinct() {
        let first = StorageKey::KeyDescription(0).as_u8();
        let last = StorageKey::KeyDescription(MAX_KEY_SLOTS - 1).as_u8();
        assert_eq!(last - first, MAX_KEY_SLOTS - 1);
        assert_eq!(
            StorageKey::from_u8(last),
            Some(StorageKey::KeyDescription(MAX_KEY_SLOTS - 1))
        );
    }

    #[test]
    fn test_unknown_key_byte() {
        assert_eq!(StorageKey::from_u8(5), None);
        assert_eq!(StorageKey::from_u8(DESCRIPTION_BASE + MAX_KEY_SLOTS), None);
        assert_eq!(StorageKey::from_u8(0xFF), None);
    }
}
