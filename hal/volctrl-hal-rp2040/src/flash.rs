//! Flash storage driver for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage in the
//! last 64KB of flash. The flash is driven in blocking mode and adapted
//! to sequential-storage's async interface with `BlockingAsync`; each
//! operation runs to completion with `block_on`, so settings and key
//! bindings are committed before the control loop continues.
//!
//! Implements the `FlashStorage` trait from `volctrl-hal`.

use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_futures::block_on;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

// Re-export shared types from volctrl-hal
pub use volctrl_hal::flash::{FlashError, StorageKey};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024; // 64KB for settings and keys
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the config partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for one record; the encoded keyset is the largest
const DATA_BUFFER_SIZE: usize = 1024;

type ConfigFlash<'d> = BlockingAsync<Flash<'d, FLASH, Blocking, FLASH_SIZE>>;

/// RP2040 Flash storage implementation
pub struct Rp2040FlashStorage<'d> {
    flash: ConfigFlash<'d>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Create a new flash storage instance
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self {
            flash: BlockingAsync::new(Flash::new_blocking(flash)),
        }
    }
}

impl<'d> volctrl_hal::FlashStorage for Rp2040FlashStorage<'d> {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        let result = block_on(map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        ));

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(_) => Err(FlashError::Storage),
        }
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        block_on(map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        ))
        .map_err(|_| FlashError::Storage)
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        matches!(
            block_on(map::fetch_item::<StorageKey, &[u8], _>(
                &mut self.flash,
                CONFIG_RANGE,
                &mut NoCache::new(),
                &mut data_buffer,
                &key,
            )),
            Ok(Some(_))
        )
    }

    fn erase_all(&mut self) -> Result<(), FlashError> {
        block_on(self.flash.erase(CONFIG_RANGE.start, CONFIG_RANGE.end))
            .map_err(|_| FlashError::Flash)
    }
}
