//! Persistent key-binding store
//!
//! Bindings live in a bounded in-memory list mirrored to three kinds of
//! flash records:
//!
//! - `Keyset`: the whole binding list (postcard)
//! - `KeyDescription(slot)`: the label of the binding in that slot
//! - `KeysetLen`: the binding count, written last as the commit marker
//!
//! At boot the count record and the list are reconciled so that an
//! interrupted update never exposes more bindings than were committed.

use core::fmt;

use heapless::{String, Vec};
use volctrl_hal::{FlashError, FlashStorage, StorageKey, MAX_KEY_SLOTS};

use super::binding::{ArgString, Description, KeyBinding, KeyCode};
use super::protocol::protocol_name;
use crate::command::{check_arity, resolve, Arg, ArityPolicy, CommandId};

/// Maximum number of bindings
pub const KEYSET_CAPACITY: usize = MAX_KEY_SLOTS as usize;

/// Serialized keyset buffer size
const KEYSET_BUF_SIZE: usize = 640;

/// Column header printed above [`DisplayRow`]s
pub const SHOWREM_HEADER: &str = " IDX | PROTOCOL | IR_ADDR | IR_CMD  | CMD          | DESCRIPTION";

/// Errors from loading the store at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Flash operation failed
    Flash(FlashError),
    /// Keyset record could not be decoded
    Corrupted,
}

impl From<FlashError> for StoreError {
    fn from(e: FlashError) -> Self {
        StoreError::Flash(e)
    }
}

/// Errors from registering a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegError {
    /// All binding slots are used
    StoreFull,
    /// The command to bind is not in the registry
    UnknownCommand,
    /// Argument count differs from the bound command's arity
    ArityMismatch,
    /// Description does not fit a description record
    DescriptionTooLong,
    /// No key was received before the deadline
    Timeout,
    /// Persisting the binding failed
    Storage(FlashError),
}

impl RegError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            RegError::StoreFull => "The maximum number of keys to register is reached!",
            RegError::UnknownCommand => "regrem: You tried to register an unknown command",
            RegError::ArityMismatch => "regrem: Invalid number of arguments for cmd to register",
            RegError::DescriptionTooLong => "regrem: Description too long",
            RegError::Timeout => "Timeout!",
            RegError::Storage(_) => "ERROR: Key could not be written to flash!",
        }
    }
}

impl From<FlashError> for RegError {
    fn from(e: FlashError) -> Self {
        RegError::Storage(e)
    }
}

/// Errors from deleting a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DelError {
    /// No bindings are stored
    EmptyStore,
    /// Index is not below the binding count
    IndexOutOfRange,
    /// Persisting the deletion failed
    Storage(FlashError),
}

impl DelError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            DelError::EmptyStore => "No remote key registered. Nothing to delete!",
            DelError::IndexOutOfRange => "Index out of range!",
            DelError::Storage(_) => "ERROR: Deletion could not be written to flash!",
        }
    }
}

impl From<FlashError> for DelError {
    fn from(e: FlashError) -> Self {
        DelError::Storage(e)
    }
}

/// A validated registration waiting for its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    /// Label for the new binding
    pub description: Description,
    /// Command to bind
    pub command: CommandId,
    /// Arguments to bind, space-prefixed
    pub args: ArgString,
}

/// Bounded list of key bindings with a flash mirror
#[derive(Debug, Clone, Default)]
pub struct KeyBindingStore {
    bindings: Vec<KeyBinding, KEYSET_CAPACITY>,
}

impl KeyBindingStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Restore the store from flash
    ///
    /// Missing records mean a fresh device and yield an empty store. If
    /// the count record and the list disagree, the list is truncated to
    /// the smaller of the two and the count record rewritten.
    pub fn load<S: FlashStorage>(storage: &mut S) -> Result<Self, StoreError> {
        let mut len_buf = [0u8; 1];
        let committed = match storage.read(StorageKey::KeysetLen, &mut len_buf) {
            Ok(1) => len_buf[0] as usize,
            Ok(_) => return Err(StoreError::Corrupted),
            Err(FlashError::NotFound) => 0,
            Err(e) => return Err(e.into()),
        };

        let mut buf = [0u8; KEYSET_BUF_SIZE];
        let mut bindings: Vec<KeyBinding, KEYSET_CAPACITY> =
            match storage.read(StorageKey::Keyset, &mut buf) {
                Ok(len) => {
                    postcard::from_bytes(&buf[..len]).map_err(|_| StoreError::Corrupted)?
                }
                Err(FlashError::NotFound) => Vec::new(),
                Err(e) => return Err(e.into()),
            };

        if committed != bindings.len() {
            let len = committed.min(bindings.len());
            bindings.truncate(len);
            let store = Self { bindings };
            store.persist_list(storage)?;
            return Ok(store);
        }

        Ok(Self { bindings })
    }

    /// Number of stored bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no bindings are stored
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Check if every slot is used
    pub fn is_full(&self) -> bool {
        self.bindings.is_full()
    }

    /// Binding at `index`
    pub fn get(&self, index: usize) -> Option<&KeyBinding> {
        self.bindings.get(index)
    }

    /// Find the binding for a key
    pub fn lookup_by_ir(&self, code: &KeyCode) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.code == *code)
    }

    /// Validate a registration request
    ///
    /// `args` are the arguments of the command being bound; their count
    /// must match its arity exactly.
    pub fn prepare(
        &self,
        description: &str,
        command_word: &str,
        args: &[Arg],
    ) -> Result<PendingRegistration, RegError> {
        if self.is_full() {
            return Err(RegError::StoreFull);
        }

        let command = resolve(command_word).ok_or(RegError::UnknownCommand)?;
        check_arity(command, args.len(), ArityPolicy::Exactly)
            .map_err(|_| RegError::ArityMismatch)?;

        // At most MAX_ARGS arguments of MAX_ARG_LEN each, which always fit
        let mut bound = ArgString::new();
        for arg in args {
            let _ = bound.push(' ');
            let _ = bound.push_str(arg);
        }

        let mut label = Description::new();
        label
            .push_str(description)
            .map_err(|_| RegError::DescriptionTooLong)?;

        Ok(PendingRegistration {
            description: label,
            command,
            args: bound,
        })
    }

    /// Append a binding for `code` and persist it
    ///
    /// Writes the description, the full list and finally the count. If
    /// any write fails the in-memory list is rolled back.
    ///
    /// Returns the slot index of the new binding.
    pub fn commit<S: FlashStorage>(
        &mut self,
        pending: PendingRegistration,
        code: KeyCode,
        storage: &mut S,
    ) -> Result<usize, RegError> {
        let slot = self.bindings.len();
        self.bindings
            .push(KeyBinding {
                code,
                command: pending.command,
                args: pending.args,
            })
            .map_err(|_| RegError::StoreFull)?;

        let result = storage
            .write(
                StorageKey::KeyDescription(slot as u8),
                pending.description.as_bytes(),
            )
            .and_then(|_| self.persist_list(storage));

        if let Err(e) = result {
            self.bindings.pop();
            return Err(e.into());
        }
        Ok(slot)
    }

    /// Delete the binding at `index`, shifting later bindings down
    ///
    /// The list and count are written first; descriptions are shifted
    /// only once they are committed. If the list cannot be written the
    /// binding is restored and flash is left untouched.
    pub fn delete<S: FlashStorage>(&mut self, index: usize, storage: &mut S) -> Result<(), DelError> {
        if self.is_empty() {
            return Err(DelError::EmptyStore);
        }
        if index >= self.len() {
            return Err(DelError::IndexOutOfRange);
        }

        let removed = self.bindings.remove(index);
        if let Err(e) = self.persist_list(storage) {
            let _ = self.bindings.insert(index, removed);
            return Err(e.into());
        }

        for slot in index..self.len() {
            let description = read_description(storage, slot + 1);
            storage.write(
                StorageKey::KeyDescription(slot as u8),
                description.as_bytes(),
            )?;
        }
        Ok(())
    }

    /// Lazy listing of all bindings with their descriptions
    ///
    /// Each call starts a fresh pass over the current bindings.
    pub fn rows<'a, S: FlashStorage>(&'a self, storage: &'a mut S) -> Rows<'a, S> {
        Rows {
            store: self,
            storage,
            next: 0,
        }
    }

    fn persist_list<S: FlashStorage>(&self, storage: &mut S) -> Result<(), FlashError> {
        let mut buf = [0u8; KEYSET_BUF_SIZE];
        let encoded =
            postcard::to_slice(&self.bindings, &mut buf).map_err(|_| FlashError::BufferTooSmall)?;
        storage.write(StorageKey::Keyset, encoded)?;
        storage.write(StorageKey::KeysetLen, &[self.bindings.len() as u8])
    }
}

fn read_description<S: FlashStorage>(storage: &mut S, slot: usize) -> Description {
    let mut buf = [0u8; 8];
    let mut description = Description::new();
    if let Ok(len) = storage.read(StorageKey::KeyDescription(slot as u8), &mut buf) {
        if let Ok(text) = core::str::from_utf8(&buf[..len]) {
            let _ = description.push_str(text);
        }
    }
    description
}

/// Iterator over [`DisplayRow`]s
pub struct Rows<'a, S> {
    store: &'a KeyBindingStore,
    storage: &'a mut S,
    next: usize,
}

impl<'a, S: FlashStorage> Iterator for Rows<'a, S> {
    type Item = DisplayRow;

    fn next(&mut self) -> Option<DisplayRow> {
        let index = self.next;
        let binding = self.store.get(index)?;
        self.next += 1;
        Some(DisplayRow {
            index,
            code: binding.code,
            command: binding.command,
            args: binding.args.clone(),
            description: read_description(self.storage, index),
        })
    }
}

/// One line of the `showrem` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// Slot index
    pub index: usize,
    /// Bound key
    pub code: KeyCode,
    /// Bound command
    pub command: CommandId,
    /// Bound arguments, space-prefixed
    pub args: ArgString,
    /// Label read back from flash
    pub description: Description,
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut invocation: String<40> = String::new();
        let _ = invocation.push_str(self.command.name());
        let _ = invocation.push_str(&self.args);
        write!(
            f,
            " {:<4}| {:<9}| 0x{:04X}  | 0x{:04X}  | {:<13}| {}",
            self.index,
            protocol_name(self.code.protocol),
            self.code.address,
            self.code.command,
            invocation.as_str(),
            self.description.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use crate::testing::MemoryStorage;

    fn args(line: &str) -> Vec<Arg, 3> {
        parse(line).unwrap().args
    }

    fn register(
        store: &mut KeyBindingStore,
        storage: &mut MemoryStorage,
        desc: &str,
        word: &str,
        bound: &str,
        command: u16,
    ) -> usize {
        let bound = args(&std::format!("volup {}", bound));
        let pending = store.prepare(desc, word, &bound).unwrap();
        store
            .commit(pending, KeyCode::new(2, 0x00FF, command), storage)
            .unwrap()
    }

    #[test]
    fn test_prepare_store_full() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        for i in 0..KEYSET_CAPACITY {
            register(&mut store, &mut storage, "k", "volup", "", i as u16);
        }
        assert!(store.is_full());
        assert_eq!(store.prepare("k", "volup", &[]), Err(RegError::StoreFull));
    }

    #[test]
    fn test_prepare_unknown_command() {
        let store = KeyBindingStore::new();
        assert_eq!(store.prepare("k", "jump", &[]), Err(RegError::UnknownCommand));
    }

    #[test]
    fn test_prepare_requires_exact_arity() {
        let store = KeyBindingStore::new();
        assert_eq!(store.prepare("k", "setvol", &[]), Err(RegError::ArityMismatch));
        assert_eq!(
            store.prepare("k", "volup", &args("volup 5")),
            Err(RegError::ArityMismatch)
        );
        let pending = store.prepare("k", "setvol", &args("volup 40")).unwrap();
        assert_eq!(pending.command, CommandId::SetVol);
        assert_eq!(pending.args.as_str(), " 40");
    }

    #[test]
    fn test_commit_writes_description_list_then_length() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        let slot = register(&mut store, &mut storage, "mute", "setvol", "0", 0x10);

        assert_eq!(slot, 0);
        assert_eq!(
            storage.log,
            [
                StorageKey::KeyDescription(0),
                StorageKey::Keyset,
                StorageKey::KeysetLen
            ]
        );
        assert_eq!(storage.raw(StorageKey::KeysetLen), Some(&[1u8][..]));
        assert_eq!(storage.raw(StorageKey::KeyDescription(0)), Some(&b"mute"[..]));
    }

    #[test]
    fn test_commit_rolls_back_on_write_failure() {
        let mut storage = MemoryStorage::new();
        storage.fail_on = Some(StorageKey::Keyset);
        let mut store = KeyBindingStore::new();
        let pending = store.prepare("k", "volup", &[]).unwrap();
        let result = store.commit(pending, KeyCode::new(2, 1, 1), &mut storage);
        assert_eq!(result, Err(RegError::Storage(FlashError::Storage)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_register_then_delete_restores_length() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "a", "volup", "", 1);
        let before = store.len();

        let slot = register(&mut store, &mut storage, "b", "voldown", "", 2);
        store.delete(slot, &mut storage).unwrap();

        assert_eq!(store.len(), before);
        assert!(store.lookup_by_ir(&KeyCode::new(2, 0x00FF, 2)).is_none());
        assert!(store.lookup_by_ir(&KeyCode::new(2, 0x00FF, 1)).is_some());
    }

    #[test]
    fn test_delete_first_shifts_entries_and_descriptions() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "zero", "volup", "", 0);
        register(&mut store, &mut storage, "one", "voldown", "", 1);
        register(&mut store, &mut storage, "two", "setvol", "20", 2);

        store.delete(0, &mut storage).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().command, CommandId::VolDown);
        assert_eq!(store.get(1).unwrap().command, CommandId::SetVol);
        assert_eq!(storage.raw(StorageKey::KeysetLen), Some(&[2u8][..]));

        let rows: std::vec::Vec<DisplayRow> = store.rows(&mut storage).collect();
        assert_eq!(rows[0].description.as_str(), "one");
        assert_eq!(rows[1].description.as_str(), "two");
    }

    #[test]
    fn test_delete_failed_write_keeps_store_and_labels() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "zero", "volup", "", 0);
        register(&mut store, &mut storage, "one", "voldown", "", 1);
        register(&mut store, &mut storage, "two", "setvol", "20", 2);

        storage.fail_on = Some(StorageKey::Keyset);
        assert_eq!(
            store.delete(0, &mut storage),
            Err(DelError::Storage(FlashError::Storage))
        );
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0).unwrap().command, CommandId::VolUp);

        storage.fail_on = None;
        let reloaded = KeyBindingStore::load(&mut storage).unwrap();
        assert_eq!(reloaded.len(), 3);
        let labels: std::vec::Vec<Description> = reloaded
            .rows(&mut storage)
            .map(|row| row.description)
            .collect();
        assert_eq!(labels, ["zero", "one", "two"]);
    }

    #[test]
    fn test_delete_writes_list_before_descriptions() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "zero", "volup", "", 0);
        register(&mut store, &mut storage, "one", "voldown", "", 1);
        storage.log.clear();

        store.delete(0, &mut storage).unwrap();
        assert_eq!(
            storage.log,
            [
                StorageKey::Keyset,
                StorageKey::KeysetLen,
                StorageKey::KeyDescription(0)
            ]
        );
    }

    #[test]
    fn test_prepare_description_too_long() {
        let store = KeyBindingStore::new();
        assert_eq!(
            store.prepare("muchtoolong", "volup", &[]),
            Err(RegError::DescriptionTooLong)
        );
    }

    #[test]
    fn test_delete_errors() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        assert_eq!(store.delete(0, &mut storage), Err(DelError::EmptyStore));

        register(&mut store, &mut storage, "a", "volup", "", 1);
        assert_eq!(store.delete(1, &mut storage), Err(DelError::IndexOutOfRange));
        assert_eq!(store.delete(7, &mut storage), Err(DelError::IndexOutOfRange));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_roundtrip() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "up", "volup", "", 1);
        register(&mut store, &mut storage, "half", "setvol", "50", 2);

        let loaded = KeyBindingStore::load(&mut storage).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(1), store.get(1));
    }

    #[test]
    fn test_load_fresh_device() {
        let mut storage = MemoryStorage::new();
        let loaded = KeyBindingStore::load(&mut storage).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_truncates_uncommitted_entry() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "up", "volup", "", 1);
        register(&mut store, &mut storage, "down", "voldown", "", 2);
        // Simulate a crash before the count record of the second entry
        storage.write(StorageKey::KeysetLen, &[1]).unwrap();

        let loaded = KeyBindingStore::load(&mut storage).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(storage.raw(StorageKey::KeysetLen), Some(&[1u8][..]));
    }

    #[test]
    fn test_load_corrupted_keyset() {
        let mut storage = MemoryStorage::new();
        storage.write(StorageKey::KeysetLen, &[1]).unwrap();
        storage.write(StorageKey::Keyset, &[0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(
            KeyBindingStore::load(&mut storage).unwrap_err(),
            StoreError::Corrupted
        );
    }

    #[test]
    fn test_display_row_format() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "half", "setvol", "50", 0x1A);

        let row = store.rows(&mut storage).next().unwrap();
        assert_eq!(
            std::format!("{}", row),
            " 0   | NEC      | 0x00FF  | 0x001A  | setvol 50    | half"
        );
        assert_eq!(row.to_string().len(), SHOWREM_HEADER.len() - "DESCRIPTION".len() + 4);
    }

    #[test]
    fn test_rows_restartable() {
        let mut storage = MemoryStorage::new();
        let mut store = KeyBindingStore::new();
        register(&mut store, &mut storage, "a", "volup", "", 1);
        register(&mut store, &mut storage, "b", "voldown", "", 2);

        assert_eq!(store.rows(&mut storage).count(), 2);
        assert_eq!(store.rows(&mut storage).count(), 2);
    }
}
