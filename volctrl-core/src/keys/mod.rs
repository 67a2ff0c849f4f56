//! Infrared key bindings
//!
//! A binding aliases a decoded remote key to a complete command
//! invocation. Bindings are learned with `regrem`, listed with `showrem`
//! and removed with `delrem`; every mutation is mirrored to flash.

pub mod binding;
pub mod protocol;
pub mod store;

pub use binding::{ArgString, Description, IrKey, KeyBinding, KeyCode, ARG_STRING_LEN};
pub use protocol::{protocol_name, PROTOCOL_NEC};
pub use store::{
    DelError, DisplayRow, KeyBindingStore, PendingRegistration, RegError, Rows, StoreError,
    KEYSET_CAPACITY, SHOWREM_HEADER,
};
