//! Background jobs spawned by the server binary.

pub mod hold_timeout;
