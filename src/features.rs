//! Independent page behaviors. Each `init` wires one feature and returns the
//! `Disposer` that tears it down.

pub mod accordion;
pub mod assets;
pub mod navigation;
pub mod progress;
pub mod reveal;
pub mod scroll;
pub mod seats;
pub mod toast;
