//! Core library for the piano roll component.
//!
//! The crate is split into independent pieces: the timeline data model, the
//! static colour and note-name tables, the piano roll component itself, and a
//! registry that exposes components under a tag name. The registry is an
//! explicit value passed around by the host rather than global state.

pub mod component;
pub mod config;
pub mod error;
pub mod registry;
pub mod tables;
pub mod timeline;

pub use component::{Component, NoteData, PianoRoll, PIANO_ROLL_TAG};
pub use config::AppConfig;
pub use error::{PianoRollError, Result};
pub use registry::{
    register_piano_roll, register_piano_roll_as, ComponentFactory, ComponentRegistry,
};
pub use tables::{C_MAJ_NOTE_STRINGS, D_LYDIAN_NOTE_STRINGS, SUBWAY_COLORS};
pub use timeline::{TimelineGrid, TimelineNote, TimelineState};
