use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::{
    tables::color_for_index, timeline::TimelineNote, TimelineGrid, TimelineState,
};

/// Tag under which the piano roll is registered.
pub const PIANO_ROLL_TAG: &str = "piano-roll-component";

/// Note data handed to a component by its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteData {
    pub pitch: i32,
    pub position: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f32>,
}

impl NoteData {
    pub fn new(pitch: i32, position: f64, duration: f64) -> Self {
        Self {
            pitch,
            position,
            duration,
            velocity: None,
        }
    }
}

/// Behaviour shared by everything the [`ComponentRegistry`](crate::ComponentRegistry)
/// can construct.
pub trait Component: Send {
    fn tag_name(&self) -> &str;

    /// Replaces the component's notes, returning how many were accepted.
    fn set_notes(&mut self, notes: Vec<NoteData>) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The piano roll component. Owns the timeline it displays.
#[derive(Debug, Clone, Default)]
pub struct PianoRoll {
    state: TimelineState,
}

impl PianoRoll {
    pub fn new(grid: TimelineGrid) -> Self {
        Self {
            state: TimelineState::new(grid),
        }
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TimelineState {
        &mut self.state
    }

    /// Palette colour of the note with `id`, based on its display index.
    pub fn note_color(&self, id: &str) -> Option<&'static str> {
        self.state
            .notes()
            .iter()
            .position(|note| note.id == id)
            .map(color_for_index)
    }
}

impl Component for PianoRoll {
    fn tag_name(&self) -> &str {
        PIANO_ROLL_TAG
    }

    fn set_notes(&mut self, notes: Vec<NoteData>) -> usize {
        self.state.notes.clear();
        for (index, data) in notes.into_iter().enumerate() {
            let note = TimelineNote {
                id: format!("note-{index}"),
                pitch: data.pitch,
                position: data.position,
                duration: data.duration,
                selected: false,
                velocity: data.velocity,
            };
            if let Err(err) = self.state.add_note(note) {
                tracing::warn!(%err, "skipping note passed to piano roll");
            }
        }
        tracing::debug!(accepted = self.state.notes().len(), "piano roll notes replaced");
        self.state.notes().len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notes_assigns_sequential_ids_and_skips_invalid() {
        let mut roll = PianoRoll::default();
        let accepted = roll.set_notes(vec![
            NoteData::new(60, 0.0, 1.0),
            NoteData::new(62, -1.0, 1.0),
            NoteData {
                velocity: Some(0.5),
                ..NoteData::new(64, 2.0, 0.5)
            },
        ]);

        assert_eq!(accepted, 2);
        let ids: Vec<_> = roll.state().notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["note-0", "note-2"]);
        assert_eq!(roll.state().note("note-2").unwrap().velocity, Some(0.5));
    }

    #[test]
    fn set_notes_replaces_previous_notes() {
        let mut roll = PianoRoll::default();
        roll.set_notes(vec![NoteData::new(60, 0.0, 1.0), NoteData::new(62, 1.0, 1.0)]);
        roll.set_notes(vec![NoteData::new(67, 4.0, 1.0)]);

        assert_eq!(roll.state().notes().len(), 1);
        assert_eq!(roll.state().notes()[0].pitch, 67);
    }

    #[test]
    fn colours_follow_display_order() {
        let mut roll = PianoRoll::default();
        roll.set_notes(vec![NoteData::new(60, 0.0, 1.0), NoteData::new(62, 1.0, 1.0)]);

        assert_eq!(roll.note_color("note-0"), Some("#0039A6"));
        assert_eq!(roll.note_color("note-1"), Some("#FF6319"));
        assert_eq!(roll.note_color("missing"), None);
    }

    #[test]
    fn reports_its_tag() {
        let roll = PianoRoll::new(TimelineGrid::default());
        assert_eq!(roll.tag_name(), PIANO_ROLL_TAG);
    }
}
