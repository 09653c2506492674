//! Timeline data model shared by the piano roll and any external editor code.
//!
//! Positions and durations are expressed in timeline units (beats). The
//! structures deserialize from the camelCase JSON shape consumers already
//! exchange, so validation is explicit: call [`TimelineState::validate`] on
//! anything that did not go through [`TimelineState::add_note`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{PianoRollError, Result};

/// A single note event on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNote {
    pub id: String,
    pub pitch: i32,
    pub position: f64,
    pub duration: f64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f32>,
}

impl TimelineNote {
    pub fn new(id: impl Into<String>, pitch: i32, position: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            pitch,
            position,
            duration,
            selected: false,
            velocity: None,
        }
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// End of the note in timeline units.
    pub fn end(&self) -> f64 {
        self.position + self.duration
    }

    /// Checks `duration > 0` and `position >= 0`.
    pub fn validate(&self) -> Result<()> {
        if !self.position.is_finite() || !self.duration.is_finite() {
            return Err(PianoRollError::invalid_note(
                &self.id,
                "position and duration must be finite",
            ));
        }
        if self.position < 0.0 {
            return Err(PianoRollError::invalid_note(
                &self.id,
                format!("position {} is negative", self.position),
            ));
        }
        if self.duration <= 0.0 {
            return Err(PianoRollError::invalid_note(
                &self.id,
                format!("duration {} must be positive", self.duration),
            ));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Display and quantisation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineGrid {
    /// Extent of the timeline in units.
    pub max_length: f64,
    /// Beats per bar.
    pub time_signature: u32,
    /// Grid cells per beat.
    pub subdivision: u32,
}

impl Default for TimelineGrid {
    fn default() -> Self {
        Self {
            max_length: 64.0,
            time_signature: 4,
            subdivision: 4,
        }
    }
}

impl TimelineGrid {
    pub fn validate(&self) -> Result<()> {
        if !self.max_length.is_finite() || self.max_length <= 0.0 {
            return Err(PianoRollError::InvalidGrid(format!(
                "max length {} must be positive",
                self.max_length
            )));
        }
        if self.time_signature == 0 {
            return Err(PianoRollError::InvalidGrid(
                "time signature must be at least one beat".to_string(),
            ));
        }
        if self.subdivision == 0 {
            return Err(PianoRollError::InvalidGrid(
                "subdivision must be at least one".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of the smallest grid cell in timeline units.
    pub fn step_length(&self) -> f64 {
        1.0 / self.subdivision.max(1) as f64
    }

    pub fn bar_length(&self) -> f64 {
        self.time_signature as f64
    }

    /// Rounds `position` to the nearest grid step, clamped to the timeline.
    pub fn snap(&self, position: f64) -> f64 {
        let step = self.step_length();
        let snapped = (position / step).round() * step;
        clamp_to_length(snapped, self.max_length)
    }
}

/// Aggregate timeline state: notes in display order plus transport markers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    #[serde(default)]
    pub notes: Vec<TimelineNote>,
    #[serde(default)]
    pub playhead_position: f64,
    #[serde(default)]
    pub queue_position: f64,
    #[serde(default)]
    pub grid: TimelineGrid,
}

impl TimelineState {
    pub fn new(grid: TimelineGrid) -> Self {
        Self {
            grid,
            ..Default::default()
        }
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn notes(&self) -> &[TimelineNote] {
        &self.notes
    }

    pub fn note(&self, id: &str) -> Option<&TimelineNote> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn note_mut(&mut self, id: &str) -> Option<&mut TimelineNote> {
        self.notes.iter_mut().find(|note| note.id == id)
    }

    pub fn selected_notes(&self) -> impl Iterator<Item = &TimelineNote> {
        self.notes.iter().filter(|note| note.selected)
    }

    /// Appends a validated note, rejecting ids that are already in use.
    pub fn add_note(&mut self, note: TimelineNote) -> Result<()> {
        note.validate()?;
        if self.note(&note.id).is_some() {
            return Err(PianoRollError::DuplicateNoteId(note.id));
        }
        self.notes.push(note);
        Ok(())
    }

    pub fn remove_note(&mut self, id: &str) -> Option<TimelineNote> {
        let index = self.notes.iter().position(|note| note.id == id)?;
        Some(self.notes.remove(index))
    }

    pub fn select(&mut self, id: &str, selected: bool) -> Result<()> {
        let note = self
            .note_mut(id)
            .ok_or_else(|| PianoRollError::NoteNotFound(id.to_string()))?;
        note.selected = selected;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for note in &mut self.notes {
            note.selected = false;
        }
    }

    pub fn set_playhead(&mut self, position: f64) {
        self.playhead_position = clamp_to_length(position, self.grid.max_length);
    }

    pub fn set_queue_position(&mut self, position: f64) {
        self.queue_position = clamp_to_length(position, self.grid.max_length);
    }

    /// Validates the grid, every note and id uniqueness.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        let mut seen = HashSet::with_capacity(self.notes.len());
        for note in &self.notes {
            note.validate()?;
            if !seen.insert(note.id.as_str()) {
                return Err(PianoRollError::DuplicateNoteId(note.id.clone()));
            }
        }
        Ok(())
    }
}

fn clamp_to_length(position: f64, max_length: f64) -> f64 {
    // NaN collapses to zero through `max`.
    position.max(0.0).min(max_length.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(ids: &[&str]) -> TimelineState {
        let mut state = TimelineState::new(TimelineGrid::default());
        for (i, id) in ids.iter().enumerate() {
            state
                .add_note(TimelineNote::new(*id, 60 + i as i32, i as f64, 1.0))
                .unwrap();
        }
        state
    }

    #[test]
    fn rejects_non_positive_duration_and_negative_position() {
        assert!(TimelineNote::new("a", 60, 0.0, 0.0).validate().is_err());
        assert!(TimelineNote::new("b", 60, 0.0, -1.0).validate().is_err());
        assert!(TimelineNote::new("c", 60, -0.5, 1.0).validate().is_err());
        assert!(TimelineNote::new("d", 60, f64::NAN, 1.0).validate().is_err());
        assert!(TimelineNote::new("e", 60, 0.0, 0.25).is_valid());
    }

    #[test]
    fn add_note_keeps_insertion_order_and_unique_ids() {
        let mut state = state_with(&["x", "a", "m"]);
        let order: Vec<_> = state.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, ["x", "a", "m"]);

        let err = state
            .add_note(TimelineNote::new("a", 72, 8.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, PianoRollError::DuplicateNoteId(ref id) if id == "a"));
        assert_eq!(state.notes().len(), 3);
    }

    #[test]
    fn add_note_rejects_invalid_notes() {
        let mut state = state_with(&[]);
        let err = state
            .add_note(TimelineNote::new("bad", 60, 1.0, 0.0))
            .unwrap_err();
        assert!(format!("{err}").contains("bad"));
        assert!(state.notes().is_empty());
    }

    #[test]
    fn remove_note_preserves_remaining_order() {
        let mut state = state_with(&["a", "b", "c"]);
        let removed = state.remove_note("b").unwrap();
        assert_eq!(removed.id, "b");
        let order: Vec<_> = state.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, ["a", "c"]);
        assert!(state.remove_note("b").is_none());
    }

    #[test]
    fn selection_tracks_flags() {
        let mut state = state_with(&["a", "b"]);
        state.select("b", true).unwrap();
        let selected: Vec<_> = state.selected_notes().map(|n| n.id.clone()).collect();
        assert_eq!(selected, ["b"]);

        assert!(matches!(
            state.select("zzz", true),
            Err(PianoRollError::NoteNotFound(_))
        ));

        state.clear_selection();
        assert_eq!(state.selected_notes().count(), 0);
    }

    #[test]
    fn transport_markers_clamp_to_grid() {
        let mut state = state_with(&[]);
        state.set_playhead(100.0);
        assert_eq!(state.playhead_position, 64.0);
        state.set_queue_position(-3.0);
        assert_eq!(state.queue_position, 0.0);
        state.set_playhead(12.5);
        assert_eq!(state.playhead_position, 12.5);
    }

    #[test]
    fn grid_snaps_to_subdivision() {
        let grid = TimelineGrid::default();
        assert_eq!(grid.step_length(), 0.25);
        assert_eq!(grid.bar_length(), 4.0);
        assert_eq!(grid.snap(1.3), 1.25);
        assert_eq!(grid.snap(1.4), 1.5);
        assert_eq!(grid.snap(-2.0), 0.0);
        assert_eq!(grid.snap(80.0), 64.0);
    }

    #[test]
    fn grid_validation_rejects_degenerate_values() {
        let mut grid = TimelineGrid::default();
        assert!(grid.validate().is_ok());
        grid.subdivision = 0;
        assert!(grid.validate().is_err());
        grid = TimelineGrid {
            time_signature: 0,
            ..Default::default()
        };
        assert!(grid.validate().is_err());
        grid = TimelineGrid {
            max_length: 0.0,
            ..Default::default()
        };
        assert!(grid.validate().is_err());
    }

    #[test]
    fn deserializes_camel_case_json_with_optional_velocity() {
        let json = r#"{
            "notes": [
                {"id": "n1", "pitch": 60, "position": 0, "duration": 1, "selected": false},
                {"id": "n2", "pitch": 64, "position": 1.5, "duration": 0.5, "selected": true, "velocity": 0.8}
            ],
            "playheadPosition": 2,
            "queuePosition": 4,
            "grid": {"maxLength": 32, "timeSignature": 3, "subdivision": 2}
        }"#;

        let state = TimelineState::from_json(json).unwrap();
        state.validate().unwrap();
        assert_eq!(state.notes[0].velocity, None);
        assert_eq!(state.notes[1].velocity, Some(0.8));
        assert!(state.notes[1].selected);
        assert_eq!(state.playhead_position, 2.0);
        assert_eq!(state.queue_position, 4.0);
        assert_eq!(state.grid.time_signature, 3);

        let out = state.to_json_pretty().unwrap();
        assert!(out.contains("\"playheadPosition\""));
        assert!(out.contains("\"maxLength\""));
    }

    #[test]
    fn partial_grid_fills_missing_fields_from_defaults() {
        let state = TimelineState::from_json(r#"{"grid": {"subdivision": 8}}"#).unwrap();
        assert_eq!(state.grid.subdivision, 8);
        assert_eq!(state.grid.max_length, 64.0);
        assert_eq!(state.grid.time_signature, 4);
        state.validate().unwrap();
    }

    #[test]
    fn validate_catches_problems_in_deserialized_state() {
        let json = r#"{"notes": [
            {"id": "n1", "pitch": 60, "position": 0, "duration": 1},
            {"id": "n1", "pitch": 62, "position": 1, "duration": 1}
        ]}"#;
        let state = TimelineState::from_json(json).unwrap();
        assert!(matches!(
            state.validate(),
            Err(PianoRollError::DuplicateNoteId(_))
        ));

        let json = r#"{"notes": [{"id": "n1", "pitch": 60, "position": -1, "duration": 1}]}"#;
        let state = TimelineState::from_json(json).unwrap();
        assert!(matches!(
            state.validate(),
            Err(PianoRollError::InvalidNote { .. })
        ));
    }
}
