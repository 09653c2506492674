//! Static lookup tables used by the piano roll and sketch code.

/// Note colour palette, one entry per subway line.
pub const SUBWAY_COLORS: [&str; 10] = [
    "#0039A6", "#FF6319", "#6CBE45", "#996633", "#A7A9AC", "#FCCC0A", "#EE352E", "#00933C",
    "#B933AD", "#808183",
];

/// C major from C4 to C6.
pub const C_MAJ_NOTE_STRINGS: [&str; 15] = [
    "C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5", "D5", "E5", "F5", "G5", "A5", "B5", "C6",
];

/// D Lydian from D4 to C#6.
pub const D_LYDIAN_NOTE_STRINGS: [&str; 14] = [
    "D4", "E4", "F#4", "G#4", "A4", "B4", "C#5", "D5", "E5", "F#5", "G#5", "A5", "B5", "C#6",
];

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Palette colour for the `index`-th item, wrapping around the table.
pub fn color_for_index(index: usize) -> &'static str {
    SUBWAY_COLORS[index % SUBWAY_COLORS.len()]
}

/// Formats a MIDI note number using sharps, e.g. `61` -> `C#4`.
pub fn midi_note_name(note: u8) -> String {
    let octave = (note / 12) as i32 - 1;
    format!("{}{}", SHARP_NAMES[(note % 12) as usize], octave)
}

/// Parses scientific pitch notation (`C4`, `F#5`, `Bb3`, `C-1`) into a MIDI
/// note number. Returns `None` for malformed names or out-of-range notes.
pub fn note_name_to_midi(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let base = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let octave_start = rest
        .find(|c: char| c == '-' || c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (accidentals, octave) = rest.split_at(octave_start);

    let mut offset = 0i32;
    for accidental in accidentals.chars() {
        match accidental {
            '#' => offset += 1,
            'b' => offset -= 1,
            _ => return None,
        }
    }

    let octave: i32 = octave.parse().ok()?;
    let midi = octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(base + offset)?;
    u8::try_from(midi).ok().filter(|n| *n <= 127)
}
