//! Per-subject palettes prepared for perceptual matching.
//!
//! Every usable `#RRGGBB` entry is converted to Lab once, up front, and kept
//! next to its sRGB value so a match index maps straight back to an output
//! color. The combined palette concatenates all subjects (subject order, then
//! entry order) and serves as the fallback for unrouted blocks.

use crate::delta_e::ciede2000;
use crate::error::{GenerateError, ParseColorError};
use crate::lab::{srgb_to_lab, Lab};
use crate::subjects::Subjects;
use image::Rgb;
use tracing::{debug, warn};

/// Parses a `#RRGGBB` token. Hex digits are case-insensitive.
pub fn parse_hex(hex: &str) -> Result<Rgb<u8>, ParseColorError> {
    let digits = hex.strip_prefix('#').ok_or(ParseColorError::MissingHash)?;
    let len = digits.chars().count();
    if len != 6 {
        return Err(ParseColorError::InvalidLength(len));
    }
    let mut value = 0u32;
    for c in digits.chars() {
        let digit = c.to_digit(16).ok_or(ParseColorError::InvalidDigit(c))?;
        value = (value << 4) | digit;
    }
    Ok(Rgb::from([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
}

#[derive(Debug, Default, Clone)]
pub struct LabPalette {
    lab: Vec<Lab>,
    rgb: Vec<Rgb<u8>>,
    hex: Vec<String>,
}

impl LabPalette {
    /// Builds a palette from hex entries, skipping malformed ones.
    fn from_entries(subject: &str, entries: &[String]) -> Self {
        let mut palette = Self::default();
        for (index, entry) in entries.iter().enumerate() {
            match parse_hex(entry) {
                Ok(rgb) => palette.push(entry, rgb),
                Err(e) => warn!(
                    subject,
                    index,
                    entry = entry.as_str(),
                    "skipping palette entry: {e}"
                ),
            }
        }
        palette
    }

    fn push(&mut self, hex: &str, rgb: Rgb<u8>) {
        self.lab.push(srgb_to_lab(rgb));
        self.rgb.push(rgb);
        self.hex.push(hex.to_owned());
    }

    fn extend_from(&mut self, other: &LabPalette) {
        self.lab.extend_from_slice(&other.lab);
        self.rgb.extend_from_slice(&other.rgb);
        self.hex.extend_from_slice(&other.hex);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lab.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn lab(&self) -> &[Lab] {
        &self.lab
    }

    #[inline]
    pub fn rgb(&self) -> &[Rgb<u8>] {
        &self.rgb
    }

    /// Source tokens, parallel to [`lab`](Self::lab) and [`rgb`](Self::rgb).
    #[inline]
    pub fn hex(&self) -> &[String] {
        &self.hex
    }

    /// Index of the entry with the smallest ΔE00 to `target`.
    ///
    /// Entries are scanned in order and only a strictly smaller distance
    /// replaces the current best, so ties go to the earliest entry.
    pub fn nearest(&self, target: &Lab) -> Option<usize> {
        let mut best = None;
        let mut min_diff = f64::INFINITY;
        for (i, lab) in self.lab.iter().enumerate() {
            let diff = ciede2000(target, lab);
            if diff < min_diff {
                min_diff = diff;
                best = Some(i);
            }
        }
        best
    }
}

#[derive(Debug, Clone)]
pub struct PreparedPalettes {
    subjects: Subjects<LabPalette>,
    combined: LabPalette,
}

impl PreparedPalettes {
    pub fn prepare(palettes: &Subjects<Vec<String>>) -> Result<Self, GenerateError> {
        if palettes.iter().all(|(_, entries)| entries.is_empty()) {
            return Err(GenerateError::NoValidPalettes);
        }

        let mut subjects = Subjects::new();
        let mut combined = LabPalette::default();
        for (subject, entries) in palettes {
            if entries.is_empty() {
                debug!(subject, "empty palette, blocks will use the combined palette");
                continue;
            }
            let palette = LabPalette::from_entries(subject, entries);
            if palette.is_empty() {
                warn!(subject, "palette has no usable colors, blocks will use the combined palette");
                continue;
            }
            combined.extend_from(&palette);
            subjects.insert(subject, palette);
        }

        if subjects.is_empty() {
            return Err(GenerateError::NoValidPalettes);
        }
        if combined.is_empty() {
            return Err(GenerateError::NoUsableColors);
        }
        debug!(
            subjects = subjects.len(),
            colors = combined.len(),
            "palettes prepared"
        );
        Ok(Self { subjects, combined })
    }

    /// The subject's own palette, if it has one.
    pub fn subject(&self, name: &str) -> Option<&LabPalette> {
        self.subjects.get(name)
    }

    #[inline]
    pub fn combined(&self) -> &LabPalette {
        &self.combined
    }

    /// Palette that applies to a routed subject. Unrouted blocks and subjects
    /// without a usable palette get the combined palette.
    pub fn target(&self, subject: Option<&str>) -> &LabPalette {
        subject
            .and_then(|name| self.subject(name))
            .unwrap_or(&self.combined)
    }
}
