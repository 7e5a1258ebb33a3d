//! Loading helpers for the command line front end.
//!
//! Masks are named after their file stem. Palette files hold one subject per
//! line, `subject: #RRGGBB, #RRGGBB, ...`.

use crate::error::MaskError;
use crate::subjects::Subjects;
use image::{ImageReader, RgbaImage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static HEX_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[0-9a-fA-F]{6}\b").expect("hex token pattern is valid"));

/// Subject name for a mask file: its stem, e.g. `masks/skin.png` is `skin`.
pub fn subject_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[derive(Debug, Default)]
pub struct LoadedMasks {
    pub masks: Subjects<RgbaImage>,
    pub errors: Vec<MaskError>,
}

/// Loads every mask in `paths`, in order.
///
/// A file that cannot be decoded, has the wrong size, or reuses a subject
/// name is reported in [`LoadedMasks::errors`] and skipped; the rest load.
pub fn load_masks<P: AsRef<Path>>(paths: &[P], required: (u32, u32)) -> LoadedMasks {
    let mut loaded = LoadedMasks::default();
    for path in paths {
        let path = path.as_ref();
        let file = path.to_string_lossy().into_owned();
        let subject = subject_name(path);
        if loaded.masks.contains(&subject) {
            loaded
                .errors
                .push(MaskError::DuplicateSubject { file, subject });
            continue;
        }
        let mask = match ImageReader::open(path)
            .map_err(image::ImageError::from)
            .and_then(|reader| reader.decode())
        {
            Ok(img) => img.to_rgba8(),
            Err(source) => {
                loaded.errors.push(MaskError::Read { file, source });
                continue;
            }
        };
        if mask.dimensions() != required {
            loaded.errors.push(MaskError::Dimensions {
                file,
                expected: required,
                actual: mask.dimensions(),
            });
            continue;
        }
        loaded.masks.insert(subject, mask);
    }
    loaded
}

/// Every `#RRGGBB` token in `line`, in order of appearance.
pub fn parse_palette_line(line: &str) -> Vec<String> {
    HEX_TOKEN
        .find_iter(line)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Parses a palette file. Blank lines, `//` comments and lines without a
/// `subject:` prefix are ignored. A repeated subject replaces the earlier line.
pub fn parse_palette_text(text: &str) -> Subjects<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .filter_map(|line| line.split_once(':'))
        .map(|(subject, colors)| (subject.trim(), parse_palette_line(colors)))
        .filter(|(subject, _)| !subject.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::path::PathBuf;

    #[test]
    fn subject_is_file_stem() {
        assert_eq!(subject_name(Path::new("masks/skin.png")), "skin");
        assert_eq!(subject_name(Path::new("hair.v2.png")), "hair.v2");
        assert_eq!(subject_name(Path::new("background")), "background");
    }

    #[test]
    fn palette_line_tokens() {
        assert_eq!(
            parse_palette_line("#FF0000, #00ff00,#0000FF"),
            ["#FF0000", "#00ff00", "#0000FF"]
        );
        assert_eq!(parse_palette_line("#FF00001, #12345, red"), Vec::<String>::new());
        assert!(parse_palette_line("").is_empty());
    }

    #[test]
    fn palette_text_keeps_line_order() {
        let text = "
            // portrait palettes
            skin: #FFCCAA, #EEBB99
            hair: #000000
            not a palette line
            background:
        ";
        let palettes = parse_palette_text(text);
        assert_eq!(
            palettes.names().collect::<Vec<_>>(),
            ["skin", "hair", "background"]
        );
        assert_eq!(palettes.get("skin").unwrap(), &["#FFCCAA", "#EEBB99"]);
        assert!(palettes.get("background").unwrap().is_empty());
    }

    #[test]
    fn loads_valid_masks_and_reports_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, w: u32, h: u32| -> PathBuf {
            let path = dir.path().join(name);
            RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
                .save(&path)
                .unwrap();
            path
        };
        let skin = write("skin.png", 2, 2);
        let hair = write("hair.png", 3, 3);
        let dup_dir = dir.path().join("more");
        std::fs::create_dir(&dup_dir).unwrap();
        let dup = dup_dir.join("skin.png");
        RgbaImage::new(2, 2).save(&dup).unwrap();
        let missing = dir.path().join("eyes.png");

        let loaded = load_masks(&[skin, hair, dup, missing], (2, 2));
        assert_eq!(loaded.masks.names().collect::<Vec<_>>(), ["skin"]);
        assert_eq!(loaded.errors.len(), 3);
        assert!(matches!(
            loaded.errors[0],
            MaskError::Dimensions {
                expected: (2, 2),
                actual: (3, 3),
                ..
            }
        ));
        assert!(matches!(
            &loaded.errors[1],
            MaskError::DuplicateSubject { subject, .. } if subject == "skin"
        ));
        assert!(matches!(loaded.errors[2], MaskError::Read { .. }));
    }
}
