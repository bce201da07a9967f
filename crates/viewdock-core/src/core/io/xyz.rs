//! Generic multi-frame `.xyz` coordinates.
//!
//! Each frame is an atom count line, a free comment line and `element x y z` atom
//! lines. Frames carry no docking scores; the comment is kept in `extra["comment"]`.

use super::error::FormatError;
use super::traits::DockingFile;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use crate::core::models::ids::{ModelRef, PoseId};
use crate::core::models::payload::{StructuralPayload, XyzAtom, XyzFrame};
use crate::core::models::pose::PoseRecord;
use crate::core::models::score::ScoreSet;
use nalgebra::Point3;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

pub struct XyzFile;

impl DockingFile for XyzFile {
    const FORMAT: SourceFormat = SourceFormat::Xyz;

    fn read_from(reader: &mut impl BufRead, _origin: &Path) -> Result<ParsedDocking, FormatError> {
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        let mut frames = Vec::new();
        let mut cursor = 0;

        while cursor < lines.len() {
            if lines[cursor].trim().is_empty() {
                cursor += 1;
                continue;
            }
            let (frame, next) = read_frame(&lines, cursor)?;
            frames.push(frame);
            cursor = next;
        }

        if frames.is_empty() {
            return Err(FormatError::malformed(0, "", "no frames found"));
        }

        let records = frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                let id = PoseId(index as u32 + 1);
                let mut extra = BTreeMap::new();
                extra.insert("comment".to_string(), frame.comment.clone());
                PoseRecord::new(id, Self::FORMAT, ScoreSet::new(), ModelRef::from(id))
                    .with_extra(extra)
            })
            .collect();

        Ok(ParsedDocking::new(
            Self::FORMAT,
            records,
            StructuralPayload::XyzFrames(frames),
        ))
    }
}

/// Reads the frame whose count line sits at `start` and returns it with the index
/// of the first line after it.
fn read_frame(lines: &[String], start: usize) -> Result<(XyzFrame, usize), FormatError> {
    let count_line = lines[start].trim();
    let count: usize = count_line.parse().map_err(|_| {
        FormatError::malformed(start + 1, count_line, "expected an atom count")
    })?;
    if count == 0 {
        return Err(FormatError::malformed(start + 1, count_line, "frame declares no atoms"));
    }

    let comment = lines
        .get(start + 1)
        .map(|line| line.trim().to_string())
        .ok_or_else(|| FormatError::malformed(start + 1, count_line, "frame has no comment line"))?;

    let first_atom = start + 2;
    let mut atoms = Vec::with_capacity(count);
    for offset in 0..count {
        let index = first_atom + offset;
        let Some(line) = lines.get(index).map(|l| l.trim()).filter(|l| !l.is_empty()) else {
            return Err(FormatError::malformed(
                start + 1,
                count_line,
                format!("frame declares {} atoms but only {} follow", count, offset),
            ));
        };
        atoms.push(parse_atom(index + 1, line)?);
    }

    let next = first_atom + count;
    // A further coordinate line means the count line under-reports the frame.
    if let Some(extra) = lines.get(next).map(|l| l.trim()) {
        if looks_like_atom(extra) {
            return Err(FormatError::malformed(
                start + 1,
                count_line,
                format!("frame declares {} atoms but more follow", count),
            ));
        }
    }

    Ok((XyzFrame { comment, atoms }, next))
}

fn parse_atom(line_num: usize, line: &str) -> Result<XyzAtom, FormatError> {
    let mut fields = line.split_whitespace();
    let element = fields
        .next()
        .ok_or_else(|| FormatError::malformed(line_num, line, "missing element symbol"))?;
    let mut coords = [0.0_f64; 3];
    for coord in coords.iter_mut() {
        *coord = fields
            .next()
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| FormatError::malformed(line_num, line, "expected x, y and z coordinates"))?;
    }
    Ok(XyzAtom {
        element: element.to_string(),
        position: Point3::new(coords[0], coords[1], coords[2]),
    })
}

fn looks_like_atom(line: &str) -> bool {
    let fields: Vec<&str> = line.split_whitespace().collect();
    fields.len() >= 4 && fields[1..4].iter().all(|f| f.parse::<f64>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FRAMES: &str = "\
3
water, frame one
O   0.000000   0.000000   0.117300
H   0.000000   0.757200  -0.469200
H   0.000000  -0.757200  -0.469200
3
-5.25
O   0.100000   0.000000   0.117300
H   0.100000   0.757200  -0.469200
H   0.100000  -0.757200  -0.469200
";

    fn read(content: &str) -> Result<ParsedDocking, FormatError> {
        XyzFile::read_from(&mut content.as_bytes(), Path::new("traj.xyz"))
    }

    #[test]
    fn every_frame_becomes_a_scoreless_record() {
        let parsed = read(TWO_FRAMES).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.records.iter().all(|r| r.scores().is_empty()));
        assert_eq!(parsed.records[0].extra().get("comment").unwrap(), "water, frame one");
        assert_eq!(parsed.records[1].extra().get("comment").unwrap(), "-5.25");
        assert_eq!(parsed.records[1].model_ref().index(), 2);
    }

    #[test]
    fn coordinates_are_kept_per_frame() {
        let parsed = read(TWO_FRAMES).unwrap();
        let StructuralPayload::XyzFrames(frames) = &parsed.payload else {
            panic!("expected xyz frames");
        };
        assert_eq!(frames[1].atoms.len(), 3);
        assert_eq!(frames[1].atoms[0].element, "O");
        assert_eq!(frames[1].atoms[0].position, Point3::new(0.1, 0.0, 0.1173));
    }

    #[test]
    fn fewer_atoms_than_declared_is_malformed() {
        let content = "4\ncomment\nO 0 0 0\nH 0 1 0\nH 0 -1 0\n";
        match read(content) {
            Err(FormatError::MalformedRecord { line, content, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(content, "4");
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn more_atoms_than_declared_is_malformed() {
        let content = "2\ncomment\nO 0 0 0\nH 0 1 0\nH 0 -1 0\n";
        assert!(matches!(read(content), Err(FormatError::MalformedRecord { line: 1, .. })));
    }

    #[test]
    fn bad_coordinate_reports_atom_line() {
        let content = "2\ncomment\nO 0 0 0\nH 0 one 0\n";
        assert!(matches!(read(content), Err(FormatError::MalformedRecord { line: 4, .. })));
    }

    #[test]
    fn zero_atom_frame_is_malformed() {
        assert!(matches!(read("0\nempty\n"), Err(FormatError::MalformedRecord { line: 1, .. })));
    }

    #[test]
    fn empty_file_is_malformed() {
        assert!(matches!(read(""), Err(FormatError::MalformedRecord { line: 0, .. })));
    }
}
