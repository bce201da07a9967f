use super::ids::ModelRef;
use nalgebra::Point3;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Coordinate records of one pose, kept as the PDB/PDBQT lines the docking program wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbModel {
    lines: Vec<String>,
}

impl PdbModel {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn atom_count(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub element: String,
    pub position: Point3<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzFrame {
    pub comment: String,
    pub atoms: Vec<XyzAtom>,
}

/// Structural data read alongside the pose records of one file.
///
/// Ownership of a payload passes to the structure loader once a file is loaded;
/// records only keep [`ModelRef`]s into it.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralPayload {
    /// One PDB-style model per pose (Vina, SwissDock, legacy chimerax clusters).
    PdbModels(Vec<PdbModel>),
    /// One XYZ frame per pose.
    XyzFrames(Vec<XyzFrame>),
    /// A single sibling structure file shared by every pose (pyDock).
    PairedStructure { path: PathBuf },
    /// One structure file per pose (pyDock `*_<Conf>.pdb` conformations).
    ConformationFiles(Vec<PathBuf>),
}

/// Borrowed view of the structure addressed by one [`ModelRef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelView<'a> {
    Pdb(&'a PdbModel),
    Xyz(&'a XyzFrame),
    Paired(&'a Path),
}

impl StructuralPayload {
    /// Number of addressable models, `None` when every reference shares one file.
    pub fn model_count(&self) -> Option<usize> {
        match self {
            StructuralPayload::PdbModels(models) => Some(models.len()),
            StructuralPayload::XyzFrames(frames) => Some(frames.len()),
            StructuralPayload::ConformationFiles(files) => Some(files.len()),
            StructuralPayload::PairedStructure { .. } => None,
        }
    }

    pub fn model(&self, model_ref: ModelRef) -> Option<ModelView<'_>> {
        match self {
            StructuralPayload::PdbModels(models) => {
                models.get(model_ref.position()).map(ModelView::Pdb)
            }
            StructuralPayload::XyzFrames(frames) => {
                frames.get(model_ref.position()).map(ModelView::Xyz)
            }
            StructuralPayload::ConformationFiles(files) => files
                .get(model_ref.position())
                .map(|path| ModelView::Paired(path)),
            StructuralPayload::PairedStructure { path } => Some(ModelView::Paired(path)),
        }
    }

    /// Builds a payload holding only `refs`, in that order, so that the `n`-th
    /// reference becomes model `n + 1`. Unknown references are skipped.
    pub(crate) fn select(&self, refs: &[ModelRef]) -> Self {
        match self {
            StructuralPayload::PdbModels(models) => StructuralPayload::PdbModels(
                refs.iter()
                    .filter_map(|r| models.get(r.position()).cloned())
                    .collect(),
            ),
            StructuralPayload::XyzFrames(frames) => StructuralPayload::XyzFrames(
                refs.iter()
                    .filter_map(|r| frames.get(r.position()).cloned())
                    .collect(),
            ),
            StructuralPayload::ConformationFiles(files) => StructuralPayload::ConformationFiles(
                refs.iter()
                    .filter_map(|r| files.get(r.position()).cloned())
                    .collect(),
            ),
            StructuralPayload::PairedStructure { path } => {
                StructuralPayload::PairedStructure { path: path.clone() }
            }
        }
    }
}

impl ModelView<'_> {
    /// Writes the model in its native text format (PDB lines, XYZ frame, or a copy
    /// of the paired structure file).
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        match self {
            ModelView::Pdb(model) => {
                for line in model.lines() {
                    writeln!(writer, "{}", line)?;
                }
                writeln!(writer, "END")?;
            }
            ModelView::Xyz(frame) => {
                writeln!(writer, "{}", frame.atoms.len())?;
                writeln!(writer, "{}", frame.comment)?;
                for atom in &frame.atoms {
                    writeln!(
                        writer,
                        "{:<3}{:>14.6}{:>14.6}{:>14.6}",
                        atom.element, atom.position.x, atom.position.y, atom.position.z
                    )?;
                }
            }
            ModelView::Paired(path) => {
                let content = std::fs::read(path)?;
                writer.write_all(&content)?;
            }
        }
        Ok(())
    }
}
