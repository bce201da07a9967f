use std::fmt;
use std::str::FromStr;

/// The docking programs/servers whose output the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// AutoDock Vina `.pdbqt` with `MODEL`/`ENDMDL` blocks.
    Vina,
    /// SwissDock `.dock4` clusters, also embedded in Attracting Cavities `.chimerax` files.
    SwissDock,
    /// Legacy EADock/SwissDock `.chimerax` web-data file pointing at a cluster `.pdb`.
    LegacyChimerax,
    /// pyDock `.ene`/`.eneRST` energy tables with a paired `.pdb`.
    PyDock,
    /// Plain multi-frame `.xyz` coordinates.
    Xyz,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::Vina,
        SourceFormat::SwissDock,
        SourceFormat::LegacyChimerax,
        SourceFormat::PyDock,
        SourceFormat::Xyz,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Vina => "vina",
            SourceFormat::SwissDock => "swissdock",
            SourceFormat::LegacyChimerax => "chimerax-legacy",
            SourceFormat::PyDock => "pydock",
            SourceFormat::Xyz => "xyz",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vina" | "pdbqt" => Ok(SourceFormat::Vina),
            "swissdock" | "dock4" => Ok(SourceFormat::SwissDock),
            "chimerax-legacy" | "eadock" => Ok(SourceFormat::LegacyChimerax),
            "pydock" | "ene" | "enerst" => Ok(SourceFormat::PyDock),
            "xyz" => Ok(SourceFormat::Xyz),
            other => Err(format!(
                "Unknown docking format '{}'. Expected one of: vina, swissdock, chimerax-legacy, pydock, xyz.",
                other
            )),
        }
    }
}
