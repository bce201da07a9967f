use crate::core::io::detect::detect_from_path;
use crate::core::io::read_docking;
use crate::core::models::docking::ParsedDocking;
use crate::core::models::format::SourceFormat;
use crate::core::models::payload::StructuralPayload;
use crate::engine::config::{LoadConfig, SwissDockMode};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::store::CollectionStore;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// One collection produced by a load, with the structures it refers to.
#[derive(Debug, Clone)]
pub struct LoadedObject {
    pub store: CollectionStore,
    pub payload: StructuralPayload,
    pub receptor: Option<PathBuf>,
}

impl LoadedObject {
    pub fn name(&self) -> &str {
        self.store.name()
    }
}

/// Object name used when none is given: the file name up to its first `.`.
pub fn default_object_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

/// Detects (unless forced) and parses `path`, without building collections.
pub fn parse_file(
    path: &Path,
    forced: Option<SourceFormat>,
    reporter: &ProgressReporter,
) -> Result<ParsedDocking, EngineError> {
    let format = reporter.phase("Format detection", || match forced {
        Some(format) => Ok(format),
        None => detect_from_path(path),
    })?;
    debug!("Reading '{}' as {}", path.display(), format);

    reporter.phase("Parsing", || {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        read_docking(format, &mut reader, path)
    })
    .map_err(EngineError::from)
}

/// Runs the full load pipeline: detection, parsing, post-parse selection and
/// collection building.
///
/// Returns one object in general and one per cluster for SwissDock results loaded
/// with [`SwissDockMode::Split`].
#[instrument(skip_all, name = "load_workflow", fields(path = %path.display()))]
pub fn run(
    path: &Path,
    config: &LoadConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<LoadedObject>, EngineError> {
    let parsed = parse_file(path, config.format, reporter)?;
    let format = parsed.format;
    let object_name = config
        .object_name
        .clone()
        .unwrap_or_else(|| default_object_name(path));

    let parts = select_poses(parsed, &object_name, config);

    let objects = reporter.phase("Collection building", || build_collections(parts, reporter))?;

    info!(
        "Loaded {} pose(s) from '{}' ({}) into {} object(s).",
        objects.iter().map(|o| o.store.len()).sum::<usize>(),
        path.display(),
        format,
        objects.len()
    );
    Ok(objects)
}

/// Turns each selected part into a store. Task events are closed even when a
/// store rejects its records.
fn build_collections(
    parts: Vec<(String, ParsedDocking)>,
    reporter: &ProgressReporter,
) -> Result<Vec<LoadedObject>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: parts.len() as u64,
    });
    let objects = parts
        .into_iter()
        .map(|(name, docking)| -> Result<LoadedObject, EngineError> {
            let store = CollectionStore::from_records(name, docking.records)?;
            reporter.report(Progress::TaskIncrement);
            Ok(LoadedObject {
                store,
                payload: docking.payload,
                receptor: docking.receptor,
            })
        })
        .collect();
    reporter.report(Progress::TaskFinish);
    objects
}

fn select_poses(
    parsed: ParsedDocking,
    object_name: &str,
    config: &LoadConfig,
) -> Vec<(String, ParsedDocking)> {
    match parsed.format {
        SourceFormat::PyDock => {
            let total = parsed.len();
            let kept = parsed.truncate(config.max_n);
            if kept.len() < total {
                debug!("Kept the first {} of {} pyDock rows", kept.len(), total);
            }
            vec![(object_name.to_string(), kept)]
        }
        SourceFormat::SwissDock => match config.swissdock_mode {
            SwissDockMode::All => vec![(object_name.to_string(), parsed)],
            SwissDockMode::Leaders => {
                let leaders = parsed.select(|record, _| record.cluster_rank() == Some(0));
                vec![(object_name.to_string(), leaders)]
            }
            SwissDockMode::Split => parsed
                .split_by_cluster()
                .into_iter()
                .map(|(cluster, part)| {
                    let name = match cluster {
                        Some(cluster) => format!("{}-{}", object_name, cluster),
                        None => object_name.to_string(),
                    };
                    (name, part)
                })
                .collect(),
        },
        other => {
            if config.swissdock_mode != SwissDockMode::All {
                debug!(
                    "SwissDock mode '{}' has no effect on {} results",
                    config.swissdock_mode, other
                );
            }
            vec![(object_name.to_string(), parsed)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::error::FormatError;
    use crate::engine::config::LoadConfigBuilder;
    use std::fs;
    use tempfile::tempdir;

    const DOCK4: &str = "\
REMARK Cluster: 0
REMARK ClusterRank: 0
REMARK deltaG: -7.1
ATOM      1  C   LIG     1       0.000   0.000   0.000
REMARK Cluster: 0
REMARK ClusterRank: 1
REMARK deltaG: -6.8
ATOM      1  C   LIG     1       0.100   0.000   0.000
REMARK Cluster: 1
REMARK ClusterRank: 0
REMARK deltaG: -6.5
ATOM      1  C   LIG     1       0.200   0.000   0.000
";

    #[test]
    fn default_object_name_stops_at_first_dot() {
        assert_eq!(default_object_name(Path::new("/data/cluster.dock4.pdb")), "cluster");
        assert_eq!(default_object_name(Path::new("run1.pdbqt")), "run1");
        assert_eq!(default_object_name(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn swissdock_modes_shape_the_collections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clusters.dock4");
        fs::write(&path, DOCK4).unwrap();
        let reporter = ProgressReporter::new();

        let all = run(&path, &LoadConfig::default(), &reporter).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "clusters");
        assert_eq!(all[0].store.len(), 3);

        let config = LoadConfigBuilder::new()
            .swissdock_mode(SwissDockMode::Leaders)
            .build()
            .unwrap();
        let leaders = run(&path, &config, &reporter).unwrap();
        let ids: Vec<_> = leaders[0].store.ids().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(leaders[0].payload.model_count(), Some(2));

        let config = LoadConfigBuilder::new()
            .object_name("dock")
            .swissdock_mode(SwissDockMode::Split)
            .build()
            .unwrap();
        let split = run(&path, &config, &reporter).unwrap();
        let names: Vec<_> = split.iter().map(|o| (o.name().to_string(), o.store.len())).collect();
        assert_eq!(
            names,
            vec![("dock-0".to_string(), 2), ("dock-1".to_string(), 1)]
        );
    }

    #[test]
    fn failed_collection_building_still_closes_its_phase() {
        use crate::core::models::ids::{ModelRef, PoseId};
        use crate::core::models::pose::PoseRecord;
        use crate::core::models::score::ScoreSet;
        use std::sync::Mutex;

        let record = |id| {
            PoseRecord::new(PoseId(id), SourceFormat::Xyz, ScoreSet::new(), ModelRef::from(PoseId(id)))
        };
        let parsed = ParsedDocking::new(
            SourceFormat::Xyz,
            vec![record(2), record(1)],
            StructuralPayload::XyzFrames(Vec::new()),
        );

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let result = reporter.phase("Collection building", || {
            build_collections(vec![("bad".to_string(), parsed)], &reporter)
        });
        drop(reporter);

        assert!(matches!(
            result,
            Err(EngineError::Store {
                source: crate::engine::store::StoreError::IdOutOfOrder { .. }
            })
        ));
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart {
                    name: "Collection building"
                },
                Progress::TaskStart { total_steps: 1 },
                Progress::TaskFinish,
                Progress::PhaseFinish,
            ]
        );
    }

    #[test]
    fn forced_format_skips_detection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poses.txt");
        fs::write(&path, DOCK4).unwrap();

        assert!(matches!(
            parse_file(&path, None, &ProgressReporter::new()),
            Err(EngineError::Format {
                source: FormatError::UnrecognizedFormat { .. }
            })
        ));
        let parsed = parse_file(&path, Some(SourceFormat::SwissDock), &ProgressReporter::new()).unwrap();
        assert_eq!(parsed.len(), 3);
    }
}
