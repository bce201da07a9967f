use super::load_into_session;
use crate::cli::ExportArgs;
use crate::config::{build_export_config, read_file_config};
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: ExportArgs, config_path: Option<&Path>, set_values: &[String]) -> Result<()> {
    let file_config = read_file_config(config_path, set_values)?;
    let export_config = build_export_config(&args, &file_config)?;

    let (session, names) = load_into_session(&args.input, &args.sort, config_path, set_values)?;
    if names.is_empty() {
        return Err(CliError::Argument(format!(
            "No objects were loaded from {:?}",
            args.input.input
        )));
    }

    for name in &names {
        let output = output_path_for(&args.output, name, names.len());
        info!("Exporting object '{}' to {:?}", name, &output);
        session.export_docked_data(
            name,
            &output,
            args.output_format.as_deref(),
            &export_config,
        )?;
        println!("Data of '{}' exported to: {}", name, output.display());
    }
    Ok(())
}

/// With several objects (SwissDock split mode) every object gets its own file,
/// named after the object and keeping the requested extension.
fn output_path_for(output: &Path, object: &str, object_count: usize) -> PathBuf {
    if object_count <= 1 {
        return output.to_path_buf();
    }
    let file_name = match output.extension() {
        Some(ext) => format!("{}.{}", object, ext.to_string_lossy()),
        None => object.to_string(),
    };
    output.with_file_name(file_name)
}
