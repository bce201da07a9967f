use super::load_into_session;
use crate::cli::{ExtractArgs, SortArgs};
use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use viewdock::core::models::ids::PoseId;

pub fn run(args: ExtractArgs, config_path: Option<&Path>, set_values: &[String]) -> Result<()> {
    let (session, names) =
        load_into_session(&args.input, &SortArgs::default(), config_path, set_values)?;

    let object = match (&args.object, names.as_slice()) {
        (Some(object), _) => object.clone(),
        (None, [only]) => only.clone(),
        (None, _) => {
            return Err(CliError::Argument(format!(
                "The input produced several objects ({}); choose one with --object",
                names.join(", ")
            )));
        }
    };

    let id = PoseId(args.id);
    let model_ref = session.select(&object, id)?;
    let model = session.model(&object, id)?;
    info!(
        "Writing pose {} of '{}' (model {}) to {:?}",
        id, object, model_ref, &args.output
    );

    let mut writer = BufWriter::new(File::create(&args.output)?);
    model.write_to(&mut writer)?;
    writer.flush()?;

    println!(
        "Pose {} of '{}' written to: {}",
        id,
        object,
        args.output.display()
    );
    Ok(())
}
