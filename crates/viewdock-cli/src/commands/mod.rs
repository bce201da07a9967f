pub mod export;
pub mod extract;
pub mod load;

use crate::cli::{InputArgs, SortArgs};
use crate::config::{self, build_load_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use std::path::Path;
use tracing::info;
use viewdock::engine::error::EngineError;
use viewdock::engine::progress::ProgressReporter;
use viewdock::workflows::session::Session;

/// Loads the input of a command into a fresh session and applies the requested
/// ordering to every object it produced.
fn load_into_session(
    input: &InputArgs,
    sort: &SortArgs,
    config_path: Option<&Path>,
    set_values: &[String],
) -> Result<(Session, Vec<String>)> {
    let file_config = config::read_file_config(config_path, set_values)?;
    let load_config = build_load_config(input, &file_config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Loading docking results from {:?}", &input.input);
    let mut session: Session = Session::default();
    let names = session.load(&input.input, &load_config, &reporter)?;

    if let Some(field) = &sort.sort {
        for name in &names {
            if let Some(store) = session.store_mut(name) {
                store
                    .sort_by(field, sort.descending)
                    .map_err(EngineError::from)?;
            }
        }
    }
    Ok((session, names))
}
