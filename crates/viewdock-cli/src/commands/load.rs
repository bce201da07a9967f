use super::load_into_session;
use crate::cli::LoadArgs;
use crate::error::Result;
use crate::utils::table::render_store;
use std::path::Path;
use tracing::info;

pub fn run(args: LoadArgs, config_path: Option<&Path>, set_values: &[String]) -> Result<()> {
    let (session, names) = load_into_session(&args.input, &args.sort, config_path, set_values)?;

    for name in &names {
        let Some(store) = session.store(name) else {
            continue;
        };
        info!("Printing object '{}' ({} poses)", name, store.len());
        println!("Object '{}': {} pose(s)", name, store.len());
        if let Some(key) = store.sort_key() {
            println!(
                "Sorted by '{}' ({})",
                key.field,
                if key.descending { "descending" } else { "ascending" }
            );
        }
        if store.is_empty() {
            println!("  (no poses)");
        } else {
            print!("{}", render_store(store, args.top));
        }
        println!();
    }
    Ok(())
}
