use friendly_pics::settings::SettingsStore;
use friendly_pics::state::AppState;
use log::{info, warn};
use std::path::PathBuf;

fn startup_folder_from_args() -> Option<PathBuf> {
    std::env::args_os()
        .skip(1)
        .filter(|arg| !arg.to_string_lossy().starts_with('-'))
        .map(PathBuf::from)
        .find(|path| path.is_dir())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let settings = SettingsStore::open_default()?;
    let mut app_state = AppState::new(settings);

    if let Some(folder) = startup_folder_from_args() {
        match app_state.open_folder(&folder) {
            Ok(model) => {
                let with_thumbnails = model.prefetch_thumbnails();
                for entry in model.loaded_entries() {
                    println!("{}", entry.name());
                }
                info!(
                    "{} of {} files listed, {} with thumbnails",
                    model.loaded_count(),
                    model.total_count(),
                    with_thumbnails
                );
            }
            Err(e) => warn!("Failed to open {}: {}", folder.display(), e),
        }
    }

    app_state.settings().save()?;

    Ok(())
}
