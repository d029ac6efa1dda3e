//! Checkpoint metadata patches

use anyhow::{Context, Result};
use log::info;

use memshift::cli::MetaAction;
use memshift_criu::{read_build_id, CoreImage, CriuImage, FilesImage};

pub fn run(action: MetaAction) -> Result<()> {
    match action {
        MetaAction::SetAlive { core_json } => {
            let mut image = CoreImage::load(&core_json)?;
            let updated = image.mark_alive();
            if updated == 0 {
                println!("No tasks found to update");
                return Ok(());
            }
            image.save(&core_json)?;
            println!("Successfully updated {updated} task(s) to 'Alive'");
        }

        MetaAction::SetName { files_json, library, new_name } => {
            let mut image = FilesImage::load(&files_json)?;
            image.set_name(&library, &new_name)?;
            image.save(&files_json)?;
            println!("Updated name to {new_name}.");
        }

        MetaAction::SetSize { files_json, library, size } => {
            let mut image = FilesImage::load(&files_json)?;
            image.set_size(&library, size)?;
            image.save(&files_json)?;
            println!("Updated size of {library} to {size} bytes.");
        }

        MetaAction::SetBuildId { files_json, library } => {
            let build_id = read_build_id(&library)
                .with_context(|| format!("Failed to read build ID of {}", library.display()))?;
            info!("build id words: {build_id:?}");

            let mut image = FilesImage::load(&files_json)?;
            image.set_build_id(&library.to_string_lossy(), build_id.clone())?;
            image.save(&files_json)?;
            println!("Updated build ID to {build_id:?}.");
        }
    }
    Ok(())
}
