use anyhow::Context;
use clap::Parser;

use skyblock::config::Args;
use skyblock::{SeedSource, WorldManager};
use skyblock_gen::TreeKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let species = TreeKind::from_selector(&args.tree_type).species();
    log::info!("Selected tree type: {}", species.name());

    let seeds = match args.seed {
        Some(seed) => {
            log::info!("Using base seed {}", seed);
            SeedSource::new(seed)
        }
        None => SeedSource::from_entropy(),
    };

    let mut manager = WorldManager::new(&args.world_dir, args.compression.into(), species, seeds);
    for name in &args.worlds {
        manager
            .new_world(name)
            .with_context(|| format!("Could not bootstrap world {}", name))?;
    }
    manager.save_all()?;

    log::info!(
        "{} world(s) ready under {}. Press Ctrl+C to stop",
        manager.world_names().len(),
        args.world_dir.display()
    );
    tokio::signal::ctrl_c().await.context("Failed to install CTRL+C signal handler")?;

    manager.close()?;
    log::info!("All worlds saved");
    Ok(())
}
