use clap::Parser;
use color_eyre::Result;
use sgt::{
    Config, Profile, Storage, Store,
    cli::{Cli, Commands},
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Open the snapshot storage and hydrate the store from it; a missing or
    // malformed snapshot falls back to the default state
    let storage_path = config.get_storage_path();
    let storage = Storage::open(
        storage_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Storage path contains invalid UTF-8"))?,
    )?;
    let mut store = Store::new(storage.load());

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = sgt::tui::App::new(config, store, storage);
            sgt::tui::run_event_loop(app)?;
        }
        Commands::AddSession {
            subject,
            duration,
            activity,
            notes,
        } => {
            sgt::cli::handle_add_session(subject, duration, activity, notes, &mut store, &storage)?;
        }
        Commands::AddTask {
            title,
            subject,
            due,
            priority,
            estimate,
        } => {
            sgt::cli::handle_add_task(title, subject, due, priority, estimate, &mut store, &storage)?;
        }
        Commands::AddGoal {
            title,
            goal_type,
            target_time,
            target_tasks,
            subject,
            due,
        } => {
            sgt::cli::handle_add_goal(
                title,
                goal_type,
                target_time,
                target_tasks,
                subject,
                due,
                &mut store,
                &storage,
            )?;
        }
        Commands::AddSubject { name, color } => {
            sgt::cli::handle_add_subject(name, color, &mut store, &storage)?;
        }
    }

    Ok(())
}
