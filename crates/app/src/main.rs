use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use piano_roll_core::{
    register_piano_roll_as, AppConfig, ComponentRegistry, PianoRollError, TimelineState,
    C_MAJ_NOTE_STRINGS, D_LYDIAN_NOTE_STRINGS, SUBWAY_COLORS,
};
use tracing_subscriber::EnvFilter;

fn main() -> piano_roll_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Tables => run_tables(),
        Commands::Validate { input } => run_validate(&input),
        Commands::Init { output } => run_init(&config, &output),
        Commands::Register => run_register(&config),
    }
}

fn run_tables() -> piano_roll_core::Result<()> {
    println!("colors:        {}", SUBWAY_COLORS.join(" "));
    println!("C major:       {}", C_MAJ_NOTE_STRINGS.join(" "));
    println!("D lydian:      {}", D_LYDIAN_NOTE_STRINGS.join(" "));
    Ok(())
}

fn run_validate(input: &Path) -> piano_roll_core::Result<()> {
    tracing::info!(?input, "validating timeline");
    let raw = std::fs::read_to_string(input)?;
    let state = TimelineState::from_json(&raw)?;
    state.validate()?;
    println!(
        "ok: {} notes, {} selected, grid {}/{} over {} units",
        state.notes().len(),
        state.selected_notes().count(),
        state.grid.time_signature,
        state.grid.subdivision,
        state.grid.max_length,
    );
    Ok(())
}

fn run_init(config: &AppConfig, output: &Path) -> piano_roll_core::Result<()> {
    tracing::info!(?output, "writing empty timeline");
    let state = TimelineState::new(config.grid.clone());
    std::fs::write(output, state.to_json_pretty()?)?;
    Ok(())
}

fn run_register(config: &AppConfig) -> piano_roll_core::Result<()> {
    let mut registry = ComponentRegistry::new();
    for attempt in 1..=2 {
        let defined =
            register_piano_roll_as(&mut registry, &config.tag_name, config.grid.clone())?;
        tracing::info!(attempt, defined, tag = %config.tag_name, "registration");
    }

    if registry.get(&config.tag_name).is_none() {
        return Err(PianoRollError::NotDefined(config.tag_name.clone()));
    }
    println!("{} defined ({} component(s) registered)", config.tag_name, registry.len());
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Piano roll component tooling", long_about = None)]
struct Cli {
    /// Optional JSON config overriding the default grid and tag name.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the colour palette and note-name tables.
    Tables,
    /// Check a timeline state JSON file against the note and grid invariants.
    Validate {
        /// Path to the timeline JSON.
        input: PathBuf,
    },
    /// Write an empty timeline using the configured grid.
    Init {
        /// Output path for the timeline JSON.
        output: PathBuf,
    },
    /// Register the piano roll component twice and report the outcome.
    Register,
}
