use std::path::PathBuf;

use clap::Parser;
use dungeon_layout::constants::GENERATION_DEFAULT_TICK;
use dungeon_layout::rooms::RoomModifier;
use dungeon_layout::scatter::OverlapResolver;
use dungeon_layout::separation::{AabbSeparation, NoOverlap};
use dungeon_layout::volume::SizeClass;
use dungeon_layout::{DungeonGenerator, DungeonLayout, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a procedural dungeon layout", long_about = None)]
struct Cli {
    /// JSON generator config. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed overriding the config; without either a clock seed is used.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds per overlap-resolution tick.
    #[arg(long, default_value_t = GENERATION_DEFAULT_TICK)]
    dt: f32,
    /// Print the whole layout as JSON instead of a summary.
    #[arg(long)]
    json: bool,
    /// Skip volume separation and treat every volume as non-overlapping.
    #[arg(long)]
    no_separation: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let generator = DungeonGenerator::new(config)?;
    let mut resolver: Box<dyn OverlapResolver> = if cli.no_separation {
        Box::new(NoOverlap)
    } else {
        Box::new(AabbSeparation::default())
    };
    let layout = generator.generate(resolver.as_mut(), cli.dt)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print_summary(&layout);
    }
    Ok(())
}

fn print_summary(layout: &DungeonLayout) {
    let main = layout
        .volumes
        .iter()
        .filter(|v| v.class == SizeClass::Main)
        .count();
    println!("seed       {}", layout.seed);
    println!(
        "volumes    {} kept, {} main, {} discarded",
        layout.volumes.len(),
        main,
        layout.discarded.len()
    );
    println!("tree       {} edges", layout.tree.len());
    println!(
        "corridors  {} segments, {} meshes",
        layout.segments.len(),
        layout.corridors.len()
    );

    let grouped = layout.rooms.by_modifier();
    for modifier in RoomModifier::ALL {
        let count = grouped.get(&modifier).map_or(0, Vec::len);
        println!("rooms      {modifier:?}: {count}");
    }
    for (label, class) in [
        ("start", SizeClass::StaircaseDown),
        ("end", SizeClass::StaircaseUp),
    ] {
        if let Some(room) = layout.rooms.staircase(class) {
            println!("{label:<10} room {} at {}", room.id, room.center);
        }
    }
    for corridor in &layout.corridors {
        println!(
            "  {} ({:.1} long, {} triangles)",
            corridor.name,
            corridor.segment.length(),
            corridor.mesh.triangle_count()
        );
    }
}
