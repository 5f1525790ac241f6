//! Headless Encounter Runner
//!
//! Seeds a small world, scores the attacker's leverage, runs one combat
//! session to completion, and prints the breakdown and result. Development
//! harness only; the surrounding application owns the real surfaces.

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use hexhive::core::config::EngineConfig;
use hexhive::core::error::Result;
use hexhive::core::types::{CharacterId, Faction, ResourceType, TerritoryId, Vec2};
use hexhive::engine::registry::SessionRegistry;
use hexhive::state::character::{Character, TraitType};
use hexhive::state::repository::{InMemoryStore, RecordStore};
use hexhive::state::snapshot::{GameStateSnapshot, InMemorySnapshots, MissionRecord};
use hexhive::state::territory::Territory;

/// Headless Encounter Runner - one leverage-scaled combat to completion
#[derive(Parser, Debug)]
#[command(name = "encounter_runner")]
#[command(about = "Run a leverage-scaled encounter and print the result")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Attacker's Strength trait level
    #[arg(long, default_value_t = 3)]
    strength: u32,

    /// Attacker's Agility trait level
    #[arg(long, default_value_t = 2)]
    agility: u32,

    /// Fight over the first seeded territory instead of open ground
    #[arg(long)]
    territorial: bool,

    /// Optional TOML engine config
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Print every round as it resolves
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    seed: u64,
    leverage_total: f32,
    leverage_efficiency: f32,
    active_categories: usize,
    winner: String,
    rounds: u32,
    total_damage: u64,
    winner_experience: u64,
    rewards_pending: bool,
    territory_influence: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("hexhive=info")
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args, seed, config))
}

async fn run(args: Args, seed: u64, config: EngineConfig) -> Result<()> {
    let characters: Arc<InMemoryStore<CharacterId, Character>> = Arc::new(InMemoryStore::new());
    let territories: Arc<InMemoryStore<TerritoryId, Territory>> = Arc::new(InMemoryStore::new());
    let snapshots = Arc::new(InMemorySnapshots::new());

    // Attacker with tunable traits, defender with a fixed modest loadout
    let mut attacker = Character::new("Vex", Faction::Sun);
    attacker.set_trait(TraitType::Strength, args.strength);
    attacker.set_trait(TraitType::Agility, args.agility);
    attacker.add_resource(ResourceType::Energy, 120);
    attacker.add_resource(ResourceType::Minerals, 60);

    let mut defender = Character::new("Korr", Faction::Ocean);
    defender.set_trait(TraitType::Strength, 2);

    let world = seed_territories(attacker.faction);
    let contested_id = world.first().map(|t| t.id);
    let snapshot = build_snapshot(&attacker, &world);

    let attacker_id = attacker.id;
    let defender_id = defender.id;
    characters.insert(attacker_id, attacker);
    characters.insert(defender_id, defender);
    for territory in world {
        territories.insert(territory.id, territory);
    }
    snapshots.set(snapshot.clone());

    let registry = SessionRegistry::new(config, characters.clone(), territories, snapshots, seed)?;

    let leverage = registry.calculate_leverage(&snapshot)?;
    if args.format == "text" {
        println!("Leverage for {}", snapshot.character.name);
        println!("================");
        println!("Total: {:.3} (efficiency {:.3})", leverage.total, leverage.efficiency);
        for (category, bonuses) in leverage.bonuses.iter() {
            for bonus in bonuses {
                println!(
                    "  {:<20} {:>6.3} / {:.2}  [{:>5.1}%]  {}",
                    category.label(),
                    bonus.value,
                    bonus.max,
                    bonus.progress,
                    bonus.description
                );
            }
        }
        if !leverage.potential.actions.is_empty() {
            println!("Next best actions:");
            for action in &leverage.potential.actions {
                println!(
                    "  +{:.3} ({:?}) {}",
                    action.impact, action.difficulty, action.description
                );
            }
        }
        println!();
    }

    let territory = if args.territorial { contested_id } else { None };
    let combat_id = registry
        .initiate_combat(attacker_id, defender_id, territory)
        .await?;

    let result = if args.verbose {
        loop {
            let outcome = registry.step_round(combat_id).await?;
            println!(
                "round {:>3}: attacker dealt {}, took {}",
                outcome.round,
                outcome.attacker_damage,
                outcome
                    .defender_damage
                    .map_or("nothing".to_string(), |d| d.to_string())
            );
            if outcome.finished {
                break;
            }
        }
        registry.run_to_completion(combat_id).await?
    } else {
        registry.run_to_completion(combat_id).await?
    };

    let winner_name = characters
        .read(&result.winner)
        .map(|record| record.value.name)
        .unwrap_or_else(|| "unknown".into());

    let report = RunReport {
        seed,
        leverage_total: leverage.total,
        leverage_efficiency: leverage.efficiency,
        active_categories: leverage.bonuses.active_categories(),
        winner: winner_name,
        rounds: result.rounds,
        total_damage: result.total_damage,
        winner_experience: result
            .rewards
            .as_ref()
            .map_or(0, |bundle| bundle.winner_experience),
        rewards_pending: result.rewards_pending,
        territory_influence: result.territory_influence.map(|i| i.amount),
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Encounter Result");
            println!("================");
            println!("Winner: {}", report.winner);
            println!("Rounds: {}", report.rounds);
            println!("Total damage: {}", report.total_damage);
            println!("Winner experience: {}", report.winner_experience);
            if let Some(influence) = report.territory_influence {
                println!("Territory influence: {influence:.1}");
            }
            if report.rewards_pending {
                println!("(rewards pending - persistence retry required)");
            }
            println!("Seed: {}", report.seed);
        }
    }

    Ok(())
}

/// Eight named sectors; the attacker's faction holds the first three
fn seed_territories(faction: Faction) -> Vec<Territory> {
    let names = [
        "Alpha Sector",
        "Beta Quadrant",
        "Gamma Zone",
        "Delta Region",
        "Epsilon Field",
        "Zeta Plains",
        "Eta Valley",
        "Theta Mountains",
    ];

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut territory = Territory::new(
                *name,
                Vec2::new((i % 4) as f32 * 150.0, (i / 4) as f32 * 150.0),
            );
            territory.elevation = (i as f32) * 10.0;
            territory.resources = vec![ResourceType::ALL[i % ResourceType::ALL.len()]];
            if i < 3 {
                territory.controlled_by = Some(faction);
            }
            territory
        })
        .collect()
}

fn build_snapshot(attacker: &Character, world: &[Territory]) -> GameStateSnapshot {
    let mut snapshot = GameStateSnapshot::for_character(attacker.clone());
    snapshot.territories = world.to_vec();
    snapshot.missions = vec![
        MissionRecord { id: "survey-alpha".into(), progress: 100.0 },
        MissionRecord { id: "hold-the-line".into(), progress: 45.0 },
    ];
    snapshot.achievements = vec!["first_claim".into()];
    snapshot.social.alliance_size = 2;
    snapshot.research.completed = vec!["resource_efficiency".into()];
    snapshot.combat_history.rating = 50.0;
    snapshot.combat_history.wins = 2;
    snapshot.combat_history.losses = 0;
    snapshot
}
