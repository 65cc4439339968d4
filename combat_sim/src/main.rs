//! Combat simulator
//!
//! Loads a scenario, deploys its actors into one zone and drains their
//! action queues concurrently through a single `CombatEngine`, then prints
//! what each action did and where every combatant ended up.
//!
//! ```text
//! combat_sim run combat_sim/scenarios/skirmish.toml --threads 4
//! combat_sim skills --skills my_skills.toml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod scenario;
mod simulation;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use combat_core::config::load_skill_configs;
use combat_core::skill::SkillKind;
use combat_core::{default_skills, SkillRegistry};
use scenario::Scenario;
use simulation::{ActionRecord, Simulation};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "combat_sim")]
#[command(about = "Run combat scenarios through the resolution engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Skill table to load instead of the built-in one
    #[arg(long, global = true)]
    skills: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a scenario file
    Run {
        scenario: PathBuf,
        /// Overrides the scenario's seed
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads draining the queues
        #[arg(long, default_value_t = 4)]
        threads: usize,
    },
    /// List the skills in the active skill table
    Skills,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let skills = skill_table(cli.skills.as_deref())?;

    match cli.command {
        Command::Run {
            scenario,
            seed,
            threads,
        } => run(&scenario, skills, seed, threads),
        Command::Skills => {
            list_skills(&skills);
            Ok(())
        }
    }
}

fn skill_table(path: Option<&Path>) -> Result<SkillRegistry> {
    match path {
        Some(path) => load_skill_configs(path)
            .with_context(|| format!("loading skills from {}", path.display())),
        None => Ok(default_skills()),
    }
}

fn run(path: &Path, skills: SkillRegistry, seed: Option<u64>, threads: usize) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let seed = seed.or(scenario.seed).unwrap_or(0);
    info!(scenario = %path.display(), seed, "starting simulation");

    let simulation = Simulation::build(&scenario, skills, seed);
    let records = simulation.run(threads)?;
    let expired = simulation.settle();
    info!(expired, "pending events settled");

    print_actions(&records);
    print_broadcasts(&simulation);
    print_combatants(&simulation);
    Ok(())
}

fn list_skills(skills: &SkillRegistry) {
    for name in skills.names() {
        let Some(skill) = skills.get(name) else {
            continue;
        };
        let kind = match &skill.kind {
            SkillKind::Attack(attack) if attack.area.is_some() => "area attack",
            SkillKind::Attack(_) => "attack",
            SkillKind::Heal(_) => "heal",
            SkillKind::Posture(_) => "posture",
            SkillKind::Enhance(_) => "enhancement",
        };
        println!("{name:<20} {kind:<12} speed {:.2} ratio {:.2}", skill.speed, skill.speed_ratio);
    }
}

fn print_actions(records: &[ActionRecord]) {
    println!("== actions ==");
    for record in records {
        let target = record
            .action
            .target
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        let outcome = if record.accepted() {
            format!("{:.2}s", record.duration)
        } else {
            "rejected".to_string()
        };
        println!(
            "[w{}] {} {:<16} -> {:<5} {}",
            record.worker, record.action.actor, record.action.skill, target, outcome
        );
    }
    let accepted = records.iter().filter(|r| r.accepted()).count();
    println!("{accepted}/{} actions accepted", records.len());
}

fn print_broadcasts(simulation: &Simulation) {
    println!("== broadcasts ==");
    for action in simulation.broadcasts().actions() {
        println!("{}", action.summary());
    }
}

fn print_combatants(simulation: &Simulation) {
    println!("== combatants ==");
    for id in simulation.roster() {
        let Some(handle) = simulation.engine().zone().lookup(*id) else {
            continue;
        };
        let guard = handle.lock();
        let Some(creature) = guard.as_creature() else {
            continue;
        };
        let ham = &creature.ham;
        println!(
            "{} {:<14} H {}/{} A {}/{} M {}/{} {:?} states {:?} damage taken {}",
            creature.id,
            creature.name,
            ham.health.current,
            ham.health.max,
            ham.action.current,
            ham.action.max,
            ham.mind.current,
            ham.mind.max,
            creature.posture,
            creature.status.flags(),
            creature.ledger.total(),
        );
    }
}
