//! Run command - connect to a simulator and learn for N episodes

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::{
    adapters::{DriveMode, TcpSimulator},
    engine::{EpisodeRunner, JsonlTraceObserver, ProgressObserver, RunConfig, UpdateMode},
    grid::WorldModel,
    q_learning::{GreedyScope, LearningConfig, QLearningAgent},
};

#[derive(Parser, Debug)]
#[command(about = "Run learning episodes against a remote grid world")]
pub struct RunArgs {
    /// Simulator host
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Simulator port
    #[arg(long, short = 'p', default_value_t = 50001)]
    pub port: u16,

    /// Number of learning episodes
    #[arg(long, short = 'e', default_value_t = 50)]
    pub episodes: usize,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Learning rate α (0.0-1.0); 1.0 replaces values outright
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,

    /// Exploration rate ε (0.0-1.0)
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// When value updates are applied (episodic or stepwise)
    #[arg(long, short = 'm', default_value = "episodic")]
    pub mode: String,

    /// Action set for the greedy branch (candidates or all)
    #[arg(long, default_value = "candidates")]
    pub greedy_scope: String,

    /// Allow exploration to immediately retrace the previous step
    #[arg(long, default_value_t = false)]
    pub allow_backtrack: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Color used to mark visited tiles
    #[arg(long, default_value = "coral")]
    pub mark_color: String,

    /// Render greedy-policy arrows after each episode
    #[arg(long, default_value_t = false)]
    pub policy_arrows: bool,

    /// How moves are driven (direct or turn-and-step)
    #[arg(long, default_value = "direct")]
    pub drive: String,

    /// Per-request reply timeout in seconds (0 waits forever)
    #[arg(long, default_value_t = 30)]
    pub reply_timeout_secs: u64,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional JSONL trace of every transition
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Optional path for a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Parse update mode from string (e.g., "episodic" or "stepwise")
fn parse_update_mode(s: &str) -> Result<UpdateMode> {
    match s.to_lowercase().as_str() {
        "episodic" => Ok(UpdateMode::Episodic),
        "stepwise" => Ok(UpdateMode::Stepwise),
        other => Err(anyhow!(
            "Unknown update mode '{other}'. Use 'episodic' or 'stepwise'"
        )),
    }
}

/// Parse greedy scope from string (e.g., "candidates" or "all")
fn parse_greedy_scope(s: &str) -> Result<GreedyScope> {
    match s.to_lowercase().as_str() {
        "candidates" => Ok(GreedyScope::Candidates),
        "all" | "all-directions" => Ok(GreedyScope::AllDirections),
        other => Err(anyhow!(
            "Unknown greedy scope '{other}'. Use 'candidates' or 'all'"
        )),
    }
}

/// Parse drive mode from string (e.g., "direct" or "turn-and-step")
fn parse_drive_mode(s: &str) -> Result<DriveMode> {
    match s.to_lowercase().as_str() {
        "direct" => Ok(DriveMode::Direct),
        "turn-and-step" | "turn" => Ok(DriveMode::TurnAndStep),
        other => Err(anyhow!(
            "Unknown drive mode '{other}'. Use 'direct' or 'turn-and-step'"
        )),
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let update_mode = parse_update_mode(&args.mode)?;
    let greedy_scope = parse_greedy_scope(&args.greedy_scope)?;
    let drive_mode = parse_drive_mode(&args.drive)?;
    let reply_timeout = if args.reply_timeout_secs == 0 {
        None
    } else {
        Some(Duration::from_secs(args.reply_timeout_secs))
    };

    let addr = format!("{}:{}", args.host, args.port);
    println!("Connecting to {addr}...");
    let mut sim = TcpSimulator::connect(&addr, reply_timeout, drive_mode)?;

    let world = WorldModel::fetch(&mut sim)?;
    println!(
        "World: {}x{}, goal at {}",
        world.width(),
        world.height(),
        world.goal()
    );

    let config = LearningConfig {
        gamma: args.gamma,
        alpha: args.alpha,
        epsilon: args.epsilon,
        no_turning_back: !args.allow_backtrack,
        greedy_scope,
    };
    let mut agent = QLearningAgent::new(world, config);
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }

    let run_config = RunConfig {
        episodes: args.episodes,
        update_mode,
        mark_color: args.mark_color.clone(),
        draw_policy_arrows: args.policy_arrows,
    };
    let mut runner = EpisodeRunner::new(run_config);
    if !args.no_progress {
        runner = runner.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(ref trace_path) = args.trace {
        runner = runner.with_observer(Box::new(JsonlTraceObserver::new(trace_path)?));
    }

    let result = runner.run(&mut agent, &mut sim)?;

    println!("\n=== Run Complete ===");
    println!("Episodes: {}", result.episodes);
    println!(
        "Goal terminations: {} ({:.1}%)",
        result.goal_terminations,
        if result.episodes > 0 {
            result.goal_terminations as f64 / result.episodes as f64 * 100.0
        } else {
            0.0
        }
    );
    println!("Target terminations: {}", result.target_terminations);
    println!("Average episode length: {:.1} steps", result.avg_episode_steps);

    if let Some(ref summary_path) = args.summary {
        result.save(summary_path)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
