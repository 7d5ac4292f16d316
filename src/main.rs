//! Ray-Rust: Go board core with ladder reading and tactical ratings.
//!
//! ## Usage
//!
//! - `ray-rust` - Show a demo
//! - `ray-rust demo` - Play a short sequence and print its tactical features
//! - `ray-rust analyze b:E5 w:E6 ...` - Rate a position given as a move list
//! - `ray-rust playout --count 100` - Average score of policy playouts

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::info;

use ray_rust::config::EngineConfig;
use ray_rust::constants::{DEFAULT_BOARD_SIZE, DEFAULT_KOMI};
use ray_rust::ladder::{LadderHint, ladder_extension, ladder_hint_map};
use ray_rust::playout::playout;
use ray_rust::position::GameInfo;
use ray_rust::rating::analyze_po_rating;
use ray_rust::stone::Color;

/// Ray-Rust: Go board core with ladder reading and tactical ratings
#[derive(Parser)]
#[command(name = "ray-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a short sequence and show what the engine sees
    Demo,
    /// Rate a position given as a list of moves such as b:D4 or w:pass
    Analyze {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f64,
        /// Forbid whole-board repetition
        #[arg(long)]
        superko: bool,
        /// Color to rate for (defaults to the side to move)
        #[arg(long)]
        color: Option<String>,
        moves: Vec<String>,
    },
    /// Run policy playouts from the empty board and report the mean score
    Playout {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            size,
            komi,
            superko,
            color,
            moves,
        }) => {
            let config = EngineConfig::new()
                .with_board_size(size)
                .with_komi(komi)
                .with_superko(superko);
            let game = replay(&config, &moves)?;
            let color = match color {
                Some(c) => Color::parse(&c).ok_or_else(|| anyhow!("unknown color '{c}'"))?,
                None => game.to_move(),
            };
            report(&game, color);
        }
        Some(Commands::Playout {
            size,
            komi,
            seed,
            count,
        }) => run_playouts(&EngineConfig::new().with_board_size(size).with_komi(komi).with_seed(seed), count)?,
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

/// Build a position from moves written as `color:coord`.
fn replay(config: &EngineConfig, moves: &[String]) -> Result<GameInfo> {
    let mut game = config.new_game()?;
    for (i, mv) in moves.iter().enumerate() {
        let (c, coord) = mv
            .split_once(':')
            .ok_or_else(|| anyhow!("move {} '{mv}' should look like b:D4", i + 1))?;
        let color = Color::parse(c).ok_or_else(|| anyhow!("unknown color '{c}' in move {}", i + 1))?;
        let pos = game
            .geometry()
            .parse_coord(coord)
            .with_context(|| format!("move {}", i + 1))?;
        game.play(pos, color)
            .with_context(|| format!("move {} ({mv})", i + 1))?;
    }
    info!("replayed {} moves", moves.len());
    Ok(game)
}

/// Print the board, the tactical features for `color`, and ladder findings.
fn report(game: &GameInfo, color: Color) {
    let geo = game.geometry();
    println!("{game}");

    println!("Tactical features for {color}:");
    let analysis = analyze_po_rating(game, color);
    for &pos in geo.onboard() {
        let names = analysis.features.names(pos);
        if !names.is_empty() {
            println!("  {:<4} {}", geo.format_coord(pos), names.join(" "));
        }
    }

    let hints = ladder_hint_map(game);
    let failing: Vec<String> = geo
        .onboard()
        .iter()
        .filter(|&&p| hints[p] == LadderHint::CannotEscape)
        .map(|&p| geo.format_coord(p))
        .collect();
    if !failing.is_empty() {
        println!("Failing ladder escapes for {}: {}", game.to_move(), failing.join(" "));
    }

    let marks = ladder_extension(game, color);
    for &pos in geo.onboard() {
        if marks[pos] > 0 {
            println!("  {} runs into a dead ladder ({} stones)", geo.format_coord(pos), marks[pos]);
        }
    }
}

fn run_demo() -> Result<()> {
    println!("Ray-Rust: Go board core with ladder reading\n");

    // A black pair on the second line in atari, chased toward the edge.
    let moves: Vec<String> = [
        "b:C2", "w:B2", "b:D2", "w:C3", "b:J9", "w:D3", "b:H9", "w:E3", "b:G9", "w:C1", "b:F9", "w:D1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let game = replay(&EngineConfig::new(), &moves)?;
    report(&game, Color::Black);
    Ok(())
}

fn run_playouts(config: &EngineConfig, count: usize) -> Result<()> {
    let mut rng = config.rng();
    let mut total = 0.0;
    let mut black_wins = 0;
    for i in 0..count {
        let mut game = config.new_game()?;
        let score = playout(&mut game, &mut rng, &config.weights);
        if score > 0.0 {
            black_wins += 1;
        }
        total += score;
        info!("playout {}: {score:+.1} after {} moves", i + 1, game.moves());
    }
    if count > 0 {
        println!(
            "{count} playouts on {}x{}: mean score {:+.2} for Black, Black won {black_wins}",
            config.board_size,
            config.board_size,
            total / count as f64
        );
    }
    Ok(())
}
