use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context as _, eyre};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;

use twist_ladders::cli::config::CliConfig;
use twist_ladders::cli::output::{
    OutputFormat, event_colored, format_relative_time, format_timestamp, format_uuid_short,
    print_field, print_frame, print_json_error, print_success, print_table,
};
use twist_ladders::engine::{
    Board, CATALOG, EventKind, GameMode, PerPlayer, PlayerId, PowerUpId, RandomSource, Rules,
    SeededRandom, ThreadRandom,
};
use twist_ladders::frame::snapshot_to_frame;
use twist_ladders::runner::{GameResult, GameRunner};
use twist_ladders::session::{ActivationOutcome, RollOutcome, Session};

#[derive(Parser)]
#[command(name = "ladders")]
#[command(about = "Snakes & Ladders with twists", long_about = None)]
struct Cli {
    /// Output format: human or json (defaults to human on a terminal)
    #[arg(long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game at the terminal
    Play {
        /// Game mode (classic, twist)
        #[arg(long)]
        mode: Option<String>,
        /// Seed the dice for a reproducible game
        #[arg(long)]
        seed: Option<u64>,
        /// Let the computer roll for player 2
        #[arg(long)]
        vs_computer: bool,
    },
    /// Play many games unattended and report totals
    Simulate {
        /// Number of games to play
        #[arg(long, default_value = "100")]
        games: u32,
        /// Seed for the first game; each later game uses the next seed
        #[arg(long)]
        seed: Option<u64>,
        /// Game mode (classic, twist)
        #[arg(long)]
        mode: Option<String>,
    },
    /// Show the snakes and ladders on the board
    Board,
    /// List the power-ups a twist game can offer
    Powerups,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current config
    Show,
    /// Set a config value
    Set {
        /// One of mode, seed, roll_delay_ms, vs_computer, max_rolls
        key: String,
        value: String,
    },
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(cli.format.as_deref()).map_err(|e| eyre!(e))?;

    let result = match cli.command {
        Commands::Play {
            mode,
            seed,
            vs_computer,
        } => handle_play(format, mode, seed, vs_computer).await,
        Commands::Simulate { games, seed, mode } => handle_simulate(format, games, seed, mode),
        Commands::Board => handle_board(format),
        Commands::Powerups => handle_powerups(format),
        Commands::Config { command } => handle_config_command(format, command),
    };

    if let Err(e) = &result
        && format == OutputFormat::Json
    {
        print_json_error(&format!("{e:#}"));
    }

    result
}

fn parse_mode(mode: Option<String>, config: &CliConfig) -> color_eyre::Result<GameMode> {
    match mode {
        Some(mode) => GameMode::from_str(&mode)
            .ok_or_else(|| eyre!("Invalid mode '{}'. Use 'classic' or 'twist'.", mode)),
        None => Ok(config.mode()),
    }
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource + Send> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

// ============================================================================
// Play
// ============================================================================

const PLAY_HELP: &str = "Commands: [enter]/roll, spin, 1-6 or a power-up name to pick, reset, classic, twist, quit";

async fn handle_play(
    format: OutputFormat,
    mode: Option<String>,
    seed: Option<u64>,
    vs_computer: bool,
) -> color_eyre::Result<()> {
    let config = CliConfig::load()?;
    let mode = parse_mode(mode, &config)?;
    let vs_computer = vs_computer || config.vs_computer();
    let seed = seed.or(config.seed);

    let mut session = Session::new(Rules::for_mode(mode), random_source(seed));
    let runner = GameRunner::new().with_max_rolls(config.max_rolls());

    if format == OutputFormat::Human {
        print_field("Session", &format_uuid_short(session.id()));
        print_field("Mode", mode.as_str());
        if vs_computer {
            print_field("Player 2", "computer");
        }
        println!("{PLAY_HELP}");
    }
    show(&session, format)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let computer_turn = vs_computer
            && !session.is_game_over()
            && session.state().current_player() == PlayerId::Two;

        if computer_turn {
            sleep(config.roll_delay()).await;
            if !runner.step(&mut session) {
                return Err(eyre!(
                    "Game stopped after {} rolls without a winner",
                    session.state().rolls_count()
                ));
            }
            show(&session, format)?;
            continue;
        }

        let Some(line) = lines
            .next_line()
            .await
            .wrap_err("Failed to read from stdin")?
        else {
            break;
        };

        match line.trim().to_lowercase().as_str() {
            "" | "r" | "roll" => {
                if let RollOutcome::Ignored(reason) = session.request_roll() {
                    println!("Can't roll: {}", reason.as_str());
                    continue;
                }
            }
            "s" | "spin" => {
                if let ActivationOutcome::Ignored(reason) = session.spin_power_up_wheel() {
                    println!("Can't spin: {}", reason.as_str());
                    continue;
                }
            }
            "reset" => session.reset(),
            "classic" => session.set_mode(GameMode::Classic),
            "twist" => session.set_mode(GameMode::Twist),
            "q" | "quit" | "exit" => break,
            "h" | "help" | "?" => {
                println!("{PLAY_HELP}");
                continue;
            }
            choice => {
                let Some(id) = pick_power_up(choice) else {
                    println!("Unknown command '{choice}'. {PLAY_HELP}");
                    continue;
                };
                if let ActivationOutcome::Ignored(reason) = session.activate_power_up(id.power_up())
                {
                    println!("Can't activate: {}", reason.as_str());
                    continue;
                }
            }
        }

        show(&session, format)?;
    }

    if format == OutputFormat::Human {
        print_field(
            "Session started",
            &format!(
                "{} ({})",
                format_timestamp(session.started_at()),
                format_relative_time(session.started_at())
            ),
        );
    }

    Ok(())
}

/// A 1-based wheel position or a power-up name
fn pick_power_up(choice: &str) -> Option<PowerUpId> {
    if let Ok(n) = choice.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| PowerUpId::all().nth(i));
    }
    PowerUpId::from_str(choice)
}

fn show<R: RandomSource>(session: &Session<R>, format: OutputFormat) -> color_eyre::Result<()> {
    let frame = snapshot_to_frame(&session.snapshot(), session.state().rules());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&frame)?),
        OutputFormat::Human => {
            print_frame(&frame);
            if session.offer_pending() {
                println!("Pick a power-up (1-6) or spin the wheel:");
                for (i, power_up) in CATALOG.iter().enumerate() {
                    println!(
                        "  {}. {} {} - {}",
                        i + 1,
                        power_up.emoji,
                        power_up.display_name,
                        power_up.description
                    );
                }
            }
            if let Some(winner) = frame.winner {
                print_success(&format!("Player {winner} wins! Type 'reset' to play again."));
            }
        }
    }

    Ok(())
}

// ============================================================================
// Simulate
// ============================================================================

#[derive(Debug, Default, Serialize)]
struct SimulationSummary {
    mode: GameMode,
    games: u32,
    unfinished: u32,
    total_rolls: u64,
    wins: PerPlayer<u32>,
    snake_bites: PerPlayer<u32>,
    ladders_climbed: PerPlayer<u32>,
    powerups_used: PerPlayer<u32>,
}

impl SimulationSummary {
    fn record(&mut self, result: &GameResult) {
        self.games += 1;
        self.total_rolls += u64::from(result.rolls);
        match result.winner {
            Some(winner) => *self.wins.get_mut(winner) += 1,
            None => self.unfinished += 1,
        }
        for player in [PlayerId::One, PlayerId::Two] {
            *self.snake_bites.get_mut(player) += result.stats.snake_bites.get(player);
            *self.ladders_climbed.get_mut(player) += result.stats.ladders_climbed.get(player);
            *self.powerups_used.get_mut(player) += result.stats.powerups_used.get(player);
        }
    }

    fn average_rolls(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_rolls as f64 / f64::from(self.games)
    }
}

fn handle_simulate(
    format: OutputFormat,
    games: u32,
    seed: Option<u64>,
    mode: Option<String>,
) -> color_eyre::Result<()> {
    let config = CliConfig::load()?;
    let mode = parse_mode(mode, &config)?;
    let seed = seed.or(config.seed);
    let runner = GameRunner::new().with_max_rolls(config.max_rolls());

    let mut summary = SimulationSummary {
        mode,
        ..Default::default()
    };

    for game in 0..games {
        let random = random_source(seed.map(|s| s.wrapping_add(u64::from(game))));
        let mut session = Session::new(Rules::for_mode(mode), random);
        summary.record(&runner.play_out(&mut session));
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Human => {
            print_field("Mode", mode.as_str());
            print_field("Games", &summary.games.to_string());
            print_field("Average rolls", &format!("{:.1}", summary.average_rolls()));
            if summary.unfinished > 0 {
                print_field("Unfinished", &summary.unfinished.to_string());
            }

            let rows = [PlayerId::One, PlayerId::Two]
                .into_iter()
                .map(|player| {
                    vec![
                        player.to_string(),
                        summary.wins.get(player).to_string(),
                        summary.snake_bites.get(player).to_string(),
                        summary.ladders_climbed.get(player).to_string(),
                        summary.powerups_used.get(player).to_string(),
                    ]
                })
                .collect();
            print_table(
                vec!["Player", "Wins", "Snake Bites", "Ladders", "Power-ups"],
                rows,
            );
        }
    }

    Ok(())
}

// ============================================================================
// Board and power-ups
// ============================================================================

fn handle_board(format: OutputFormat) -> color_eyre::Result<()> {
    let board = Board::standard();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&board)?),
        OutputFormat::Human => {
            let mut rows: Vec<Vec<String>> = board
                .snakes()
                .map(|(head, tail)| {
                    vec![
                        event_colored(EventKind::Snake, "Snake"),
                        head.to_string(),
                        tail.to_string(),
                    ]
                })
                .collect();
            rows.extend(board.ladders().map(|(base, top)| {
                vec![
                    event_colored(EventKind::Ladder, "Ladder"),
                    base.to_string(),
                    top.to_string(),
                ]
            }));
            print_table(vec!["Kind", "From", "To"], rows);
        }
    }

    Ok(())
}

fn handle_powerups(format: OutputFormat) -> color_eyre::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&CATALOG)?),
        OutputFormat::Human => {
            let rows = CATALOG
                .iter()
                .map(|power_up| {
                    vec![
                        power_up.emoji.to_string(),
                        power_up.display_name.to_string(),
                        power_up.id.as_str().to_string(),
                        power_up.description.to_string(),
                    ]
                })
                .collect();
            print_table(vec!["", "Name", "Id", "Effect"], rows);
        }
    }

    Ok(())
}

// ============================================================================
// Config
// ============================================================================

fn handle_config_command(format: OutputFormat, command: ConfigCommands) -> color_eyre::Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = CliConfig::load()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Human => {
                    print_field("mode", config.mode().as_str());
                    print_field(
                        "seed",
                        &config
                            .seed
                            .map_or_else(|| "random".to_string(), |s| s.to_string()),
                    );
                    print_field(
                        "roll_delay_ms",
                        &config.roll_delay().as_millis().to_string(),
                    );
                    print_field("vs_computer", &config.vs_computer().to_string());
                    print_field("max_rolls", &config.max_rolls().to_string());
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let mut config = CliConfig::load()?;
            config.set(&key, &value)?;
            config.save()?;
            print_success(&format!("Set {key} = {value}"));
        }
        ConfigCommands::Path => {
            println!("{}", CliConfig::config_path()?.display());
        }
    }

    Ok(())
}
