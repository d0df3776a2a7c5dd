//! girya - kettlebell circuit generator and workout tracker
//!
//! гиря (girya) - the Russian kettlebell

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use girya::config::{Backend, Config, WeightUnit};
use girya::goals::Goal;
use girya::planner::RngSource;
use girya::service::random_goal;
use girya::tui::App;
use girya::workout::Workout;
use girya::WorkoutService;

#[derive(Parser)]
#[command(name = "girya")]
#[command(author, version, about = "гиря - kettlebell circuit generator and tracker")]
struct Cli {
    /// Storage backend
    #[arg(long, global = true, env = "GIRYA_STORE", value_enum, default_value_t = Backend::Sqlite)]
    store: Backend,

    /// Store file (defaults to girya.db or girya.json)
    #[arg(long, global = true, env = "GIRYA_PATH")]
    path: Option<PathBuf>,

    /// Unit weights are entered in
    #[arg(long, global = true, env = "GIRYA_UNIT", value_enum, default_value_t = WeightUnit::Kg)]
    unit: WeightUnit,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Show the training goals and their parameters
    Goals,

    /// Generate a new workout
    Generate {
        /// strength, endurance, fat_loss or muscle_building (random if omitted)
        goal: Option<String>,
    },

    /// List workout history, most recent first
    List {
        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show one workout
    Show {
        id: String,
    },

    /// Delete a workout
    Delete {
        id: String,
    },

    /// Start Telegram bot
    Bot {
        /// Telegram bot token (or set TELOXIDE_TOKEN env var)
        #[arg(short, long, env = "TELOXIDE_TOKEN")]
        token: String,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config {
        backend: cli.store,
        path: cli.path,
        unit: cli.unit,
    };

    // The dashboard owns the terminal, keep it quiet unless asked
    let quiet = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(if quiet { "error" } else { "info" });

    let service = WorkoutService::new(config.open_store()?);

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(service, config.unit);
            app.run()?;
        }

        Some(Commands::Goals) => {
            println!("{:<16} {:<7} {:<7} {:<10} {}", "goal", "reps", "rounds", "rest", "exercises");
            println!("{:-<60}", "");
            for goal in Goal::all() {
                let c = goal.config();
                println!(
                    "{:<16} {:<7} {:<7} {:<10} {}",
                    goal.key(),
                    format!("{}-{}", c.reps_min, c.reps_max),
                    c.rounds,
                    format!("{}s/{}s", c.rest_between_exercises, c.rest_between_rounds),
                    c.exercise_count
                );
                println!("    {}", c.description);
            }
        }

        Some(Commands::Generate { goal }) => {
            let goal = goal.unwrap_or_else(|| random_goal(&mut RngSource::thread()).key().to_string());
            let workout = service.create_workout(&goal)?;
            print_workout(&workout, config.unit);
            println!("\nid: {}", workout.id);
        }

        Some(Commands::List { limit }) => {
            let workouts = service.list_workouts();
            if workouts.is_empty() {
                println!("No workouts yet. Run `girya generate <goal>` to create one.");
            }
            for w in workouts.iter().take(limit) {
                println!(
                    "{} | {:15} | {:10} | {} rounds • {} exercises • {} reps",
                    w.date.format("%Y-%m-%d %H:%M"),
                    w.goal_label,
                    w.status_label(),
                    w.rounds,
                    w.exercises.len(),
                    w.reps().map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
                );
                println!("    {}", w.circuit_line());
                let weights: Vec<_> = w
                    .weighted_exercises()
                    .map(|(name, weight)| format!("{}: {}", name, config.unit.format(Some(weight))))
                    .collect();
                if !weights.is_empty() {
                    println!("    Weights: {}", weights.join(", "));
                }
                println!("    id: {}", w.id);
            }
        }

        Some(Commands::Show { id }) => {
            let workout = service.get_workout(&id)?;
            print_workout(&workout, config.unit);
        }

        Some(Commands::Delete { id }) => {
            if service.delete_workout(&id)? {
                println!("Deleted {}", id);
            } else {
                println!("No workout with id {}", id);
            }
        }

        Some(Commands::Bot { token }) => {
            println!("Starting Telegram bot...");
            println!("Store: {}", config.describe());
            girya::bot::run_bot(token, service, config.unit).await?;
        }
    }

    Ok(())
}

fn print_workout(workout: &Workout, unit: WeightUnit) {
    println!(
        "{} - {} ({})",
        workout.goal_label,
        workout.date.format("%Y-%m-%d %H:%M"),
        workout.status_label()
    );
    println!(
        "{} rounds, rest {}s between exercises, {}s between rounds",
        workout.rounds, workout.rest_between_exercises, workout.rest_between_rounds
    );
    println!("{:-<60}", "");
    for (i, e) in workout.exercises.iter().enumerate() {
        let last = e
            .suggested_weight
            .map(|w| format!(" (last: {})", unit.format(Some(w))))
            .unwrap_or_default();
        println!(
            "{}. {:28} {:>3} reps  {}{}",
            i + 1,
            e.name,
            e.reps,
            unit.format(e.weight),
            last
        );
    }
}
