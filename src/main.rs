use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use winner_selector::display;
use winner_selector::export;
use winner_selector::roster;
use winner_selector::selector::{Selector, SelectorConfig, DEFAULT_MAX_WINNERS};
use winner_selector::xlsx;
use winner_selector::{ColumnLayout, WinnerSet};

#[derive(Parser)]
#[command(name = "winner-selector")]
#[command(about = "Draw random winners per location from a CSV roster", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Zero-based positions of the roster columns
#[derive(Args, Debug, Clone, Copy)]
struct ColumnArgs {
    /// Column holding the participant number used to prevent double wins
    #[arg(long, default_value = "2")]
    id_column: usize,

    /// Column holding the participant name
    #[arg(long, default_value = "3")]
    name_column: usize,

    /// Column holding the location winners are grouped by
    #[arg(long, default_value = "4")]
    location_column: usize,

    /// Column holding the department
    #[arg(long, default_value = "5")]
    department_column: usize,
}

impl From<ColumnArgs> for ColumnLayout {
    fn from(args: ColumnArgs) -> Self {
        ColumnLayout {
            identifier: args.id_column,
            name: args.name_column,
            location: args.location_column,
            department: args.department_column,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Spin, draw winners per location and export them
    Draw {
        /// Roster CSV file (first row is a header)
        input: PathBuf,

        /// Directory for the per-location <location>_winners.csv files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Also write all winners to an Excel workbook
        #[arg(long = "xlsx")]
        workbook: Option<PathBuf>,

        /// Skip the per-location CSV files
        #[arg(long)]
        no_csv: bool,

        /// Maximum winners per location
        #[arg(long, default_value_t = DEFAULT_MAX_WINNERS)]
        max_winners: usize,

        /// Length of the spin animation in milliseconds
        #[arg(long, default_value = "10000")]
        spin_duration_ms: u64,

        /// Time between spin updates in milliseconds
        #[arg(long, default_value = "500")]
        spin_interval_ms: u64,

        /// Seed for a reproducible draw
        #[arg(long, env = "WINNER_SELECTOR_SEED")]
        seed: Option<u64>,

        /// Draw immediately without the spin animation
        #[arg(long)]
        no_spin: bool,

        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Display locations and entry counts of a roster
    Info {
        /// Roster CSV file (first row is a header)
        input: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Draw {
            input,
            output_dir,
            workbook,
            no_csv,
            max_winners,
            spin_duration_ms,
            spin_interval_ms,
            seed,
            no_spin,
            columns,
        } => {
            let config = SelectorConfig {
                spin_duration: Duration::from_millis(spin_duration_ms),
                spin_interval: Duration::from_millis(spin_interval_ms),
                max_winners,
                seed,
            };
            let winners = draw(&input, columns.into(), config, no_spin)?;

            println!("Winners");
            println!();
            print!("{}", display::format_winners(&winners));

            if !no_csv {
                let paths = export::export_all(&output_dir, &winners)
                    .context("Failed to write winner CSV files")?;
                for path in paths {
                    println!("Wrote {}", path.display());
                }
            }

            if let Some(path) = workbook {
                xlsx::write_winners_to_xlsx(&winners, &path)
                    .context("Failed to write Excel file")?;
                println!("Wrote {}", path.display());
            }
        }
        Commands::Info { input, columns } => {
            info(&input, columns.into())?;
        }
    }

    Ok(())
}

fn draw(input: &Path, layout: ColumnLayout, config: SelectorConfig, no_spin: bool) -> Result<WinnerSet> {
    println!("Reading roster: {}", input.display());
    let entries = roster::read_roster_file(input, &layout).context("Failed to read roster CSV")?;
    println!("Found {} entries", entries.len());

    let groups = roster::group(entries);
    let mut selector = Selector::new(config)?;

    if no_spin {
        return Ok(selector.draw_now(&groups)?);
    }

    println!("Selecting winners (spinning for {:?})...", selector.config().spin_duration);
    let (tx, rx) = mpsc::channel();
    selector.run(
        groups,
        |snapshot| {
            println!();
            print!("{}", display::format_snapshot(snapshot));
        },
        move |winners| {
            let _ = tx.send(winners);
        },
    )?;

    if !selector.wait() {
        anyhow::bail!("Selection run ended without committing winners");
    }
    println!();

    rx.recv().context("Selection run did not deliver winners")
}

fn info(input: &Path, layout: ColumnLayout) -> Result<()> {
    let entries = roster::read_roster_file(input, &layout).context("Failed to read roster CSV")?;
    let groups = roster::group(entries);

    println!("Roster: {}", input.display());
    print!("{}", display::format_roster_info(&groups));
    Ok(())
}
