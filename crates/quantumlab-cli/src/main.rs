//! CLI for quantumlab — run the tutorial experiments from a terminal.

mod commands;

use clap::{Parser, Subcommand};

use commands::RunArgs;

#[derive(Parser)]
#[command(name = "quantumlab")]
#[command(about = "quantumlab — add the little arrows, square the length, roll the dice")]
#[command(version = quantumlab_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send photons through a chain of linear polarizers (Malus's law)
    Malus {
        /// Polarizer axes in degrees, in the order the photon meets them
        #[arg(long, value_delimiter = ',', default_value = "0,45,90")]
        angles: Vec<f64>,

        /// Linear polarization of the source in degrees (default: unpolarized)
        #[arg(long)]
        source: Option<f64>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Single photons through a Mach-Zehnder interferometer
    MachZehnder {
        /// Beam splitter reflectance
        #[arg(long, default_value = "0.5")]
        reflectance: f64,

        /// Upper arm length (wavelength units)
        #[arg(long, default_value = "1.0")]
        upper: f64,

        /// Lower arm length (wavelength units)
        #[arg(long, default_value = "1.0")]
        lower: f64,

        /// Put a blocker in the upper arm
        #[arg(long)]
        block_upper: bool,

        /// Put a blocker in the lower arm
        #[arg(long)]
        block_lower: bool,

        /// Wavelength unit used to turn lengths into clock turns
        #[arg(long, default_value = "1.0")]
        wavelength: f64,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Partial reflection from a thin sheet of glass
    Glass {
        /// Glass thickness (wavelength units)
        #[arg(long, default_value = "0.125")]
        thickness: f64,

        /// Refractive index of the glass
        #[arg(long, default_value = "1.5")]
        index: f64,

        /// Reflectance of each surface
        #[arg(long, default_value = "0.04")]
        surface: f64,

        /// Also print the reflection probability at this many thicknesses
        /// between 0 and --thickness
        #[arg(long)]
        sweep: Option<usize>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Oven → analyzer → analyzer chain for spin-1/2 particles
    SternGerlach {
        /// Orientation of the first analyzer in degrees (only "up" passes)
        #[arg(long, default_value = "0")]
        first: f64,

        /// Orientation of the second analyzer in degrees
        #[arg(long, default_value = "90")]
        second: f64,

        /// Optional third analyzer in degrees, measured after the second
        #[arg(long)]
        third: Option<f64>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Three-orientation Bell experiment with entangled pairs
    Bell {
        /// Pair source: quantum (singlet) or local (instruction sets)
        #[arg(long, default_value = "quantum", value_parser = ["quantum", "local"])]
        model: String,

        /// Instruction sets handed out by the local source
        #[arg(long, default_value = "uniform", value_parser = ["uniform", "mixed"])]
        strategy: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Penney's game with red/blue cards
    Penney {
        /// First player's pattern, e.g. RRB
        #[arg(long, default_value = "RBB")]
        first: String,

        /// Second player's pattern (default: best response to --first)
        #[arg(long)]
        second: Option<String>,

        /// Print the best-response table for every first pick and exit
        #[arg(long)]
        table: bool,

        #[command(flatten)]
        run: RunArgs,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Malus {
            angles,
            source,
            run,
        } => commands::malus::run(commands::malus::MalusCommandConfig {
            angles_deg: &angles,
            source_deg: source,
            run: &run,
        }),
        Commands::MachZehnder {
            reflectance,
            upper,
            lower,
            block_upper,
            block_lower,
            wavelength,
            run,
        } => commands::mach_zehnder::run(commands::mach_zehnder::MachZehnderCommandConfig {
            reflectance,
            upper_length: upper,
            lower_length: lower,
            block_upper,
            block_lower,
            wavelength,
            run: &run,
        }),
        Commands::Glass {
            thickness,
            index,
            surface,
            sweep,
            run,
        } => commands::glass::run(commands::glass::GlassCommandConfig {
            thickness,
            refractive_index: index,
            surface_reflectance: surface,
            sweep,
            run: &run,
        }),
        Commands::SternGerlach {
            first,
            second,
            third,
            run,
        } => commands::stern_gerlach::run(commands::stern_gerlach::SternGerlachCommandConfig {
            first_deg: first,
            second_deg: second,
            third_deg: third,
            run: &run,
        }),
        Commands::Bell {
            model,
            strategy,
            run,
        } => commands::bell::run(commands::bell::BellCommandConfig {
            model: &model,
            strategy: &strategy,
            run: &run,
        }),
        Commands::Penney {
            first,
            second,
            table,
            run,
        } => commands::penney::run(commands::penney::PenneyCommandConfig {
            first: &first,
            second: second.as_deref(),
            table,
            run: &run,
        }),
    }
}
