//! Fabric zoning CLI (fczone)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fczone::commands::{
    CheckCommand, DeleteCommand, FetchCommand, FetchTarget, LookupCommand, RestoreCommand,
    XrefCommand,
};
use fczone::context::FabricContext;
use fczone::exit::{exit_code, EXIT_OK};
use fczone_config::SettingsOverrides;

#[derive(Parser)]
#[command(name = "fczone")]
#[command(about = "Fibre Channel fabric zoning maintenance")]
#[command(version)]
#[command(long_about = "
Fibre Channel fabric zoning maintenance

Checks, deletes and restores zoning objects (aliases, zones, cfgs) on a
fabric switch without touching the effective configuration. Fabric access
settings come from --config, FABRIC_* environment variables and the global
options below.

Examples:
  fczone check -d defined.json -e effective.json -w wwns.txt -z zones.txt
  fczone aliases -d defined.json -w wwns.txt
  fczone xref -d defined.json --prefix Host
  fczone members -d defined.json
  fczone -i 10.0.0.5 -u admin -p secret fetch
  fczone -i 10.0.0.5 -u admin -p secret active -o active.json
  fczone -i 10.0.0.5 -u admin -p secret delete -f objects.txt
  fczone -i 10.0.0.5 -u admin -p secret dry-run -w wwns.txt -z zones.txt
  fczone -i 10.0.0.5 -u admin -p secret restore -s defined.json Host1
")]
struct Cli {
    /// Settings file (any format supported by the config crate)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Switch address
    #[arg(short = 'i', long, global = true)]
    address: Option<String>,

    /// Login user
    #[arg(short = 'u', long = "user", global = true)]
    user: Option<String>,

    /// Login password
    #[arg(short = 'p', long, global = true)]
    password: Option<String>,

    /// Use plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    insecure: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate deletion lists against configuration snapshots
    Check {
        /// Defined configuration snapshot
        #[arg(short, long)]
        defined: PathBuf,

        /// Effective configuration snapshot
        #[arg(short, long)]
        effective: PathBuf,

        /// WWNs to delete, one per line
        #[arg(short, long)]
        wwns: PathBuf,

        /// Zones to delete, one per line
        #[arg(short, long)]
        zones: PathBuf,
    },

    /// Print the aliases referencing the listed WWNs
    Aliases {
        /// Defined configuration snapshot
        #[arg(short, long)]
        defined: PathBuf,

        /// WWNs, one per line
        #[arg(short, long)]
        wwns: PathBuf,
    },

    /// Print zone memberships of every member reference
    Xref {
        /// Defined configuration snapshot
        #[arg(short, long)]
        defined: PathBuf,

        /// Only list references starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print member counts per zone
    Members {
        /// Defined configuration snapshot
        #[arg(short, long)]
        defined: PathBuf,
    },

    /// Save configuration documents from the switch
    Fetch {
        /// Documents to fetch
        #[arg(long, value_enum, default_value = "both")]
        target: FetchTarget,

        /// Output file for the defined configuration
        #[arg(long)]
        defined_out: Option<PathBuf>,

        /// Output file for the effective configuration
        #[arg(long)]
        effective_out: Option<PathBuf>,
    },

    /// Print the name of the effective cfg
    Active {
        /// Also save it to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete the listed objects and commit after confirmation
    Delete {
        /// Object names, one per line
        #[arg(short, long)]
        file: PathBuf,

        /// Commit without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate against the switch, then delete without committing
    DryRun {
        /// WWNs whose aliases to delete, one per line
        #[arg(short, long)]
        wwns: PathBuf,

        /// Zones to delete, one per line
        #[arg(short, long)]
        zones: PathBuf,

        /// Delete every alias of a WWN referenced by several aliases
        #[arg(long)]
        all_aliases: bool,
    },

    /// Recreate one object from a defined configuration snapshot
    Restore {
        /// Defined configuration snapshot
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Alias, zone or cfg name
        name: String,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = SettingsOverrides {
        address: cli.address,
        username: cli.user,
        password: cli.password,
        insecure: cli.insecure,
        override_confirm: false,
    };
    let fabric = || FabricContext::load(cli.config.as_deref(), &overrides);

    match cli.command {
        Commands::Check {
            defined,
            effective,
            wwns,
            zones,
        } => CheckCommand::new().execute(&defined, &effective, &wwns, &zones),

        Commands::Aliases { defined, wwns } => LookupCommand::new().execute(&defined, &wwns),

        Commands::Xref { defined, prefix } => {
            XrefCommand::new().execute(&defined, prefix.as_deref())
        }

        Commands::Members { defined } => XrefCommand::new().members(&defined),

        Commands::Fetch {
            target,
            defined_out,
            effective_out,
        } => {
            let context = fabric()?;
            FetchCommand::new(&context)
                .execute(target, defined_out, effective_out)
                .await
        }

        Commands::Active { output } => {
            let context = fabric()?;
            FetchCommand::new(&context).active(output.as_deref()).await
        }

        Commands::Delete { file, yes } => {
            let context = fabric()?;
            DeleteCommand::new(&context).execute(&file, yes).await
        }

        Commands::DryRun {
            wwns,
            zones,
            all_aliases,
        } => {
            let context = fabric()?;
            DeleteCommand::new(&context)
                .dry_run(&wwns, &zones, all_aliases)
                .await
        }

        Commands::Restore { snapshot, name } => {
            let context = fabric()?;
            RestoreCommand::new(&context).execute(&snapshot, &name).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let (verbose, quiet) = (cli.verbose || cli.debug, cli.quiet);

    match run(cli).await {
        Ok(()) => {
            log::info!("Command completed successfully");
            std::process::exit(EXIT_OK);
        }
        Err(e) => {
            if !quiet {
                eprintln!("Error: {}", e);

                // Print error chain if in verbose mode
                if verbose {
                    for cause in e.chain().skip(1) {
                        eprintln!("  Caused by: {}", cause);
                    }
                }
            }
            std::process::exit(exit_code(&e));
        }
    }
}
