use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use device_registry::config::DeviceRegistryConfig;
use device_registry::contract::client::DeviceRegistryApi;
use device_registry::contract::model::{NewDevice, NewPassport, PageRequest};
use device_registry::domain::{serial, warranty};
use device_registry::DeviceRegistry;
use runtime::{AppConfig, CliArgs};

mod db;
mod output;

use output::{print_json, DeviceDto, PageDto, PassportDto};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Device Registry - product passports, serial resolution and warranty tracking
#[derive(Parser)]
#[command(name = "device-registry")]
#[command(about = "Device Registry - product passports, serial resolution and warranty tracking")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration
    Check,
    /// Apply database migrations
    Migrate,
    /// Find the passport a serial number belongs to
    Resolve {
        serial: String,
    },
    /// Compute a warranty expiration date without touching the database
    Expiration {
        #[arg(long)]
        purchase_date: NaiveDate,
        #[arg(long)]
        months: u32,
        /// The device has a registered owner
        #[arg(long)]
        owner: bool,
    },
    /// Create a passport claiming a serial range
    AddPassport {
        #[arg(long)]
        name: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        prefix: String,
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
        #[arg(long)]
        months: u32,
    },
    /// List passports page by page
    Passports {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        size: Option<u64>,
    },
    /// Register a device under the passport its serial resolves to
    RegisterDevice {
        serial: String,
        #[arg(long)]
        purchase_date: NaiveDate,
        /// Owner reference; omit for an anonymous device
        #[arg(long)]
        owner: Option<Uuid>,
    },
    /// List devices, optionally filtered by serial number or comment
    Devices {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        size: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging(&logging_config, &config.home_path());
    tracing::debug!("Device registry starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(&config),
        Commands::Migrate => {
            let (registry, conn) = open_registry(&config).await?;
            registry.migrate(&conn).await?;
            println!("Migrations applied");
            Ok(())
        }
        Commands::Expiration {
            purchase_date,
            months,
            owner,
        } => {
            println!(
                "{}",
                warranty::compute_expiration(purchase_date, months, owner)
            );
            Ok(())
        }
        command => {
            let client = connect_client(&config).await?;
            run_data_command(client.as_ref(), command).await
        }
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db_cfg) = &config.database {
        db::detect_from_dsn(db_cfg)?;
    }
    let module_cfg: DeviceRegistryConfig = config.module_config(DeviceRegistry::NAME)?;
    tracing::debug!(?module_cfg, "Module configuration parsed");

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn open_registry(config: &AppConfig) -> Result<(DeviceRegistry, DatabaseConnection)> {
    let db_cfg = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database is not configured"))?;
    let conn = db::connect(db_cfg, &config.home_path()).await?;
    Ok((DeviceRegistry::default(), conn))
}

/// Connect, bring the schema up to date and hand out the local client.
async fn connect_client(config: &AppConfig) -> Result<Arc<dyn DeviceRegistryApi>> {
    let (registry, conn) = open_registry(config).await?;
    registry.migrate(&conn).await?;

    let module_cfg: DeviceRegistryConfig = config.module_config(DeviceRegistry::NAME)?;
    registry.init(conn, &module_cfg).await?;
    registry.client()
}

async fn run_data_command(client: &dyn DeviceRegistryApi, command: Commands) -> Result<()> {
    match command {
        Commands::Resolve { serial } => {
            match serial::parse(&serial) {
                Ok(parsed) => tracing::debug!(
                    prefix = %parsed.prefix,
                    suffix = parsed.suffix,
                    "Parsed serial number"
                ),
                Err(e) => tracing::debug!("{e}"),
            }
            let passport = client.resolve_passport(&serial).await?;
            print_json(&PassportDto::from(passport))
        }
        Commands::AddPassport {
            name,
            model,
            prefix,
            from,
            to,
            months,
        } => {
            let passport = client
                .create_passport(NewPassport {
                    name,
                    model,
                    serial_prefix: prefix,
                    from_serial_number: from,
                    to_serial_number: to,
                    warranty_months: months,
                })
                .await?;
            print_json(&PassportDto::from(passport))
        }
        Commands::Passports { page, size } => {
            let page = client
                .list_passports(PageRequest { page, size })
                .await?;
            print_json(&PageDto::<PassportDto>::from_page(page))
        }
        Commands::RegisterDevice {
            serial,
            purchase_date,
            owner,
        } => {
            let device = client
                .register_device(NewDevice {
                    serial_number: serial,
                    purchase_date,
                    owner_id: owner,
                })
                .await?;
            print_json(&DeviceDto::from(device))
        }
        Commands::Devices { search, page, size } => {
            let page = client
                .list_devices(search.as_deref(), PageRequest { page, size })
                .await?;
            print_json(&PageDto::<DeviceDto>::from_page(page))
        }
        Commands::Check | Commands::Migrate | Commands::Expiration { .. } => {
            Err(anyhow!("command does not use the registry client"))
        }
    }
}
