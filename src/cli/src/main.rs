use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::{ReqwestApi, SnmpDeviceService};
use common::{
    config::Config,
    error::{SnmpCfgError, SnmpCfgResult},
    log,
};
use serde_json::Value;
use tracing::debug;
use types::{console::GetMode, devices::DeviceForm};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "snmpcfg", version, about = "SNMP collector device configuration client")]
struct Args {
    /// TOML config file, defaults to ./snmpcfg.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base url, overrides host/port/base_path of the config
    #[arg(long)]
    url: Option<Url>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List devices, optionally keeping IDs matching a case-insensitive regex
    List {
        #[arg(short, long)]
        filter: Option<String>,
    },
    Get {
        id: String,
    },
    /// Create a device from a JSON file
    Add {
        file: PathBuf,
    },
    /// Replace device `id` with the JSON file content
    Edit {
        id: String,
        file: PathBuf,
    },
    Delete {
        id: String,
    },
    /// Show the objects that block deleting a device
    CheckDelete {
        id: String,
    },
    Ping {
        file: PathBuf,
    },
    Query {
        file: PathBuf,
        #[arg(short, long, default_value = "get")]
        mode: GetMode,
        #[arg(short, long)]
        oid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    log::init(args.log_level.as_deref().unwrap_or(&config.log.level))?;

    let api = match args.url {
        Some(url) => ReqwestApi::with_base(url, config.api)?,
        None => ReqwestApi::new(config.api)?,
    };
    debug!("api base {}", api.base());

    let service = SnmpDeviceService::new(Arc::new(api));
    let output = run(&service, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(service: &SnmpDeviceService, command: Command) -> SnmpCfgResult<Value> {
    let output = match command {
        Command::List { filter } => serde_json::to_value(service.get_devices(filter.as_deref()).await?)?,
        Command::Get { id } => serde_json::to_value(service.get_device_by_id(&id).await?)?,
        Command::Add { file } => serde_json::to_value(service.add_device(&read_form(&file)?).await?)?,
        Command::Edit { id, file } => {
            serde_json::to_value(service.edit_device(&read_form(&file)?, &id).await?)?
        }
        Command::Delete { id } => service.delete_device(&id).await?,
        Command::CheckDelete { id } => {
            serde_json::to_value(service.check_on_delete_snmp_device(&id).await?)?
        }
        Command::Ping { file } => service.ping_device(&read_form(&file)?).await?,
        Command::Query { file, mode, oid } => {
            service.send_query(&read_form(&file)?, &mode, &oid).await?
        }
    };
    Ok(output)
}

fn read_form(path: &Path) -> SnmpCfgResult<DeviceForm> {
    let data = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&data)?;
    DeviceForm::try_from(value).map_err(|e| {
        SnmpCfgError::Common(format!("{}: device must be a JSON object: {}", path.display(), e))
    })
}
