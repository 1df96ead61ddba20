//! Configuration view and validation commands: `fieldview config`.

use anyhow::Result;

use fieldview::fieldview_config::{CONFIG_DIR, CONFIG_FILE, FieldviewConfig, FieldviewToml};
use fieldview::preview::PreviewSize;
use fieldview::ui::icons::{CHECK, WARN};

use super::super::ConfigCommands;

pub fn cmd_config(
    project_dir: &std::path::Path,
    cli_size: Option<PreviewSize>,
    command: Option<ConfigCommands>,
) -> Result<()> {
    let config_dir = project_dir.join(CONFIG_DIR);
    let config_path = config_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Fieldview Configuration");
            println!("=======================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                FieldviewToml::load(&config_path)?
            } else {
                println!("No fieldview.toml found at {}", config_path.display());
                println!("Using default configuration.");
                FieldviewToml::default()
            };
            println!();
            print_toml(&toml);

            println!("Effective values (with env/CLI overrides):");
            let config = FieldviewConfig::with_cli_args(project_dir.to_path_buf(), false, cli_size)?;
            println!("  preview size = \"{}\"", config.preview_size()?);
            println!("  id_strategy = \"{}\"", config.id_strategy()?);
            println!();

            if !config_path.exists() {
                println!("Run 'fieldview config init' to create a fieldview.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No fieldview.toml found. Using defaults (valid).");
                return Ok(());
            }

            let toml = FieldviewToml::load(&config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("{}Configuration is valid.", CHECK);
            } else {
                println!("{}Configuration warnings:", WARN);
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("fieldview.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
            }

            FieldviewToml::default().save(&config_path)?;

            println!("Created fieldview.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [preview] default_size, date_format, date_time_format, map_preview_limit");
            println!("  - [array] drag_hysteresis_px, id_strategy");
            println!();
        }
    }

    Ok(())
}

fn print_toml(toml: &FieldviewToml) {
    println!("[preview]");
    println!("  default_size = \"{}\"", toml.preview.default_size);
    println!("  date_format = \"{}\"", toml.preview.date_format);
    println!("  date_time_format = \"{}\"", toml.preview.date_time_format);
    println!("  map_preview_limit = {}", toml.preview.map_preview_limit);
    println!();
    println!("[array]");
    println!("  drag_hysteresis_px = {}", toml.array.drag_hysteresis_px);
    println!("  id_strategy = \"{}\"", toml.array.id_strategy);
    println!();
}
