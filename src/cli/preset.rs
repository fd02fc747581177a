//! Preset management commands.

use crate::cli::common::{load_settings, print_json, settings_store, CliError, CliResult};
use crate::models::{KeyOrdering, PackingMode, Preset};
use crate::store::{FilePresetStore, PresetStore, SettingsStore};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Manage settings presets
#[derive(Debug, Clone, Args)]
pub struct PresetArgs {
    /// Preset subcommand
    #[command(subcommand)]
    pub command: PresetCommand,
}

/// Preset subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum PresetCommand {
    /// List built-in and saved presets
    List(ListArgs),
    /// Save the current settings as a preset
    Save(SaveArgs),
    /// Apply a preset to the current settings
    Load(NameArgs),
    /// Delete a saved preset
    Delete(NameArgs),
}

/// List presets
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Save the current settings as a preset
#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Preset name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Overwrite an existing preset with the same name
    #[arg(long)]
    pub force: bool,
}

/// Preset selected by name
#[derive(Debug, Clone, Args)]
pub struct NameArgs {
    /// Preset name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Preset summary for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    /// Preset name
    pub name: String,
    /// Whether the preset ships with the application
    pub builtin: bool,
    /// Save timestamp (RFC 3339), absent for built-ins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    /// Key ordering
    pub layout: KeyOrdering,
    /// Packing mode
    pub packing: PackingMode,
    /// Hold time in seconds
    pub hold_time: f64,
}

/// Preset list response
#[derive(Debug, Clone, Serialize)]
pub struct PresetListResponse {
    /// Presets, built-ins first
    pub presets: Vec<PresetInfo>,
    /// Total number of presets
    pub count: usize,
}

impl From<&Preset> for PresetInfo {
    fn from(preset: &Preset) -> Self {
        Self {
            name: preset.name.clone(),
            builtin: preset.is_builtin(),
            saved_at: preset.saved_at.map(|at| at.to_rfc3339()),
            layout: preset.settings.layout,
            packing: preset.settings.packing,
            hold_time: preset.settings.hold_time,
        }
    }
}

fn preset_store() -> CliResult<FilePresetStore> {
    FilePresetStore::in_config_dir()
        .map_err(|e| CliError::io(format!("Failed to locate configuration directory: {e:#}")))
}

fn list_presets(store: &FilePresetStore) -> CliResult<Vec<Preset>> {
    store
        .list()
        .map_err(|e| CliError::io(format!("Failed to read presets: {e:#}")))
}

fn normalize(name: &str) -> CliResult<String> {
    Preset::normalize_name(name).map_err(|e| CliError::validation(format!("{e:#}")))
}

impl PresetArgs {
    /// Execute the preset command
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            PresetCommand::List(args) => args.execute(),
            PresetCommand::Save(args) => args.execute(),
            PresetCommand::Load(args) => load(&args.name),
            PresetCommand::Delete(args) => delete(&args.name),
        }
    }
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self) -> CliResult<()> {
        let presets = list_presets(&preset_store()?)?;

        if self.json {
            let presets: Vec<PresetInfo> = presets.iter().map(PresetInfo::from).collect();
            return print_json(&PresetListResponse {
                count: presets.len(),
                presets,
            });
        }

        println!("{} presets:", presets.len());
        for preset in &presets {
            let detail = preset.saved_at.map_or_else(
                || "built-in".to_string(),
                |at| at.format("%Y-%m-%d %H:%M").to_string(),
            );
            println!(
                "  {:<30} {:<8} {:<10} {:<17}",
                preset.name, preset.settings.layout, preset.settings.packing, detail
            );
        }
        Ok(())
    }
}

impl SaveArgs {
    /// Execute the save command
    pub fn execute(&self) -> CliResult<()> {
        let name = normalize(&self.name)?;
        let settings = load_settings(&settings_store()?)?;
        let mut store = preset_store()?;

        let exists = list_presets(&store)?.iter().any(|p| p.name == name);
        if exists && !self.force {
            return Err(CliError::validation(format!(
                "Preset '{name}' already exists. Use --force to overwrite it"
            )));
        }

        let result = if self.force {
            store.replace(&name, &settings)
        } else {
            store.add(&name, &settings)
        };
        let preset = result.map_err(|e| CliError::validation(format!("{e:#}")))?;

        println!("Saved preset '{}'.", preset.name);
        Ok(())
    }
}

fn load(name: &str) -> CliResult<()> {
    let name = normalize(name)?;
    let store = preset_store()?;

    let preset = list_presets(&store)?
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| CliError::not_found(format!("Preset '{name}' not found")))?;

    let mut current = settings_store()?;
    current
        .save(&preset.settings)
        .map_err(|e| CliError::io(format!("Failed to save settings: {e:#}")))?;

    println!("Loaded preset '{}'.", preset.name);
    Ok(())
}

fn delete(name: &str) -> CliResult<()> {
    let name = normalize(name)?;
    let mut store = preset_store()?;

    let presets = list_presets(&store)?;
    let Some(preset) = presets.iter().find(|p| p.name == name) else {
        return Err(CliError::not_found(format!("Preset '{name}' not found")));
    };
    if preset.is_builtin() {
        return Err(CliError::validation(format!(
            "Built-in preset '{name}' cannot be deleted"
        )));
    }

    store
        .remove(&name)
        .map_err(|e| CliError::io(format!("Failed to delete preset: {e:#}")))?;

    println!("Deleted preset '{name}'.");
    Ok(())
}
