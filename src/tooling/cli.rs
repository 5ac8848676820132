//! CLI Tooling
//!
//! Command-line interface over one workspace: inspect the hierarchy, allocate
//! identifiers, plan and apply moves, and watch for changes.

use crate::config::{ConfigLoader, ZettelConfig};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::plan::{plan_adopt, plan_create, plan_move, plan_renumber, AdoptOptions, RenamePlan};
use crate::workspace::format::{
    format_apply_report, format_identifier_report, format_plan_text, format_status_text,
    format_tree_text,
};
use crate::workspace::{
    apply_plan, create_note, creation_times, HierarchyService, HierarchyStatus,
    IdentifierReport, WatchConfig, WatchDaemon,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Zettelgraph CLI - Folgezettel hierarchies for plain-file note vaults
#[derive(Parser, Debug)]
#[command(name = "zettelgraph")]
#[command(about = "Build and maintain Folgezettel hierarchies over a folder of notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the configured logging table.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the hierarchy
    Tree {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show node, edge and surrogate counts
    Status {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the next free child identifier under a note or folder
    NextId {
        /// Parent path, relative to the workspace
        parent: PathBuf,
    },
    /// Check an identifier against the grammar and show its ancestry
    Check {
        identifier: String,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Move notes under a new parent, renumbering them and their descendants
    Move {
        /// Notes or folders to move
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// New parent note or folder
        #[arg(long = "to")]
        target: PathBuf,
        /// Print the plan without touching any file
        #[arg(long)]
        dry_run: bool,
    },
    /// Give a note a new identifier, re-prefixing its descendants
    Renumber {
        path: PathBuf,
        identifier: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Number untagged notes and separate notes sharing an identifier
    Adopt {
        /// Inbox folder for notes outside any numbered folder (default from config)
        #[arg(long)]
        inbox: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Create an empty note as the next child of a note or folder
    New {
        /// Parent path, relative to the workspace
        parent: PathBuf,
        /// Display name of the new note
        name: String,
        /// File extension, without the dot; empty for none
        #[arg(long, default_value = "md")]
        ext: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Rebuild the hierarchy whenever the workspace changes
    Watch {
        /// Override the configured debounce window in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Override the configured batch window in milliseconds
        #[arg(long)]
        batch_window_ms: Option<u64>,
    },
}

/// Workspace-bound state shared by every command.
pub struct CliContext {
    service: Arc<HierarchyService>,
}

impl CliContext {
    /// Load configuration for the workspace (or from `config_path`) and set up the
    /// hierarchy service. Nothing is scanned yet.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = Self::load_config(&workspace_root, config_path.as_ref())?;
        let service = HierarchyService::new(&workspace_root, config)?;
        Ok(Self {
            service: Arc::new(service),
        })
    }

    pub fn load_config(
        workspace_root: &std::path::Path,
        config_path: Option<&PathBuf>,
    ) -> Result<ZettelConfig, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(workspace_root)?,
        };
        Ok(config)
    }

    pub fn service(&self) -> &HierarchyService {
        &self.service
    }

    pub fn config(&self) -> &ZettelConfig {
        self.service.config()
    }

    /// Run one command and return what should be printed.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree { format } => {
                let graph = self.service.rebuild()?;
                match format {
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&graph.snapshot())?),
                    OutputFormat::Text => Ok(format_tree_text(&graph, use_color())),
                }
            }
            Commands::Status { format } => {
                let graph = self.service.rebuild()?;
                let status = HierarchyStatus::from_graph(&graph);
                match format {
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&status)?),
                    OutputFormat::Text => Ok(format_status_text(&status)),
                }
            }
            Commands::NextId { parent } => {
                self.service.rebuild()?;
                let path = self.service.resolve(parent);
                if !self.service.current().contains(&path) {
                    return Err(ApiError::NodeNotFound(parent.display().to_string()));
                }
                Ok(self.service.next_child_id(&path)?)
            }
            Commands::Check { identifier, format } => {
                let report = IdentifierReport::new(identifier);
                match format {
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
                    OutputFormat::Text => Ok(format_identifier_report(&report)),
                }
            }
            Commands::Move {
                sources,
                target,
                dry_run,
            } => {
                let graph = self.service.rebuild()?;
                let sources: Vec<PathBuf> =
                    sources.iter().map(|s| self.service.resolve(s)).collect();
                let plan = plan_move(&graph, &sources, &self.service.resolve(target))?;
                self.finish_plan(plan, *dry_run)
            }
            Commands::Renumber {
                path,
                identifier,
                dry_run,
            } => {
                let graph = self.service.rebuild()?;
                let plan = plan_renumber(&graph, &self.service.resolve(path), identifier)?;
                self.finish_plan(plan, *dry_run)
            }
            Commands::Adopt { inbox, dry_run } => {
                let graph = self.service.rebuild()?;
                let options = AdoptOptions {
                    inbox: inbox.clone().unwrap_or_else(|| self.config().inbox.clone()),
                    created: creation_times(&graph),
                };
                let plan = plan_adopt(&graph, &options)?;
                self.finish_plan(plan, *dry_run)
            }
            Commands::New {
                parent,
                name,
                ext,
                dry_run,
            } => {
                let graph = self.service.rebuild()?;
                let parent_path = self.service.resolve(parent);
                if !graph.contains(&parent_path) {
                    return Err(ApiError::NodeNotFound(parent.display().to_string()));
                }
                let plan = plan_create(&graph, &parent_path, name, Some(ext.as_str()))?;
                if *dry_run {
                    return Ok(plan.path.display().to_string());
                }
                let path = create_note(&plan)?;
                self.service.rebuild()?;
                Ok(path.display().to_string())
            }
            Commands::Watch {
                debounce_ms,
                batch_window_ms,
            } => {
                let mut config = WatchConfig::from_config(self.service.root(), self.config());
                if let Some(ms) = debounce_ms {
                    config.debounce_ms = *ms;
                }
                if let Some(ms) = batch_window_ms {
                    config.batch_window_ms = *ms;
                }
                let daemon = WatchDaemon::new(Arc::clone(&self.service), config);
                daemon.start()?;
                Ok("Watch stopped.".to_string())
            }
        }
    }

    fn finish_plan(&self, plan: RenamePlan, dry_run: bool) -> Result<String, ApiError> {
        let mut out = format_plan_text(&plan, self.service.root());
        if dry_run || plan.is_empty() {
            return Ok(out);
        }
        let report = apply_plan(self.service.root(), &plan)?;
        self.service.rebuild()?;
        info!(renamed = report.renamed.len(), "Plan applied");
        out.push_str(&format_apply_report(&report));
        Ok(out)
    }
}

fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
