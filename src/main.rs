// SPDX-License-Identifier: PMPL-1.0-or-later

//! embed-shell: frame load detection, bilingual labels and shortcuts for an
//! embedded web application
//!
//! Simulates detection runs against a config, translates keys and templates,
//! and offers a terminal front-end driven by the page's keyboard shortcuts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use embed_shell::config::{AppConfig, Endpoints};
use embed_shell::diagnostics::{self, DiagnosticsInput};
use embed_shell::i18n::{host_locale_tag, Catalog, I18n, Lang};
use embed_shell::report;
use embed_shell::shell::Shell;
use embed_shell::simulate::{self, SimulationConfig};
use embed_shell::storage::FilePreferences;
use embed_shell::template::localize_html;
use embed_shell::tui::ShellTui;
use embed_shell::types::{FrameRect, ScriptedSignal};
use embed_shell::view::StaticProbe;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "embed-shell")]
#[command(version)]
#[command(about = "Frame load detection with fallback, bilingual labels and shortcuts")]
#[command(long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted detection cycle and print what it decided
    Simulate {
        /// Directory with edited en.json/zh.json tables
        #[arg(long, value_name = "DIR")]
        locales: Option<PathBuf>,

        /// App config (JSON or YAML); built-in when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Interface language
        #[arg(short, long, value_enum, default_value = "en")]
        lang: LangArg,

        /// Frame signal, e.g. load@1.2s or error@300ms (repeatable)
        #[arg(short, long = "event", value_name = "SIGNAL", value_parser = parse_signal_arg)]
        events: Vec<ScriptedSignal>,

        /// Render the frame with a zero-sized box
        #[arg(long)]
        zero_size: bool,

        /// Stop the clock at this time instead of running every check
        #[arg(long, value_parser = parse_duration_arg)]
        until: Option<Duration>,

        /// Sleep through the delays
        #[arg(long)]
        realtime: bool,

        /// Save the session report (.json, .yaml or .txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a dotted key
    Translate {
        /// Directory with edited en.json/zh.json tables
        #[arg(long, value_name = "DIR")]
        locales: Option<PathBuf>,

        #[arg(value_name = "KEY")]
        key: String,

        #[arg(short, long, value_enum, default_value = "en")]
        lang: LangArg,
    },

    /// Localise an HTML template carrying data-i18n attributes
    Localize {
        /// Directory with edited en.json/zh.json tables
        #[arg(long, value_name = "DIR")]
        locales: Option<PathBuf>,

        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        #[arg(short, long, value_enum, default_value = "en")]
        lang: LangArg,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the resolved embed and launch addresses
    Urls {
        /// Directory with edited en.json/zh.json tables
        #[arg(long, value_name = "DIR")]
        locales: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only this language; both when omitted
        #[arg(short, long, value_enum)]
        lang: Option<LangArg>,
    },

    /// Check config, locale tables, template and preferences
    Diagnostics {
        /// Directory with edited en.json/zh.json tables
        #[arg(long, value_name = "DIR")]
        locales: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Preferences file
        #[arg(long, default_value = "preferences.json")]
        prefs: PathBuf,
    },

    /// Interactive terminal front-end
    Tui {
        /// Directory with edited en.json/zh.json tables
        #[arg(long, value_name = "DIR")]
        locales: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Start in this language (saved choice, host locale, then config default otherwise)
        #[arg(short, long, value_enum)]
        lang: Option<LangArg>,

        /// Preferences file
        #[arg(long, default_value = "preferences.json")]
        prefs: PathBuf,
    },
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LangArg {
    En,
    Zh,
}

impl From<LangArg> for Lang {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::En => Lang::En,
            LangArg::Zh => Lang::Zh,
        }
    }
}

fn parse_signal_arg(raw: &str) -> Result<ScriptedSignal, String> {
    simulate::parse_signal(raw).map_err(|err| format!("{:#}", err))
}

fn parse_duration_arg(raw: &str) -> Result<Duration, String> {
    simulate::parse_duration(raw).map_err(|err| format!("{:#}", err))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    // a subscriber may already be installed when embedded in another binary
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate {
            config,
            locales,
            lang,
            events,
            zero_size,
            until,
            realtime,
            output,
        } => {
            let frame = if zero_size {
                FrameRect::new(0.0, 0.0)
            } else {
                FrameRect::new(1280.0, 720.0)
            };
            let session = simulate::run(&SimulationConfig {
                config_path: config,
                locales_dir: locales,
                lang: lang.into(),
                signals: events,
                frame: Some(frame),
                until,
                realtime,
            })?;

            report::print_report(&session);

            if let Some(output_path) = output {
                report::save_report(&session, output_path)?;
            }
        }

        Commands::Translate { locales, key, lang } => {
            let catalog = Catalog::load_or_builtin(locales.as_deref())?;
            println!("{}", catalog.t(lang.into(), &key));
        }

        Commands::Localize {
            locales,
            template,
            lang,
            output,
        } => {
            let html = std::fs::read_to_string(&template)
                .with_context(|| format!("reading template {}", template.display()))?;
            let catalog = Catalog::load_or_builtin(locales.as_deref())?;
            let localized = localize_html(&html, &catalog, lang.into())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, localized)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Localised page saved to: {}", path.display());
                }
                None => println!("{}", localized),
            }
        }

        Commands::Urls {
            locales,
            config,
            lang,
        } => {
            let app_config = AppConfig::load_or_builtin(config.as_deref())?;
            let catalog = Catalog::load_or_builtin(locales.as_deref())?;
            let langs: Vec<Lang> = match lang {
                Some(lang) => vec![lang.into()],
                None => Lang::all().to_vec(),
            };
            for lang in langs {
                let endpoints = Endpoints::resolve(&app_config, &catalog, lang);
                println!("{} {}", lang.flag(), lang.display_name());
                println!("  Embed:  {}", endpoints.embed_url);
                println!("  Launch: {}", endpoints.direct_url);
            }
        }

        Commands::Diagnostics {
            locales,
            config,
            template,
            prefs,
        } => {
            let prefs = FilePreferences::new(prefs);
            diagnostics::run_self_diagnostics(&DiagnosticsInput {
                config_path: config.as_deref(),
                locales_dir: locales.as_deref(),
                template_path: template.as_deref(),
                prefs: &prefs,
            })?;
        }

        Commands::Tui {
            locales,
            config,
            lang,
            prefs,
        } => {
            let app_config = AppConfig::load_or_builtin(config.as_deref())?;
            let catalog = Catalog::load_or_builtin(locales.as_deref())?;
            let host_tag = host_locale_tag();
            let mut i18n = I18n::with_fallback(
                catalog,
                Box::new(FilePreferences::new(prefs)),
                host_tag.as_deref(),
                app_config.app.default_language,
            );
            if let Some(lang) = lang {
                i18n.set_language(lang.into());
            }
            let (cols, rows) = crossterm::terminal::size()?;
            let probe = StaticProbe(Some(FrameRect::new(f64::from(cols), f64::from(rows))));
            let mut shell = Shell::new(app_config, i18n, probe, ShellTui::fullscreen_host());
            ShellTui::run(&mut shell)?;
        }
    }

    Ok(())
}
