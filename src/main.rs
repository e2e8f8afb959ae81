//! # Quotecard CLI
//!
//! Command-line interface for rendering quote cards, managing templates and
//! running the generation proxy.
//!
//! ## Usage
//!
//! ```bash
//! # Render a card
//! quotecard render --quote1 "Lumina nu se negociază." --author "Anonim"
//!
//! # Render from a saved template with a different quote
//! quotecard render --template Clasic --quote1 "Alt gând" -o card.png
//!
//! # Run the proxy server (serves the editor from ./editor)
//! OPENAI_API_KEY=sk-... quotecard serve --static-dir ./editor
//!
//! # Generate a quote through a running server
//! quotecard generate quote --backend http://localhost:3000
//!
//! # Templates and history
//! quotecard templates list
//! quotecard history list
//! ```

use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use quotecard::{
    EditorState, QuoteCardError,
    font::{FontBook, parse_family_list},
    generate::{DEFAULT_BACKEND_URL, GenerationClient},
    server::{self, ServerConfig},
    store::{
        FileStore, KeyValueStore,
        history::QuoteHistory,
        templates::{SaveOutcome, TemplateSettings, TemplateStore},
    },
};

/// Quotecard - quote card renderer and generation proxy
#[derive(Parser, Debug)]
#[command(name = "quotecard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding templates and history (defaults to the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a card to PNG
    Render {
        #[command(flatten)]
        card: CardArgs,

        /// Output file (defaults to a name derived from the first quote)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run the HTTP proxy server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = server::DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Directory with the editor frontend, served at /
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,

        /// Base URL of the OpenAI-compatible API
        #[arg(long, default_value = server::DEFAULT_API_BASE)]
        api_base: String,

        /// Chat model used for quotes
        #[arg(long, default_value = server::DEFAULT_CHAT_MODEL)]
        chat_model: String,

        /// Image model used for backgrounds
        #[arg(long, default_value = server::DEFAULT_IMAGE_MODEL)]
        image_model: String,
    },

    /// Manage saved templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage the generated-quote history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Generate content through a running quotecard server
    Generate {
        /// Server base URL
        #[arg(long, default_value = DEFAULT_BACKEND_URL)]
        backend: String,

        #[command(subcommand)]
        what: GenerateAction,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateAction {
    /// List saved templates
    List,
    /// Print a template's settings as JSON
    Show { name: String },
    /// Save settings (from a JSON file and/or flags) as a template
    Save {
        name: String,

        #[command(flatten)]
        card: CardArgs,

        /// Overwrite an existing template without asking
        #[arg(long)]
        force: bool,
    },
    /// Delete a template
    Delete {
        name: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List recent generated quotes, newest first
    List,
    /// Forget all generated quotes
    Clear,
}

#[derive(Subcommand, Debug)]
enum GenerateAction {
    /// Generate a quote and record it in the history
    Quote,
    /// Generate a background image and render a card with it
    Image {
        #[command(flatten)]
        card: CardArgs,

        /// Output file (defaults to a name derived from the first quote)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Card settings shared by every command that builds a card.
#[derive(Args, Debug)]
struct CardArgs {
    /// Settings JSON file (template settings format)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Start from a saved template
    #[arg(long, value_name = "NAME")]
    template: Option<String>,

    #[arg(long)]
    quote1: Option<String>,

    /// Second quote (also enables it)
    #[arg(long)]
    quote2: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Card width in pixels (400-2000)
    #[arg(long)]
    width: Option<u32>,

    /// Card height in pixels (400-2000)
    #[arg(long)]
    height: Option<u32>,

    /// Background image file
    #[arg(long, value_name = "FILE")]
    background: Option<PathBuf>,

    /// TTF/OTF file registered under the first family of the font stack
    #[arg(long, value_name = "FILE")]
    font_file: Option<PathBuf>,

    /// Bold companion for --font-file
    #[arg(long, value_name = "FILE", requires = "font_file")]
    bold_font_file: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), QuoteCardError> {
    let cli = Cli::parse();
    let store = match cli.data_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::default_location(),
    };

    match cli.command {
        Commands::Render { card, output } => {
            let editor = build_editor(&card, &store)?;
            save_card(&editor, output)?;
        }

        Commands::Serve {
            listen,
            static_dir,
            api_base,
            chat_model,
            image_model,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                api_base,
                chat_model,
                image_model,
                static_dir,
                ..ServerConfig::from_env()
            };
            runtime()?.block_on(server::serve(config))?;
        }

        Commands::Templates { action } => run_templates(action, &store)?,

        Commands::History { action } => {
            let mut history = QuoteHistory::load(&store);
            match action {
                HistoryAction::List => {
                    if history.is_empty() {
                        println!("No generated quotes yet.");
                    }
                    for (i, entry) in history.entries().iter().enumerate() {
                        let when = chrono::DateTime::from_timestamp_millis(entry.ts)
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default();
                        println!("{:>2}. [{}] {}", i + 1, when, entry.text);
                    }
                }
                HistoryAction::Clear => {
                    history.clear();
                    history.save(&store);
                    println!("History cleared.");
                }
            }
        }

        Commands::Generate { backend, what } => {
            let client = GenerationClient::new(backend)?;
            let rt = runtime()?;
            match what {
                GenerateAction::Quote => {
                    let mut history = QuoteHistory::load(&store);
                    let quote = rt.block_on(client.generate_quote(&mut history, &store, &mut rand::rng()))?;
                    println!("{}", quote);
                }
                GenerateAction::Image { card, output } => {
                    let mut editor = build_editor(&card, &store)?;
                    let data_url = rt.block_on(client.generate_image(&editor.content.quote1, &mut rand::rng()))?;
                    editor.apply_data_url(&data_url)?;
                    save_card(&editor, output)?;
                }
            }
        }
    }

    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime, QuoteCardError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| QuoteCardError::Transport(format!("Failed to start async runtime: {}", e)))
}

fn run_templates(action: TemplateAction, store: &dyn KeyValueStore) -> Result<(), QuoteCardError> {
    let templates = TemplateStore::new(store);

    match action {
        TemplateAction::List => {
            let summaries = templates.summaries();
            if summaries.is_empty() {
                println!("No saved templates.");
            }
            for summary in summaries {
                println!("{:>2}. {}  ({})", summary.index + 1, summary.name, summary.created_at);
            }
        }

        TemplateAction::Show { name } => {
            let template = templates
                .find(&name)?
                .ok_or_else(|| QuoteCardError::InvalidInput(format!("No template named '{}'", name)))?;
            println!("{}", serde_json::to_string_pretty(&template.settings)?);
        }

        TemplateAction::Save { name, card, force } => {
            let editor = build_editor(&card, store)?;
            let outcome = templates.save(&name, editor.capture_settings(), |existing| {
                force || confirm(&format!("Template '{}' already exists. Overwrite?", existing))
            })?;
            match outcome {
                SaveOutcome::Created(name) => println!("Saved template '{}'.", name),
                SaveOutcome::Overwritten(name) => println!("Overwrote template '{}'.", name),
                SaveOutcome::Declined(name) => println!("Kept existing template '{}'.", name),
            }
        }

        TemplateAction::Delete { name, yes } => {
            let deleted = templates.delete_by_name(&name, |existing| {
                yes || confirm(&format!("Delete template '{}'?", existing))
            })?;
            match deleted {
                Some(name) => println!("Deleted template '{}'.", name),
                None => println!("Nothing deleted."),
            }
        }
    }

    Ok(())
}

/// Assemble an editor from template, settings file and flag overrides, in that order.
fn build_editor(card: &CardArgs, store: &dyn KeyValueStore) -> Result<EditorState, QuoteCardError> {
    let mut editor = EditorState::default();

    if let Some(name) = &card.template {
        let template = TemplateStore::new(store)
            .find(name)?
            .ok_or_else(|| QuoteCardError::InvalidInput(format!("No template named '{}'", name)))?;
        editor.apply_settings(&template.settings)?;
    }

    if let Some(path) = &card.settings {
        let settings: TemplateSettings = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        editor.apply_settings(&settings)?;
    }

    if let Some(font) = &card.font_file {
        let mut fonts = FontBook::new();
        let family = parse_family_list(&editor.style.font_family)
            .into_iter()
            .next()
            .unwrap_or_else(|| "sans-serif".to_string());
        fonts.load_ttf(&family, font, card.bold_font_file.as_deref())?;
        log::info!("Registered {} as '{}'", font.display(), family);
        editor = editor.with_fonts(fonts);
    }

    if let Some(text) = &card.quote1 {
        editor.content.quote1 = text.clone();
    }
    if let Some(text) = &card.quote2 {
        editor.content.quote2 = text.clone();
        editor.style.enable_quote2 = true;
    }
    if let Some(text) = &card.author {
        editor.content.author = text.clone();
    }
    if let Some(width) = card.width {
        editor.style.card_width = check_size("width", width)?;
    }
    if let Some(height) = card.height {
        editor.style.card_height = check_size("height", height)?;
    }
    if let Some(path) = &card.background {
        editor.load_image_bytes(&std::fs::read(path)?)?;
    }

    Ok(editor)
}

fn check_size(what: &str, value: u32) -> Result<u32, QuoteCardError> {
    use quotecard::style::{MAX_CARD_SIZE, MIN_CARD_SIZE};
    if (MIN_CARD_SIZE..=MAX_CARD_SIZE).contains(&value) {
        Ok(value)
    } else {
        Err(QuoteCardError::InvalidInput(format!(
            "Card {} must be between {} and {} pixels, got {}",
            what, MIN_CARD_SIZE, MAX_CARD_SIZE, value
        )))
    }
}

fn save_card(editor: &EditorState, output: Option<PathBuf>) -> Result<(), QuoteCardError> {
    let path = output.unwrap_or_else(|| PathBuf::from(editor.export_filename()));
    write_png(&path, &editor.export_png()?)?;
    println!(
        "Saved {}x{} card to {}",
        editor.style.card_width,
        editor.style.card_height,
        path.display()
    );
    Ok(())
}

fn write_png(path: &Path, bytes: &[u8]) -> Result<(), QuoteCardError> {
    std::fs::write(path, bytes)
        .map_err(|e| QuoteCardError::Image(format!("Failed to save PNG to {}: {}", path.display(), e)))
}

/// Ask a yes/no question on the terminal; anything but "y"/"yes" is no.
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
