//! Archetype Command Line Interface
//!
//! Operator tool for classifying answer sets and inspecting the catalog.
//!
//! # Usage
//!
//! ```bash
//! # Classify a quick-quiz answer file with a dream narrative
//! archetype_cli classify --variant quick --answers answers.json --text "a kiss in a garden"
//!
//! # Classify answers piped on stdin, JSON output
//! echo '{"q1": 0, "q2": 3}' | archetype_cli -o json classify --variant full
//!
//! # Describe an archetype in Spanish
//! archetype_cli describe sage --lang es
//!
//! # List the quick bank
//! archetype_cli questions --variant quick
//!
//! # Validate data files in ARCHETYPE_CONFIG_DIR
//! ARCHETYPE_CONFIG_DIR=./config archetype_cli validate
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use dream_archetype::{
    parse_answers, AnswerSet, ArchetypeEngine, Lang, QuizVariant, CONFIG_DIR_ENV,
};

#[derive(Parser)]
#[command(name = "archetype_cli")]
#[command(version)]
#[command(about = "Classify dream-quiz answers into archetype profiles")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Override directory for data files
    #[arg(long, global = true, env = CONFIG_DIR_ENV)]
    config_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    Full,
    Quick,
}

impl From<Variant> for QuizVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Full => QuizVariant::Full,
            Variant::Quick => QuizVariant::Quick,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an answer set
    Classify {
        #[arg(long, value_enum)]
        variant: Variant,

        /// Answer JSON file (reads stdin if not provided or "-")
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Dream narrative (quick quiz only)
        #[arg(long)]
        text: Option<String>,

        /// Display language for the profile
        #[arg(long, default_value = "en")]
        lang: String,

        /// Number of ranked archetypes to show
        #[arg(long, default_value_t = 3)]
        top: usize,
    },

    /// Show one archetype's registry entry
    Describe {
        /// Archetype key, e.g. "sage"
        class: String,

        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// List the questions of a bank
    Questions {
        #[arg(long, value_enum)]
        variant: Variant,

        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Load and validate every data file
    Validate,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let source = match &cli.config_dir {
        Some(dir) => dream_archetype::DataSource::with_override_dir(dir),
        None => dream_archetype::DataSource::embedded(),
    };
    let engine = ArchetypeEngine::from_source(&source).context("failed to load archetype data")?;

    match cli.command {
        Commands::Classify {
            variant,
            answers,
            text,
            lang,
            top,
        } => cmd_classify(
            &engine,
            variant.into(),
            answers,
            text.as_deref(),
            Lang::parse_or_default(&lang),
            top,
            cli.format,
        ),
        Commands::Describe { class, lang } => {
            cmd_describe(&engine, &class, Lang::parse_or_default(&lang), cli.format)
        }
        Commands::Questions { variant, lang } => cmd_questions(
            &engine,
            variant.into(),
            Lang::parse_or_default(&lang),
            cli.format,
        ),
        Commands::Validate => cmd_validate(&engine, cli.format),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn read_answers(path: Option<PathBuf>) -> Result<AnswerSet> {
    let raw = match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(&p)
            .with_context(|| format!("failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(parse_answers(&raw))
}

fn cmd_classify(
    engine: &ArchetypeEngine,
    variant: QuizVariant,
    answers: Option<PathBuf>,
    text: Option<&str>,
    lang: Lang,
    top: usize,
    format: OutputFormat,
) -> Result<()> {
    let answers = read_answers(answers)?;
    let progress = engine.progress(variant, &answers);
    let result = engine.evaluate(variant, &answers, text);

    if format == OutputFormat::Json {
        println!("{}", engine.payload(variant, &result).to_json_pretty()?);
        return Ok(());
    }

    let view = engine.profile(&result, lang, top);
    println!(
        "Answered {}/{} {} questions",
        progress.answered, progress.total, variant
    );
    println!();
    println!("{} ({}%)", view.primary.name, view.primary.percent);
    println!("  {}", view.primary.tagline);
    println!("  {}", view.primary.description);
    println!("  Traits: {}", view.primary.traits.join(", "));
    if let Some(secondary) = &view.secondary {
        println!();
        println!("Secondary: {} ({}%)", secondary.name, secondary.percent);
    }
    println!();
    println!("Confidence: {}", view.confidence);
    println!();
    println!("Ranking:");
    for (rank, chip) in view.ranking.iter().enumerate() {
        println!("  {}. {:<16} {:>3}%", rank + 1, chip.name, chip.percent);
    }
    let compatible: Vec<_> = view.compatible.iter().map(|c| c.name.as_str()).collect();
    println!();
    println!("Compatible with: {}", compatible.join(", "));
    Ok(())
}

fn cmd_describe(
    engine: &ArchetypeEngine,
    key: &str,
    lang: Lang,
    format: OutputFormat,
) -> Result<()> {
    let taxonomy = engine.taxonomy();

    if format == OutputFormat::Json {
        let compatible: Vec<_> = taxonomy
            .compatible_for(key)
            .iter()
            .map(|c| c.as_str())
            .collect();
        let output = serde_json::json!({
            "key": key,
            "name": taxonomy.name_for(key, lang),
            "tagline": taxonomy.tagline_for(key, lang),
            "description": taxonomy.description_for(key, lang),
            "long_description": taxonomy.long_description_for(key, lang),
            "traits": taxonomy.traits_for(key, lang),
            "color": taxonomy.color_for(key),
            "dark_color": taxonomy.dark_color_for(key),
            "compatible": compatible,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", taxonomy.name_for(key, lang));
    println!("  {}", taxonomy.tagline_for(key, lang));
    println!();
    println!("{}", taxonomy.long_description_for(key, lang));
    println!();
    println!("Traits: {}", taxonomy.traits_for(key, lang).join(", "));
    println!(
        "Colors: {} / {}",
        taxonomy.color_for(key),
        taxonomy.dark_color_for(key)
    );
    let compatible: Vec<_> = taxonomy
        .compatible_for(key)
        .iter()
        .map(|c| taxonomy.name(*c, lang))
        .collect();
    println!("Compatible with: {}", compatible.join(", "));
    Ok(())
}

fn cmd_questions(
    engine: &ArchetypeEngine,
    variant: QuizVariant,
    lang: Lang,
    format: OutputFormat,
) -> Result<()> {
    let bank = engine.bank(variant);

    if format == OutputFormat::Json {
        let questions: Vec<_> = bank.iter().collect();
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    for question in bank.iter() {
        println!("[{}] {}", question.id, question.prompt.get(lang));
        for (index, option) in question.options.iter().enumerate() {
            let votes: Vec<_> = option
                .scores
                .iter()
                .map(|(class, weight)| format!("{}:{}", class, weight))
                .collect();
            let dominant = option
                .dominant()
                .map(|class| engine.taxonomy().name(class, lang))
                .unwrap_or("-");
            println!(
                "    {}. {}  [{}] ({})",
                index,
                option.text.get(lang),
                dominant,
                votes.join(" ")
            );
        }
    }
    Ok(())
}

fn cmd_validate(engine: &ArchetypeEngine, format: OutputFormat) -> Result<()> {
    let full = engine.bank(QuizVariant::Full).len();
    let quick = engine.bank(QuizVariant::Quick).len();
    let archetypes = engine.taxonomy().len();
    let keywords = engine.keywords().len();

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "valid": true,
            "archetypes": archetypes,
            "full_questions": full,
            "quick_questions": quick,
            "keywords": keywords,
            "config": engine.config(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Catalog OK");
    println!("  Archetypes:       {:>4}", archetypes);
    println!("  Full questions:   {:>4}", full);
    println!("  Quick questions:  {:>4}", quick);
    println!("  Keywords:         {:>4}", keywords);
    Ok(())
}
