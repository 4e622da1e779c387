// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use bibpage::utils::logging::{format_error, format_info, format_success};
use bibpage::{Config, JsonExporter, PageAssembler, ParserKind, Pipeline, Validator};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bibpage")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Generate a categorized, searchable publications page from BibTeX", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the inputs and write the publications page (default)
    Generate {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Parse and render without writing, then check the output location
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Write the parsed entries and their categories as JSON
    Export {
        /// Destination JSON file
        destination: PathBuf,

        #[command(flatten)]
        inputs: InputArgs,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[derive(Args, Default)]
struct InputArgs {
    /// Bibliography file
    #[arg(long, value_name = "FILE")]
    bib: Option<PathBuf>,

    /// Categorization file with \addtocategory directives
    #[arg(long, value_name = "FILE")]
    categories: Option<PathBuf>,

    /// Generated page
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    parser: Option<ParserKind>,

    /// Oldest publication year to include
    #[arg(long, value_name = "YEAR")]
    min_year: Option<i32>,
}

impl InputArgs {
    fn apply(self, config: &mut Config) {
        if let Some(bib) = self.bib {
            config.paths.bibliography = bib;
        }
        if let Some(categories) = self.categories {
            config.paths.categories = categories;
        }
        if let Some(output) = self.output {
            config.paths.output = output;
        }
        if let Some(parser) = self.parser {
            config.parser.kind = parser;
        }
        if let Some(min_year) = self.min_year {
            config.parser.min_year = min_year;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    bibpage::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    let command = cli.command.unwrap_or(Commands::Generate {
        inputs: InputArgs::default(),
    });

    let result = match command {
        Commands::Generate { inputs } => {
            inputs.apply(&mut config);
            cmd_generate(config, cli.color)
        }
        Commands::Check { inputs } => {
            inputs.apply(&mut config);
            cmd_check(config)
        }
        Commands::Export {
            destination,
            inputs,
            pretty,
        } => {
            inputs.apply(&mut config);
            cmd_export(config, destination, pretty)
        }
    };

    if let Err(e) = result {
        println!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_generate(config: Config, color: bool) -> Result<()> {
    let pipeline = Pipeline::new(config)
        .context("Invalid configuration")?
        .with_progress(true)
        .with_color(color);
    info!("Parsing bibliography files with the {} parser", pipeline.parser_name());

    let stats = pipeline.run().context("Failed to generate publications page")?;

    for line in stats.summary_lines() {
        println!("{}", line);
    }
    println!(
        "{}",
        format_success("Done! You can now render the site with 'quarto render'")
    );

    Ok(())
}

fn cmd_check(config: Config) -> Result<()> {
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;

    let inputs = pipeline.load_inputs()?;
    let (_document, stats) = pipeline.render(&inputs);

    for line in stats.summary_lines() {
        println!("{}", line);
    }

    let output = &pipeline.config().paths.output;
    Validator::validate_output_path(output)
        .with_context(|| format!("{} cannot be written", output.display()))?;
    println!("{}", format_info(&format!("{} is writable", output.display())));

    Ok(())
}

fn cmd_export(config: Config, destination: PathBuf, pretty: bool) -> Result<()> {
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;
    let inputs = pipeline.load_inputs()?;

    let assembler = PageAssembler::new(&pipeline.config().page);
    let partition = assembler.partition(&inputs.bibliography, &inputs.categories);

    let count = JsonExporter::new(&destination)
        .export(&partition, pipeline.config().parser.min_year, pretty)
        .context("JSON export failed")?;

    println!(
        "{}",
        format_success(&format!("Exported {} entries to {}", count, destination.display()))
    );
    Ok(())
}
