mod commands;
mod examples;
mod output;
mod theme;

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::{Color, Colorize, control::ShouldColorize};
use env_logger::Env;

use commands::{
    demo::handle_demo,
    schema::{SchemaArgs, handle_schema},
    search::{SearchArgs, handle_search},
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use sift::{ShapeDescriptor, SiftConfig, registered_shapes};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("SIFT_CONFIG", "Path to the sift.toml configuration file"),
    ("SIFT_DATA_DIR", "Data directory when the config uses data.dir = \"${SIFT_DATA_DIR}\""),
    ("RUST_LOG", "Log filter, overrides [logging] filter in sift.toml"),
];

#[derive(Parser)]
#[command(name = "sift")]
#[command(version)]
#[command(
    about = "Filter, sort and page collections of typed records",
    long_about = r#"Record search CLI for sift that provides:

• Case-insensitive free-text search over a shape's text fields
• Field:operator:value filter criteria with lenient type coercion
• Stable single-key sorting with a per-shape default
• Clamped paging with total counts

Commands:
  search    Search records of a registered shape
  schema    Describe registered shapes and their fields
  demo      Run the built-in walkthroughs
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Configuration file (defaults to ./sift.toml when present)
    #[arg(long, env = "SIFT_CONFIG", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Parse the command line against the styled command, letting clap print help,
/// version and usage errors itself.
fn parse_cli() -> Cli {
    cli_command()
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches))
        .unwrap_or_else(|err| err.exit())
}

/// The clap command with per-command examples and an appendix describing the
/// registered shapes. Shapes must be registered before this is built.
fn cli_command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .styles(help_styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(render_appendix(&registered_shapes(), use_color));

    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(render_examples(example.groups, use_color));
        }
    }
    command
}

fn help_styles() -> Styles {
    Styles::styled()
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .header(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

fn paint(text: &str, color: Color, use_color: bool) -> String {
    if use_color { text.color(color).to_string() } else { text.to_string() }
}

fn heading(buffer: &mut String, title: &str, use_color: bool) {
    let title = if use_color {
        title.color(THEME.highlight).bold().to_string()
    } else {
        title.to_string()
    };
    let _ = writeln!(buffer, "{title}");
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut buffer = String::new();
    heading(&mut buffer, "Examples:", use_color);

    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            buffer.push('\n');
        }
        let _ = writeln!(buffer, "  {}", paint(group.title, THEME.primary, use_color));
        for command in group.commands {
            let _ = writeln!(
                buffer,
                "    {} {}",
                paint(ICONS.arrow, THEME.muted, use_color),
                paint(command, THEME.secondary, use_color)
            );
        }
    }
    buffer
}

/// One line per shape: its name, field count, free-text fields and default sort.
fn describe_shape(shape: &ShapeDescriptor) -> String {
    let mut line = format!("{} fields", shape.fields.len());
    if !shape.text_search_fields.is_empty() {
        let _ = write!(line, ", free text over {}", shape.text_search_fields.join(", "));
    }
    if let Some(sort) = shape.default_sort {
        let _ = write!(line, ", sorted by {sort} descending by default");
    }
    line
}

fn render_appendix(shapes: &[ShapeDescriptor], use_color: bool) -> String {
    let mut buffer = String::new();

    heading(&mut buffer, "Shapes:", use_color);
    if shapes.is_empty() {
        let _ = writeln!(buffer, "  (none registered)");
    }
    let width = shapes.iter().map(|shape| shape.shape.len()).max().unwrap_or(0);
    for shape in shapes {
        let name = format!("{:width$}", shape.shape);
        let _ = writeln!(
            buffer,
            "  {}  {}",
            paint(&name, THEME.key, use_color),
            paint(&describe_shape(shape), THEME.value, use_color)
        );
    }

    buffer.push('\n');
    heading(&mut buffer, "Environment Variables:", use_color);
    for (key, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(
            buffer,
            "  {}  {}",
            paint(key, THEME.key, use_color),
            paint(description, THEME.value, use_color)
        );
    }

    buffer.push('\n');
    heading(&mut buffer, "Tip:", use_color);
    let _ = writeln!(
        buffer,
        "  {}",
        paint("Run 'sift schema <shape>' to list the fields a filter can name.", THEME.secondary, use_color)
    );
    buffer
}

#[derive(Subcommand)]
enum Commands {
    /// Search records of a registered shape
    Search(SearchArgs),

    /// Describe registered shapes and their fields
    Schema(SchemaArgs),

    /// Run the built-in walkthroughs against sample data
    Demo,
}

fn init_logging(config: &SiftConfig, verbose: bool) {
    let filter = if verbose { "debug" } else { config.logging.filter.as_str() };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(filter)).try_init();
}

#[tokio::main]
async fn main() {
    sift::examples::register_all();
    let cli = parse_cli();

    if let Err(err) = execute(cli).await {
        eprintln!("{} {err:#}", "Error:".color(THEME.error).bold());
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = SiftConfig::load_or_default(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    match cli.command {
        Commands::Search(args) => handle_search(args, &config, &output).await,
        Commands::Schema(args) => handle_schema(args, &output),
        Commands::Demo => handle_demo(&output).await,
    }
}
