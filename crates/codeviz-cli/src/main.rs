mod render;
mod serve;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use codeviz_core::{resolve_language, Config, DiagramType, Language, Pipeline, VisualizeRequest};

#[derive(Parser)]
#[command(name = "codeviz")]
#[command(about = "AST, control-flow and data-dependency diagrams for Python and Java", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a diagram of a source file
    Render {
        /// Source file to visualize
        file: PathBuf,

        /// Source language: auto, python or java
        #[arg(short, long, default_value = "auto")]
        language: String,

        /// Diagram type: ast, cfg or ddg
        #[arg(short, long, default_value = "ast")]
        diagram: String,

        /// Override the AST depth limit
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the HTTP API
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Svg,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Render {
            file,
            language,
            diagram,
            max_depth,
            format,
            output,
        } => run_render(config, &file, &language, &diagram, max_depth, format, output.as_deref()),
        Commands::Serve { port } => run_serve(config, port),
        Commands::Config => {
            match toml::to_string_pretty(&config) {
                Ok(text) => print!("{}", text),
                Err(_) => print!("{}", Config::default_config_string()),
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_render(
    config: Config,
    file: &Path,
    language: &str,
    diagram: &str,
    max_depth: Option<usize>,
    format: Format,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(file)?;

    // An explicit language wins; otherwise the extension, then the content.
    let language = if language.eq_ignore_ascii_case("auto") {
        match file
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
        {
            Some(lang) => lang,
            None => resolve_language(&source, "auto")?,
        }
    } else {
        resolve_language(&source, language)?
    };
    let diagram: DiagramType = diagram.parse()?;

    let mut request = VisualizeRequest::new(source, language, diagram);
    request.max_depth = max_depth;

    let visualization = Pipeline::new(config).run(&request)?;
    if let Some(error) = &visualization.metadata.parse_error {
        tracing::warn!("{}", error);
    }

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&visualization)?,
        Format::Svg => render::render_svg(&visualization),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("Wrote {} to {}", visualization.title, path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn run_serve(config: Config, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut serve_config = serve::ServeConfig::from(&config);
    if let Some(port) = port {
        serve_config.port = port;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve::start_server(Pipeline::new(config), serve_config))
}
