use anyhow::{Context, Result};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::str::FromStr;
use teamsync::agent::ChatAnalysisAgent;
use teamsync::cli::{self, AnswerWriter, CliArgs, Command};
use teamsync::config::Config;
use teamsync::context::StandardContext;
use teamsync::model::transcript::parse_transcript;

fn init_logging(args: &CliArgs, config: &Config) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Info)
    };
    let log_config = ConfigBuilder::new()
        .add_filter_allow_str("teamsync")
        .build();
    // A second init (e.g. in tests) is harmless.
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
}

#[tokio::main]
async fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = cli::parse_args(&raw)?;

    let ctx = StandardContext::new(args.root.clone());
    let config = Config::load_or_default(&ctx)?;
    init_logging(&args, &config);

    match args.command {
        Command::Help => cli::print_help("teamsync"),
        Command::Parse { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let messages = parse_transcript(&text);
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        Command::Extract { file, today } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let agent = ChatAnalysisAgent::new(&config)?;
            let extraction = agent.extract(&text, today).await?;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
        Command::Ask { file, question } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let agent = ChatAnalysisAgent::new(&config)?;
            let mut out = AnswerWriter::new(std::io::stdout());
            agent
                .ask(&text, &question, |chunk| out.write_chunk(chunk))
                .await?;
            out.write_chunk("\n");
        }
    }

    Ok(())
}
