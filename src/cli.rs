use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use copypasta_ext::prelude::*;
use serde::Serialize;

use luckydip::config::{Config, OutputFormat};
use luckydip::draw::{Draw, parse_numbers};
use luckydip::generators::{DrawRequest, Strategy, UniqueDrawGenerator};
use luckydip::lottery::{Entry, LotteryRound, Outcome};
use luckydip::source::{Mapping, SecureSource};

#[derive(Debug, Parser)]
#[command(name = "luckydip", version, about = "Draw unique random numbers for a lottery ticket")]
pub struct Cli {
    /// Config file, instead of the one in the user config directory
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one draw
    Dip(DipArgs),
    /// Validate hand-picked numbers
    Check(CheckArgs),
    /// Play tickets against a winning draw
    Play(PlayArgs),
}

#[derive(Debug, Args)]
pub struct DrawOptions {
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i32>,
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i32>,
    #[arg(long)]
    pub count: Option<usize>,
    #[arg(long, value_enum)]
    pub mapping: Option<Mapping>,
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Args)]
pub struct DipArgs {
    #[command(flatten)]
    pub options: DrawOptions,

    /// Copy the draw to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub options: DrawOptions,

    /// The numbers, as separate arguments or one quoted list
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub numbers: Vec<String>,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub options: DrawOptions,

    /// Winning draw to use instead of generating one
    #[arg(long, value_name = "NUMBERS")]
    pub winning: Option<String>,

    /// Tickets, each a quoted list of numbers
    #[arg(required = true, num_args = 1..)]
    pub tickets: Vec<String>,
}

impl DrawOptions {
    fn apply(&self, mut config: Config) -> Config {
        config.min = self.min.unwrap_or(config.min);
        config.max = self.max.unwrap_or(config.max);
        config.count = self.count.unwrap_or(config.count);
        config.mapping = self.mapping.unwrap_or(config.mapping);
        config.strategy = self.strategy.unwrap_or(config.strategy);
        config.format = self.format.unwrap_or(config.format);
        config
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Command::Dip(args) => dip(args.options.apply(config), args.copy),
        Command::Check(args) => check(args.options.apply(config), &args.numbers),
        Command::Play(args) => play(
            args.options.apply(config),
            args.winning.as_deref(),
            &args.tickets,
        ),
    }
}

fn dip(config: Config, copy: bool) -> Result<()> {
    let mut source = SecureSource::thread();
    let draw = config
        .generator()
        .generate_request(&mut source, &config.request())?;

    println!("{}", render_draw(&draw, config.format)?);

    if copy {
        copy_to_clipboard(draw.to_string())?;
    }
    Ok(())
}

fn check(config: Config, numbers: &[String]) -> Result<()> {
    let draw = parse_ticket(&config.request(), &numbers.join(" "))?;
    println!("{}", render_draw(&draw, config.format)?);
    Ok(())
}

#[derive(Serialize)]
struct PlayReport<'a> {
    round: &'a LotteryRound,
    outcomes: &'a [Outcome],
}

fn play(config: Config, winning: Option<&str>, tickets: &[String]) -> Result<()> {
    let request = config.request();
    let entries = tickets
        .iter()
        .enumerate()
        .map(|(i, ticket)| {
            Ok(Entry {
                player: format!("ticket-{}", i + 1),
                draw: parse_ticket(&request, ticket)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut round = match winning {
        Some(numbers) => {
            let winning = parse_ticket(&request, numbers).context("invalid winning draw")?;
            LotteryRound::with_winning(None, winning)?
        }
        None => draw_round(&config.generator(), &request)?,
    };
    let outcomes = round.play(&entries)?;

    match config.format {
        OutputFormat::Json => {
            let report = PlayReport {
                round: &round,
                outcomes: &outcomes,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("round {} winning draw: {}", round.round(), round.winning());
            for outcome in &outcomes {
                let verdict = if outcome.matches { "WIN" } else { "no match" };
                println!("{}: {} {}", outcome.player, outcome.draw, verdict);
            }
            if !outcomes.iter().any(|o| o.matches) {
                println!("No winners.");
            }
        }
    }
    Ok(())
}

fn draw_round(generator: &UniqueDrawGenerator, request: &DrawRequest) -> Result<LotteryRound> {
    let mut source = SecureSource::thread();
    Ok(LotteryRound::draw(None, generator, &mut source, request)?)
}

fn parse_ticket(request: &DrawRequest, text: &str) -> Result<Draw> {
    let numbers = parse_numbers(text)?;
    request
        .validate_ticket(&numbers)
        .with_context(|| format!("invalid ticket {text:?}"))
}

fn render_draw(draw: &Draw, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Plain => draw.to_string(),
        OutputFormat::Json => serde_json::to_string(draw)?,
        OutputFormat::Slots => draw
            .slots()
            .map(|(id, value)| format!("{id}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn copy_to_clipboard(text: String) -> Result<()> {
    let mut clipboard = copypasta_ext::try_context().ok_or_else(|| anyhow!("no clipboard available"))?;
    clipboard
        .set_contents(text)
        .map_err(|e| anyhow!("could not copy to clipboard: {e}"))?;
    tracing::debug!("draw copied to clipboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["luckydip", "dip", "--max", "49", "--mapping", "scaled"]);
        let Command::Dip(args) = cli.command else {
            panic!("expected dip");
        };
        let config = args.options.apply(Config::default());
        assert_eq!(config.request(), DrawRequest::new(1, 49, 6));
        assert_eq!(config.mapping, Mapping::Scaled);
        assert_eq!(config.strategy, Strategy::Auto);
    }

    #[test]
    fn renders_slots_one_per_line() {
        let draw: Draw = "1 5 12 33 40 60".parse().unwrap();
        assert_eq!(
            render_draw(&draw, OutputFormat::Slots).unwrap(),
            "no1=1\nno2=5\nno3=12\nno4=33\nno5=40\nno6=60"
        );
        assert_eq!(
            render_draw(&draw, OutputFormat::Json).unwrap(),
            "[1,5,12,33,40,60]"
        );
    }

    #[test]
    fn ticket_accepts_split_or_quoted_numbers() {
        let request = DrawRequest::default();
        let split = parse_ticket(&request, &["1", "2", "3", "4", "5", "6"].join(" ")).unwrap();
        let quoted = parse_ticket(&request, "1 2 3 4 5 6").unwrap();
        assert_eq!(split, quoted);
        assert!(parse_ticket(&request, "1 2 3").is_err());
    }
}
