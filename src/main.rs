use braille_writer::{
    Command, ModeRegistry, Session, back_translate,
    braille::{Cells, chars_to_code, code_to_dots},
    test::{TestResult, check_yaml},
    translate,
};
use clap::{Parser, Subcommand};
use std::{error::Error, path::PathBuf, process::ExitCode};
use tabled::{Table, Tabled};

#[derive(Debug, Subcommand)]
enum Commands {
    /// translate print <INPUT> to braille
    #[command(arg_required_else_help = true)]
    Translate {
        /// String to translate
        input: String,
    },
    /// translate braille <INPUT> to print, given as glyphs or in dot notation
    /// such as 1-12-0-14
    #[command(arg_required_else_help = true)]
    BackTranslate {
        /// Braille to translate
        input: String,
    },
    /// type <CHORDS> one after the other as on a braille keyboard. A chord is
    /// a run of dot numbers, 0 is a space. DEL, NL, CLEAR, ESC, CAP and MODE
    /// press the editing keys.
    #[command(arg_required_else_help = true)]
    Type {
        /// Chords and editing keys
        chords: Vec<String>,
    },
    /// print the alphabet, indicators and contractions of the mode
    Alphabet,
    /// list the available modes
    Modes,
    /// Run the tests defined in the <YAML_TEST_FILE>. Return 0 if all
    /// tests pass or 1 if any of the tests fail.
    CheckYaml {
        /// YAML file listing all the tests
        yaml: PathBuf,
    },
}

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "brl")]
#[command(about = "A command line tool to write and translate Unified English Braille")]
#[command(author, version, long_about = None)] // Read from `Cargo.toml`
struct Cli {
    /// Braille mode to use
    #[arg(long, global = true, env = "BRL_MODE", default_value = "ueb1")]
    mode: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Tabled)]
struct CellRow {
    cell: char,
    dots: String,
    print: String,
}

#[derive(Tabled)]
struct IndicatorRow {
    name: &'static str,
    cells: String,
}

#[derive(Tabled)]
struct ContractionRow {
    text: &'static str,
    cells: String,
    class: String,
}

#[derive(Tabled)]
struct ModeRow {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    description: &'static str,
}

fn dots(code: braille_writer::Code) -> String {
    code_to_dots(code)
        .iter()
        .map(|d| d.to_string())
        .collect::<String>()
}

fn command(token: &str) -> Result<Vec<Command>, Box<dyn Error>> {
    let command = match token {
        "DEL" => Command::Delete,
        "NL" => Command::Newline,
        "CLEAR" => Command::Clear,
        "ESC" => Command::Cancel,
        "CAP" => Command::CycleCapital,
        "MODE" => Command::CycleMode,
        chord => {
            let mut commands: Vec<Command> = code_to_dots(chars_to_code(chord)?)
                .into_iter()
                .map(Command::AddDot)
                .collect();
            commands.push(Command::Confirm);
            return Ok(commands);
        }
    };
    Ok(vec![command])
}

fn run(args: Cli) -> Result<ExitCode, Box<dyn Error>> {
    match args.command {
        Commands::Translate { input } => {
            println!("{}", translate(&args.mode, &input)?);
        }
        Commands::BackTranslate { input } => {
            println!("{}", back_translate(&args.mode, &input)?);
        }
        Commands::Type { chords } => {
            let mut session = Session::new(ModeRegistry::with_default_modes()?, &args.mode)?;
            for token in chords {
                for command in command(&token)? {
                    session.handle(command)?;
                }
            }
            let (text, braille) = session.finish();
            println!("{}", braille);
            println!("{}", text);
        }
        Commands::Alphabet => {
            let registry = ModeRegistry::with_default_modes()?;
            let mode = registry
                .mode_by_id(&args.mode)
                .ok_or_else(|| format!("unknown mode {}", args.mode))?;
            let mut rows: Vec<CellRow> = mode
                .alphabet()
                .iter()
                .map(|(code, c)| CellRow {
                    cell: code.to_glyph(),
                    dots: dots(*code),
                    print: c.to_string(),
                })
                .collect();
            rows.extend(mode.number_map().iter().map(|(code, c)| CellRow {
                cell: code.to_glyph(),
                dots: dots(*code),
                print: format!("{c} (number)"),
            }));
            println!("{}", Table::new(rows));
            let indicators = mode.indicators().iter().map(|i| IndicatorRow {
                name: i.name,
                cells: Cells(&i.codes).to_string(),
            });
            println!("{}", Table::new(indicators));
            if !mode.contractions().is_empty() {
                let contractions = mode.contractions().iter().map(|c| ContractionRow {
                    text: c.text,
                    cells: Cells(&c.codes).to_string(),
                    class: c.class.to_string(),
                });
                println!("{}", Table::new(contractions));
            }
        }
        Commands::Modes => {
            let registry = ModeRegistry::with_default_modes()?;
            let rows = registry.mode_options().into_iter().map(|info| ModeRow {
                id: info.id,
                name: info.name,
                category: info.category.unwrap_or(""),
                description: info.description,
            });
            println!("{}", Table::new(rows));
        }
        Commands::CheckYaml { yaml } => {
            println!("Testing with {:?}", yaml);
            let results = check_yaml(&yaml)?;
            for result in results.iter() {
                match result {
                    TestResult::Failure {
                        input,
                        expected,
                        actual,
                        direction,
                    } => println!(
                        "FAIL {:?} {:?}: expected {:?}, got {:?}",
                        direction, input, expected, actual
                    ),
                    TestResult::UnexpectedSuccess { input, direction } => {
                        println!("XPASS {:?} {:?}", direction, input)
                    }
                    _ => (),
                }
            }
            println!(
                "Pass: {}",
                results.iter().filter(|r| r.is_success()).count()
            );
            println!(
                "Expected failures: {}",
                results.iter().filter(|r| r.is_expected_failure()).count()
            );
            let failures = results
                .iter()
                .filter(|r| r.is_failure() || r.is_unexpected_success())
                .count();
            println!("Fail: {}", failures);
            if failures > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("brl: {e}");
            ExitCode::FAILURE
        }
    }
}
