use std::io::Write;
use std::io::stdout;

use clap::Parser;
use clap::Subcommand;
use expression_calculator::History;
use expression_calculator::HistoryEntry;
use expression_calculator::Lexer;
use expression_calculator::TraceStep;
use expression_calculator::convert;
use expression_calculator::convert_with_trace;
use expression_calculator::history;
use expression_calculator::lex::InvalidCharacterError;
use expression_calculator::lex::InvalidNumberError;
use expression_calculator::run;
use expression_calculator::tokenize;
use miette::Error;
use miette::miette;

#[derive(Parser, Debug)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Tokenize { expression: String },
    Convert {
        expression: String,
        #[arg(long)]
        steps: bool,
    },
    Eval { expression: String },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Tokenize { expression }) => {
            for token in Lexer::new(&expression) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => return Err(fail(e)),
                };
                println!("{:?} {}", token.kind, token.literal);
            }
        }
        Some(Commands::Convert { expression, steps }) => {
            let tokens = match tokenize(&expression) {
                Ok(tokens) => tokens,
                Err(e) => return Err(fail(e)),
            };
            if steps {
                match convert_with_trace(&tokens) {
                    Ok((postfix, trace)) => {
                        print_trace(&trace);
                        println!("{}", history::render(&postfix));
                    }
                    Err(e) => return Err(fail(e)),
                }
            } else {
                match convert(&tokens) {
                    Ok(postfix) => println!("{}", history::render(&postfix)),
                    Err(e) => return Err(fail(e)),
                }
            }
        }
        Some(Commands::Eval { expression }) => match run(&expression) {
            Ok((_, result)) => println!("{result}"),
            Err(e) => return Err(fail(e)),
        },
        None => menu()?,
    }

    Ok(())
}

/// Scan failures get a terse one-line summary before the full report, and
/// input errors exit with the conventional status for bad data.
fn fail(e: Error) -> Error {
    if let Some(invalid) = e.downcast_ref::<InvalidCharacterError>() {
        eprintln!("Error: unexpected character: {}", invalid.token);
        eprintln!("{e:?}");

        std::process::exit(65);
    } else if let Some(invalid) = e.downcast_ref::<InvalidNumberError>() {
        eprintln!("Error: invalid number: {}", invalid.literal);
        eprintln!("{e:?}");

        std::process::exit(65);
    }
    e
}

fn print_trace(trace: &[TraceStep<'_>]) {
    for step in trace {
        println!(
            "  {} -> output: [{}]  stack: [{}]",
            step.token,
            history::render(&step.output),
            history::render(&step.stack),
        );
    }
}

/// Prompt on stdout and read one trimmed line; `None` means stdin closed.
fn prompt(message: &str) -> Result<Option<String>, Error> {
    write!(stdout(), "{message}").map_err(|e| miette!("{e}"))?;
    stdout().flush().map_err(|e| miette!("{e}"))?;
    let mut input = String::new();
    let read = std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| miette!("{e}"))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn menu() -> Result<(), Error> {
    let mut history = History::new();

    println!("Welcome to the Expression Calculator!");

    loop {
        println!();
        println!("{}", "=".repeat(50));
        println!("EXPRESSION CALCULATOR");
        println!("{}", "=".repeat(50));
        println!("1. Enter expression");
        println!("2. Convert to postfix (step by step)");
        println!("3. Evaluate expression");
        println!("4. View history");
        println!("5. Exit");

        let Some(choice) = prompt("\nChoose an option (1-5): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => enter_expression(&mut history)?,
            "2" => convert_latest(&history),
            "3" => evaluate_latest(&history),
            "4" => view_history(&history),
            "5" => {
                println!("Thank you for using the Expression Calculator!");
                break;
            }
            _ => println!("Invalid choice. Please select 1-5."),
        }
    }

    Ok(())
}

fn enter_expression(history: &mut History) -> Result<(), Error> {
    println!("\nSupported operators: + - * / ^ and ( ) for grouping");
    println!("Example: 3 + 4 * (2 - 1)");

    let Some(expression) = prompt("\nEnter infix expression: ")? else {
        return Ok(());
    };

    match run(&expression) {
        Ok((postfix, result)) => {
            history.push(HistoryEntry::new(&expression, &postfix, result));
            println!("Expression added. Result: {result}");
        }
        Err(e) => eprintln!("{e:?}"),
    }
    Ok(())
}

fn convert_latest(history: &History) {
    let Some(latest) = history.latest() else {
        println!("\nNo expressions in history.");
        return;
    };

    println!("\nConverting: {}", latest.infix);
    let traced = tokenize(&latest.infix).and_then(|tokens| convert_with_trace(&tokens));
    match traced {
        Ok((postfix, trace)) => {
            print_trace(&trace);
            println!("Final postfix: {}", history::render(&postfix));
        }
        // Entries come from successful runs, so this only triggers if the
        // stored infix text was tampered with.
        Err(e) => eprintln!("{e:?}"),
    }
}

fn evaluate_latest(history: &History) {
    match history.latest() {
        Some(latest) => println!("\nEvaluating: {} = {}", latest.infix, latest.result),
        None => println!("\nNo expressions to evaluate."),
    }
}

fn view_history(history: &History) {
    println!("\nCALCULATION HISTORY");
    if history.is_empty() {
        println!("No calculations yet.");
        return;
    }
    for (i, entry) in history.iter().enumerate() {
        println!("{}. Infix: {}", i + 1, entry.infix);
        println!("   Postfix: {}", entry.postfix);
        println!("   Result: {}", entry.result);
    }
}
