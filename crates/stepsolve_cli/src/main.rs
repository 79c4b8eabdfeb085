use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use stepsolve_core::{evaluate_expression, solve_equation, solve_simultaneous, Solution};

#[derive(Parser)]
#[command(
    name = "stepsolve",
    version = env!("CARGO_PKG_VERSION"),
    about = "Numeric expression evaluation and equation solving with steps"
)]
struct Cli {
    /// Print the solution record as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a constant arithmetic expression.
    Eval { expression: String },
    /// Solve a single equation for its unknown (or check a constant one).
    Solve { equation: String },
    /// Solve a system of 2 or 3 equations by grid search.
    System { equations: Vec<String> },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let solution = match &cli.command {
        Command::Eval { expression } => evaluate_expression(expression)?,
        Command::Solve { equation } => solve_equation(equation)?,
        Command::System { equations } => solve_simultaneous(equations)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        print_text(&solution);
    }
    Ok(())
}

fn print_text(solution: &Solution) {
    println!("Problem: {}", solution.problem);
    for (i, step) in solution.steps.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, step.expression, step.explanation);
    }
    println!("Answer: {}", solution.answer);
}
