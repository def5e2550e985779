mod automata;
mod binary_op;
mod enumerate;
mod equivalence;
mod regex_cmd;
mod test_files;

use automata::AutomataType;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::{Path, PathBuf};

pub use automata::AutomataType as FaType;

/// dandy: a little toolbox for DFAs, NFAs and regular expressions, driven by
/// the table file format described in the `dandy` crate.
#[derive(Parser, Debug)]
#[command(name = "dandy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect, combine and test finite automata and regexes", long_about = None)]
struct DandyArgs {
    /// Suppress informational log lines; only print the requested output
    #[arg(long, global = true)]
    no_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether two or more automata are equivalent
    Equivalence {
        /// The automata file to test the others against
        input: PathBuf,

        #[command(flatten)]
        args: EquivalenceArgs,
    },
    /// Combine two automata with a binary operation (union, intersection, ...)
    BinaryOp {
        /// Which operation to compute
        #[arg(value_enum)]
        op: BinaryOperation,

        #[command(flatten)]
        args: BinaryOpArgs,
    },
    /// List words belonging to the language of an automaton loaded from a file
    EnumerateFile(EnumerateFileArgs),
    /// List words belonging to the language of a regular expression
    EnumerateRegex(EnumerateRegexArgs),
    /// Test an automaton against one or more files of input strings
    Test(TestFileArgs),
    /// Compile a regular expression into a minimized DFA, or test it against input files
    Regex {
        #[command(subcommand)]
        command: RegexCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RegexCommand {
    /// Compile a pattern and print the resulting minimized DFA's table
    Compile(RegexCompileArgs),
    /// Compile a pattern and test it against one or more files of input lines
    Test(RegexTestArgs),
}

#[derive(Parser, Debug)]
pub struct RegexCompileArgs {
    /// The regular expression to compile
    pub pattern: String,

    /// Print the table using only ASCII characters instead of the default Unicode arrows/bullets
    #[arg(long)]
    pub ascii: bool,
}

#[derive(Parser, Debug)]
pub struct RegexTestArgs {
    /// The regular expression to compile
    pub pattern: String,

    /// Files containing strings to test, one per line
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct EquivalenceArgs {
    /// The type of the input and compared-against automata
    #[arg(short, long, value_enum, default_value_t = FaType::Dfa)]
    pub r#type: FaType,

    /// Treat the input file as this type instead (default: same as --type)
    #[arg(long, value_enum)]
    pub in_type: Option<FaType>,

    /// Check that the compared automaton is also minimized (DFA only)
    #[arg(long)]
    pub minimized: bool,

    /// Print `true`/`false` instead of a descriptive result
    #[arg(long)]
    pub bool: bool,

    /// Suppress informational log lines for this comparison
    #[arg(long)]
    pub no_log: bool,

    /// Print only the last N path components of each compared file (0 = full result only)
    #[arg(long, default_value_t = 1)]
    pub path_length: usize,

    /// Files to compare against the input automaton
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BinaryOpArgs {
    /// First automaton file
    pub first: PathBuf,

    /// Second automaton file
    pub second: PathBuf,

    /// Type of both input automata
    #[arg(short, long, value_enum, default_value_t = FaType::Dfa)]
    pub r#type: FaType,

    /// Type of the second automaton, if different from the first
    #[arg(long, value_enum)]
    pub second_type: Option<FaType>,

    /// Minimize the result (and the inputs, if they're already DFAs)
    #[arg(long)]
    pub minimized: bool,

    /// Print the first N words of the resulting language
    #[arg(long)]
    pub generate: Option<usize>,

    /// Check the result for equivalence against a third automaton
    #[arg(long)]
    pub compare_against: Option<PathBuf>,

    /// Type of the automaton given to --compare-against
    #[arg(long, value_enum, default_value_t = FaType::Dfa)]
    pub compared_type: FaType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BinaryOperation {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl BinaryOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperation::Union => "union",
            BinaryOperation::Intersection => "intersection",
            BinaryOperation::Difference => "difference",
            BinaryOperation::SymmetricDifference => "symmetric difference",
        }
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Parser, Debug)]
pub struct EnumerateFileArgs {
    /// The automaton file to enumerate words from
    pub file: PathBuf,

    /// The type of the automaton in the file
    #[arg(short, long, value_enum, default_value_t = AutomataType::Dfa)]
    pub r#type: AutomataType,

    /// How many words to print
    #[arg(short, long, default_value_t = 10)]
    pub amount: usize,
}

#[derive(Parser, Debug)]
pub struct EnumerateRegexArgs {
    /// The regular expression to enumerate words from
    pub regex: String,

    /// How many words to print
    #[arg(short, long, default_value_t = 10)]
    pub amount: usize,
}

#[derive(Parser, Debug)]
pub struct TestFileArgs {
    /// The automaton file to test input against
    pub automata: PathBuf,

    /// The type of the automaton in the file
    #[arg(short, long, value_enum, default_value_t = AutomataType::Dfa)]
    pub r#type: AutomataType,

    /// How to interpret each input file
    #[arg(long, value_enum, default_value_t = TestType::Lines)]
    pub test_type: TestType,

    /// Files containing strings to test, one per line
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestType {
    /// Test every line of the file individually, reporting pass/fail per line
    Lines,
    /// Treat every line of the file as a single test case; fail on the first rejected line
    WholeFile,
}

/// Joins the last `n` components of `path` with `/`, or returns `None` if `n == 0`.
pub fn last_n_components(path: &Path, n: usize) -> Option<String> {
    if n == 0 {
        return None;
    }
    let components: Vec<_> = path
        .components()
        .rev()
        .take(n)
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(
        components
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("/"),
    )
}

fn main() -> Result<(), String> {
    let args = DandyArgs::parse();

    match &args.command {
        Command::Equivalence {
            input,
            args: eq_args,
        } => {
            let file = std::fs::read_to_string(input)
                .map_err(|e| format!("Error reading {}: {e}", input.display()))?;
            equivalence::equivalence(&args, eq_args, &file);
            Ok(())
        }
        Command::BinaryOp { op, args: op_args } => {
            binary_op::binary_op(&args, op_args, *op, &mut |s| println!("{s}"))
        }
        Command::EnumerateFile(file_args) => {
            enumerate::enumerate_file(&args, file_args, |s| println!("{s}"))
        }
        Command::EnumerateRegex(regex_args) => {
            enumerate::enumerate_regex(&args, regex_args, |s| println!("{s}"))
        }
        Command::Test(test_args) => test_files::test_files(&args, test_args, |s| println!("{s}")),
        Command::Regex { command } => match command {
            RegexCommand::Compile(compile_args) => {
                regex_cmd::regex_compile(&args, compile_args, |s| println!("{s}"))
            }
            RegexCommand::Test(test_args) => {
                regex_cmd::regex_test(&args, test_args, |s| println!("{s}"))
            }
        },
    }
}
