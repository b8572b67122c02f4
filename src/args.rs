use std::path::PathBuf;

use clap::Parser;

/// Translate a PL/0 program into C.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// PL/0 source file; must end in `.pl0`
    pub input: PathBuf,

    /// Where to write the generated C
    #[arg(required_unless_present = "tokens")]
    pub output: Option<PathBuf>,

    /// Maximum block nesting, counting the program block. Values above 2
    /// produce nested C functions, a GCC extension; a nested procedure
    /// called from outside its enclosing procedure is reported with a
    /// warning, since C cannot see it there.
    #[arg(long, default_value_t = wmoc::DEFAULT_MAX_DEPTH as u32, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: u32,

    /// Print the token stream instead of translating
    #[arg(long)]
    pub tokens: bool,

    /// More logging on stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
