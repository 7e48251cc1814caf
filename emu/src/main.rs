use clap::Parser;
use color_print::cprintln;

use slemu::hooks::dump::Dump;
use slemu::{Error, Exit, Hook, State, Stdio};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Parser, Debug)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Compiled program, one hex word per line
    #[arg(default_value = "main.sml")]
    input_file: String,

    /// Stop after this many instructions
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// YAML map of addresses to dump after
    #[arg(short, long)]
    dump_cfg: Option<String>,

    /// Dump registers after every instruction
    #[arg(short = 'a', long)]
    dump_all: bool,

    /// Read program input from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Print a banner and the final state
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            cprintln!("<red,bold>error</>: {}", e);
            std::process::exit(1);
        }
    }
}

// Ok(false) when the program faulted.
fn run(args: &Args) -> Result<bool, Error> {
    if args.verbose {
        cprintln!("<s>*** Simpletron ***</> {}", args.input_file);
    }

    let mut state = State::new();
    state.load_program_file(&args.input_file)?;

    let mut console = match &args.input {
        Some(path) => Stdio::from_file(path).map_err(|e| Error::FileOpen(path.clone(), e))?,
        None => Stdio::new(),
    };
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Dump::arg(
        args.dump_cfg.clone(),
        args.dump_all,
    )?)];

    match state.run(&mut console, &mut hooks, args.tmax) {
        Ok(Exit::Halted(time)) => {
            if args.verbose {
                cprintln!("<green,bold>halt</>: after {} instructions", time);
                println!("{}", state.dump());
            }
            Ok(true)
        }
        Ok(Exit::StepLimit(time)) => {
            cprintln!("<yellow,bold>warn</>: stopped after {} instructions", time);
            if args.verbose {
                println!("{}", state.dump());
            }
            Ok(true)
        }
        Err(fault) => {
            cprintln!("<red,bold>error</>: {}", fault);
            cprintln!("<s>*** Simpletron execution abnormally terminated ***</>");
            println!("{}", state.dump());
            Ok(false)
        }
    }
}
