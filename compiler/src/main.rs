use std::io::{Read, Write};

use clap::Parser;
use slc::msg::Msg;
use slc::{Error, Options};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source file (`-` for stdin)
    input: Option<String>,

    /// Output file (`-` for stdout)
    #[clap(short, long)]
    output: Option<String>,

    /// Print progress and a listing of the compiled program
    #[clap(short, long)]
    verbose: bool,

    /// Print the symbol table
    #[clap(short, long)]
    symbols: bool,

    /// YAML file with default options
    #[clap(short, long)]
    config: Option<String>,
}

impl Args {
    fn options(self) -> Result<Options, Error> {
        let mut opts = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };
        if let Some(input) = self.input {
            opts.input = input;
        }
        if let Some(output) = self.output {
            opts.output = output;
        }
        opts.verbose |= self.verbose;
        opts.symbols |= self.symbols;
        Ok(opts)
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = args.options().and_then(|opts| run(&opts)) {
        Msg::Error(e.to_string()).print();
        std::process::exit(1);
    }
}

fn read_source(path: &str) -> Result<String, Error> {
    let mut source = String::new();
    if path == "-" {
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| Error::FileRead("<stdin>".to_string(), e))?;
    } else {
        let mut file =
            std::fs::File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        file.read_to_string(&mut source)
            .map_err(|e| Error::FileRead(path.to_string(), e))?;
    }
    Ok(source)
}

fn run(opts: &Options) -> Result<(), Error> {
    Msg::Info(format!("1. Compile {}", opts.input)).log(opts.verbose);
    let source = read_source(&opts.input)?;
    let name = if opts.input == "-" { "<stdin>" } else { &opts.input };
    let compilation = slc::compile(name, &source);

    if opts.symbols {
        compilation.symbols.print();
    }
    compilation.print_diags();

    let program = compilation
        .program()
        .ok_or(Error::CompilationFailed(compilation.diags.len()))?;

    if opts.verbose {
        compilation.print_listing();
    }

    Msg::Info(format!("2. Write {}", opts.output)).log(opts.verbose);
    if opts.output == "-" {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        program
            .write_text(&mut out)
            .and_then(|_| out.flush())
            .map_err(|e| Error::FileWrite("<stdout>".to_string(), e))?;
    } else {
        let mut file = std::fs::File::create(&opts.output)
            .map_err(|e| Error::FileWrite(opts.output.clone(), e))?;
        program
            .write_text(&mut file)
            .map_err(|e| Error::FileWrite(opts.output.clone(), e))?;
    }
    Ok(())
}
