use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Write};

/// Line-oriented terminal the machine reads input from and prints to.
pub trait Console {
    /// Show `prompt` and read one line without its terminator. `None` at end
    /// of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
    fn write(&mut self, text: &str);
}

/// Process stdout, with input from stdin or a file.
pub struct Stdio {
    input: Box<dyn BufRead>,
}

impl Stdio {
    pub fn new() -> Self {
        Stdio {
            input: Box::new(BufReader::new(io::stdin())),
        }
    }

    pub fn from_file(path: &str) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Stdio {
            input: Box::new(BufReader::new(file)),
        })
    }
}

impl Default for Stdio {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Stdio {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
        }
    }

    fn write(&mut self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }
}

/// Canned input and captured output.
#[derive(Debug, Default, Clone)]
pub struct Script {
    input: VecDeque<String>,
    pub output: String,
    pub prompts: usize,
}

impl Script {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Script {
            input: input.into_iter().map(Into::into).collect(),
            output: String::new(),
            prompts: 0,
        }
    }

    /// Output split into lines.
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

impl Console for Script {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.prompts += 1;
        self.input.pop_front()
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }
}
