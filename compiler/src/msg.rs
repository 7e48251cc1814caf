use color_print::cprintln;

/// Messages not tied to a source line.
#[derive(Debug)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
    Info(String),
}

impl Msg {
    pub fn print(&self) {
        match self {
            Msg::Error(msg) => cprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
            Msg::Info(msg) => cprintln!("<blue>info</>: {}", msg),
        }
    }

    /// Print only in verbose mode; errors always print.
    pub fn log(&self, verbose: bool) {
        if verbose || matches!(self, Msg::Error(_)) {
            self.print();
        }
    }
}
