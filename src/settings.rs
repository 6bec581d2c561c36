/// Texts and names the interpreter uses when talking to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Shown before every line is read.
    pub prompt: String,
    /// Printed once when the loop starts, if set.
    pub startup_text: Option<String>,
    /// Printed when the loop stops.
    pub stop_text: String,
    /// Printed when a line names an unknown command.
    pub not_found_text: String,
    /// The line that stops the shell.
    pub exit_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            startup_text: None,
            stop_text: "Goodbye".to_string(),
            not_found_text: "Command not found".to_string(),
            exit_command: "exit".to_string(),
        }
    }
}

impl Settings {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_startup_text(mut self, text: impl Into<String>) -> Self {
        self.startup_text = Some(text.into());
        self
    }

    pub fn with_stop_text(mut self, text: impl Into<String>) -> Self {
        self.stop_text = text.into();
        self
    }

    pub fn with_not_found_text(mut self, text: impl Into<String>) -> Self {
        self.not_found_text = text.into();
        self
    }

    pub fn with_exit_command(mut self, name: impl Into<String>) -> Self {
        self.exit_command = name.into();
        self
    }
}
