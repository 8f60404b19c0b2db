//! Command interpreter and session history

use chrono::Local;

use super::TerminalConfig;
use super::typing::BootLog;

/// Every command the interpreter knows, with the line shown by `help`.
pub const COMMANDS: [(&str, &str); 12] = [
    ("help", "Show this help message"),
    ("clear", "Clear the terminal"),
    ("about", "Learn about me"),
    ("skills", "List my technical skills"),
    ("projects", "View my main projects"),
    ("contact", "Get my contact information"),
    ("github", "Open my GitHub profile"),
    ("linkedin", "Open my LinkedIn profile"),
    ("experience", "Show my work experience"),
    ("education", "Show my educational background"),
    ("whoami", "Who am I?"),
    ("date", "Show current date and time"),
];

fn help_text() -> String {
    let mut text = String::from("Available commands:");
    for (name, description) in COMMANDS {
        text.push_str(&format!("\n  {name:<14}- {description}"));
    }
    text
}

const ABOUT: &str = "Hi there! 👋 I'm a full-stack developer passionate about building elegant solutions.
I specialize in web development using modern technologies and best practices.
Type 'skills' to see my technical expertise or 'projects' to view my work.";

const SKILLS: &str = "Technical Skills:
┌─────────────────┐
│ Frontend        │
├─────────────────┤
│ • React/Next.js │
│ • TypeScript    │
│ • Tailwind CSS  │
│ • Redux         │
└─────────────────┘
┌─────────────────┐
│ Backend         │
├─────────────────┤
│ • Node.js       │
│ • Python        │
│ • PHP/Symfony   │
│ • MySQL         │
└─────────────────┘";

const PROJECTS: &str = "🚀 Notable Projects:
1. Portfolio Website (Next.js, TypeScript)
   - Interactive terminal interface
   - Responsive design

2. E-Commerce Platform (Symfony)
   - Full-stack development
   - Payment integration

3. Harry Potter Trading Cards
   - Real-time card trading
   - Firebase integration

Type 'github' to see more projects!";

const CONTACT: &str = "📫 Contact Information:
- Email: your.email@example.com
- LinkedIn: linkedin.com/in/yourprofile
- GitHub: github.com/yourusername";

const EXPERIENCE: &str = "💼 Work Experience:
2023-Present | Senior Frontend Developer
- Leading development of React applications
- Mentoring junior developers

2021-2023 | Full Stack Developer
- Built scalable web applications
- Implemented CI/CD pipelines";

const EDUCATION: &str = "🎓 Education:
2018-2022 | Bachelor's in Computer Science
- Major: Software Engineering
- GPA: 3.8/4.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    ClearHistory,
    OpenUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub output: String,
    pub action: Option<CommandAction>,
}

impl CommandResponse {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            action: None,
        }
    }
}

/// Interpret one line of input. Only the first word is significant.
pub fn interpret(input: &str, config: &TerminalConfig) -> CommandResponse {
    let line = input.trim().to_lowercase();
    let Some(cmd) = line.split_whitespace().next() else {
        return CommandResponse::text("");
    };

    match cmd {
        "help" => CommandResponse::text(help_text()),
        "clear" => CommandResponse {
            output: String::new(),
            action: Some(CommandAction::ClearHistory),
        },
        "about" => CommandResponse::text(ABOUT),
        "skills" => CommandResponse::text(SKILLS),
        "projects" => CommandResponse::text(PROJECTS),
        "contact" => CommandResponse::text(CONTACT),
        "github" => CommandResponse {
            output: "Opening GitHub profile...".to_string(),
            action: Some(CommandAction::OpenUrl(config.github_url.clone())),
        },
        "linkedin" => CommandResponse {
            output: "Opening LinkedIn profile...".to_string(),
            action: Some(CommandAction::OpenUrl(config.linkedin_url.clone())),
        },
        "experience" => CommandResponse::text(EXPERIENCE),
        "education" => CommandResponse::text(EDUCATION),
        "whoami" => CommandResponse::text("ilan@portfolio"),
        "date" => CommandResponse::text(Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()),
        other => CommandResponse::text(format!(
            "Command not found: {other}\nType 'help' to see available commands."
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub input: String,
    pub output: String,
}

/// Everything shown inside the terminal: boot log, history and the pending input line.
#[derive(bevy::prelude::Resource, Debug, Default)]
pub struct TerminalSession {
    pub boot: BootLog,
    pub history: Vec<HistoryEntry>,
    pub input: String,
}

impl TerminalSession {
    pub fn accepts_input(&self) -> bool {
        self.boot.prompt_ready()
    }

    pub fn reset(&mut self) {
        self.boot.reset();
        self.history.clear();
        self.input.clear();
    }

    /// Run the pending input. Returns a URL to open, if the command asked for one.
    pub fn submit(&mut self, config: &TerminalConfig) -> Option<String> {
        let input = self.input.trim().to_string();
        self.input.clear();

        let response = interpret(&input, config);
        match response.action {
            Some(CommandAction::ClearHistory) => {
                self.history.clear();
                None
            }
            action => {
                self.history.push(HistoryEntry {
                    input,
                    output: response.output,
                });
                match action {
                    Some(CommandAction::OpenUrl(url)) => Some(url),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_command() {
        let response = interpret("help", &TerminalConfig::default());
        assert!(response.output.starts_with("Available commands:"));
        assert_eq!(response.output.lines().count(), COMMANDS.len() + 1);
        for (name, _) in COMMANDS {
            assert!(response.output.contains(&format!("  {name} ")));
            let known = interpret(name, &TerminalConfig::default());
            assert!(!known.output.starts_with("Command not found"));
        }
        assert!(response.output.contains("  education     - Show my educational background"));
        assert_eq!(response.action, None);
    }

    #[test]
    fn test_case_and_arguments_ignored() {
        let config = TerminalConfig::default();
        assert_eq!(interpret("  WhoAmI  extra args ", &config).output, "ilan@portfolio");
    }

    #[test]
    fn test_unknown_command() {
        let response = interpret("sudo rm", &TerminalConfig::default());
        assert_eq!(
            response.output,
            "Command not found: sudo\nType 'help' to see available commands."
        );
    }

    #[test]
    fn test_empty_input() {
        let response = interpret("   ", &TerminalConfig::default());
        assert_eq!(response.output, "");
        assert_eq!(response.action, None);
    }

    #[test]
    fn test_link_commands() {
        let config = TerminalConfig::default();
        let github = interpret("github", &config);
        assert_eq!(github.output, "Opening GitHub profile...");
        assert_eq!(
            github.action,
            Some(CommandAction::OpenUrl("https://github.com/yourusername".to_string()))
        );
        let linkedin = interpret("linkedin", &config);
        assert_eq!(
            linkedin.action,
            Some(CommandAction::OpenUrl("https://linkedin.com/in/yourprofile".to_string()))
        );
    }

    #[test]
    fn test_date_is_not_empty() {
        let response = interpret("date", &TerminalConfig::default());
        assert!(response.output.contains('/'));
        assert!(response.output.ends_with('M'));
    }

    #[test]
    fn test_history_and_clear() {
        let config = TerminalConfig::default();
        let mut session = TerminalSession::default();
        session.input = " about ".to_string();
        assert_eq!(session.submit(&config), None);
        session.input = String::new();
        session.submit(&config);
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].input, "about");
        assert!(session.history[0].output.starts_with("Hi there!"));
        assert_eq!(session.history[1].output, "");
        assert!(session.input.is_empty());

        session.input = "CLEAR".to_string();
        session.submit(&config);
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_submit_returns_url() {
        let config = TerminalConfig::default();
        let mut session = TerminalSession::default();
        session.input = "github".to_string();
        assert_eq!(
            session.submit(&config).as_deref(),
            Some("https://github.com/yourusername")
        );
        assert_eq!(session.history.len(), 1);
    }
}
