//! Terminal configuration

use bevy::prelude::*;
use std::time::Duration;

#[derive(Resource, Clone, Debug)]
pub struct TerminalConfig {
    /// Pause before the first boot-log character
    pub boot_delay: Duration,
    /// Extra pause before the boot log restarts after reopening
    pub reopen_delay: Duration,
    /// Pause between the last boot-log line and the prompt
    pub prompt_delay: Duration,
    pub min_size: Vec2,
    /// Viewports narrower than this get the compact layout
    pub mobile_breakpoint: f32,
    pub prompt: String,
    pub title: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub line_height: f32,
    pub font_size: f32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            boot_delay: Duration::from_millis(400),
            reopen_delay: Duration::from_millis(1200),
            prompt_delay: Duration::from_millis(500),
            min_size: Vec2::new(400.0, 200.0),
            mobile_breakpoint: 768.0,
            prompt: "ilan@portfolio> ".to_string(),
            title: "ilan@portfolio:~/experience".to_string(),
            github_url: "https://github.com/yourusername".to_string(),
            linkedin_url: "https://linkedin.com/in/yourprofile".to_string(),
            line_height: 20.0,
            font_size: 14.0,
        }
    }
}
