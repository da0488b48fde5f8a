use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub show_toast: bool,
    pub show_content: bool,
    /// Milliseconds during which an identical notification is suppressed.
    pub delay: Option<u64>,
    /// Play sounds even while the window has focus.
    pub always_play_sound: bool,
    /// Silences this notification entirely, e.g. while streaming.
    pub muted: bool,
    /// Channels in which this notification is silenced.
    pub exclude: Vec<String>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            show_toast: false,
            show_content: false,
            delay: Some(500),
            always_play_sound: false,
            muted: false,
            exclude: Vec::new(),
        }
    }
}

impl Notification {
    pub fn should_notify(&self, channel: &str) -> bool {
        !self.muted
            && !self
                .exclude
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(channel))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Notifications {
    pub highlight: Notification,
}
