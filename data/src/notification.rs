use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::audio::{self, Sound};
use crate::config::{self, Config};
use crate::message::{Highlight, Message};

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Notification {
    Highlight {
        user: String,
        channel: String,
        message: String,
        sound: Option<Sound>,
    },
}

impl Notification {
    pub fn highlight(message: &Message, highlight: &Highlight) -> Self {
        Notification::Highlight {
            user: message.login_name.clone(),
            channel: message.channel.clone(),
            message: message.text.clone(),
            sound: highlight.sound.clone(),
        }
    }
}

/// Where dispatched notifications end up.
pub trait Sink {
    fn play(&mut self, source: audio::Source);

    fn alert(&mut self, title: &str, body: &str);
}

/// What a dispatch ended up doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatched {
    pub played: bool,
    pub alerted: bool,
}

#[derive(Debug, Default)]
pub struct Notifications {
    recent_notifications: HashMap<Notification, DateTime<Utc>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(
        &mut self,
        config: &Config,
        message: &Message,
        highlight: &Highlight,
        focused: bool,
        sink: &mut impl Sink,
    ) -> Dispatched {
        self.notify_at(Utc::now(), config, message, highlight, focused, sink)
    }

    pub fn notify_at(
        &mut self,
        now: DateTime<Utc>,
        config: &Config,
        message: &Message,
        highlight: &Highlight,
        focused: bool,
        sink: &mut impl Sink,
    ) -> Dispatched {
        let settings = &config.notifications.highlight;

        if !highlight.is_actionable()
            || !settings.should_notify(&message.channel)
        {
            return Dispatched::default();
        }

        let channel = if message.channel.is_empty() {
            "a whisper"
        } else {
            message.channel.as_str()
        };

        let (title, body) = if settings.show_content {
            (
                format!("{} highlighted you in {channel}", message.login_name),
                message.text.as_str(),
            )
        } else {
            (format!("{} highlighted you", message.login_name), channel)
        };

        self.execute(
            now,
            settings,
            &config.sound,
            &Notification::highlight(message, highlight),
            highlight,
            focused,
            &title,
            body,
            sink,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        now: DateTime<Utc>,
        settings: &config::Notification,
        sound: &config::Sound,
        notification: &Notification,
        highlight: &Highlight,
        focused: bool,
        title: &str,
        body: &str,
        sink: &mut impl Sink,
    ) -> Dispatched {
        let delay = i64::try_from(settings.delay.unwrap_or(500))
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);

        // `None` when the window reaches past the earliest representable time
        let cutoff = now.checked_sub_signed(delay);

        self.recent_notifications
            .retain(|_, last| cutoff.is_none_or(|cutoff| *last > cutoff));

        if self.recent_notifications.contains_key(notification) {
            log::trace!("suppressing repeated notification {notification:?}");
            return Dispatched::default();
        }

        let mut dispatched = Dispatched::default();

        if let Some(highlight_sound) = &highlight.sound
            && (!focused || settings.always_play_sound)
        {
            sink.play(highlight_sound.source(sound));
            dispatched.played = true;
        }

        if highlight.alert {
            sink.alert(title, body);
            dispatched.alerted = true;
        }

        self.recent_notifications.insert(notification.clone(), now);

        dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::highlight::{self, Context};

    #[derive(Default)]
    struct Recorder {
        played: Vec<audio::Source>,
        alerts: Vec<(String, String)>,
    }

    impl Sink for Recorder {
        fn play(&mut self, source: audio::Source) {
            self.played.push(source);
        }

        fn alert(&mut self, title: &str, body: &str) {
            self.alerts.push((title.to_string(), body.to_string()));
        }
    }

    fn config(toml: &str) -> Config {
        Config::parse(toml).expect("valid config")
    }

    const HIGHLIGHTS: &str = r#"
        [highlights.self]
        enabled = true
        alert = true
        sound = true
    "#;

    fn resolve(config: &Config, message: &Message) -> Highlight {
        let context = Context::new(&config.highlights, Some("me"));

        highlight::resolve(message, &context)
    }

    #[test]
    fn dispatches_sound_and_alert() {
        let config = config(HIGHLIGHTS);
        let message = Message::new("#rust", "ann", "hi me");
        let highlight = resolve(&config, &message);
        let mut sink = Recorder::default();

        let dispatched = Notifications::new()
            .notify(&config, &message, &highlight, false, &mut sink);

        assert_eq!(
            dispatched,
            Dispatched {
                played: true,
                alerted: true
            }
        );
        assert_eq!(sink.played, [audio::Source::Ping]);
        assert_eq!(
            sink.alerts,
            [("ann highlighted you".to_string(), "#rust".to_string())]
        );
    }

    #[test]
    fn focused_window_plays_no_sound() {
        let message = Message::new("#rust", "ann", "hi me");

        let tests = [
            (HIGHLIGHTS.to_string(), false),
            (
                format!(
                    "{HIGHLIGHTS}\n[notifications.highlight]\n\
                     always_play_sound = true"
                ),
                true,
            ),
        ];

        for (toml, expected) in tests {
            let config = config(&toml);
            let highlight = resolve(&config, &message);
            let mut sink = Recorder::default();

            let dispatched = Notifications::new()
                .notify(&config, &message, &highlight, true, &mut sink);

            assert_eq!(dispatched.played, expected, "{toml}");
            assert!(dispatched.alerted);
        }
    }

    #[test]
    fn muted_and_excluded_channels() {
        let tests = [
            "[notifications.highlight]\nmuted = true",
            "[notifications.highlight]\nexclude = [\"#RUST\"]",
        ];

        for extra in tests {
            let config = config(&format!("{HIGHLIGHTS}\n{extra}"));
            let message = Message::new("#rust", "ann", "hi me");
            let highlight = resolve(&config, &message);
            let mut sink = Recorder::default();

            let dispatched = Notifications::new()
                .notify(&config, &message, &highlight, false, &mut sink);

            assert_eq!(dispatched, Dispatched::default(), "{extra}");
            assert!(sink.played.is_empty());
            assert!(sink.alerts.is_empty());
        }
    }

    #[test]
    fn repeated_notifications_are_suppressed() {
        let config = config(&format!(
            "{HIGHLIGHTS}\n[notifications.highlight]\n\
             show_content = true\ndelay = 1000"
        ));
        let message = Message::new("#rust", "ann", "hi me");
        let highlight = resolve(&config, &message);
        let mut notifications = Notifications::new();
        let mut sink = Recorder::default();
        let start = Utc::now();

        let offsets = [(0, true), (500, false), (1500, true)];

        for (offset, expected) in offsets {
            let dispatched = notifications.notify_at(
                start + TimeDelta::milliseconds(offset),
                &config,
                &message,
                &highlight,
                false,
                &mut sink,
            );

            assert_eq!(dispatched.alerted, expected, "{offset}");
        }

        assert_eq!(sink.alerts.len(), 2);
        assert_eq!(
            sink.alerts[0],
            ("ann highlighted you in #rust".to_string(), "hi me".to_string())
        );
    }

    #[test]
    fn huge_delay_keeps_suppressing() {
        let tests = [
            (9_000_000_000_000_000_000, Utc::now()),
            (u64::MAX, Utc::now()),
            (1000, DateTime::<Utc>::MIN_UTC),
        ];

        for (delay, now) in tests {
            let mut config = config(HIGHLIGHTS);
            config.notifications.highlight.delay = Some(delay);
            let message = Message::new("#rust", "ann", "hi me");
            let highlight = resolve(&config, &message);
            let mut notifications = Notifications::new();
            let mut sink = Recorder::default();

            for _ in 0..2 {
                notifications.notify_at(
                    now,
                    &config,
                    &message,
                    &highlight,
                    false,
                    &mut sink,
                );
            }

            assert_eq!(sink.alerts.len(), 1, "{delay}");
        }
    }

    #[test]
    fn expired_notifications_are_forgotten() {
        let config = config(&format!(
            "{HIGHLIGHTS}\n[notifications.highlight]\ndelay = 1000"
        ));
        let mut notifications = Notifications::new();
        let mut sink = Recorder::default();
        let start = Utc::now();

        let messages = [
            (0, Message::new("#rust", "ann", "hi me")),
            (100, Message::new("#rust", "bob", "hi me")),
            (2000, Message::new("#rust", "cat", "hi me")),
        ];

        for (offset, message) in messages {
            let highlight = resolve(&config, &message);

            notifications.notify_at(
                start + TimeDelta::milliseconds(offset),
                &config,
                &message,
                &highlight,
                false,
                &mut sink,
            );
        }

        assert_eq!(sink.alerts.len(), 3);
        assert_eq!(notifications.recent_notifications.len(), 1);
    }

    #[test]
    fn nothing_to_dispatch() {
        let config = config(HIGHLIGHTS);
        let message = Message::new("#rust", "ann", "hello");
        let highlight = resolve(&config, &message);
        let mut sink = Recorder::default();

        let dispatched = Notifications::new()
            .notify(&config, &message, &highlight, false, &mut sink);

        assert_eq!(dispatched, Dispatched::default());
    }
}
