//! Decides how an incoming message is highlighted.
//!
//! Highlight sources are evaluated as a fixed cascade of stages:
//!
//! 1. subscription messages, which claim the highlight color
//! 2. blocked users, which cancel any highlight
//! 3. received whispers
//! 4. user rules, which stop the cascade once they alert and play a sound
//! 5. the local user's own messages, which stop the cascade
//! 6. phrase rules, including one for the local user's name
//! 7. badge rules

use std::ops::ControlFlow;

use crate::audio::Sound;
use crate::config::highlights::{Highlights, Pattern, Rule};
use crate::message::{Flags, Message};
use crate::palette::Color;

/// Everything resolution depends on besides the message itself. Holds an
/// immutable view of the configuration for the duration of the calls.
#[derive(Debug)]
pub struct Context<'a> {
    config: &'a Highlights,
    own_nick: Option<&'a str>,
    own_nick_rule: Option<Rule>,
}

impl<'a> Context<'a> {
    /// `own_nick` is the local user's login name, `None` when anonymous.
    pub fn new(config: &'a Highlights, own_nick: Option<&'a str>) -> Self {
        let own_nick = own_nick.filter(|nick| !nick.is_empty());

        let own_nick_rule = own_nick
            .filter(|_| config.own_nick.enabled)
            .and_then(|nick| Pattern::words(&[nick.to_string()], true).ok())
            .map(|pattern| Rule {
                pattern,
                alert: config.own_nick.alert,
                sound: config.own_nick.sound,
                sound_url: config.own_nick.sound_url.clone(),
                color: Some(config.colors.self_highlight),
                show_in_mentions: config.own_nick.show_in_mentions,
            });

        Self {
            config,
            own_nick,
            own_nick_rule,
        }
    }

    fn is_own_nick(&self, login_name: &str) -> bool {
        self.own_nick
            .is_some_and(|nick| nick.eq_ignore_ascii_case(login_name))
    }

    fn rule_color(&self, rule: Option<Color>) -> Color {
        rule.unwrap_or(self.config.colors.highlight)
    }
}

/// The outcome of highlight resolution for one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlight {
    pub highlighted: bool,
    pub alert: bool,
    pub sound: Option<Sound>,
    pub color: Option<Color>,
    pub show_in_mentions: bool,
}

impl Highlight {
    pub fn has_sound(&self) -> bool {
        self.sound.is_some()
    }

    /// Whether anything needs to be dispatched to the user.
    pub fn is_actionable(&self) -> bool {
        self.alert || self.has_sound()
    }

    /// Writes the highlight related fields of `message`.
    pub fn apply(&self, message: &mut Message) {
        if self.highlighted {
            message.flags |= Flags::HIGHLIGHTED;
        }

        if self.show_in_mentions {
            message.flags |= Flags::SHOW_IN_MENTIONS;
        }

        if let Some(color) = self.color {
            message.highlight_color = Some(color);
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Accumulator {
    highlighted: bool,
    alert: bool,
    sound: Option<Sound>,
    color: Option<Color>,
    show_in_mentions: bool,
    color_claimed: bool,
}

impl Accumulator {
    fn set_color(&mut self, color: Color) {
        if !self.color_claimed {
            self.color = Some(color);
        }
    }

    fn is_complete(&self) -> bool {
        self.alert && self.sound.is_some()
    }
}

impl From<Accumulator> for Highlight {
    fn from(accumulator: Accumulator) -> Self {
        Highlight {
            highlighted: accumulator.highlighted,
            alert: accumulator.alert,
            sound: accumulator.sound,
            color: accumulator.color,
            show_in_mentions: accumulator.show_in_mentions,
        }
    }
}

type Flow = ControlFlow<Accumulator, Accumulator>;
type Stage = fn(Accumulator, &Message, &Context<'_>) -> Flow;

const STAGES: [(&str, Stage); 7] = [
    ("subscription", subscription),
    ("blocked", blocked),
    ("whisper", whisper),
    ("users", users),
    ("own message", own_message),
    ("phrases", phrases),
    ("badges", badges),
];

pub fn resolve(message: &Message, context: &Context<'_>) -> Highlight {
    let mut accumulator = Accumulator::default();

    for (name, stage) in STAGES {
        match stage(accumulator, message, context) {
            ControlFlow::Continue(next) => accumulator = next,
            ControlFlow::Break(done) => {
                log::trace!(
                    "highlight of message from {} settled at {name}",
                    message.login_name
                );
                return done.into();
            }
        }
    }

    accumulator.into()
}

/// Resolves the highlight of `message` and applies it.
pub fn resolve_and_apply(
    message: &mut Message,
    context: &Context<'_>,
) -> Highlight {
    let highlight = resolve(message, context);
    highlight.apply(message);
    highlight
}

fn subscription(
    mut accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    let settings = &context.config.subscription;

    if message.flags.contains(Flags::SUBSCRIPTION) && settings.enabled {
        accumulator.alert |= settings.alert;

        if settings.sound {
            accumulator.sound = Some(Sound::new(settings.sound_url.as_ref()));
        }

        accumulator.highlighted = true;
        accumulator.color = Some(context.config.colors.subscription);
        accumulator.color_claimed = true;
    }

    ControlFlow::Continue(accumulator)
}

fn blocked(
    accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    if context.config.is_blocked(&message.login_name) {
        ControlFlow::Break(Accumulator::default())
    } else {
        ControlFlow::Continue(accumulator)
    }
}

fn whisper(
    mut accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    let settings = &context.config.whisper;

    if message.is_received_whisper() && settings.enabled {
        accumulator.alert |= settings.alert;

        if settings.sound {
            accumulator.sound = Some(Sound::new(settings.sound_url.as_ref()));
        }

        accumulator.set_color(context.config.colors.whisper);
    }

    ControlFlow::Continue(accumulator)
}

fn users(
    mut accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    for rule in &context.config.users {
        if !rule.is_match(&message.login_name) {
            continue;
        }

        log::debug!(
            "highlight because user {} sent a message",
            message.login_name
        );

        accumulator.highlighted = true;
        accumulator.set_color(context.rule_color(rule.color));
        accumulator.show_in_mentions |= rule.show_in_mentions;
        accumulator.alert |= rule.alert;

        if rule.sound {
            accumulator.sound = Some(Sound::new(rule.sound_url.as_ref()));
        }

        // User highlights beat phrase highlights
        if accumulator.is_complete() {
            return ControlFlow::Break(accumulator);
        }
    }

    ControlFlow::Continue(accumulator)
}

fn own_message(
    accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    if context.is_own_nick(&message.login_name) {
        ControlFlow::Break(accumulator)
    } else {
        ControlFlow::Continue(accumulator)
    }
}

fn phrases(
    mut accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    let rules = context
        .config
        .matches
        .iter()
        .chain(context.own_nick_rule.as_ref());

    for rule in rules {
        if !rule.is_match(&message.text) {
            continue;
        }

        accumulator.highlighted = true;
        accumulator.set_color(context.rule_color(rule.color));
        accumulator.show_in_mentions |= rule.show_in_mentions;
        accumulator.alert |= rule.alert;

        if rule.sound && accumulator.sound.is_none() {
            accumulator.sound = Some(Sound::new(rule.sound_url.as_ref()));
        }

        if accumulator.is_complete() {
            break;
        }
    }

    ControlFlow::Continue(accumulator)
}

fn badges(
    mut accumulator: Accumulator,
    message: &Message,
    context: &Context<'_>,
) -> Flow {
    let mut matched = false;

    'rules: for rule in &context.config.badges {
        for badge in &message.badges {
            if !rule.is_match(badge) {
                continue;
            }

            if !matched {
                accumulator.highlighted = true;
                accumulator.set_color(context.rule_color(rule.color));
                matched = true;
            }

            accumulator.alert |= rule.alert;

            if rule.sound && accumulator.sound.is_none() {
                accumulator.sound = Some(Sound::new(rule.sound_url.as_ref()));
            }

            if accumulator.is_complete() {
                break 'rules;
            }
        }
    }

    ControlFlow::Continue(accumulator)
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::message::{Badge, Direction};

    fn highlights(toml: &str) -> Highlights {
        toml::from_str(toml).expect("valid highlights")
    }

    fn url(url: &str) -> Url {
        Url::parse(url).expect("valid url")
    }

    fn sub(author: &str, text: &str) -> Message {
        Message::new("#rust", author, text).with_flags(Flags::SUBSCRIPTION)
    }

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn nothing_configured() {
        let config = Highlights::default();
        let context = Context::new(&config, Some("me"));

        let highlight = resolve(&sub("ann", "hi me"), &context);

        assert_eq!(highlight, Highlight::default());
        assert!(!highlight.is_actionable());
    }

    #[test]
    fn subscription_claims_color() {
        let config = highlights(
            r##"
            [subscription]
            enabled = true
            alert = true
            sound = true

            [[match]]
            words = ["hype"]
            color = "#ff0000"
            show_in_mentions = true
            "##,
        );
        let context = Context::new(&config, None);

        let highlight = resolve(&sub("ann", "hype!"), &context);

        assert!(highlight.highlighted);
        assert!(highlight.alert);
        assert_eq!(highlight.sound, Some(Sound::Fallback));
        assert_eq!(highlight.color, Some(config.colors.subscription));
        assert!(highlight.show_in_mentions);
    }

    #[test]
    fn blocked_user_overrides_subscription() {
        let config = highlights(
            r#"
            blocked = ["Troll"]

            [subscription]
            enabled = true
            alert = true
            sound = true
            "#,
        );
        let context = Context::new(&config, None);

        let highlight = resolve(&sub("troll", "resub"), &context);

        assert_eq!(highlight, Highlight::default());
    }

    #[test]
    fn whisper_does_not_stop_the_cascade() {
        let config = highlights(
            r##"
            [whisper]
            enabled = true
            alert = true
            sound_url = "file:///tmp/whisper.wav"

            [[match]]
            words = ["urgent"]
            sound = true
            sound_url = "file:///tmp/urgent.wav"
            color = "#ff0000"
            "##,
        );
        let context = Context::new(&config, Some("me"));

        let plain = Message::new("", "ann", "psst").with_flags(Flags::WHISPER);
        let urgent =
            Message::new("", "ann", "urgent psst").with_flags(Flags::WHISPER);
        let sent = plain.clone().with_direction(Direction::Sent);

        let highlight = resolve(&plain, &context);
        assert!(highlight.alert);
        assert!(!highlight.has_sound());
        assert!(!highlight.highlighted);
        assert_eq!(highlight.color, Some(config.colors.whisper));

        let highlight = resolve(&urgent, &context);
        assert!(highlight.alert);
        assert!(highlight.highlighted);
        assert_eq!(
            highlight.sound,
            Some(Sound::Custom(url("file:///tmp/urgent.wav")))
        );
        assert_eq!(highlight.color, Some(RED));

        assert_eq!(resolve(&sent, &context), Highlight::default());
    }

    #[test]
    fn whisper_respects_subscription_color() {
        let config = highlights(
            r#"
            [subscription]
            enabled = true

            [whisper]
            enabled = true
            alert = true
            sound = true
            sound_url = "file:///tmp/whisper.wav"
            "#,
        );
        let context = Context::new(&config, None);

        let message = Message::new("", "ann", "psst")
            .with_flags(Flags::SUBSCRIPTION | Flags::WHISPER);

        let highlight = resolve(&message, &context);

        assert!(highlight.highlighted);
        assert!(highlight.alert);
        assert_eq!(
            highlight.sound,
            Some(Sound::Custom(url("file:///tmp/whisper.wav")))
        );
        assert_eq!(highlight.color, Some(config.colors.subscription));
    }

    #[test]
    fn user_rule_beats_phrase_rule() {
        let config = highlights(
            r##"
            [[users]]
            words = ["ann"]
            alert = true
            sound = true
            color = "#0000ff"

            [[match]]
            words = ["hello"]
            color = "#ff0000"
            show_in_mentions = true
            "##,
        );
        let context = Context::new(&config, None);

        let message = Message::new("#rust", "Ann", "hello");

        let highlight = resolve(&message, &context);

        assert!(highlight.highlighted);
        assert!(highlight.alert);
        assert_eq!(highlight.sound, Some(Sound::Fallback));
        assert_eq!(highlight.color, Some(BLUE));
        assert!(!highlight.show_in_mentions);
    }

    #[test]
    fn incomplete_user_rule_lets_phrases_add() {
        let config = highlights(
            r##"
            [[users]]
            words = ["ann"]
            alert = true
            color = "#0000ff"

            [[match]]
            words = ["hello"]
            sound = true
            color = "#ff0000"
            show_in_mentions = true
            "##,
        );
        let context = Context::new(&config, None);

        let message = Message::new("#rust", "ann", "hello");

        let highlight = resolve(&message, &context);

        assert!(highlight.alert);
        assert_eq!(highlight.sound, Some(Sound::Fallback));
        assert_eq!(highlight.color, Some(RED));
        assert!(highlight.show_in_mentions);
    }

    #[test]
    fn later_user_rule_sound_overrides() {
        let config = highlights(
            r#"
            [[users]]
            words = ["ann"]
            sound = true

            [[users]]
            regex = "^a"
            sound = true
            sound_url = "file:///tmp/a.wav"
            "#,
        );
        let context = Context::new(&config, None);

        let highlight = resolve(&Message::new("#rust", "ann", "hi"), &context);

        assert_eq!(
            highlight.sound,
            Some(Sound::Custom(url("file:///tmp/a.wav")))
        );
        assert_eq!(highlight.color, Some(config.colors.highlight));
    }

    #[test]
    fn own_messages_skip_phrases_and_badges() {
        let config = highlights(
            r#"
            [self]
            enabled = true
            alert = true

            [[match]]
            words = ["hello"]
            alert = true

            [[badges]]
            badge = "broadcaster"
            alert = true
            "#,
        );
        let context = Context::new(&config, Some("Me"));

        let message = Message::new("#rust", "me", "hello me")
            .with_badges(vec![Badge::new("broadcaster", "1")]);

        assert_eq!(resolve(&message, &context), Highlight::default());
    }

    #[test]
    fn own_nick_highlight() {
        let config = highlights(
            r#"
            [self]
            enabled = true
            alert = true
            sound = true
            show_in_mentions = true
            "#,
        );
        let context = Context::new(&config, Some("me"));

        let message = Message::new("#rust", "ann", "hey ME!");
        let highlight = resolve(&message, &context);
        assert!(highlight.highlighted);
        assert!(highlight.alert);
        assert_eq!(highlight.sound, Some(Sound::Fallback));
        assert_eq!(highlight.color, Some(config.colors.self_highlight));
        assert!(highlight.show_in_mentions);

        let message = Message::new("#rust", "ann", "meme");
        let highlight = resolve(&message, &context);
        assert!(!highlight.highlighted);

        let anonymous = Context::new(&config, None);
        let message = Message::new("#rust", "ann", "hey me");
        let highlight = resolve(&message, &anonymous);
        assert!(!highlight.highlighted);
    }

    #[test]
    fn phrase_sound_does_not_override_earlier_sound() {
        let config = highlights(
            r#"
            [subscription]
            enabled = true
            sound = true
            sound_url = "file:///tmp/sub.wav"

            [[match]]
            words = ["hype"]
            alert = true
            sound = true
            sound_url = "file:///tmp/hype.wav"
            "#,
        );
        let context = Context::new(&config, None);

        let highlight = resolve(&sub("ann", "hype"), &context);

        assert!(highlight.alert);
        assert_eq!(
            highlight.sound,
            Some(Sound::Custom(url("file:///tmp/sub.wav")))
        );
    }

    #[test]
    fn first_matching_phrase_sets_sound() {
        let config = highlights(
            r##"
            [[match]]
            words = ["a"]
            sound = true
            sound_url = "file:///tmp/first.wav"
            color = "#ff0000"

            [[match]]
            words = ["b"]
            alert = true
            sound = true
            sound_url = "file:///tmp/second.wav"
            color = "#0000ff"
            "##,
        );
        let context = Context::new(&config, None);

        let highlight = resolve(&Message::new("#rust", "ann", "a b"), &context);

        assert!(highlight.alert);
        assert_eq!(
            highlight.sound,
            Some(Sound::Custom(url("file:///tmp/first.wav")))
        );
        assert_eq!(highlight.color, Some(BLUE));
    }

    #[test]
    fn badges() {
        let config = highlights(
            r##"
            [[badges]]
            badge = "subscriber/12"
            color = "#ff0000"

            [[badges]]
            badge = "moderator"
            alert = true
            sound = true
            color = "#0000ff"
            "##,
        );
        let context = Context::new(&config, None);

        let tests = [
            (vec![], Highlight::default()),
            (
                vec![Badge::new("subscriber", "6")],
                Highlight::default(),
            ),
            (
                vec![Badge::new("subscriber", "12")],
                Highlight {
                    highlighted: true,
                    color: Some(RED),
                    ..Highlight::default()
                },
            ),
            (
                vec![
                    Badge::new("moderator", "1"),
                    Badge::new("subscriber", "12"),
                ],
                Highlight {
                    highlighted: true,
                    alert: true,
                    sound: Some(Sound::Fallback),
                    color: Some(RED),
                    show_in_mentions: false,
                },
            ),
            (
                vec![Badge::new("moderator", "1")],
                Highlight {
                    highlighted: true,
                    alert: true,
                    sound: Some(Sound::Fallback),
                    color: Some(BLUE),
                    show_in_mentions: false,
                },
            ),
        ];

        for (badges, expected) in tests {
            let message =
                Message::new("#rust", "ann", "hi").with_badges(badges.clone());

            assert_eq!(resolve(&message, &context), expected, "{badges:?}");
        }
    }

    #[test]
    fn apply_sets_message_fields() {
        let config = highlights(
            r##"
            [[match]]
            words = ["hello"]
            color = "#ff0000"
            show_in_mentions = true
            "##,
        );
        let context = Context::new(&config, None);
        let mut message = Message::new("#rust", "ann", "hello");

        let highlight = resolve_and_apply(&mut message, &context);

        assert!(highlight.highlighted);
        assert!(
            message
                .flags
                .contains(Flags::HIGHLIGHTED | Flags::SHOW_IN_MENTIONS)
        );
        assert_eq!(message.highlight_color, Some(RED));
    }
}
