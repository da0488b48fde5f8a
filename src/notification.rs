use std::thread::JoinHandle;

use data::Config;
use data::audio::Source;
use data::notification;

pub use self::toast::prepare;

mod toast;

/// Sends highlight notifications to the desktop.
pub struct Sink {
    show_toast: bool,
    playing: Vec<JoinHandle<()>>,
}

impl Sink {
    pub fn new(config: &Config) -> Self {
        Self {
            show_toast: config.notifications.highlight.show_toast,
            playing: vec![],
        }
    }

    /// Waits for sounds still playing.
    pub fn finish(self) {
        for handle in self.playing {
            if handle.join().is_err() {
                log::error!("sound playback panicked");
            }
        }
    }
}

impl notification::Sink for Sink {
    #[cfg(feature = "audio")]
    fn play(&mut self, source: Source) {
        self.playing.push(crate::audio::play(source));
    }

    #[cfg(not(feature = "audio"))]
    fn play(&mut self, source: Source) {
        log::info!("playing {source:?} (audio support disabled)");
    }

    fn alert(&mut self, title: &str, body: &str) {
        if self.show_toast {
            toast::show(title, body);
        } else {
            log::info!("alert: {title}: {body}");
        }
    }
}
