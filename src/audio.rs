use std::fs::File;
use std::io::{self, BufReader};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use data::audio::Source;
use rodio::source::{SineWave, Source as _};
use rodio::{Decoder, OutputStreamBuilder, Sink};
use url::Url;

const PING_FREQUENCY: f32 = 880.0;
const PING_DURATION: Duration = Duration::from_millis(150);

pub fn play(source: Source) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = _play(source) {
            log::error!("Failed to play sound: {e}");
        }
    })
}

fn _play(source: Source) -> Result<(), PlayError> {
    let mut stream_handle = OutputStreamBuilder::open_default_stream()?;
    stream_handle.log_on_drop(false);
    let sink = Sink::connect_new(stream_handle.mixer());

    match source {
        Source::File(path) => {
            let file = File::open(&path)?;
            sink.append(Decoder::new(BufReader::new(file))?);
        }
        Source::Url(url) => return Err(PlayError::Unsupported(url)),
        Source::Ping => {
            sink.append(
                SineWave::new(PING_FREQUENCY)
                    .take_duration(PING_DURATION)
                    .amplify(0.2),
            );
        }
    }

    sink.sleep_until_end();

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error(transparent)]
    Decoding(Arc<rodio::decoder::DecoderError>),
    #[error(transparent)]
    StreamInitialization(Arc<rodio::StreamError>),
    #[error(transparent)]
    Io(Arc<io::Error>),
    #[error("only local sound files can be played: {0}")]
    Unsupported(Url),
}

impl From<rodio::decoder::DecoderError> for PlayError {
    fn from(error: rodio::decoder::DecoderError) -> Self {
        Self::Decoding(Arc::new(error))
    }
}

impl From<rodio::StreamError> for PlayError {
    fn from(error: rodio::StreamError) -> Self {
        Self::StreamInitialization(Arc::new(error))
    }
}

impl From<io::Error> for PlayError {
    fn from(error: io::Error) -> Self {
        Self::Io(Arc::new(error))
    }
}
