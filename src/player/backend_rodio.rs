use super::AudioBackend;
use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use std::{fs::File, path::Path, time::Duration};

/// Plays through the default output device.
pub struct RodioBackend {
    sink: Sink,
    _stream: OutputStream,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            sink,
            _stream: stream,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn play(&mut self, path: &Path, start: Duration) -> Result<()> {
        let file = File::open(path)?;
        let source = Decoder::try_from(file)?;

        self.sink.clear();
        self.sink.append(source);
        if !start.is_zero() {
            self.sink.try_seek(start).map_err(|e| anyhow::anyhow!("{e}"))?;
        }
        self.sink.play();

        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.clear();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.sink.try_seek(position).map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn is_stopped(&self) -> bool {
        self.sink.empty()
    }
}
