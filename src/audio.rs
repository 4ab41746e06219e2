use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use crate::config::AudioConfig;
use crate::game::SoundEffect;

type Sound = Buffered<Decoder<BufReader<File>>>;

/// Audio manager for playing sound effects
pub struct AudioManager {
    /// Kept alive for as long as sounds should play; None when audio is off
    output: Option<(OutputStream, OutputStreamHandle)>,
    /// Pre-loaded and buffered effects; missing files are simply absent
    sounds: HashMap<SoundEffect, Sound>,
    volume: f32,
}

impl AudioManager {
    /// Opens the default output device and pre-loads every effect.
    pub fn new(config: &AudioConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        let mut sounds = HashMap::new();
        for effect in SoundEffect::ALL {
            let path = config
                .asset_dir
                .join(format!("{}.wav", effect.asset_name()));
            match File::open(&path)
                .map_err(|e| e.to_string())
                .and_then(|file| Decoder::new(BufReader::new(file)).map_err(|e| e.to_string()))
            {
                Ok(source) => {
                    sounds.insert(effect, source.buffered());
                }
                Err(err) => log::warn!("sound {} unavailable: {}", path.display(), err),
            }
        }

        Ok(Self {
            output: Some((stream, stream_handle)),
            sounds,
            volume: config.volume,
        })
    }

    /// An audio manager that never makes a sound.
    pub fn silent() -> Self {
        Self {
            output: None,
            sounds: HashMap::new(),
            volume: 0.0,
        }
    }

    /// Builds from config, falling back to silence if the device or files fail.
    pub fn from_config(config: &AudioConfig) -> Self {
        if !config.enabled {
            log::info!("audio disabled");
            return Self::silent();
        }
        Self::new(config).unwrap_or_else(|err| {
            log::warn!("failed to initialize audio: {}; continuing without sound", err);
            Self::silent()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    /// Fire-and-forget playback; never blocks and never fails loudly.
    pub fn play(&self, effect: SoundEffect) {
        let (Some((_, handle)), Some(sound)) = (&self.output, self.sounds.get(&effect)) else {
            return;
        };
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(handle) {
            sink.set_volume(self.volume);
            // Clone the buffered source (fast - just clones references)
            sink.append(sound.clone());
            sink.detach();
        }
    }
}
