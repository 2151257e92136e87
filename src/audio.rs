use std::io::{self, Write};

use crate::engine::Cue;
use crate::game::Sound;

/// Something that can voice the engine's sound cues
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
    fn set_music(&mut self, playing: bool);
    fn music_playing(&self) -> bool;

    /// Route a cue to the matching call; non-audio cues are ignored
    fn handle(&mut self, cue: &Cue) {
        match cue {
            Cue::Sound(sound) => self.play(*sound),
            Cue::StartMusic => self.set_music(true),
            Cue::StopMusic => self.set_music(false),
            Cue::Celebrate | Cue::Announce(_) => {}
        }
    }
}

/// Terminal bell for feedback sounds. Background music has no terminal
/// equivalent, so only its on/off state is tracked for the status line.
pub struct TerminalBell<W: Write> {
    out: W,
    music: bool,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out, music: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, sound: Sound) {
        let rings = match sound {
            Sound::Start => 0,
            Sound::Correct => 1,
            Sound::Incorrect => 2,
            Sound::Congrats => 3,
        };
        for _ in 0..rings {
            // a lost bell is not worth interrupting the game for
            let _ = self.out.write_all(b"\x07");
        }
        let _ = self.out.flush();
    }

    fn set_music(&mut self, playing: bool) {
        self.music = playing;
    }

    fn music_playing(&self) -> bool {
        self.music
    }
}

/// Keeps every sound it is asked to play; used by headless runs
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub played: Vec<Sound>,
    pub music: bool,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }

    fn set_music(&mut self, playing: bool) {
        self.music = playing;
    }

    fn music_playing(&self) -> bool {
        self.music
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_rings_per_sound() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(Sound::Start);
        bell.play(Sound::Incorrect);
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn cues_route_to_sink() {
        let mut sink = RecordingSink::default();
        sink.handle(&Cue::StartMusic);
        sink.handle(&Cue::Sound(Sound::Correct));
        sink.handle(&Cue::Celebrate);
        assert!(sink.music_playing());
        assert_eq!(sink.played, vec![Sound::Correct]);

        sink.handle(&Cue::StopMusic);
        assert!(!sink.music_playing());
    }
}
