//! Session-owned audio playback.
//!
//! A session owns exactly one [`PlaybackSlot`]. Starting new audio always
//! stops whatever is playing, and dropping the slot stops it too, so two
//! answers can never be read out over each other.

use crate::errors::DocSearchResult;

/// An audio output device.
pub trait AudioPlayer {
    /// Start playing the audio at `url`.
    fn play(&mut self, url: &str) -> DocSearchResult<()>;

    /// Stop the current playback.
    fn stop(&mut self) -> DocSearchResult<()>;
}

/// Player for environments without audio output. Accepts every request.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play(&mut self, url: &str) -> DocSearchResult<()> {
        tracing::debug!(url, "Silent playback");
        Ok(())
    }

    fn stop(&mut self) -> DocSearchResult<()> {
        Ok(())
    }
}

/// The single playback handle of a session.
#[derive(Debug)]
pub struct PlaybackSlot<P: AudioPlayer> {
    player: P,
    current: Option<String>,
}

impl<P: AudioPlayer> PlaybackSlot<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            current: None,
        }
    }

    /// URL of the audio currently playing.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Stop any current playback, then play `url`.
    pub fn play(&mut self, url: &str) -> DocSearchResult<()> {
        self.stop()?;
        self.player.play(url)?;
        self.current = Some(url.to_string());
        Ok(())
    }

    /// Stop the current playback. Does nothing when idle.
    pub fn stop(&mut self) -> DocSearchResult<()> {
        if let Some(url) = self.current.take() {
            tracing::debug!(url = %url, "Stopping playback");
            self.player.stop()?;
        }
        Ok(())
    }
}

impl<P: AudioPlayer> Drop for PlaybackSlot<P> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DocSearchError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every call into a shared log.
    #[derive(Clone, Default)]
    struct RecordingPlayer {
        log: Rc<RefCell<Vec<String>>>,
        fail_play: bool,
    }

    impl AudioPlayer for RecordingPlayer {
        fn play(&mut self, url: &str) -> DocSearchResult<()> {
            if self.fail_play {
                return Err(DocSearchError::Playback("no device".into()));
            }
            self.log.borrow_mut().push(format!("play {url}"));
            Ok(())
        }

        fn stop(&mut self) -> DocSearchResult<()> {
            self.log.borrow_mut().push("stop".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_play_replaces_current() {
        let player = RecordingPlayer::default();
        let log = player.log.clone();
        let mut slot = PlaybackSlot::new(player);

        slot.play("a.mp3").unwrap();
        slot.play("b.mp3").unwrap();
        assert_eq!(slot.current(), Some("b.mp3"));
        assert_eq!(*log.borrow(), vec!["play a.mp3", "stop", "play b.mp3"]);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let player = RecordingPlayer::default();
        let log = player.log.clone();
        let mut slot = PlaybackSlot::new(player);
        slot.stop().unwrap();
        assert!(!slot.is_playing());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_drop_stops_playback() {
        let player = RecordingPlayer::default();
        let log = player.log.clone();
        {
            let mut slot = PlaybackSlot::new(player);
            slot.play("a.mp3").unwrap();
        }
        assert_eq!(*log.borrow(), vec!["play a.mp3", "stop"]);
    }

    #[test]
    fn test_failed_play_leaves_slot_idle() {
        let player = RecordingPlayer {
            fail_play: true,
            ..Default::default()
        };
        let mut slot = PlaybackSlot::new(player);
        let err = slot.play("a.mp3").unwrap_err();
        assert!(matches!(err, DocSearchError::Playback(_)));
        assert!(!slot.is_playing());
    }

    #[test]
    fn test_silent_player() {
        let mut slot = PlaybackSlot::new(SilentPlayer);
        slot.play("x").unwrap();
        assert!(slot.is_playing());
        slot.stop().unwrap();
        assert!(!slot.is_playing());
    }
}
