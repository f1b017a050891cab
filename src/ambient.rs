//! Ambient environments: background video, music and effect sounds
//!
//! [`MediaDirector`] follows the game's event stream and says what the page
//! should do with its media elements. It never blocks and never fails; a
//! rejected `play()` on the page side is the page's business.

use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::settings::{Settings, SettingsError};
use crate::sim::GameEvent;

/// Ambient theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    Jungle,
    Arctic,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Jungle => "jungle",
            Environment::Arctic => "arctic",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SettingsError> {
        match s.to_lowercase().as_str() {
            "jungle" => Ok(Environment::Jungle),
            "arctic" => Ok(Environment::Arctic),
            _ => Err(SettingsError::UnknownEnvironment(s.to_string())),
        }
    }

    pub fn video(&self) -> &'static str {
        match self {
            Environment::Jungle => "assets/video.mp4",
            Environment::Arctic => "assets/arctic.mp4",
        }
    }

    pub fn music(&self) -> &'static str {
        match self {
            Environment::Jungle => "assets/bg.mp3",
            Environment::Arctic => "assets/arctic_bg.mp3",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Environment::Jungle => Environment::Arctic,
            Environment::Arctic => Environment::Jungle,
        }
    }
}

/// Instruction for the page's media elements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum MediaCommand {
    PlayEffect { asset: &'static str, volume: f32 },
    PlayMusic { track: &'static str, volume: f32 },
    PauseMusic { track: &'static str },
    MuteMusic { track: &'static str, muted: bool },
    LoadVideo { source: &'static str },
    PlayVideo,
    PauseVideo,
}

/// Tracks started/paused/visible and turns events into media commands
#[derive(Debug, Clone)]
pub struct MediaDirector {
    settings: Settings,
    started: bool,
    paused: bool,
    visible: bool,
}

impl MediaDirector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            started: false,
            paused: false,
            visible: true,
        }
    }

    pub fn environment(&self) -> Environment {
        self.settings.environment
    }

    fn running(&self) -> bool {
        self.started && !self.paused
    }

    /// Music may play: running, page visible, sound on
    fn audible(&self) -> bool {
        self.running() && self.visible && self.settings.sound_enabled
    }

    /// Unmute and play the current track, muting the other one
    fn resume_music(&self, out: &mut Vec<MediaCommand>) {
        let env = self.settings.environment;
        out.push(MediaCommand::MuteMusic {
            track: env.music(),
            muted: false,
        });
        out.push(MediaCommand::MuteMusic {
            track: env.other().music(),
            muted: true,
        });
        out.push(MediaCommand::PlayMusic {
            track: env.music(),
            volume: self.settings.effective_music_volume(),
        });
    }

    pub fn handle(&mut self, event: &GameEvent) -> Vec<MediaCommand> {
        let mut out = Vec::new();
        let env = self.settings.environment;

        if let Some(effect) = SoundEffect::for_event(event) {
            if self.settings.sound_enabled {
                out.push(MediaCommand::PlayEffect {
                    asset: effect.asset(env),
                    volume: self.settings.effect_volume(effect.base_volume()),
                });
            }
            return out;
        }

        match *event {
            GameEvent::Started => {
                self.started = true;
                self.paused = false;
                out.push(MediaCommand::PlayVideo);
                if self.settings.sound_enabled {
                    self.resume_music(&mut out);
                }
            }
            GameEvent::Paused => {
                self.paused = true;
                out.push(MediaCommand::PauseMusic { track: env.music() });
                out.push(MediaCommand::PauseVideo);
            }
            GameEvent::Resumed => {
                self.paused = false;
                if self.audible() {
                    self.resume_music(&mut out);
                }
                out.push(MediaCommand::PlayVideo);
            }
            GameEvent::EnvironmentChanged { from, to } => {
                self.settings.environment = to;
                out.push(MediaCommand::LoadVideo { source: to.video() });
                if self.running() {
                    out.push(MediaCommand::PlayVideo);
                }
                out.push(MediaCommand::MuteMusic {
                    track: to.music(),
                    muted: false,
                });
                out.push(MediaCommand::MuteMusic {
                    track: from.music(),
                    muted: true,
                });
                if self.running() {
                    out.push(MediaCommand::PauseMusic {
                        track: from.music(),
                    });
                    if self.audible() {
                        out.push(MediaCommand::PlayMusic {
                            track: to.music(),
                            volume: self.settings.effective_music_volume(),
                        });
                    }
                }
            }
            GameEvent::SoundToggled { enabled } => {
                self.settings.sound_enabled = enabled;
                if enabled {
                    if self.audible() {
                        self.resume_music(&mut out);
                    } else {
                        out.push(MediaCommand::MuteMusic {
                            track: env.other().music(),
                            muted: true,
                        });
                    }
                } else {
                    for e in [Environment::Jungle, Environment::Arctic] {
                        out.push(MediaCommand::MuteMusic {
                            track: e.music(),
                            muted: true,
                        });
                    }
                }
            }
            GameEvent::VisibilityChanged { visible } => {
                self.visible = visible;
                if visible {
                    if self.audible() {
                        self.resume_music(&mut out);
                    }
                } else if self.started {
                    out.push(MediaCommand::PauseMusic { track: env.music() });
                }
            }
            _ => {}
        }
        out
    }

    /// The window regained focus. A focused window is a visible one.
    pub fn window_focused(&mut self) -> Vec<MediaCommand> {
        self.visible = true;
        let mut out = Vec::new();
        if self.audible() {
            self.resume_music(&mut out);
        }
        out
    }

    /// The background video reached its end; loop it while the game runs
    pub fn video_ended(&self) -> Vec<MediaCommand> {
        if self.running() {
            vec![MediaCommand::PlayVideo]
        } else {
            Vec::new()
        }
    }

    /// Handle a batch of events in order
    pub fn handle_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) -> Vec<MediaCommand> {
        events.into_iter().flat_map(|e| self.handle(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn spawned() -> GameEvent {
        GameEvent::Spawned {
            target: 1,
            pos: Vec2::ZERO,
            size: 200.0,
        }
    }

    #[test]
    fn test_parse_environment() {
        assert_eq!(Environment::parse("Arctic").unwrap(), Environment::Arctic);
        assert!(matches!(
            Environment::parse("desert"),
            Err(SettingsError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_start_plays_video_and_music() {
        let mut d = MediaDirector::new(&Settings::default());
        let cmds = d.handle(&GameEvent::Started);
        assert_eq!(cmds[0], MediaCommand::PlayVideo);
        assert!(cmds.contains(&MediaCommand::PlayMusic {
            track: "assets/bg.mp3",
            volume: 1.0
        }));
    }

    #[test]
    fn test_effects_follow_environment_and_mute() {
        let mut d = MediaDirector::new(&Settings::default());
        assert_eq!(
            d.handle(&spawned()),
            vec![MediaCommand::PlayEffect {
                asset: "assets/pop.mp3",
                volume: 0.6
            }]
        );

        d.handle(&GameEvent::EnvironmentChanged {
            from: Environment::Jungle,
            to: Environment::Arctic,
        });
        assert_eq!(
            d.handle(&spawned()),
            vec![MediaCommand::PlayEffect {
                asset: "assets/arctic_pop.mp3",
                volume: 0.6
            }]
        );

        d.handle(&GameEvent::SoundToggled { enabled: false });
        assert!(d.handle(&spawned()).is_empty());
    }

    #[test]
    fn test_environment_switch_while_running() {
        let mut d = MediaDirector::new(&Settings::default());
        d.handle(&GameEvent::Started);
        let cmds = d.handle(&GameEvent::EnvironmentChanged {
            from: Environment::Jungle,
            to: Environment::Arctic,
        });
        assert_eq!(
            cmds,
            vec![
                MediaCommand::LoadVideo {
                    source: "assets/arctic.mp4"
                },
                MediaCommand::PlayVideo,
                MediaCommand::MuteMusic {
                    track: "assets/arctic_bg.mp3",
                    muted: false
                },
                MediaCommand::MuteMusic {
                    track: "assets/bg.mp3",
                    muted: true
                },
                MediaCommand::PauseMusic {
                    track: "assets/bg.mp3"
                },
                MediaCommand::PlayMusic {
                    track: "assets/arctic_bg.mp3",
                    volume: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_environment_switch_on_title_only_loads() {
        let mut d = MediaDirector::new(&Settings::default());
        let cmds = d.handle(&GameEvent::EnvironmentChanged {
            from: Environment::Jungle,
            to: Environment::Arctic,
        });
        assert!(!cmds.contains(&MediaCommand::PlayVideo));
        assert!(!cmds.iter().any(|c| matches!(c, MediaCommand::PlayMusic { .. })));
    }

    #[test]
    fn test_pause_and_visibility() {
        let mut d = MediaDirector::new(&Settings::default());
        d.handle(&GameEvent::Started);
        let cmds = d.handle(&GameEvent::Paused);
        assert!(cmds.contains(&MediaCommand::PauseVideo));

        // Back to visible while paused: stay quiet
        d.handle(&GameEvent::VisibilityChanged { visible: false });
        let cmds = d.handle(&GameEvent::VisibilityChanged { visible: true });
        assert!(cmds.is_empty());

        let cmds = d.handle(&GameEvent::Resumed);
        assert_eq!(cmds.last(), Some(&MediaCommand::PlayVideo));
        let cmds = d.handle(&GameEvent::VisibilityChanged { visible: false });
        assert_eq!(
            cmds,
            vec![MediaCommand::PauseMusic {
                track: "assets/bg.mp3"
            }]
        );
    }

    #[test]
    fn test_hidden_page_stays_quiet() {
        let mut d = MediaDirector::new(&Settings::default());
        d.handle(&GameEvent::Started);
        d.handle(&GameEvent::Paused);
        d.handle(&GameEvent::VisibilityChanged { visible: false });

        // Resuming in a background tab restarts the video only
        let cmds = d.handle(&GameEvent::Resumed);
        assert_eq!(cmds, vec![MediaCommand::PlayVideo]);
        let cmds = d.handle(&GameEvent::SoundToggled { enabled: true });
        assert!(!cmds.iter().any(|c| matches!(c, MediaCommand::PlayMusic { .. })));

        let cmds = d.handle(&GameEvent::VisibilityChanged { visible: true });
        assert!(cmds.iter().any(|c| matches!(c, MediaCommand::PlayMusic { .. })));
    }

    #[test]
    fn test_focus_resumes_music_while_running() {
        let mut d = MediaDirector::new(&Settings::default());
        assert!(d.window_focused().is_empty());

        d.handle(&GameEvent::Started);
        let cmds = d.window_focused();
        assert_eq!(
            cmds.last(),
            Some(&MediaCommand::PlayMusic {
                track: "assets/bg.mp3",
                volume: 1.0
            })
        );

        d.handle(&GameEvent::Paused);
        assert!(d.window_focused().is_empty());
    }

    #[test]
    fn test_video_loops_only_while_running() {
        let mut d = MediaDirector::new(&Settings::default());
        assert!(d.video_ended().is_empty());
        d.handle(&GameEvent::Started);
        assert_eq!(d.video_ended(), vec![MediaCommand::PlayVideo]);
        d.handle(&GameEvent::Paused);
        assert!(d.video_ended().is_empty());
    }

    #[test]
    fn test_mute_silences_both_tracks() {
        let mut d = MediaDirector::new(&Settings::default());
        d.handle(&GameEvent::Started);
        let cmds = d.handle(&GameEvent::SoundToggled { enabled: false });
        assert_eq!(cmds.len(), 2);
        assert!(cmds.iter().all(|c| matches!(c, MediaCommand::MuteMusic { muted: true, .. })));
        let cmds = d.handle(&GameEvent::SoundToggled { enabled: true });
        assert!(cmds.iter().any(|c| matches!(c, MediaCommand::PlayMusic { .. })));
    }
}
