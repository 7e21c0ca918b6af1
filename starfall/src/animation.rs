use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named player animation clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKey {
    Left,
    Turn,
    Right,
}

impl fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimationKey::Left => "left",
            AnimationKey::Turn => "turn",
            AnimationKey::Right => "right",
        };
        f.write_str(name)
    }
}

/// A sequence of spritesheet frames played at a fixed rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    /// Spritesheet frame indices, in playback order.
    pub frames: Vec<u32>,
    /// How long each frame lasts in seconds.
    pub frame_duration: f32,
    pub looping: bool,
}

impl Clip {
    pub fn new(frames: Vec<u32>, frame_rate: f32, looping: bool) -> Self {
        Self {
            frames,
            frame_duration: 1.0 / frame_rate,
            looping,
        }
    }

    /// Consecutive frames `start..=end` of a spritesheet grid.
    pub fn from_range(start: u32, end: u32, frame_rate: f32, looping: bool) -> Self {
        Self::new((start..=end).collect(), frame_rate, looping)
    }
}

/// Clip table for the 32x48 `dude` spritesheet.
pub fn player_clips() -> HashMap<AnimationKey, Clip> {
    HashMap::from([
        (AnimationKey::Left, Clip::from_range(0, 3, 10.0, true)),
        (AnimationKey::Turn, Clip::new(vec![4], 20.0, false)),
        (AnimationKey::Right, Clip::from_range(5, 8, 10.0, true)),
    ])
}

/// Plays one clip at a time out of a clip table.
#[derive(Clone, Debug)]
pub struct Animator {
    clips: HashMap<AnimationKey, Clip>,
    current: Option<AnimationKey>,
    current_frame_index: usize,
    timer: f32,
    playing: bool,
}

impl Animator {
    pub fn new(clips: HashMap<AnimationKey, Clip>) -> Self {
        Self {
            clips,
            current: None,
            current_frame_index: 0,
            timer: 0.0,
            playing: false,
        }
    }

    /// Start `key` from its first frame.
    ///
    /// With `ignore_if_playing` set, a clip that is already running keeps
    /// its position instead of restarting. Unknown keys are ignored.
    pub fn play(&mut self, key: AnimationKey, ignore_if_playing: bool) {
        if !self.clips.contains_key(&key) {
            log::warn!("No animation clip registered for '{key}'");
            return;
        }
        if ignore_if_playing && self.playing && self.current == Some(key) {
            return;
        }
        self.current = Some(key);
        self.current_frame_index = 0;
        self.timer = 0.0;
        self.playing = true;
    }

    pub fn update(&mut self, dt: f32) {
        let Some(clip) = self.current.and_then(|key| self.clips.get(&key)) else {
            return;
        };
        if !self.playing || clip.frames.is_empty() {
            return;
        }

        self.timer += dt;
        while self.playing && self.timer >= clip.frame_duration {
            self.timer -= clip.frame_duration;
            self.current_frame_index += 1;

            if self.current_frame_index >= clip.frames.len() {
                if clip.looping {
                    self.current_frame_index = 0;
                } else {
                    self.current_frame_index = clip.frames.len() - 1;
                    self.playing = false;
                }
            }
        }
    }

    pub fn current_key(&self) -> Option<AnimationKey> {
        self.current
    }

    /// Spritesheet frame currently shown.
    pub fn current_frame(&self) -> Option<u32> {
        let clip = self.clips.get(&self.current?)?;
        clip.frames.get(self.current_frame_index).copied()
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(player_clips())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_left_loops_over_first_four_frames() {
        let mut anim = Animator::default();
        anim.play(AnimationKey::Left, true);

        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(anim.current_frame().unwrap());
            anim.update(0.1);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn ignore_if_playing_keeps_position() {
        let mut anim = Animator::default();
        anim.play(AnimationKey::Right, true);
        anim.update(0.25);
        assert_eq!(anim.current_frame(), Some(7));

        anim.play(AnimationKey::Right, true);
        assert_eq!(anim.current_frame(), Some(7));

        anim.play(AnimationKey::Right, false);
        assert_eq!(anim.current_frame(), Some(5));
    }

    #[test]
    fn turn_is_a_single_held_frame() {
        let mut anim = Animator::default();
        anim.play(AnimationKey::Turn, false);
        anim.update(1.0);
        assert_eq!(anim.current_key(), Some(AnimationKey::Turn));
        assert_eq!(anim.current_frame(), Some(4));
        anim.update(1.0);
        assert_eq!(anim.current_frame(), Some(4));
    }

    #[test]
    fn switching_clips_restarts_at_first_frame() {
        let mut anim = Animator::default();
        anim.play(AnimationKey::Left, true);
        anim.update(0.2);
        anim.play(AnimationKey::Right, true);
        assert_eq!(anim.current_frame(), Some(5));
    }
}
