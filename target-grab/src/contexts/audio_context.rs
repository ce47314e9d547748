/// Handle to a clip owned by the host's audio mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipHandle(pub u32);

/// Collects the one-shot clips that should start playing this frame.
/// The host drains them and hands them to its mixer.
#[derive(Debug, Clone, Default)]
pub struct AudioContext {
    /// Played when the correct object is grabbed, if set
    pub correct_clip: Option<ClipHandle>,
    /// Fallback when no `correct_clip` has been set
    pub default_clip: Option<ClipHandle>,
    clips_this_frame: Vec<ClipHandle>,
}

impl AudioContext {
    pub fn new(correct_clip: Option<ClipHandle>, default_clip: Option<ClipHandle>) -> Self {
        Self {
            correct_clip,
            default_clip,
            clips_this_frame: Vec::new(),
        }
    }

    pub fn play(&mut self, clip: ClipHandle) {
        self.clips_this_frame.push(clip);
    }

    /// Play the "correct object" cue, returning the clip that was chosen.
    pub fn play_correct_cue(&mut self) -> Option<ClipHandle> {
        let clip = self.correct_clip.or(self.default_clip)?;
        self.play(clip);
        Some(clip)
    }

    pub fn clips_this_frame(&self) -> &[ClipHandle] {
        &self.clips_this_frame
    }

    pub fn drain_clips(&mut self) -> Vec<ClipHandle> {
        std::mem::take(&mut self.clips_this_frame)
    }
}
