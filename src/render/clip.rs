use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use crate::assets::media::{ClipInfo, decode_clip_frames_rgba8, probe_clip};
use crate::foundation::error::ReelResult;
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::model::media::ClipRef;

const CACHE_CAPACITY: usize = 64;
const PREFETCH_FRAMES: u32 = 12;

/// Decoded premultiplied clip frame.
#[derive(Clone, Debug)]
pub(crate) struct ClipFrame {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// Frame cache over one clip, keyed by source frame index, filled in prefetch batches and
/// evicted least-recently-used.
pub(crate) struct ClipDecoder {
    info: ClipInfo,
    known_duration: Option<Duration>,
    frame_cache: HashMap<u64, Arc<Vec<u8>>>,
    lru: VecDeque<u64>,
    capacity: usize,
    prefetch_frames: u32,
}

impl ClipDecoder {
    /// Probe `clip` and prepare an empty cache.
    pub(crate) fn open(clip: &ClipRef) -> ReelResult<Self> {
        let info = probe_clip(&clip.path)?;
        tracing::debug!(
            path = %clip.path.display(),
            width = info.width,
            height = info.height,
            fps = info.source_fps(),
            "opened clip"
        );
        let known_duration = clip
            .duration
            .or((!info.duration.is_zero()).then_some(info.duration));
        Ok(Self {
            info,
            known_duration,
            frame_cache: HashMap::new(),
            lru: VecDeque::new(),
            capacity: CACHE_CAPACITY,
            prefetch_frames: PREFETCH_FRAMES,
        })
    }

    /// Clip length used for looping, when known.
    pub(crate) fn duration(&self) -> Option<Duration> {
        self.known_duration
    }

    /// Frame at `source_time` inside the clip.
    pub(crate) fn frame_at(&mut self, source_time: Duration) -> ReelResult<ClipFrame> {
        let key = self.key_for_time(source_time);
        if let Some(data) = self.cached(key) {
            return Ok(data);
        }
        self.prefetch_for_key(key)?;
        if let Some(data) = self.cached(key) {
            return Ok(data);
        }

        // Sparse request outside the prefetched batch.
        let frames = decode_clip_frames_rgba8(&self.info, source_time, 1)?;
        let mut rgba = frames.into_iter().next().unwrap_or_else(|| {
            vec![0u8; self.info.width as usize * self.info.height as usize * 4]
        });
        premultiply_rgba8_in_place(&mut rgba);
        let data = Arc::new(rgba);
        self.insert_frame(key, data.clone());
        Ok(self.wrap(data))
    }

    fn cached(&mut self, key: u64) -> Option<ClipFrame> {
        let data = self.frame_cache.get(&key).cloned()?;
        self.touch(key);
        Some(self.wrap(data))
    }

    fn wrap(&self, rgba8_premul: Arc<Vec<u8>>) -> ClipFrame {
        ClipFrame {
            width: self.info.width,
            height: self.info.height,
            rgba8_premul,
        }
    }

    fn step_secs(&self) -> f64 {
        let fps = self.info.source_fps();
        if fps.is_finite() && fps > 0.0 {
            1.0 / fps
        } else {
            0.001
        }
    }

    /// Cache key: index of the source frame shown at `t`.
    fn key_for_time(&self, t: Duration) -> u64 {
        (t.as_secs_f64() / self.step_secs()).floor().max(0.0) as u64
    }

    fn prefetch_for_key(&mut self, key: u64) -> ReelResult<()> {
        let batch = u64::from(self.prefetch_frames.max(1));
        let first = key / batch * batch;
        let start = Duration::from_secs_f64(first as f64 * self.step_secs());
        let frames = decode_clip_frames_rgba8(&self.info, start, self.prefetch_frames)?;

        for (offset, mut rgba) in frames.into_iter().enumerate() {
            let key = first + offset as u64;
            if self.frame_cache.contains_key(&key) {
                self.touch(key);
                continue;
            }
            premultiply_rgba8_in_place(&mut rgba);
            self.insert_frame(key, Arc::new(rgba));
        }
        Ok(())
    }

    fn insert_frame(&mut self, key: u64, data: Arc<Vec<u8>>) {
        self.frame_cache.insert(key, data);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.frame_cache.remove(&old);
            }
        }
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}
