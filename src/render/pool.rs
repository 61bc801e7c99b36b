use std::collections::HashMap;

/// Bounds for cached frame buffers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FramePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub(crate) max_pool_bytes: usize,
    /// Maximum retained buffers per `(width, height)` bucket.
    pub(crate) max_buffers_per_bucket: usize,
}

impl Default for FramePoolOpts {
    fn default() -> Self {
        Self {
            // Enough for a handful of 1080x1920 frames.
            max_pool_bytes: 96 * 1024 * 1024,
            max_buffers_per_bucket: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BufferKey {
    w: u32,
    h: u32,
}

impl BufferKey {
    fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(4)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FramePoolStats {
    pub(crate) retained_buffers: usize,
    pub(crate) retained_bytes: usize,
    pub(crate) alloc_buffers: u64,
    pub(crate) alloc_bytes: u64,
    pub(crate) dropped_on_release: u64,
}

/// Bounded pool of premultiplied RGBA8 frame buffers, bucketed by size.
///
/// Borrowed buffers are handed out zeroed (transparent).
#[derive(Debug)]
pub(crate) struct FramePool {
    opts: FramePoolOpts,
    stats: FramePoolStats,
    buckets: HashMap<BufferKey, Vec<Vec<u8>>>,
}

impl FramePool {
    pub(crate) fn new(opts: FramePoolOpts) -> Self {
        Self {
            opts,
            stats: FramePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    pub(crate) fn stats(&self) -> FramePoolStats {
        self.stats.clone()
    }

    /// Transparent `width x height` buffer, reused when one is cached.
    pub(crate) fn borrow(&mut self, width: u32, height: u32) -> Vec<u8> {
        let key = BufferKey {
            w: width,
            h: height,
        };
        if let Some(mut buf) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained_buffers = self.stats.retained_buffers.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            buf.fill(0);
            return buf;
        }

        self.stats.alloc_buffers = self.stats.alloc_buffers.saturating_add(1);
        self.stats.alloc_bytes = self.stats.alloc_bytes.saturating_add(key.byte_len() as u64);
        vec![0u8; key.byte_len()]
    }

    /// Return a buffer; it is dropped when a cap would be exceeded.
    pub(crate) fn release(&mut self, width: u32, height: u32, buf: Vec<u8>) {
        let key = BufferKey {
            w: width,
            h: height,
        };
        let bytes = key.byte_len();
        if buf.len() != bytes
            || self.opts.max_pool_bytes == 0
            || self.opts.max_buffers_per_bucket == 0
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_buffers_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        bucket.push(buf);
        self.stats.retained_buffers = self.stats.retained_buffers.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
