use super::*;

#[test]
fn pool_honors_bucket_cap() {
    let mut pool = FramePool::new(FramePoolOpts {
        max_pool_bytes: usize::MAX,
        max_buffers_per_bucket: 1,
    });

    let a = pool.borrow(8, 8);
    let b = pool.borrow(8, 8);
    pool.release(8, 8, a);
    pool.release(8, 8, b);

    let s = pool.stats();
    assert_eq!(s.retained_buffers, 1);
    assert_eq!(s.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let mut pool = FramePool::new(FramePoolOpts {
        max_pool_bytes: 8 * 8 * 4,
        max_buffers_per_bucket: 8,
    });

    let a = pool.borrow(8, 8);
    let b = pool.borrow(4, 4);
    pool.release(8, 8, a);
    pool.release(4, 4, b);

    let s = pool.stats();
    assert_eq!(s.retained_buffers, 1);
    assert_eq!(s.retained_bytes, 8 * 8 * 4);
    assert_eq!(s.dropped_on_release, 1);
}

#[test]
fn allocations_plateau_after_warm_up() {
    let mut pool = FramePool::new(FramePoolOpts::default());
    for _ in 0..3 {
        let a = pool.borrow(16, 16);
        let b = pool.borrow(16, 16);
        pool.release(16, 16, a);
        pool.release(16, 16, b);
    }
    let warm = pool.stats().alloc_buffers;
    for _ in 0..50 {
        let a = pool.borrow(16, 16);
        let b = pool.borrow(16, 16);
        pool.release(16, 16, a);
        pool.release(16, 16, b);
    }
    assert_eq!(pool.stats().alloc_buffers, warm);
    assert_eq!(warm, 2);
}

#[test]
fn reused_buffers_come_back_cleared() {
    let mut pool = FramePool::new(FramePoolOpts::default());
    let mut a = pool.borrow(2, 2);
    a.fill(200);
    pool.release(2, 2, a);
    assert!(pool.borrow(2, 2).iter().all(|&b| b == 0));
}

#[test]
fn foreign_sized_buffers_are_dropped() {
    let mut pool = FramePool::new(FramePoolOpts::default());
    pool.release(4, 4, vec![0; 3]);
    assert_eq!(pool.stats().dropped_on_release, 1);
    assert_eq!(pool.stats().retained_buffers, 0);
}
